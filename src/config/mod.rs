//! Environment-backed configuration.
//!
//! Every setting has a default. Override with `TRIAGE_*` environment variables.

pub mod error;


pub use error::ConfigError;

use std::env;
use std::net::IpAddr;
use std::path::{Path, PathBuf};

use crate::constants::{
    DEFAULT_ARTIFACT_DIR, DEFAULT_FEEDBACK_FILE, DEFAULT_MODEL_FILE, DEFAULT_VECTORIZER_FILE,
};
use crate::gatekeeper::GateConfig;

/// Server configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `TRIAGE_*` overrides on top of defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port. Default: `8080`.
    pub port: u16,

    /// IP address to bind to. Default: `127.0.0.1`.
    pub bind_addr: IpAddr,

    /// Primary location of the vectorizer artifact. Default: `vectorizer.json`.
    pub vectorizer_path: PathBuf,

    /// Primary location of the classifier artifact. Default: `model.json`.
    pub model_path: PathBuf,

    /// Fallback directory searched when a primary artifact path is absent.
    /// Default: `./artifacts`.
    pub artifact_dir: PathBuf,

    /// Show remediation suggestions next to predictions. Default: `true`.
    pub suggestions_enabled: bool,

    /// Optional JSON object (`label -> text`) replacing the built-in suggestions.
    pub suggestions_path: Option<PathBuf>,

    /// Accept and persist user feedback. Default: `false`.
    pub feedback_enabled: bool,

    /// Append-only JSON-lines feedback file. Default: `feedback.jsonl`.
    pub feedback_path: PathBuf,

    /// Prediction gate thresholds.
    pub gate: GateConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            bind_addr: IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)),
            vectorizer_path: PathBuf::from(DEFAULT_VECTORIZER_FILE),
            model_path: PathBuf::from(DEFAULT_MODEL_FILE),
            artifact_dir: PathBuf::from(DEFAULT_ARTIFACT_DIR),
            suggestions_enabled: true,
            suggestions_path: None,
            feedback_enabled: false,
            feedback_path: PathBuf::from(DEFAULT_FEEDBACK_FILE),
            gate: GateConfig::default(),
        }
    }
}

impl Config {
    const ENV_PORT: &'static str = "TRIAGE_PORT";
    const ENV_BIND_ADDR: &'static str = "TRIAGE_BIND_ADDR";
    const ENV_VECTORIZER_PATH: &'static str = "TRIAGE_VECTORIZER_PATH";
    const ENV_MODEL_PATH: &'static str = "TRIAGE_MODEL_PATH";
    const ENV_ARTIFACT_DIR: &'static str = "TRIAGE_ARTIFACT_DIR";
    const ENV_SUGGESTIONS: &'static str = "TRIAGE_SUGGESTIONS";
    const ENV_SUGGESTIONS_PATH: &'static str = "TRIAGE_SUGGESTIONS_PATH";
    const ENV_FEEDBACK: &'static str = "TRIAGE_FEEDBACK";
    const ENV_FEEDBACK_PATH: &'static str = "TRIAGE_FEEDBACK_PATH";
    const ENV_MIN_INPUT_CHARS: &'static str = "TRIAGE_MIN_INPUT_CHARS";
    const ENV_MIN_FEATURES: &'static str = "TRIAGE_MIN_FEATURES";
    const ENV_CONFIDENCE_THRESHOLD: &'static str = "TRIAGE_CONFIDENCE_THRESHOLD";
    const ENV_TOP_K: &'static str = "TRIAGE_TOP_K";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = Self::parse_port_from_env(defaults.port)?;
        let bind_addr = Self::parse_bind_addr_from_env(defaults.bind_addr)?;
        let vectorizer_path =
            Self::parse_path_from_env(Self::ENV_VECTORIZER_PATH, defaults.vectorizer_path);
        let model_path = Self::parse_path_from_env(Self::ENV_MODEL_PATH, defaults.model_path);
        let artifact_dir = Self::parse_path_from_env(Self::ENV_ARTIFACT_DIR, defaults.artifact_dir);
        let suggestions_enabled =
            Self::parse_flag_from_env(Self::ENV_SUGGESTIONS, defaults.suggestions_enabled)?;
        let suggestions_path = Self::parse_optional_path_from_env(Self::ENV_SUGGESTIONS_PATH);
        let feedback_enabled =
            Self::parse_flag_from_env(Self::ENV_FEEDBACK, defaults.feedback_enabled)?;
        let feedback_path =
            Self::parse_path_from_env(Self::ENV_FEEDBACK_PATH, defaults.feedback_path);

        let gate = GateConfig {
            min_input_chars: Self::parse_number_from_env(
                Self::ENV_MIN_INPUT_CHARS,
                defaults.gate.min_input_chars,
            )?,
            min_features: Self::parse_number_from_env(
                Self::ENV_MIN_FEATURES,
                defaults.gate.min_features,
            )?,
            confidence_threshold: Self::parse_number_from_env(
                Self::ENV_CONFIDENCE_THRESHOLD,
                defaults.gate.confidence_threshold,
            )?,
            top_k: Self::parse_number_from_env(Self::ENV_TOP_K, defaults.gate.top_k)?,
        };

        Ok(Self {
            port,
            bind_addr,
            vectorizer_path,
            model_path,
            artifact_dir,
            suggestions_enabled,
            suggestions_path,
            feedback_enabled,
            feedback_path,
            gate,
        })
    }

    /// Validates paths and gate thresholds (does not load artifacts).
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.gate
            .validate()
            .map_err(|reason| ConfigError::InvalidGate { reason })?;

        if self.artifact_dir.exists() && !self.artifact_dir.is_dir() {
            return Err(ConfigError::NotADirectory {
                path: self.artifact_dir.clone(),
            });
        }

        if self.suggestions_enabled
            && let Some(ref path) = self.suggestions_path
        {
            if !path.exists() {
                return Err(ConfigError::PathNotFound { path: path.clone() });
            }
            if !path.is_file() {
                return Err(ConfigError::NotAFile { path: path.clone() });
            }
        }

        if self.feedback_enabled && self.feedback_path.is_dir() {
            return Err(ConfigError::NotAFile {
                path: self.feedback_path.clone(),
            });
        }

        Ok(())
    }

    /// Returns `"{bind_addr}:{port}"` (useful for logging/binding).
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    /// Candidate locations for the vectorizer artifact, in lookup order.
    pub fn vectorizer_candidates(&self) -> Vec<PathBuf> {
        Self::candidates(&self.vectorizer_path, &self.artifact_dir, DEFAULT_VECTORIZER_FILE)
    }

    /// Candidate locations for the classifier artifact, in lookup order.
    pub fn model_candidates(&self) -> Vec<PathBuf> {
        Self::candidates(&self.model_path, &self.artifact_dir, DEFAULT_MODEL_FILE)
    }

    fn candidates(primary: &Path, dir: &Path, default_name: &str) -> Vec<PathBuf> {
        let file_name = primary
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| default_name.into());
        let fallback = dir.join(file_name);

        let mut out = vec![primary.to_path_buf()];
        if fallback != primary {
            out.push(fallback);
        }
        out
    }

    fn parse_port_from_env(default: u16) -> Result<u16, ConfigError> {
        match env::var(Self::ENV_PORT) {
            Ok(value) => {
                let port: u16 = value.parse().map_err(|e| ConfigError::PortParseError {
                    value: value.clone(),
                    source: e,
                })?;

                if port == 0 {
                    return Err(ConfigError::InvalidPort { value });
                }

                Ok(port)
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_bind_addr_from_env(default: IpAddr) -> Result<IpAddr, ConfigError> {
        match env::var(Self::ENV_BIND_ADDR) {
            Ok(value) => value
                .parse()
                .map_err(|e| ConfigError::InvalidBindAddr { value, source: e }),
            Err(_) => Ok(default),
        }
    }

    fn parse_path_from_env(var_name: &str, default: PathBuf) -> PathBuf {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or(default)
    }

    fn parse_optional_path_from_env(var_name: &str) -> Option<PathBuf> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
    }

    fn parse_flag_from_env(name: &'static str, default: bool) -> Result<bool, ConfigError> {
        match env::var(name) {
            Ok(value) => match value.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => Ok(true),
                "0" | "false" | "no" | "off" => Ok(false),
                _ => Err(ConfigError::InvalidFlag { name, value }),
            },
            Err(_) => Ok(default),
        }
    }

    fn parse_number_from_env<T: std::str::FromStr>(
        name: &'static str,
        default: T,
    ) -> Result<T, ConfigError> {
        match env::var(name) {
            Ok(value) => value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidNumber { name, value }),
            Err(_) => Ok(default),
        }
    }
}
