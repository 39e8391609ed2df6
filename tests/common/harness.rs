//! Spawns the full router on an ephemeral port.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use tempfile::TempDir;
use tokio::net::TcpListener;

use triage::feedback::FeedbackLog;
use triage::gatekeeper::{GateConfig, Gatekeeper};
use triage::gateway::{HandlerState, create_router_with_state};
use triage::model::ModelArtifacts;
use triage::suggestions::SuggestionTable;

use super::fixtures::write_artifacts;

#[derive(Debug, Clone)]
pub struct TestServerConfig {
    pub gate: GateConfig,
    pub suggestions: bool,
    pub feedback: bool,
}

impl Default for TestServerConfig {
    fn default() -> Self {
        Self {
            gate: GateConfig::default(),
            suggestions: true,
            feedback: true,
        }
    }
}

pub struct TestServer {
    addr: SocketAddr,
    feedback_path: PathBuf,
    _dir: TempDir,
}

impl TestServer {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn feedback_path(&self) -> &PathBuf {
        &self.feedback_path
    }
}

pub async fn spawn_test_server(config: TestServerConfig) -> anyhow::Result<TestServer> {
    let dir = TempDir::new()?;
    let (vectorizer_path, model_path) = write_artifacts(dir.path())?;

    let artifacts = ModelArtifacts::load(&[vectorizer_path], &[model_path])?;
    let (vectorizer, classifier) = artifacts.into_parts();
    let gatekeeper = Gatekeeper::new(vectorizer, classifier, config.gate)?;

    let feedback_path = dir.path().join("feedback.jsonl");
    let mut state = HandlerState::new(Arc::new(gatekeeper));
    if config.suggestions {
        state = state.with_suggestions(SuggestionTable::builtin());
    }
    if config.feedback {
        state = state.with_feedback(FeedbackLog::new(feedback_path.clone()));
    }

    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let app = create_router_with_state(state);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    Ok(TestServer {
        addr,
        feedback_path,
        _dir: dir,
    })
}
