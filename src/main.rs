//! Symptom triage HTTP server entrypoint.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use mimalloc::MiMalloc;
use tokio::net::TcpListener;
use tokio::signal;

use triage::config::Config;
use triage::feedback::FeedbackLog;
use triage::gatekeeper::Gatekeeper;
use triage::gateway::{HandlerState, create_router_with_state};
use triage::model::{ModelArtifacts, ProbabilisticClassifier, TextVectorizer};
use triage::suggestions::SuggestionTable;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if std::env::args().any(|arg| arg == "--health-check") {
        std::process::exit(run_health_check().await);
    }

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;
    config.validate()?;
    let addr = SocketAddr::new(config.bind_addr, config.port);

    tracing::info!(
        bind_addr = %config.bind_addr,
        port = config.port,
        threshold = config.gate.confidence_threshold,
        "Symptom triage starting"
    );

    let artifacts = ModelArtifacts::load(&config.vectorizer_candidates(), &config.model_candidates())
        .inspect_err(|e| tracing::error!(error = %e, "Failed to load model artifacts"))?;
    let (vectorizer, classifier) = artifacts.into_parts();
    tracing::info!(
        features = vectorizer.n_features(),
        classes = classifier.classes().len(),
        "Model loaded"
    );

    let gatekeeper = Gatekeeper::new(vectorizer, classifier, config.gate)?;
    let mut state = HandlerState::new(Arc::new(gatekeeper));

    if config.suggestions_enabled {
        let table = match &config.suggestions_path {
            Some(path) => SuggestionTable::load(path)?,
            None => SuggestionTable::builtin(),
        };
        tracing::info!(entries = table.len(), "Suggestions enabled");
        state = state.with_suggestions(table);
    }

    if config.feedback_enabled {
        tracing::info!(path = %config.feedback_path.display(), "Feedback logging enabled");
        state = state.with_feedback(FeedbackLog::new(config.feedback_path.clone()));
    }

    let app = create_router_with_state(state);

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(addr = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Symptom triage shutdown complete");
    Ok(())
}

async fn run_health_check() -> i32 {
    let port = std::env::var("TRIAGE_PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(8080);

    let url = format!("http://127.0.0.1:{}/healthz", port);

    let Ok(client) = reqwest::Client::builder()
        .timeout(Duration::from_secs(1))
        .build()
    else {
        return 1;
    };

    match client.get(&url).send().await {
        Ok(res) if res.status().is_success() => 0,
        _ => 1,
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
