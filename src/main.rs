use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use kutty_port::api;
use kutty_port::auth::identity::{load_grants, StaticTokenProvider};
use kutty_port::config::{Config, LogFormat};
use kutty_port::error::AppError;
use kutty_port::state::AppState;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let config = Config::from_env()?;

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(config.log_level.clone()))
        .with_target(false);
    match config.log_format {
        LogFormat::Compact => subscriber.compact().init(),
        LogFormat::Json => subscriber.json().init(),
    }

    let identity = Arc::new(StaticTokenProvider::new());
    let app_state = Arc::new(AppState::new(
        identity.clone(),
        config.status_transitions,
        config.event_buffer_size,
    ));

    if let Some(path) = &config.auth_tokens_file {
        let grants = load_grants(path)?;
        for grant in &grants {
            identity.grant(grant.token.clone(), grant.identity());
            if let Some(role) = grant.role {
                let user = app_state.users.get_or_create(&grant.identity())?;
                app_state.users.set_role(user.id, role)?;
            }
        }
        tracing::info!(grants = grants.len(), path = %path.display(), "token grants loaded");
    } else {
        tracing::warn!("AUTH_TOKENS_FILE not set; every authenticated request will be rejected");
    }

    let app = api::rest::router_with_site(app_state.clone(), &config.static_dir);

    let bind_addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .map_err(|err| AppError::Internal(format!("failed to bind {bind_addr}: {err}")))?;

    tracing::info!(
        http_port = config.http_port,
        status_transitions = ?config.status_transitions,
        "http server started"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|err| AppError::Internal(format!("server error: {err}")))?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
    }
}
