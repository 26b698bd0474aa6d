use std::sync::Arc;

use anyhow::Context;

use signet_api::app::{AppServices, build_app};
use signet_api::config::AppConfig;
use signet_api::provider::InMemoryIdentityProvider;
use signet_auth::TokenIssuer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    signet_observability::init();

    // Signing misconfiguration is fatal: refuse to start rather than fail
    // per-request.
    let config = AppConfig::from_env().context("invalid configuration")?;
    let issuer = TokenIssuer::new(config.token.clone());

    let services = AppServices {
        // Dev wiring; a deployment substitutes its real identity provider.
        provider: Arc::new(InMemoryIdentityProvider::new()),
        issuer,
    };

    let app = build_app(services);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
