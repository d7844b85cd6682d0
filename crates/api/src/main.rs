use std::sync::Arc;

use anyhow::Context;

use stockroom_api::app::{self, services};
use stockroom_api::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = AppConfig::load().context("failed to load configuration")?;
    stockroom_observability::init_with(cfg.log.format);

    let service = services::build_service(&cfg.database)
        .await
        .context("failed to open entity store")?;
    let app = app::build_app(Arc::new(service));

    let addr = cfg.server.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
