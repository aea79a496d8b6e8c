use anyhow::Context;

use hireboard_api::config::ApiConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    hireboard_observability::init();

    let config = ApiConfig::from_env().context("invalid configuration")?;

    let app = hireboard_api::app::build_app(&config)
        .await
        .context("failed to initialise stores")?;

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
