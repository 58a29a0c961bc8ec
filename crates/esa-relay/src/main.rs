mod config;
mod error;
mod search;
mod server;

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use esa_common::esa::EsaClient;

use config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    info!("starting esa relay server");

    // Fail fast before binding anything if credentials are missing.
    let config = Config::from_env().inspect_err(|e| {
        tracing::error!(error = %e, "required environment variables are not set");
    })?;
    info!(
        team = %config.team_name,
        api_base_url = %config.api_base_url,
        bind = %config.bind_addr(),
        "configuration loaded"
    );

    let esa = EsaClient::new(config.esa_client_config())?;
    let app = server::router(esa);

    let listener = TcpListener::bind(config.bind_addr()).await?;
    info!(
        url = %format!("http://localhost:{}", config.port),
        "server started"
    );
    axum::serve(listener, app).await?;
    Ok(())
}
