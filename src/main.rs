use anyhow::Result;
use ferrum_lite::{Server, ServerConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ServerConfig::from_env(std::env::args().nth(1))?;

    let mut server = Server::new();
    if let Some(password) = &config.password {
        server.require_auth(password.as_str());
        info!("AUTH required");
    }
    server.start_addr(&config.addr).await?;

    tokio::signal::ctrl_c().await?;
    info!("Shutting down");

    server.close().await;
    server.store().save()?;
    Ok(())
}
