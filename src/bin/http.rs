#[cfg(feature = "http_api")]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    use bunk_tracker::{AppConfig, Tracker, http_api, logging};

    logging::init("info");
    let config = AppConfig::from_env()?;
    let tracker = Tracker::open(config.open_store()?)?;

    tracing::info!(addr = %config.http_addr, "bunk-tracker HTTP API listening");
    http_api::serve(config.http_addr, tracker).await?;
    Ok(())
}

#[cfg(not(feature = "http_api"))]
fn main() {
    eprintln!("Rebuild with the `http_api` feature to enable the HTTP server.");
}
