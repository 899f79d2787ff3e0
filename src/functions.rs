// Standard library
use std::error::Error;
use std::sync::Arc;

// 3rd party crates
use tokio_util::sync::CancellationToken;
use tracing::info;

// Project imports
use crate::provider::BunnyCdnProvider;
use crate::server::functions::run_stdio;
use crate::settings::ConfigManager;

/// Main application loop: serves the host over stdio until it stops us or
/// `shutdown` is cancelled.
pub async fn run(
    config: Arc<ConfigManager>,
    shutdown: CancellationToken,
) -> Result<(), Box<dyn Error>> {
    let settings = config.get_settings().await.clone();
    info!(
        version = env!("CARGO_PKG_VERSION"),
        base_url = %settings.api.base_url,
        "Starting BunnyCDN provider"
    );

    let provider = BunnyCdnProvider::new(env!("CARGO_PKG_VERSION"), settings);
    run_stdio(provider, shutdown).await?;

    info!("Shutdown complete.");
    Ok(())
}
