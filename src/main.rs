// Standard library
use std::process::ExitCode;
use std::sync::Arc;

// 3rd party crates
use tokio::signal::ctrl_c;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::filter::{Directive, LevelFilter};
use tracing_subscriber::EnvFilter;

// Project imports
use terraform_provider_bunnycdn::functions::run;
use terraform_provider_bunnycdn::settings::ConfigManager;

/// Crates whose own logging is too chatty for a provider session.
const QUIET_CRATES: [&str; 4] = ["hyper_util=error", "hyper=error", "reqwest=error", "rustls=error"];

/// Entry point of the BunnyCDN provider.
///
/// Stdout belongs to the host protocol, so all logging goes to stderr.
#[tokio::main]
async fn main() -> ExitCode {
    // loads the .env file from the current directory or parents.
    dotenvy::dotenv_override().ok();

    let config: Arc<ConfigManager> = match ConfigManager::new() {
        Ok(config) => Arc::new(config),
        Err(e) => {
            eprintln!("Failed to initialize configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // setup logging.
    let log_level: String = config.get_log_level().await;

    let filter: EnvFilter = QUIET_CRATES
        .iter()
        .filter_map(|directive| directive.parse::<Directive>().ok())
        .fold(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::ERROR.into())
                .parse_lossy(log_level),
            EnvFilter::add_directive,
        );

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_level(true)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    info!("⚙️ Settings have been loaded.");

    let shutdown = CancellationToken::new();
    let signal_token = shutdown.clone();

    // Handle Ctrl+C
    tokio::spawn(async move {
        if let Err(e) = ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            return;
        }
        info!("Received shutdown signal, initiating graceful shutdown...");
        signal_token.cancel();
    });

    if let Err(e) = run(config, shutdown).await {
        error!("Application error: {}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
