use anyhow::{Context, Result};
use clap::Parser;
use jobspy_web::config::{ConfigSource, ServerSettings, DEFAULT_CONFIG_PATH};
use jobspy_web::{start_web_server, AppConfig};
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::info;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "jobspy-web")]
#[command(about = "Web front end for multi-site job searches")]
struct Args {
    /// Configuration file (optional, defaults apply when missing)
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    #[arg(long)]
    host: Option<String>,

    #[arg(long)]
    port: Option<u16>,

    /// Verbose logging
    #[arg(long)]
    debug: bool,
}

fn init_logging(server: &ServerSettings) -> Result<()> {
    let default_filter = if server.debug {
        "jobspy_web=DEBUG,rocket::server=OFF"
    } else {
        "jobspy_web=INFO,rocket::server=OFF"
    };

    let file_layer = match &server.log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            Some(
                fmt::layer()
                    .json()
                    .with_writer(Mutex::new(file))
                    .with_current_span(false)
                    .with_span_list(false),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(file_layer)
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let (mut config, source) = AppConfig::load(&args.config)?;
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    config.server.debug |= args.debug;

    init_logging(&config.server)?;

    info!("Environment: {}", AppConfig::get_environment());
    match source {
        ConfigSource::File(path) => info!("Loaded configuration from {}", path.display()),
        ConfigSource::Defaults => info!("{} not found, using defaults", args.config.display()),
    }
    info!("Debug mode: {}", config.server.debug);

    start_web_server(config).await
}
