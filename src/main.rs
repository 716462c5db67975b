use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod aggregate;
mod config;
mod engine;
mod engines;
mod error;
mod pipeline;
mod preprocessing;
mod server;

#[derive(Parser, Debug)]
#[command(name = "handwriting-ocr-server")]
#[command(about = "Handwriting recognition server for chat-bot front-ends")]
#[command(version)]
pub struct Args {
    /// Host address to bind to
    #[arg(long, env = "OCR_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "OCR_PORT", default_value = "9292")]
    pub port: u16,

    /// Primary recognition language (e.g. "si", "en")
    #[arg(long, env = "OCR_PRIMARY_LANGUAGE", default_value = "si")]
    pub primary_language: String,

    /// Secondary recognition language
    #[arg(long, env = "OCR_SECONDARY_LANGUAGE", default_value = "en")]
    pub secondary_language: String,

    /// Minimum confidence (exclusive) for a detection to be kept
    #[arg(
        long,
        env = "OCR_CONFIDENCE_THRESHOLD",
        default_value_t = aggregate::DEFAULT_CONFIDENCE_THRESHOLD
    )]
    pub confidence_threshold: f32,

    /// Maximum upload size in bytes (default: 20MB)
    #[arg(long, env = "OCR_MAX_FILE_SIZE", default_value = "20971520")]
    pub max_file_size: usize,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| args.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = config::Config::from(args);

    tracing::info!(
        "Starting handwriting-ocr-server v{}",
        env!("CARGO_PKG_VERSION")
    );
    tracing::info!("Binding to {}:{}", config.host, config.port);

    server::run(config).await
}
