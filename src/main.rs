use anyhow::Context;
use clap::Parser;
use inkstamp::config::Config;
use inkstamp::fetcher::{AssetFetcher, LocalAssetFetcher, S3AssetFetcher};
use inkstamp::handler::{ApiRequest, WatermarkHandler};
use inkstamp::server::WatermarkServer;
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

/// Inkstamp - composites a fixed watermark onto images served from S3
#[derive(Parser, Debug)]
#[command(name = "inkstamp")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to a YAML configuration file (default: read the environment)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen address override
    #[arg(long)]
    address: Option<String>,

    /// Listen port override
    #[arg(short, long)]
    port: Option<u16>,

    /// Serve assets from this directory instead of S3
    #[arg(long)]
    local_root: Option<PathBuf>,

    /// Handle one API gateway event from FILE ("-" for stdin), print the
    /// response as JSON and exit
    #[arg(long, value_name = "FILE")]
    invoke: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => Config::from_env().context("Failed to load configuration from environment")?,
    };
    apply_overrides(&mut config, &args);
    config.validate().context("Invalid configuration")?;

    inkstamp::logging::init_subscriber(&config.logging)
        .context("Failed to initialize logging subsystem")?;

    let missing = config.storage.missing_fields();
    if !missing.is_empty() {
        tracing::warn!(
            missing = ?missing,
            "Storage settings are empty; requests will fail until they are set"
        );
    }

    tracing::info!(
        config_file = ?args.config,
        bucket = %config.storage.bucket_name,
        watermark = %config.storage.watermark_image_name,
        local_root = ?config.storage.local_root,
        "Configuration loaded successfully"
    );

    let fetcher: Arc<dyn AssetFetcher> = match &config.storage.local_root {
        Some(root) => Arc::new(LocalAssetFetcher::new(root.clone())),
        None => Arc::new(S3AssetFetcher::from_env().await),
    };
    let handler = Arc::new(WatermarkHandler::new(fetcher, &config.storage));

    if let Some(source) = &args.invoke {
        return invoke_once(&handler, source).await;
    }

    let addr = config.server.socket_addr()?;
    let server = WatermarkServer::bind(addr, handler)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    server.serve(shutdown_signal()).await?;

    tracing::info!("Server stopped");
    Ok(())
}

fn apply_overrides(config: &mut Config, args: &Args) {
    if let Some(address) = &args.address {
        config.server.address = address.clone();
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(root) = &args.local_root {
        config.storage.local_root = Some(root.clone());
    }
}

async fn invoke_once(handler: &WatermarkHandler, source: &str) -> anyhow::Result<()> {
    let event = if source == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read event from stdin")?;
        buf
    } else {
        tokio::fs::read_to_string(source)
            .await
            .with_context(|| format!("Failed to read event file {source}"))?
    };

    let request: ApiRequest = serde_json::from_str(&event).context("Invalid event JSON")?;
    let response = handler.handle(&request).await;
    println!("{}", serde_json::to_string(&response)?);
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl-C; running until killed");
        std::future::pending::<()>().await;
    }
}
