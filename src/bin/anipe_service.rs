use anipe::config::build_context;
use anipe::server::{self, ServiceKind};
use anipe::utils::{logger, validation::Validate};
use anipe::AnipeConfig;
use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;

/// Serves one pipeline stage (or all of them) over HTTP.
#[derive(Debug, Parser)]
#[command(name = "anipe-service")]
struct ServiceArgs {
    /// opportunity, product, sales-page, social or all
    #[arg(long, env = "ANIPE_SERVICE", default_value = "all")]
    service: ServiceKind,

    #[arg(long)]
    config: Option<PathBuf>,

    /// Overrides server.port / $PORT
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = ServiceArgs::parse();
    logger::init_service_logger();

    let mut config =
        AnipeConfig::load(args.config.as_deref()).context("failed to load configuration")?;
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let ctx = build_context(&config)
        .await
        .context("failed to initialize services")?;
    server::serve(args.service, ctx, &config.server.host, config.server.port)
        .await
        .with_context(|| format!("{} stopped", args.service))?;
    Ok(())
}
