use std::path::PathBuf;

use clap::Parser;

use resource_tester::config::{AppConfig, load_config};
use resource_tester::http_probe::prelude::Prober;
use resource_tester::logging;
use resource_tester::server::{self, shutdown_signal};
use resource_tester::service::ResourceTesterService;

/// gRPC service that probes web resources over HTTP.
#[derive(Debug, Parser)]
#[command(name = "resource-tester", version)]
struct Args {
    /// YAML configuration file [default: $CONFIG_FILE, then config.yml]
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to listen on, e.g. 0.0.0.0:50055
    #[arg(short, long)]
    listen: Option<String>,

    /// Seconds in-flight requests get to finish after a shutdown signal
    #[arg(long)]
    grace_period_secs: Option<u64>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    dotenvy::dotenv().ok();
    logging::init_logging();

    let mut server_config = load_config(args.config.as_deref())?;
    if let Some(listen) = args.listen {
        server_config.listen_address = listen;
    }
    if let Some(secs) = args.grace_period_secs {
        server_config.shutdown_grace_period_seconds = secs;
    }
    let config = AppConfig::try_from(server_config)?;

    tracing::info!(
        listen_address = %config.listen_address,
        grace_period_secs = config.shutdown_grace_period.as_secs(),
        probe_timeout = ?config.probe.timeout,
        follow_redirects = config.probe.follow_redirects,
        "Configuration loaded"
    );

    let prober = Prober::new(config.probe.clone())?;
    let service = ResourceTesterService::new(prober);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let listener = std::net::TcpListener::bind(config.listen_address)?;
    server::run(
        runtime,
        service,
        listener,
        config.shutdown_grace_period,
        shutdown_signal(),
    )?;

    tracing::info!("Shutdown complete");
    Ok(())
}
