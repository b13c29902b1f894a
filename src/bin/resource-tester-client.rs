use std::time::Duration;

use clap::Parser;

use resource_tester::client::{ProbeOutcome, ResourceTesterClient};
use resource_tester::logging;

const DEFAULT_RESOURCE: &str = "market.hankuper.com";

/// Demo client: probes each resource through both RPCs and logs the results.
#[derive(Debug, Parser)]
#[command(name = "resource-tester-client", version)]
struct Args {
    /// Server to connect to
    #[arg(long, default_value = "http://localhost:50055")]
    endpoint: String,

    /// Deadline for each call, in milliseconds
    #[arg(long, default_value_t = 5000)]
    deadline_ms: u64,

    /// URLs or bare hostnames to probe [default: market.hankuper.com]
    resources: Vec<String>,
}

fn log_result(rpc: &str, resource: &str, result: Result<ProbeOutcome, tonic::Status>) {
    match result {
        Ok(outcome) => tracing::info!(
            rpc,
            resource,
            status_code = outcome.status_code,
            duration_ms = outcome.duration_millis,
            "Probe succeeded"
        ),
        Err(status) => tracing::warn!(
            rpc,
            resource,
            code = ?status.code(),
            detail = status.message(),
            "Probe failed"
        ),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    logging::init_logging();

    tracing::info!(endpoint = %args.endpoint, "Client started");

    let client = ResourceTesterClient::connect(args.endpoint.clone()).await?;
    let deadline = Some(Duration::from_millis(args.deadline_ms));

    let resources = if args.resources.is_empty() {
        vec![DEFAULT_RESOURCE.to_string()]
    } else {
        args.resources
    };

    for resource in &resources {
        log_result(
            "TestResource",
            resource,
            client.test_resource(resource, deadline).await,
        );
        log_result(
            "TestResourceAsync",
            resource,
            client.test_resource_async(resource, deadline).await,
        );
    }

    tracing::info!("Shutting down client channel");
    drop(client);
    Ok(())
}
