//! gRPC server lifecycle.
//!
//! ```text
//! bind ─▶ serve ─▶ shutdown future resolves ─▶ stop accepting ─▶ drain (≤ grace period) ─▶ return
//!                                                                      └─ elapsed ─▶ abandon
//! ```
//!
//! [`run`] wraps this for the binary: once `serve` returns, the runtime is shut
//! down without waiting for blocking probes that outlived the grace period.

pub mod signals;

use std::future::Future;
use std::net::TcpListener as StdTcpListener;
use std::time::Duration;

use thiserror::Error;
use tokio::net::TcpListener;
use tokio::runtime::Runtime;
use tokio::sync::oneshot;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::transport::Server;

use crate::service::ResourceTesterService;

pub use signals::shutdown_signal;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("gRPC transport error: {0}")]
    Transport(#[from] tonic::transport::Error),

    #[error("server task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Serve `service` on `listener` until `shutdown` resolves.
///
/// After `shutdown` resolves no new requests are accepted and in-flight requests get
/// `grace_period` to finish. Past that `serve` returns anyway and the remaining
/// connections are left to die with the process.
pub async fn serve<F>(
    service: ResourceTesterService,
    listener: TcpListener,
    grace_period: Duration,
    shutdown: F,
) -> Result<(), ServerError>
where
    F: Future<Output = ()>,
{
    let address = listener.local_addr()?;
    let (stop_tx, stop_rx) = oneshot::channel::<()>();

    let mut server = tokio::spawn(
        Server::builder()
            .add_service(service.into_server())
            .serve_with_incoming_shutdown(TcpListenerStream::new(listener), async move {
                let _ = stop_rx.await;
            }),
    );

    tracing::info!(address = %address, "Server started");

    tokio::select! {
        joined = &mut server => {
            joined??;
            tracing::info!("Server stopped");
            return Ok(());
        }
        _ = shutdown => {}
    }

    tracing::info!(
        grace_period_secs = grace_period.as_secs_f64(),
        "Shutdown requested, draining in-flight requests"
    );
    let _ = stop_tx.send(());

    match tokio::time::timeout(grace_period, &mut server).await {
        Ok(joined) => {
            joined??;
            tracing::info!("Server stopped");
        }
        Err(_) => {
            tracing::warn!("Grace period elapsed, abandoning remaining requests");
            server.abort();
        }
    }

    Ok(())
}

/// Drive [`serve`] to completion on `runtime`, then shut the runtime down.
///
/// Dropping a runtime waits for every `spawn_blocking` task, and a blocking
/// probe without a timeout can run forever. The runtime is therefore released in
/// the background, so returning from here is bounded by `grace_period`.
pub fn run<F>(
    runtime: Runtime,
    service: ResourceTesterService,
    listener: StdTcpListener,
    grace_period: Duration,
    shutdown: F,
) -> Result<(), ServerError>
where
    F: Future<Output = ()>,
{
    listener.set_nonblocking(true)?;

    let result = runtime.block_on(async {
        let listener = TcpListener::from_std(listener)?;
        serve(service, listener, grace_period, shutdown).await
    });

    runtime.shutdown_background();
    result
}
