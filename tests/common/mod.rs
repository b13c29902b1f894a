//! Shared fixtures: a local HTTP upstream to probe and an in-process gRPC server.
#![allow(dead_code)]

use std::convert::Infallible;
use std::future::Future;
use std::net::SocketAddr;
use std::time::Duration;

use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use resource_tester::client::ResourceTesterClient;
use resource_tester::http_probe::prelude::*;
use resource_tester::server::{self, ServerError};
use resource_tester::service::ResourceTesterService;

/// Start an HTTP/1.1 upstream on an ephemeral port.
///
/// - `/status/{code}` answers with `code`
/// - `/redirect` answers 301 with `Location: /status/200`
/// - `/slow/{millis}` answers 200 after sleeping
/// - anything else answers 404
pub async fn start_upstream() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((stream, _)) => {
                    tokio::spawn(async move {
                        let _ = http1::Builder::new()
                            .serve_connection(TokioIo::new(stream), service_fn(respond))
                            .await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

async fn respond(request: Request<Incoming>) -> Result<Response<String>, Infallible> {
    let path = request.uri().path().to_string();

    let response = if let Some(code) = path.strip_prefix("/status/") {
        let status = code
            .parse::<u16>()
            .ok()
            .and_then(|code| StatusCode::from_u16(code).ok())
            .unwrap_or(StatusCode::BAD_REQUEST);
        Response::builder().status(status).body(String::new())
    } else if path == "/redirect" {
        Response::builder()
            .status(StatusCode::MOVED_PERMANENTLY)
            .header("location", "/status/200")
            .body(String::new())
    } else if let Some(millis) = path.strip_prefix("/slow/") {
        let millis = millis.parse().unwrap_or(0);
        tokio::time::sleep(Duration::from_millis(millis)).await;
        Response::builder()
            .status(StatusCode::OK)
            .body("finally".to_string())
    } else {
        Response::builder()
            .status(StatusCode::NOT_FOUND)
            .body(String::new())
    };

    Ok(response.unwrap())
}

/// An address with nothing listening on it.
pub async fn closed_port() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

/// gRPC server running on an ephemeral port, stopped through [`TestServer::shutdown`].
pub struct TestServer {
    pub endpoint: String,
    stop: oneshot::Sender<()>,
    handle: JoinHandle<Result<(), ServerError>>,
}

impl TestServer {
    pub async fn client(&self) -> ResourceTesterClient {
        ResourceTesterClient::connect(self.endpoint.clone())
            .await
            .unwrap()
    }

    /// Signal shutdown and wait for `serve` to return.
    pub async fn shutdown(self) -> Result<(), ServerError> {
        let _ = self.stop.send(());
        within(Duration::from_secs(10), self.handle).await.unwrap()
    }
}

pub async fn start_service(options: ProbeOptions) -> TestServer {
    start_service_with_grace(options, Duration::from_secs(5)).await
}

pub async fn start_service_with_grace(options: ProbeOptions, grace_period: Duration) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let service = ResourceTesterService::new(Prober::new(options).unwrap());

    let (stop, stop_rx) = oneshot::channel::<()>();
    let handle = tokio::spawn(server::serve(service, listener, grace_period, async move {
        let _ = stop_rx.await;
    }));

    TestServer {
        endpoint: format!("http://{addr}"),
        stop,
        handle,
    }
}

/// Fail the test instead of hanging when `future` does not finish in time.
pub async fn within<F: Future>(limit: Duration, future: F) -> F::Output {
    tokio::time::timeout(limit, future)
        .await
        .expect("operation did not finish in time")
}
