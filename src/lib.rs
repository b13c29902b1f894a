//! Resource tester: a gRPC service that issues an HTTP GET against a URL or bare
//! hostname and reports the status code and how long the request took.
//!
//! - [`http_probe`]: locator normalization and the timed HTTP probe
//! - [`service`]: the `WebResourceTesterService` gRPC handler
//! - [`server`]: serving with bounded graceful shutdown
//! - [`client`]: typed client used by the demo binary
//! - [`config`], [`logging`]: ambient setup for the binaries

pub mod client;
pub mod config;
pub mod http_probe;
pub mod logging;
pub mod server;
pub mod service;
