//! gRPC surface of the resource tester.
//!
//! ```text
//! TestResourceRequest ─▶ normalize ─▶ probe (blocking pool)  ─┐
//!                                 └─▶ probe_async (task)     ─┴─▶ TestResourceResponse | Status
//! ```

pub mod deadline;
pub mod handler;

pub mod resourcetester {
    tonic::include_proto!("resourcetester");
}

pub use handler::ResourceTesterService;
pub use resourcetester::web_resource_tester_service_client::WebResourceTesterServiceClient;
pub use resourcetester::web_resource_tester_service_server::WebResourceTesterServiceServer;
pub use resourcetester::{TestResourceRequest, TestResourceResponse};
