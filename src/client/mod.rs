//! Typed client for the resource tester service.

use std::time::Duration;

use tonic::transport::{Channel, Endpoint};
use tonic::{Request, Status};

use crate::service::{TestResourceRequest, TestResourceResponse, WebResourceTesterServiceClient};

/// Status code and latency reported by the service for one resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeOutcome {
    pub status_code: i32,
    pub duration_millis: i32,
}

impl From<TestResourceResponse> for ProbeOutcome {
    fn from(response: TestResourceResponse) -> Self {
        ProbeOutcome {
            status_code: response.status_code,
            duration_millis: response.request_duration,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ResourceTesterClient {
    inner: WebResourceTesterServiceClient<Channel>,
}

impl ResourceTesterClient {
    /// Connect to a server, e.g. `http://localhost:50055`.
    pub async fn connect(endpoint: impl Into<String>) -> Result<Self, tonic::transport::Error> {
        let channel = Endpoint::from_shared(endpoint.into())?.connect().await?;
        Ok(Self::new(channel))
    }

    pub fn new(channel: Channel) -> Self {
        Self {
            inner: WebResourceTesterServiceClient::new(channel),
        }
    }

    /// Probe `resource` through the blocking `TestResource` RPC.
    /// `deadline` bounds how long the caller waits, server side included.
    pub async fn test_resource(
        &self,
        resource: &str,
        deadline: Option<Duration>,
    ) -> Result<ProbeOutcome, Status> {
        let response = self
            .inner
            .clone()
            .test_resource(probe_request(resource, deadline))
            .await?;
        Ok(response.into_inner().into())
    }

    /// Probe `resource` through the non-blocking `TestResourceAsync` RPC.
    pub async fn test_resource_async(
        &self,
        resource: &str,
        deadline: Option<Duration>,
    ) -> Result<ProbeOutcome, Status> {
        let response = self
            .inner
            .clone()
            .test_resource_async(probe_request(resource, deadline))
            .await?;
        Ok(response.into_inner().into())
    }
}

fn probe_request(resource: &str, deadline: Option<Duration>) -> Request<TestResourceRequest> {
    let mut request = Request::new(TestResourceRequest {
        resource_uri: resource.to_string(),
    });
    if let Some(deadline) = deadline {
        request.set_timeout(deadline);
    }
    request
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::deadline::caller_deadline;

    #[test]
    fn test_probe_request_carries_deadline() {
        let request = probe_request("example.com", Some(Duration::from_secs(5)));
        assert_eq!(request.get_ref().resource_uri, "example.com");
        assert_eq!(caller_deadline(request.metadata()), Some(Duration::from_secs(5)));

        let request = probe_request("example.com", None);
        assert_eq!(caller_deadline(request.metadata()), None);
    }
}
