use tonic::{Request, Response, Status};

use super::deadline::caller_deadline;
use super::resourcetester::web_resource_tester_service_server::{
    WebResourceTesterService, WebResourceTesterServiceServer,
};
use super::resourcetester::{TestResourceRequest, TestResourceResponse};
use crate::http_probe::prelude::*;

const ASYNC_FAILURE_PREFIX: &str = "http client request error: ";

/// Handles both probe RPCs with one shared [`Prober`].
#[derive(Debug, Clone)]
pub struct ResourceTesterService {
    prober: Prober,
}

impl ResourceTesterService {
    pub fn new(prober: Prober) -> Self {
        Self { prober }
    }

    pub fn into_server(self) -> WebResourceTesterServiceServer<Self> {
        WebResourceTesterServiceServer::new(self)
    }
}

impl From<ProbeResult> for TestResourceResponse {
    fn from(result: ProbeResult) -> Self {
        TestResourceResponse {
            status_code: i32::from(result.status_code),
            request_duration: result.duration_millis(),
        }
    }
}

impl From<ProbeError> for Status {
    fn from(err: ProbeError) -> Self {
        match err {
            ProbeError::InvalidResource(_) => Status::invalid_argument(err.to_string()),
            ProbeError::UpstreamFailure(_) => Status::internal(err.to_string()),
        }
    }
}

fn parse_resource(resource: &str) -> Result<Locator, Status> {
    normalize(resource).map_err(|err| {
        tracing::debug!(resource, "Rejected resource");
        Status::from(err)
    })
}

fn log_outcome(locator: &Locator, outcome: &Result<ProbeResult, ProbeError>) {
    match outcome {
        Ok(result) => tracing::info!(
            url = %result.url,
            status = result.status_code,
            duration_ms = result.duration_millis(),
            "Probe completed"
        ),
        Err(err) => tracing::warn!(url = %locator, error = %err, "Probe failed"),
    }
}

#[tonic::async_trait]
impl WebResourceTesterService for ResourceTesterService {
    async fn test_resource(
        &self,
        request: Request<TestResourceRequest>,
    ) -> Result<Response<TestResourceResponse>, Status> {
        let deadline = caller_deadline(request.metadata());
        let resource = request.into_inner().resource_uri;
        tracing::debug!(%resource, ?deadline, "TestResource");

        let locator = parse_resource(&resource)?;
        let timeout = self.prober.options().effective_timeout(deadline);

        let prober = self.prober.clone();
        let target = locator.clone();
        let outcome = tokio::task::spawn_blocking(move || prober.probe(&target, timeout))
            .await
            .map_err(|e| {
                tracing::warn!(url = %locator, error = %e, "Blocking probe did not finish");
                Status::internal(format!("probe interrupted: {e}"))
            })?;

        log_outcome(&locator, &outcome);
        Ok(Response::new(outcome?.into()))
    }

    async fn test_resource_async(
        &self,
        request: Request<TestResourceRequest>,
    ) -> Result<Response<TestResourceResponse>, Status> {
        let deadline = caller_deadline(request.metadata());
        let resource = request.into_inner().resource_uri;
        tracing::debug!(%resource, ?deadline, "TestResourceAsync");

        let locator = parse_resource(&resource)?;
        let timeout = self.prober.options().effective_timeout(deadline);

        let outcome = self.prober.probe_async(&locator, timeout).await;

        log_outcome(&locator, &outcome);
        match outcome {
            Ok(result) => Ok(Response::new(result.into())),
            Err(err @ ProbeError::UpstreamFailure(_)) => {
                Err(Status::internal(format!("{ASYNC_FAILURE_PREFIX}{err}")))
            }
            Err(err) => Err(err.into()),
        }
    }
}
