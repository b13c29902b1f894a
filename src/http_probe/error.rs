use thiserror::Error;

/// Failure of a single probe.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProbeError {
    /// The resource could not be turned into a locator, even with an `https://` prefix.
    /// Carries the resource exactly as the caller supplied it.
    #[error("invalid resource locator: {0}")]
    InvalidResource(String),

    /// The outbound HTTP call did not complete.
    #[error("{0}")]
    UpstreamFailure(String),
}

impl ProbeError {
    pub fn upstream(err: &(dyn std::error::Error + 'static)) -> Self {
        ProbeError::UpstreamFailure(super::report(err))
    }
}
