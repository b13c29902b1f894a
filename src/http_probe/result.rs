use std::time::Duration;

use url::Url;

/// Outcome of a probe that received an HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResult {
    pub url: Url,
    pub status_code: u16,
    pub duration: Duration,
}

impl ProbeResult {
    /// Elapsed milliseconds as carried on the wire, saturating at `i32::MAX`.
    pub fn duration_millis(&self) -> i32 {
        i32::try_from(self.duration.as_millis()).unwrap_or(i32::MAX)
    }
}
