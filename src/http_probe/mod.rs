pub mod error;
pub mod locator;
pub mod probe;
pub mod result;

pub mod prelude {
    pub use super::error::ProbeError;
    pub use super::locator::{Locator, normalize};
    pub use super::probe::{ProbeOptions, Prober};
    pub use super::result::ProbeResult;
}

use std::fmt::Write;

/// Renders an error together with its whole `source()` chain.
///
/// reqwest hides the interesting part ("connection refused", "operation timed out")
/// a couple of levels down, so the top-level `Display` alone is rarely useful.
pub fn report(mut err: &(dyn std::error::Error + 'static)) -> String {
    let mut s = format!("{}", err);
    while let Some(src) = err.source() {
        let _ = write!(s, "\n\nCaused by: {}", src);
        err = src;
    }
    s
}
