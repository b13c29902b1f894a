//! Caller deadline as carried by the `grpc-timeout` request header.

use std::time::Duration;

use tonic::metadata::MetadataMap;

const GRPC_TIMEOUT_HEADER: &str = "grpc-timeout";

/// Longest `TimeoutValue` the gRPC wire format allows.
const MAX_TIMEOUT_DIGITS: usize = 8;

/// The deadline the caller attached to this request, if any.
/// A malformed header is treated as no deadline.
pub fn caller_deadline(metadata: &MetadataMap) -> Option<Duration> {
    metadata
        .get(GRPC_TIMEOUT_HEADER)?
        .to_str()
        .ok()
        .and_then(parse_grpc_timeout)
}

/// Parses `TimeoutValue TimeoutUnit`, e.g. `5000m` or `30S`.
pub fn parse_grpc_timeout(value: &str) -> Option<Duration> {
    if !value.is_ascii() || value.len() < 2 {
        return None;
    }

    let (digits, unit) = value.split_at(value.len() - 1);
    if digits.len() > MAX_TIMEOUT_DIGITS || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let amount: u64 = digits.parse().ok()?;

    let duration = match unit {
        "H" => Duration::from_secs(amount * 60 * 60),
        "M" => Duration::from_secs(amount * 60),
        "S" => Duration::from_secs(amount),
        "m" => Duration::from_millis(amount),
        "u" => Duration::from_micros(amount),
        "n" => Duration::from_nanos(amount),
        _ => return None,
    };

    Some(duration)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_units() {
        assert_eq!(parse_grpc_timeout("2H"), Some(Duration::from_secs(7200)));
        assert_eq!(parse_grpc_timeout("3M"), Some(Duration::from_secs(180)));
        assert_eq!(parse_grpc_timeout("30S"), Some(Duration::from_secs(30)));
        assert_eq!(parse_grpc_timeout("5000m"), Some(Duration::from_secs(5)));
        assert_eq!(parse_grpc_timeout("250u"), Some(Duration::from_micros(250)));
        assert_eq!(parse_grpc_timeout("99999999n"), Some(Duration::from_nanos(99_999_999)));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for value in ["", "m", "10", "10s", "10 S", "-1S", "123456789S", "1.5S", "5é"] {
            assert_eq!(parse_grpc_timeout(value), None, "{value:?}");
        }
    }

    #[test]
    fn test_caller_deadline_from_metadata() {
        let mut metadata = MetadataMap::new();
        assert_eq!(caller_deadline(&metadata), None);

        metadata.insert(GRPC_TIMEOUT_HEADER, "1500m".parse().unwrap());
        assert_eq!(caller_deadline(&metadata), Some(Duration::from_millis(1500)));

        metadata.insert(GRPC_TIMEOUT_HEADER, "soon".parse().unwrap());
        assert_eq!(caller_deadline(&metadata), None);
    }
}
