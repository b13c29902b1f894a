use std::fmt;

use url::Url;

use super::error::ProbeError;

const DEFAULT_SCHEME_PREFIX: &str = "https://";

/// A fully qualified address, scheme included, that a probe can be issued against.
///
/// Held in `url`'s serialized form, so an empty HTTP path becomes `/`:
/// `example.com` is `https://example.com/`. The request sent is the same.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locator(Url);

impl Locator {
    pub fn as_url(&self) -> &Url {
        &self.0
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}

/// Turns a caller supplied resource (full URL or bare host) into a [`Locator`].
///
/// Input that already names a scheme is parsed as is. Anything else is parsed
/// with an `https://` prefix. `host:port` input counts as having no scheme.
pub fn normalize(resource: &str) -> Result<Locator, ProbeError> {
    let invalid = || ProbeError::InvalidResource(resource.to_string());

    if resource.is_empty() || !has_valid_uri_characters(resource) {
        return Err(invalid());
    }

    let parsed = if has_explicit_scheme(resource) {
        if resource.split_once(':').is_some_and(|(_, rest)| rest.is_empty()) {
            return Err(invalid());
        }
        Url::parse(resource)
    } else {
        Url::parse(&format!("{DEFAULT_SCHEME_PREFIX}{resource}"))
    };

    parsed.map(Locator).map_err(|_| invalid())
}

/// The url parser percent-encodes, rewrites or trims characters that are not
/// legal in a URI, so they are checked on the raw input. Allowed are the RFC 3986
/// unreserved and reserved sets, `%` followed by two hex digits, and non-ASCII
/// characters other than whitespace and controls.
fn has_valid_uri_characters(resource: &str) -> bool {
    let mut chars = resource.chars();
    while let Some(c) = chars.next() {
        let valid = match c {
            '%' => {
                let escape = (chars.next(), chars.next());
                matches!(escape, (Some(hi), Some(lo)) if hi.is_ascii_hexdigit() && lo.is_ascii_hexdigit())
            }
            c if c.is_ascii_alphanumeric() => true,
            '-' | '.' | '_' | '~' => true,
            ':' | '/' | '?' | '#' | '[' | ']' | '@' => true,
            '!' | '$' | '&' | '\'' | '(' | ')' | '*' | '+' | ',' | ';' | '=' => true,
            c => !c.is_ascii() && !c.is_whitespace() && !c.is_control(),
        };
        if !valid {
            return false;
        }
    }
    true
}

/// `scheme ":" ...` per RFC 3986, except that "localhost:8080" and friends are
/// a host and port rather than scheme "localhost".
fn has_explicit_scheme(resource: &str) -> bool {
    let Some((scheme, rest)) = resource.split_once(':') else {
        return false;
    };

    let valid_scheme = scheme.starts_with(|c: char| c.is_ascii_alphabetic())
        && scheme
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));

    valid_scheme && !rest.starts_with(|c: char| c.is_ascii_digit())
}
