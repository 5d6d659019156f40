//! Target URL validation.

use url::Url;

/// Errors produced when a target URL is rejected.
#[derive(Debug, thiserror::Error)]
pub enum UrlValidationError {
    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("URL must have a host")]
    MissingHost,
}

/// Validates that a URL parses and carries both a scheme and a host.
///
/// The parsed form is not normalized; the link stores the URL exactly as the
/// caller supplied it.
pub fn validate_url(input: &str) -> Result<(), UrlValidationError> {
    let url = Url::parse(input).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;

    if url.host_str().is_none() {
        return Err(UrlValidationError::MissingHost);
    }

    Ok(())
}
