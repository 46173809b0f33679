use url::Url;

use crate::errors::GrabError;

/// Checks that the pasted text is a usable http(s) URL. Which platform it
/// points to is left to the extractor.
pub fn parse_media_url(input: &str) -> Result<Url, GrabError> {
    let trimmed = input.trim().trim_matches('"').trim();

    if trimmed.is_empty() {
        return Err(GrabError::EmptyUrl);
    }

    let parsed = Url::parse(trimmed).map_err(|_| GrabError::MalformedUrl(trimmed.to_string()))?;

    let is_web_scheme = matches!(parsed.scheme(), "http" | "https");
    let has_host = parsed.host_str().map(|h| !h.is_empty()).unwrap_or(false);

    if is_web_scheme && has_host {
        Ok(parsed)
    } else {
        Err(GrabError::MalformedUrl(trimmed.to_string()))
    }
}
