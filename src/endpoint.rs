//! URL building shared by the backend clients.

use reqwest::Url;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid base URL: {0}")]
pub struct InvalidBaseUrl(pub String);

/// Appends `segments` to `base`, each percent-encoded as one path segment.
///
/// A segment containing `/`, `?` or `#` stays inside its segment instead of
/// changing the request path.
pub fn endpoint(base: &str, segments: &[&str]) -> Result<Url, InvalidBaseUrl> {
    let invalid = || InvalidBaseUrl(base.to_string());
    let mut url = Url::parse(base).map_err(|_| invalid())?;
    url.path_segments_mut()
        .map_err(|_| invalid())?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}
