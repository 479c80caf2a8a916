//! Validation of caller-supplied target URLs.


use std::fmt;
use thiserror::Error;
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvalidTarget {
    #[error("missing url parameter")]
    Missing,

    #[error("url is not an absolute URL")]
    Unparseable,

    #[error("unsupported url scheme")]
    UnsupportedScheme,
}

/// An absolute `http` or `https` URL. Only [`validate`] constructs one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetUrl(Url);

impl TargetUrl {
    pub fn as_url(&self) -> &Url {
        &self.0
    }

    pub fn into_url(self) -> Url {
        self.0
    }
}

impl fmt::Display for TargetUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}

pub fn validate(raw: Option<&str>) -> Result<TargetUrl, InvalidTarget> {
    let raw = match raw.map(str::trim) {
        Some(s) if !s.is_empty() => s,
        _ => return Err(InvalidTarget::Missing),
    };

    let url = Url::parse(raw).map_err(|_| InvalidTarget::Unparseable)?;

    if !is_http_scheme(url.scheme()) {
        return Err(InvalidTarget::UnsupportedScheme);
    }

    Ok(TargetUrl(url))
}

pub(crate) fn is_http_scheme(scheme: &str) -> bool {
    matches!(scheme, "http" | "https")
}
