use std::fmt;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("upstream request failed ({kind})")]
    Transport {
        kind: TransportFailure,
        #[source]
        source: reqwest::Error,
    },

    #[error("upstream did not respond within {0:?}")]
    Timeout(Duration),

    #[error("redirect location is not a usable http(s) URL: {location}")]
    InvalidLocation { location: String },

    #[error("no upstream response within the hop budget")]
    NoResponse,
}

impl UpstreamError {
    pub(crate) fn transport(source: reqwest::Error) -> Self {
        Self::Transport {
            kind: classify_reqwest_error(&source),
            source,
        }
    }

    /// Failure kind used in structured logs.
    pub fn kind(&self) -> TransportFailure {
        match self {
            Self::Transport { kind, .. } => *kind,
            Self::Timeout(_) => TransportFailure::Timeout,
            Self::InvalidLocation { .. } => TransportFailure::Protocol,
            Self::NoResponse => TransportFailure::Unknown,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportFailure {
    Connect,
    Timeout,
    Protocol,
    Body,
    Unknown,
}

impl fmt::Display for TransportFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Connect => "connect",
            Self::Timeout => "timeout",
            Self::Protocol => "protocol",
            Self::Body => "body",
            Self::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

pub fn classify_reqwest_error(err: &reqwest::Error) -> TransportFailure {
    // Timeout first: a connect timeout is reported as both.
    if err.is_timeout() {
        TransportFailure::Timeout
    } else if err.is_connect() {
        TransportFailure::Connect
    } else if err.is_body() || err.is_decode() {
        TransportFailure::Body
    } else if err.is_request() || err.is_builder() {
        TransportFailure::Protocol
    } else {
        TransportFailure::Unknown
    }
}
