use crate::target::InvalidTarget;
use crate::upstream::UpstreamError;
use http::StatusCode;
use serde::Serialize;
use thiserror::Error;

/// Every failure a request can end in. All of them become JSON responses.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid target url: {0}")]
    InvalidTarget(#[from] InvalidTarget),

    #[error("method not allowed")]
    MethodNotAllowed { allow: &'static str },

    #[error("not found")]
    NotFound,

    #[error("upstream request failed")]
    Upstream(#[from] UpstreamError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidTarget(_) => StatusCode::BAD_REQUEST,
            Self::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }

    /// Message shown to the caller. Upstream details stay in the logs.
    pub fn message(&self) -> String {
        match self {
            Self::InvalidTarget(_) => "url must be an absolute http or https URL".to_string(),
            Self::Upstream(err) => match err {
                UpstreamError::Timeout(_) => "upstream request timed out".to_string(),
                UpstreamError::InvalidLocation { .. } => {
                    "upstream sent an unusable redirect location".to_string()
                }
                _ => self.to_string(),
            },
            _ => self.to_string(),
        }
    }

    pub fn body(&self) -> ErrorBody {
        ErrorBody {
            ok: false,
            error: self.message(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    pub ok: bool,
    pub error: String,
}
