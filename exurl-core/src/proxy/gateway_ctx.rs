use crate::proxy::ApiRoute;
use crate::upstream::TransportFailure;
use std::time::Instant;
use uuid::Uuid;

#[derive(Debug, Clone, Eq, Hash, PartialEq)]
pub struct RequestId(pub String);

impl Default for RequestId {
    fn default() -> Self {
        RequestId(Uuid::new_v4().to_string())
    }
}

/// Per-request bookkeeping, read back by the logging hook.
#[derive(Debug)]
pub struct RequestCtx {
    pub request_id: RequestId,
    pub started: Instant,
    pub route: Option<ApiRoute>,
    /// Validated target URL, once known.
    pub target: Option<String>,
    pub upstream_failure: Option<TransportFailure>,
    pub redirects: usize,
    pub bytes_streamed: u64,
    pub client_closed: bool,
}

impl RequestCtx {
    pub fn new() -> Self {
        Self {
            request_id: RequestId::default(),
            started: Instant::now(),
            route: None,
            target: None,
            upstream_failure: None,
            redirects: 0,
            bytes_streamed: 0,
            client_closed: false,
        }
    }
}

impl Default for RequestCtx {
    fn default() -> Self {
        Self::new()
    }
}
