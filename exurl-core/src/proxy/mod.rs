mod downstream;
mod gateway;
mod gateway_ctx;
mod handlers;
mod request_classification;
mod respond;


pub use gateway::ExurlGateway;
pub use gateway_ctx::{RequestCtx, RequestId};
pub use request_classification::{ApiRoute, RequestKind, classify_request, query_param};
