mod client;
mod error;
mod hop;
mod method;
mod resolver;

#[cfg(test)]
mod tests;

pub use client::build_client;
pub use error::{TransportFailure, UpstreamError, classify_reqwest_error};
pub use hop::{RedirectHop, status_text};
pub use method::UpstreamMethod;
pub use resolver::{RedirectResolver, Resolution, next_location};
