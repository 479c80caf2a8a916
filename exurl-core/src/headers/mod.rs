mod bag;
mod cors;
mod disposition;
mod sanitize;

#[cfg(test)]
mod tests;

pub use bag::HeaderBag;
pub use cors::{ALLOW_HEADERS, ALLOW_METHODS, ALLOW_ORIGIN, apply_cors, cors_headers};
pub use disposition::{attachment_disposition, download_name};
pub use sanitize::{is_hop_by_hop, sanitize};
