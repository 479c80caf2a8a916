use http::{HeaderMap, Version};
use serde::Serialize;
use std::net::IpAddr;

/// What the listener knows about an inbound connection.
pub struct ConnectionInfo<'a> {
    /// `None` for non-IP listeners.
    pub peer_ip: Option<IpAddr>,
    pub headers: &'a HeaderMap,
    pub tls_version: Option<String>,
    pub http_version: Version,
}

/// JSON body of the environment echo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvReport {
    pub ok: bool,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
    pub colo: Option<String>,
    pub asn: Option<u32>,
    pub as_organization: Option<String>,
    pub continent: Option<String>,
    pub tls_version: Option<String>,
    pub http_protocol: Option<String>,
}

pub fn http_protocol(version: Version) -> Option<&'static str> {
    match version {
        Version::HTTP_09 => Some("HTTP/0.9"),
        Version::HTTP_10 => Some("HTTP/1.0"),
        Version::HTTP_11 => Some("HTTP/1.1"),
        Version::HTTP_2 => Some("HTTP/2"),
        Version::HTTP_3 => Some("HTTP/3"),
        _ => None,
    }
}
