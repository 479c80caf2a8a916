use http::HeaderMap;
use ipnet::IpNet;
use std::net::IpAddr;

const X_FORWARDED_FOR: &str = "x-forwarded-for";
const MAX_X_FORWARDED_FOR_LENGTH: usize = 1024;

/// Address of the client behind any trusted proxies.
///
/// `X-Forwarded-For` only counts when the connecting peer is itself trusted.
/// Entries are walked from the nearest hop outwards and the first one that is
/// not a trusted proxy is the client. Unparseable entries are skipped; if every
/// entry is trusted, or the header is missing or oversized, the peer is the client.
pub fn resolve_client_ip(
    headers: &HeaderMap,
    peer_ip: IpAddr,
    trusted_proxies: &[IpNet],
) -> IpAddr {
    let is_trusted = |ip: &IpAddr| trusted_proxies.iter().any(|net| net.contains(ip));

    if !is_trusted(&peer_ip) {
        return peer_ip;
    }

    headers
        .get(X_FORWARDED_FOR)
        .and_then(|value| value.to_str().ok())
        .filter(|xff| xff.len() <= MAX_X_FORWARDED_FOR_LENGTH)
        .and_then(|xff| {
            xff.rsplit(',')
                .filter_map(|entry| entry.trim().parse::<IpAddr>().ok())
                .find(|ip| !is_trusted(ip))
        })
        .unwrap_or(peer_ip)
}
