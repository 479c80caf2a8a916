mod client_ip;
mod geo;
mod report;


pub use client_ip::resolve_client_ip;
pub use geo::{GeoInfo, GeoLookup};
pub use report::{ConnectionInfo, EnvReport, http_protocol};

use crate::config::IdentityConfig;
use ipnet::IpNet;

const MAX_USER_AGENT_LENGTH: usize = 2048;

/// Answers "who is calling": client address, user agent and network metadata.
pub struct IdentityResolver {
    trusted_proxies: Vec<IpNet>,
    geo: GeoLookup,
    colo: Option<String>,
}

impl IdentityResolver {
    pub fn from_config(cfg: &IdentityConfig) -> anyhow::Result<Self> {
        Ok(Self {
            trusted_proxies: cfg.parsed_trusted_proxies()?,
            geo: GeoLookup::open(cfg.geoip_city_db.as_deref(), cfg.geoip_asn_db.as_deref())?,
            colo: cfg.colo.clone(),
        })
    }

    pub fn new(trusted_proxies: Vec<IpNet>, geo: GeoLookup, colo: Option<String>) -> Self {
        Self {
            trusted_proxies,
            geo,
            colo,
        }
    }

    pub fn geo_enabled(&self) -> bool {
        self.geo.is_enabled()
    }

    pub fn report(&self, conn: &ConnectionInfo<'_>) -> EnvReport {
        let ip = conn
            .peer_ip
            .map(|peer| resolve_client_ip(conn.headers, peer, &self.trusted_proxies));

        let user_agent = conn
            .headers
            .get(http::header::USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .filter(|ua| ua.len() <= MAX_USER_AGENT_LENGTH)
            .map(str::to_string);

        let geo = ip.map(|ip| self.geo.lookup(ip)).unwrap_or_default();

        EnvReport {
            ok: true,
            ip: ip.map(|ip| ip.to_string()),
            user_agent,
            country: geo.country,
            city: geo.city,
            colo: self.colo.clone(),
            asn: geo.asn,
            as_organization: geo.as_organization,
            continent: geo.continent,
            tls_version: conn.tls_version.clone(),
            http_protocol: http_protocol(conn.http_version).map(str::to_string),
        }
    }
}
