use anyhow::Context;
use ipnet::IpNet;
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IdentityConfig {
    /// Peers allowed to assert the client address through X-Forwarded-For.
    pub trusted_proxies: Vec<String>,

    /// MaxMind City database (country, city, continent).
    pub geoip_city_db: Option<PathBuf>,

    /// MaxMind ASN database (asn, organization).
    pub geoip_asn_db: Option<PathBuf>,

    /// Name of this edge node, echoed as `colo`.
    pub colo: Option<String>,
}

impl IdentityConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        self.parsed_trusted_proxies().map(|_| ())
    }

    pub fn parsed_trusted_proxies(&self) -> anyhow::Result<Vec<IpNet>> {
        self.trusted_proxies
            .iter()
            .map(|s| {
                s.parse::<IpNet>()
                    .with_context(|| format!("identity.trusted_proxies: invalid CIDR '{s}'"))
            })
            .collect()
    }
}
