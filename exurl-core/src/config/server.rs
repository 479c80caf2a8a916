use anyhow::{Context, bail};
use serde::Deserialize;
use std::net::SocketAddr;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// e.g. "0.0.0.0:8080"
    pub listen: String,

    /// Overrides the Pingora worker thread count.
    pub threads: Option<usize>,

    /// Serve HTTPS instead of plain HTTP.
    pub tls: Option<TlsConfig>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TlsConfig {
    pub cert: String,
    pub key: String,
}

impl ServerConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        self.listen
            .parse::<SocketAddr>()
            .with_context(|| format!("server.listen is not a socket address: {}", self.listen))?;

        if self.threads == Some(0) {
            bail!("server.threads must be at least 1");
        }

        Ok(())
    }
}
