mod identity;
mod server;
mod upstream;


pub use identity::IdentityConfig;
pub use server::{ServerConfig, TlsConfig};
pub use upstream::UpstreamConfig;

use anyhow::Context;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExurlConfig {
    pub server: ServerConfig,

    #[serde(default)]
    pub upstream: UpstreamConfig,

    #[serde(default)]
    pub identity: IdentityConfig,
}

impl ExurlConfig {
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;

        contents
            .parse()
            .with_context(|| format!("invalid config file {}", path.display()))
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        self.server.validate()?;
        self.upstream.validate()?;
        self.identity.validate()?;
        Ok(())
    }
}

impl FromStr for ExurlConfig {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        let cfg: Self = toml::from_str(s).context("failed to parse exurl config from string")?;
        cfg.validate()?;

        Ok(cfg)
    }
}
