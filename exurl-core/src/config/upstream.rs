use anyhow::bail;
use serde::Deserialize;
use std::time::Duration;

/// Hard ceiling for `max_hops`; the loop must always terminate on redirect cycles.
pub const MAX_HOPS_LIMIT: usize = 20;

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UpstreamConfig {
    /// Number of outbound requests a single resolution may issue.
    pub max_hops: usize,
    pub connect_timeout_ms: u64,
    /// Upper bound on waiting for response headers, per hop.
    pub response_timeout_ms: u64,
    /// Idle timeout between body reads while streaming.
    pub read_timeout_ms: u64,
    pub user_agent: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            max_hops: 10,
            connect_timeout_ms: 5_000,
            response_timeout_ms: 15_000,
            read_timeout_ms: 30_000,
            user_agent: concat!("exurl/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl UpstreamConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.max_hops == 0 || self.max_hops > MAX_HOPS_LIMIT {
            bail!(
                "upstream.max_hops must be between 1 and {MAX_HOPS_LIMIT}, got {}",
                self.max_hops
            );
        }

        for (name, value) in [
            ("connect_timeout_ms", self.connect_timeout_ms),
            ("response_timeout_ms", self.response_timeout_ms),
            ("read_timeout_ms", self.read_timeout_ms),
        ] {
            if value == 0 {
                bail!("upstream.{name} must be greater than zero");
            }
        }

        if self.user_agent.trim().is_empty() {
            bail!("upstream.user_agent must not be empty");
        }

        Ok(())
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn response_timeout(&self) -> Duration {
        Duration::from_millis(self.response_timeout_ms)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }
}
