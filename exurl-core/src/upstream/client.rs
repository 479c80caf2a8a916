use crate::config::UpstreamConfig;
use anyhow::Context;
use reqwest::redirect::Policy;

/// Build the shared outbound client.
///
/// Redirects are never followed here: the resolver walks them one hop at a
/// time so every hop can be observed and counted.
pub fn build_client(cfg: &UpstreamConfig) -> anyhow::Result<reqwest::Client> {
    reqwest::Client::builder()
        .redirect(Policy::none())
        .connect_timeout(cfg.connect_timeout())
        .read_timeout(cfg.read_timeout())
        .user_agent(cfg.user_agent.as_str())
        .build()
        .context("failed to build upstream HTTP client")
}
