use crate::config::ExurlConfig;
use crate::identity::IdentityResolver;
use crate::upstream::RedirectResolver;
use anyhow::Result;
use std::sync::Arc;

/// Everything the handlers share, built once at startup.
pub struct RuntimeState {
    pub resolver: RedirectResolver,
    pub identity: Arc<IdentityResolver>,
}

pub fn build_runtime_state(cfg: &ExurlConfig) -> Result<RuntimeState> {
    let resolver = RedirectResolver::from_config(&cfg.upstream)?;
    let identity = IdentityResolver::from_config(&cfg.identity)?;

    tracing::debug!(
        max_hops = resolver.max_hops(),
        geoip = identity.geo_enabled(),
        "runtime state built"
    );

    Ok(RuntimeState {
        resolver,
        identity: Arc::new(identity),
    })
}
