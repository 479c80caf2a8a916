use crate::identity::{ConnectionInfo, IdentityResolver};
use crate::proxy::RequestCtx;
use crate::proxy::respond::send_json;
use http::StatusCode;
use pingora::prelude::Session;
use std::sync::Arc;

/// Echoes what the service can see about the calling client.
pub struct EnvHandler {
    identity: Arc<IdentityResolver>,
}

impl EnvHandler {
    pub fn new(identity: Arc<IdentityResolver>) -> Self {
        Self { identity }
    }

    pub(crate) async fn handle(
        &self,
        session: &mut Session,
        ctx: &mut RequestCtx,
    ) -> pingora::Result<bool> {
        let peer_ip = session
            .client_addr()
            .and_then(|addr| addr.as_inet())
            .map(|addr| addr.ip());

        let tls_version = session
            .digest()
            .and_then(|digest| digest.ssl_digest.as_ref())
            .map(|ssl| ssl.version.to_string());

        let req = session.req_header();
        let report = self.identity.report(&ConnectionInfo {
            peer_ip,
            headers: &req.headers,
            tls_version,
            http_version: req.version,
        });

        send_json(session, ctx, StatusCode::OK, &report).await?;
        Ok(true)
    }
}
