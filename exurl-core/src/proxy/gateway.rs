use crate::proxy::gateway_ctx::RequestCtx;
use crate::proxy::handlers::{EnvHandler, FileHandler, InspectHandler};
use crate::proxy::request_classification::{ApiRoute, RequestKind, classify_request};
use crate::proxy::respond::{send_error, send_preflight};
use crate::server::RuntimeState;
use async_trait::async_trait;
use pingora::prelude::*;
use std::sync::Arc;

/// ExurlGateway answers every request itself. Pingora's upstream phase is never reached:
/// outbound traffic goes through the redirect resolver instead.
pub struct ExurlGateway {
    env_handler: EnvHandler,
    inspect_handler: InspectHandler,
    file_handler: FileHandler,
}

impl ExurlGateway {
    pub fn new(state: Arc<RuntimeState>) -> Self {
        Self {
            env_handler: EnvHandler::new(state.identity.clone()),
            inspect_handler: InspectHandler::new(state.resolver.clone()),
            file_handler: FileHandler::new(state.resolver.clone()),
        }
    }
}

#[async_trait]
impl ProxyHttp for ExurlGateway {
    type CTX = RequestCtx;

    fn new_ctx(&self) -> Self::CTX {
        RequestCtx::new()
    }

    async fn upstream_peer(
        &self,
        _session: &mut Session,
        _ctx: &mut Self::CTX,
    ) -> Result<Box<HttpPeer>> {
        Err(Error::new(Custom("exurl does not proxy through pingora peers")))
    }

    /// ACCEPT → CLASSIFY → RESPOND
    async fn request_filter(&self, session: &mut Session, ctx: &mut Self::CTX) -> Result<bool> {
        let req = session.req_header();

        match classify_request(&req.method, req.uri.path()) {
            Ok(RequestKind::Preflight) => send_preflight(session, ctx).await?,

            Ok(RequestKind::Api(route)) => {
                ctx.route = Some(route);
                match route {
                    ApiRoute::Env => self.env_handler.handle(session, ctx).await?,
                    ApiRoute::Inspect => self.inspect_handler.handle(session, ctx).await?,
                    ApiRoute::File => self.file_handler.handle(session, ctx).await?,
                };
            }

            Err(err) => send_error(session, ctx, &err).await?,
        }

        // The response has been written; nothing is left for pingora to do.
        Ok(true)
    }

    async fn logging(&self, session: &mut Session, e: Option<&Error>, ctx: &mut Self::CTX)
    where
        Self::CTX: Send + Sync,
    {
        let req = session.req_header();
        let status = session
            .response_written()
            .map(|resp| resp.status.as_u16())
            .unwrap_or(0);

        tracing::info!(
            request_id = %ctx.request_id.0,
            method = %req.method,
            path = req.uri.path(),
            route = ctx.route.map(|r| r.as_str()),
            target_url = ctx.target.as_deref(),
            status,
            duration_ms = ctx.started.elapsed().as_millis() as u64,
            redirects = ctx.redirects,
            bytes = ctx.bytes_streamed,
            client_closed = ctx.client_closed,
            upstream_failure = ctx.upstream_failure.map(|k| k.to_string()).as_deref(),
            error = e.map(|e| e.to_string()).as_deref(),
            "request completed"
        );
    }
}
