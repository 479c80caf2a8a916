use crate::error::ApiError;
use crate::inspect::InspectionResult;
use crate::proxy::downstream::until_downstream_closes;
use crate::proxy::respond::{send_error, send_json};
use crate::proxy::{RequestCtx, query_param};
use crate::target;
use crate::upstream::{RedirectResolver, UpstreamMethod};
use http::StatusCode;
use pingora::prelude::Session;

/// Resolves a target URL and reports on its final response without
/// transferring the body.
pub struct InspectHandler {
    resolver: RedirectResolver,
}

impl InspectHandler {
    pub fn new(resolver: RedirectResolver) -> Self {
        Self { resolver }
    }

    pub(crate) async fn handle(
        &self,
        session: &mut Session,
        ctx: &mut RequestCtx,
    ) -> pingora::Result<bool> {
        let uri = &session.req_header().uri;
        let target = target::validate(query_param(uri, "url").as_deref());
        let method = UpstreamMethod::from_param(query_param(uri, "method").as_deref());

        let target = match target {
            Ok(target) => target,
            Err(err) => {
                send_error(session, ctx, &ApiError::from(err)).await?;
                return Ok(true);
            }
        };
        ctx.target = Some(target.to_string());

        let resolved =
            until_downstream_closes(session, ctx, self.resolver.resolve(&target, method)).await?;

        match resolved {
            Ok(resolution) => {
                ctx.redirects = resolution.hops.len();
                let result = InspectionResult::from_resolution(resolution);
                send_json(session, ctx, StatusCode::OK, &result).await?;
            }
            Err(err) => {
                ctx.upstream_failure = Some(err.kind());
                send_error(session, ctx, &ApiError::from(err)).await?;
            }
        }

        Ok(true)
    }
}
