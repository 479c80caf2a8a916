use crate::error::ApiError;
use crate::headers::sanitize;
use crate::proxy::downstream::until_downstream_closes;
use crate::proxy::respond::{REQUEST_ID_HEADER, is_head, send_error};
use crate::proxy::{RequestCtx, query_param};
use crate::target;
use crate::upstream::{RedirectResolver, Resolution, UpstreamMethod, classify_reqwest_error};
use pingora::prelude::Session;
use pingora::{Custom, Error};
use pingora_http::ResponseHeader;

/// Streams the final response of a redirect chain back to the caller.
pub struct FileHandler {
    resolver: RedirectResolver,
}

impl FileHandler {
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
        let download = query_param(uri, "download").as_deref() == Some("1");

        let target = match target {
            Ok(target) => target,
            Err(err) => {
                send_error(session, ctx, &ApiError::from(err)).await?;
                return Ok(true);
            }
        };
        ctx.target = Some(target.to_string());

        // Always GET: the body is the point.
        let resolved = until_downstream_closes(
            session,
            ctx,
            self.resolver.resolve(&target, UpstreamMethod::Get),
        )
        .await?;

        match resolved {
            Ok(resolution) => {
                ctx.redirects = resolution.hops.len();
                self.stream(session, ctx, resolution, download).await?;
            }
            Err(err) => {
                ctx.upstream_failure = Some(err.kind());
                send_error(session, ctx, &ApiError::from(err)).await?;
            }
        }

        Ok(true)
    }

    async fn stream(
        &self,
        session: &mut Session,
        ctx: &mut RequestCtx,
        resolution: Resolution,
        download: bool,
    ) -> pingora::Result<()> {
        let Resolution {
            final_url,
            mut response,
            ..
        } = resolution;

        let headers = sanitize(response.headers(), &final_url, download);

        let mut resp = ResponseHeader::build(response.status(), Some(headers.len() + 1))?;
        for (name, value) in headers.iter() {
            resp.append_header(name.clone(), value.clone())?;
        }
        resp.insert_header(REQUEST_ID_HEADER, ctx.request_id.0.as_str())?;

        if is_head(session) {
            // Dropping `response` here closes the upstream body unread.
            session.write_response_header(Box::new(resp), true).await?;
            return Ok(());
        }

        session.write_response_header(Box::new(resp), false).await?;

        // Chunks are forwarded as they arrive. Returning early on either side
        // drops `response`, which releases the upstream connection.
        loop {
            let chunk = until_downstream_closes(session, ctx, response.chunk()).await?;

            match chunk {
                Ok(Some(chunk)) => {
                    ctx.bytes_streamed += chunk.len() as u64;
                    session.write_response_body(Some(chunk), false).await?;
                }
                Ok(None) => break,
                Err(err) => {
                    // Headers are already committed; all that is left is to abort the stream.
                    let kind = classify_reqwest_error(&err);
                    ctx.upstream_failure = Some(kind);
                    tracing::warn!(
                        request_id = %ctx.request_id.0,
                        kind = %kind,
                        error = %err,
                        "upstream body read failed"
                    );
                    return Err(Error::new(Custom("upstream body read failed")));
                }
            }
        }

        session.write_response_body(None, true).await?;
        Ok(())
    }
}
