use crate::error::ApiError;
use crate::headers::cors_headers;
use crate::proxy::RequestCtx;
use bytes::Bytes;
use http::{HeaderName, Method, StatusCode, header};
use pingora::prelude::Session;
use pingora::{Custom, Error};
use pingora_http::ResponseHeader;
use serde::Serialize;

const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";
pub(crate) const REQUEST_ID_HEADER: &str = "x-request-id";

/// Response header pre-filled with what every exurl response carries:
/// the CORS policy and the request id.
pub(crate) fn base_response(
    status: StatusCode,
    ctx: &RequestCtx,
) -> pingora::Result<ResponseHeader> {
    let mut resp = ResponseHeader::build(status, Some(8))?;
    for (name, value) in cors_headers() {
        resp.insert_header(name, value)?;
    }
    resp.insert_header(REQUEST_ID_HEADER, ctx.request_id.0.as_str())?;
    Ok(resp)
}

pub(crate) fn is_head(session: &Session) -> bool {
    session.req_header().method == Method::HEAD
}

pub(crate) async fn send_json<T: Serialize>(
    session: &mut Session,
    ctx: &RequestCtx,
    status: StatusCode,
    body: &T,
) -> pingora::Result<()> {
    send_json_with_headers(session, ctx, status, body, &[]).await
}

async fn send_json_with_headers<T: Serialize>(
    session: &mut Session,
    ctx: &RequestCtx,
    status: StatusCode,
    body: &T,
    extra: &[(HeaderName, &'static str)],
) -> pingora::Result<()> {
    let body = serde_json::to_vec(body)
        .map_err(|_| Error::new(Custom("json serialization failed")))?;

    let mut resp = base_response(status, ctx)?;
    resp.insert_header(header::CONTENT_TYPE, JSON_CONTENT_TYPE)?;
    resp.insert_header(header::CONTENT_LENGTH, body.len().to_string())?;
    for (name, value) in extra {
        resp.insert_header(name.clone(), *value)?;
    }

    // HEAD gets the same headers, including the length of the body it does not receive.
    if is_head(session) {
        session.write_response_header(Box::new(resp), true).await?;
        return Ok(());
    }

    session.write_response_header(Box::new(resp), false).await?;
    session.write_response_body(Some(Bytes::from(body)), true).await?;

    Ok(())
}

pub(crate) async fn send_error(
    session: &mut Session,
    ctx: &RequestCtx,
    err: &ApiError,
) -> pingora::Result<()> {
    match err {
        ApiError::Upstream(e) => tracing::warn!(
            request_id = %ctx.request_id.0,
            kind = %e.kind(),
            error = %e,
            "upstream request failed"
        ),
        _ => tracing::debug!(request_id = %ctx.request_id.0, error = %err, "request rejected"),
    }

    match err {
        ApiError::MethodNotAllowed { allow } => {
            send_json_with_headers(
                session,
                ctx,
                err.status(),
                &err.body(),
                &[(header::ALLOW, *allow)],
            )
            .await
        }
        _ => send_json(session, ctx, err.status(), &err.body()).await,
    }
}

/// 204 with CORS headers and no body.
pub(crate) async fn send_preflight(session: &mut Session, ctx: &RequestCtx) -> pingora::Result<()> {
    let resp = base_response(StatusCode::NO_CONTENT, ctx)?;
    session.write_response_header(Box::new(resp), true).await?;
    Ok(())
}
