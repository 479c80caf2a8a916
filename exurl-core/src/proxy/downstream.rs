use crate::proxy::RequestCtx;
use pingora::prelude::Session;
use pingora::{ConnectionClosed, Error};
use std::future::Future;

/// Drive `fut` while watching the downstream connection.
///
/// Requests handled here carry no body, so the client socket stays silent
/// until the response is done. Any read event (EOF, reset, stray bytes) ends
/// the wait: `fut` is dropped, cancelling the upstream I/O it had in flight,
/// and a downstream error is returned so pingora writes nothing further.
pub(crate) async fn until_downstream_closes<F: Future>(
    session: &mut Session,
    ctx: &mut RequestCtx,
    fut: F,
) -> pingora::Result<F::Output> {
    let closed = tokio::select! {
        out = fut => return Ok(out),
        closed = session.read_body_or_idle(true) => closed,
    };

    ctx.client_closed = true;
    tracing::debug!(
        request_id = %ctx.request_id.0,
        "downstream went away while waiting on upstream"
    );

    match closed {
        Err(e) => Err(e.into_down()),
        Ok(_) => Err(Error::explain(
            ConnectionClosed,
            "downstream sent data while waiting on upstream",
        )
        .into_down()),
    }
}
