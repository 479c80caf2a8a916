use crate::config::UpstreamConfig;
use crate::target::{TargetUrl, is_http_scheme};
use crate::upstream::{RedirectHop, UpstreamError, UpstreamMethod, build_client};
use http::header::LOCATION;
use http::{HeaderMap, StatusCode};
use std::time::Duration;
use url::Url;

/// Outcome of walking a redirect chain.
///
/// `response` is the last upstream response received. Its body has not been
/// read. When the hop budget runs out it is itself a redirect and `final_url`
/// is the location it pointed at.
#[derive(Debug)]
pub struct Resolution {
    pub requested: TargetUrl,
    pub final_url: Url,
    pub hops: Vec<RedirectHop>,
    pub response: reqwest::Response,
}

impl Resolution {
    pub fn status(&self) -> StatusCode {
        self.response.status()
    }

    pub fn headers(&self) -> &HeaderMap {
        self.response.headers()
    }
}

/// Follows redirects by hand, one request per hop, up to `max_hops` requests.
///
/// Holds no per-request state; one instance is shared by all requests.
#[derive(Debug, Clone)]
pub struct RedirectResolver {
    client: reqwest::Client,
    max_hops: usize,
    response_timeout: Duration,
}

impl RedirectResolver {
    pub fn new(client: reqwest::Client, max_hops: usize, response_timeout: Duration) -> Self {
        Self {
            client,
            max_hops: max_hops.max(1),
            response_timeout,
        }
    }

    pub fn from_config(cfg: &UpstreamConfig) -> anyhow::Result<Self> {
        let client = build_client(cfg)?;
        Ok(Self::new(client, cfg.max_hops, cfg.response_timeout()))
    }

    pub fn max_hops(&self) -> usize {
        self.max_hops
    }

    pub async fn resolve(
        &self,
        target: &TargetUrl,
        method: UpstreamMethod,
    ) -> Result<Resolution, UpstreamError> {
        let mut current = target.as_url().clone();
        let mut hops = Vec::new();
        let mut last = None;

        for _ in 0..self.max_hops {
            let response = self.send(method, &current).await?;
            let status = response.status();

            match next_location(&current, status, response.headers())? {
                Some(next) => {
                    tracing::debug!(
                        from = %current,
                        to = %next,
                        status = status.as_u16(),
                        "following redirect"
                    );

                    let from = std::mem::replace(&mut current, next);
                    hops.push(RedirectHop::new(from, status, current.clone()));
                    last = Some(response);
                }
                None => {
                    last = Some(response);
                    break;
                }
            }
        }

        let response = last.ok_or(UpstreamError::NoResponse)?;

        if hops.len() == self.max_hops {
            tracing::debug!(
                target_url = %target,
                hops = hops.len(),
                "hop budget exhausted; reporting last redirect as final"
            );
        }

        Ok(Resolution {
            requested: target.clone(),
            final_url: current,
            hops,
            response,
        })
    }

    async fn send(
        &self,
        method: UpstreamMethod,
        url: &Url,
    ) -> Result<reqwest::Response, UpstreamError> {
        let request = self.client.request(method.as_http(), url.clone()).send();

        match tokio::time::timeout(self.response_timeout, request).await {
            Ok(Ok(response)) => Ok(response),
            Ok(Err(err)) => Err(UpstreamError::transport(err)),
            Err(_) => Err(UpstreamError::Timeout(self.response_timeout)),
        }
    }
}

/// Where a response redirects to, resolved against the URL that produced it.
///
/// `None` when the response is not a 3xx or carries no (or an empty) `Location`.
pub fn next_location(
    current: &Url,
    status: StatusCode,
    headers: &HeaderMap,
) -> Result<Option<Url>, UpstreamError> {
    if !status.is_redirection() {
        return Ok(None);
    }

    let Some(raw) = headers.get(LOCATION) else {
        return Ok(None);
    };

    let invalid = || UpstreamError::InvalidLocation {
        location: String::from_utf8_lossy(raw.as_bytes()).into_owned(),
    };

    let location = raw.to_str().map_err(|_| invalid())?.trim();
    if location.is_empty() {
        return Ok(None);
    }

    let next = current.join(location).map_err(|_| invalid())?;
    if !is_http_scheme(next.scheme()) {
        return Err(invalid());
    }

    Ok(Some(next))
}
