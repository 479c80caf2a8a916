use crate::error::ApiError;
use http::{Method, Uri};
use std::str::FromStr;

const API_METHODS: &str = "GET, HEAD, OPTIONS";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiRoute {
    Env,
    Inspect,
    File,
}

impl ApiRoute {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApiRoute::Env => "env",
            ApiRoute::Inspect => "inspect",
            ApiRoute::File => "file",
        }
    }
}

impl FromStr for ApiRoute {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "/api/env" => Ok(ApiRoute::Env),
            "/api/inspect" | "/api/exurl" => Ok(ApiRoute::Inspect),
            "/api/file" => Ok(ApiRoute::File),
            _ => Err("unknown api route"),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum RequestKind {
    /// CORS preflight; answered the same way on every path.
    Preflight,
    Api(ApiRoute),
}

/// Decide what a request is from its method and path alone.
pub fn classify_request(method: &Method, path: &str) -> Result<RequestKind, ApiError> {
    if method == Method::OPTIONS {
        return Ok(RequestKind::Preflight);
    }

    let route = path.parse::<ApiRoute>().map_err(|_| ApiError::NotFound)?;

    if method == Method::GET || method == Method::HEAD {
        Ok(RequestKind::Api(route))
    } else {
        Err(ApiError::MethodNotAllowed { allow: API_METHODS })
    }
}

/// First value of a query parameter, form-decoded.
pub fn query_param(uri: &Uri, name: &str) -> Option<String> {
    let query = uri.query()?;

    url::form_urlencoded::parse(query.as_bytes())
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.into_owned())
}
