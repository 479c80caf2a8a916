use std::fmt;

/// Methods the resolver may send upstream. Bodies are never sent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UpstreamMethod {
    Get,
    #[default]
    Head,
}

impl UpstreamMethod {
    /// Coerce a caller-supplied `method` parameter.
    ///
    /// `GET` in any case selects GET; anything else, including absence, is HEAD.
    pub fn from_param(raw: Option<&str>) -> Self {
        match raw {
            Some(m) if m.eq_ignore_ascii_case("GET") => Self::Get,
            _ => Self::Head,
        }
    }

    pub fn as_http(&self) -> http::Method {
        match self {
            Self::Get => http::Method::GET,
            Self::Head => http::Method::HEAD,
        }
    }
}

impl fmt::Display for UpstreamMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_http().as_str())
    }
}
