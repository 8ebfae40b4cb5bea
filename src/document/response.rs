use super::{DocumentError, RenderParams};
use chrono::{DateTime, FixedOffset, Utc};
use http::header::{CACHE_CONTROL, HeaderName};
use http::{HeaderMap, HeaderValue, StatusCode};
use std::borrow::Cow;

/// Format a date the way HTTP headers expect it.
pub(crate) fn http_date(date: &DateTime<FixedOffset>) -> String {
    date.with_timezone(&Utc)
        .format("%a, %d %b %Y %H:%M:%S GMT")
        .to_string()
}

/// A rendered document: status, headers and body.
#[derive(Debug, Clone)]
pub struct Response {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl Response {
    pub fn new() -> Self {
        Self {
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            body: Vec::new(),
        }
    }

    pub fn set_status(&mut self, status: u16) -> Result<(), DocumentError> {
        self.status = StatusCode::from_u16(status)?;
        Ok(())
    }

    /// Set a header, replacing any previous value.
    pub fn set_header(&mut self, name: HeaderName, value: &str) -> Result<(), DocumentError> {
        self.headers.insert(name, HeaderValue::from_str(value)?);
        Ok(())
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)?.to_str().ok()
    }

    pub fn set_body(&mut self, body: impl Into<Vec<u8>>) {
        self.body = body.into();
    }

    pub fn body_str(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    /// Apply `Cache-Control` from the render parameters.
    ///
    /// The response is `private` only when `is_private` is `Some(true)`.
    /// Directives are sorted by name.
    pub fn apply_cache(&mut self, params: &RenderParams) -> Result<(), DocumentError> {
        let mut directives = vec![if params.is_private == Some(true) {
            "private".to_string()
        } else {
            "public".to_string()
        }];
        if let Some(max_age) = params.max_age {
            directives.push(format!("max-age={max_age}"));
        }
        if let Some(shared_age) = params.shared_age {
            directives.push(format!("s-maxage={shared_age}"));
        }
        directives.sort();
        self.set_header(CACHE_CONTROL, &directives.join(", "))
    }
}

impl Default for Response {
    fn default() -> Self {
        Self::new()
    }
}
