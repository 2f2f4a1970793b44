//! Responses produced by handlers and reshaped by the cache.

use super::{Headers, StatusCode};

/// Status, header fields and body of a handler's answer.
///
/// Handlers build one with the consuming setters; middleware edits one in
/// place with the `&mut self` methods. Byte encoding for storage lives in
/// [`crate::cache::codec`].
///
/// ```
/// use conditional_cache::{Response, StatusCode};
///
/// let mut response = Response::new(StatusCode::Ok)
///     .header("ETag", "\"v7\"")
///     .body("report");
/// response.set_header("Cache-Control", "max-age=30");
///
/// assert_eq!(response.headers().get("etag"), Some("\"v7\""));
/// assert_eq!(response.content(), b"report");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    status: StatusCode,
    headers: Headers,
    body: Vec<u8>,
}

impl Response {
    pub fn new(status: StatusCode) -> Self {
        Self::from_parts(status, Headers::new(), Vec::new())
    }

    pub fn from_parts(status: StatusCode, headers: Headers, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers,
            body: body.into(),
        }
    }

    /// Adds a header field; earlier fields with the same name stay.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.add_header(name, value);
        self
    }

    #[must_use]
    pub fn body(self, body: impl Into<String>) -> Self {
        self.body_bytes(body.into())
    }

    #[must_use]
    pub fn body_bytes(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    pub fn add_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers.insert(name, value);
    }

    /// Replaces every field named `name`.
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers.set(name, value);
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn set_status(&mut self, status: StatusCode) {
        self.status = status;
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn content(&self) -> &[u8] {
        &self.body
    }

    /// Drops the body; status and headers are kept.
    pub fn clear_body(&mut self) {
        self.body.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_accumulates_headers() {
        let r = Response::new(StatusCode::Created)
            .header("Set-Cookie", "a=1")
            .header("set-cookie", "b=2")
            .body("made");
        let cookies: Vec<_> = r.headers().get_all("SET-COOKIE").collect();
        assert_eq!(cookies, vec!["a=1", "b=2"]);
        assert_eq!(r.status(), StatusCode::Created);
        assert_eq!(r.content(), b"made");
    }

    #[test]
    fn set_header_replaces() {
        let mut r = Response::new(StatusCode::Ok).header("Cache-Control", "no-store");
        r.set_header("cache-control", "max-age=10");
        let vals: Vec<_> = r.headers().get_all("Cache-Control").collect();
        assert_eq!(vals, vec!["max-age=10"]);
    }

    #[test]
    fn reshaped_into_not_modified() {
        let mut r = Response::new(StatusCode::Ok).header("ETag", "\"1\"").body("payload");
        r.clear_body();
        r.set_status(StatusCode::NotModified);
        assert_eq!(r.status(), StatusCode::NotModified);
        assert!(r.content().is_empty());
        assert_eq!(r.headers().get("etag"), Some("\"1\""));
    }

    #[test]
    fn from_parts_matches_builder() {
        let mut headers = Headers::new();
        headers.insert("Location", "/x");
        let built = Response::new(StatusCode::Created).header("Location", "/x").body("made");
        assert_eq!(Response::from_parts(StatusCode::Created, headers, "made"), built);
    }
}
