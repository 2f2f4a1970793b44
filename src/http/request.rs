//! The request view handed to the middleware pipeline.

use super::{Headers, Method};

/// An already-decoded HTTP request.
///
/// The host server owns the wire format; it builds a `Request` from the
/// method, target and headers it parsed. The cache only looks at those three,
/// so no body is carried.
///
/// # Examples
///
/// ```
/// use conditional_cache::{Headers, Method, Request};
///
/// let mut headers = Headers::new();
/// headers.insert("Accept", "text/html");
/// let request = Request::from_parts(Method::Get, "/hello?name=world", headers);
///
/// assert_eq!(request.path(), "/hello");
/// assert_eq!(request.query_string(), Some("name=world"));
/// assert_eq!(request.headers().get("accept"), Some("text/html"));
/// ```
#[derive(Debug, Clone)]
pub struct Request {
    method: Method,
    path: String,
    query: Option<String>,
    headers: Headers,
}

impl Request {
    /// Builds a request; a `?` in `target` separates the path from the query.
    pub fn from_parts(method: Method, target: &str, headers: Headers) -> Self {
        let (path, query) = match target.split_once('?') {
            Some((path, query)) => (path.to_owned(), Some(query.to_owned())),
            None => (target.to_owned(), None),
        };

        Self {
            method,
            path,
            query,
            headers,
        }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Path without the query string.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Raw query string without the leading `?`.
    pub fn query_string(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }
}
