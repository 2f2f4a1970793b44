//! Per-route cache configuration.

use serde::Deserialize;

/// Cache settings attached to a route.
///
/// The router stores a copy in each request's
/// [`Extensions`](crate::context::Extensions); routes without one behave as
/// `CacheOptions::default()`, which disables caching.
///
/// Options can be built in code or deserialized from a route table:
///
/// ```
/// use conditional_cache::cache::CacheOptions;
///
/// let built = CacheOptions::new(10).cache_control("public").vary(["accept"]);
/// let loaded: CacheOptions = serde_json::from_str(
///     r#"{ "expiry": 10, "cache_control": "public", "vary": ["accept"] }"#,
/// ).unwrap();
///
/// assert_eq!(built, loaded);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CacheOptions {
    /// Freshness lifetime in seconds; `0` turns caching off for the route.
    pub expiry: u64,
    /// Directive text placed before `max-age` in `Cache-Control`.
    pub cache_control: String,
    /// Vary header names; `None` falls back to the middleware default.
    pub vary: Option<Vec<String>>,
    /// Drop the cached `GET` representation after a successful mutating request.
    pub invalidate: bool,
}

impl CacheOptions {
    /// Options that cache responses for `expiry` seconds.
    pub fn new(expiry: u64) -> Self {
        Self {
            expiry,
            ..Self::default()
        }
    }

    /// Options for a route whose successful writes invalidate the cached `GET`.
    pub fn invalidating() -> Self {
        Self {
            invalidate: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn cache_control(mut self, directive: impl Into<String>) -> Self {
        self.cache_control = directive.into();
        self
    }

    #[must_use]
    pub fn vary<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.vary = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// The `Cache-Control` value sent with freshly generated responses.
    pub fn cache_control_header(&self) -> String {
        if self.cache_control.is_empty() {
            format!("max-age={}", self.expiry)
        } else {
            format!("{}, max-age={}", self.cache_control, self.expiry)
        }
    }
}
