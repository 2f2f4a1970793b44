//! The cache decision engine.
//!
//! [`CacheMiddleware`] sits in the middleware chain in front of the route
//! endpoint. For each request it either answers from the store, answers with
//! `304 Not Modified` or `412 Precondition Failed`, or forwards the request and
//! stores what comes back.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, error, warn};

use super::{
    CacheEntry, CacheError, CacheOptions, CacheStore, codec, generate_key, parse_etag_value,
    validators::{age_seconds, format_http_date},
};
use crate::{
    Method, Response, StatusCode,
    context::Context,
    middleware::{BoxFuture, Middleware, Next},
};

/// Vary header names used when neither the route nor the middleware sets any.
pub const DEFAULT_VARY: [&str; 2] = ["accept", "accept-language"];

/// Response cache with `ETag` / `If-Match` / `If-None-Match` handling.
///
/// Routes opt in through [`CacheOptions`] with a non-zero `expiry`; requests
/// on other routes pass straight through.
///
/// # Examples
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use conditional_cache::{Response, Router, StatusCode};
/// use conditional_cache::cache::{CacheMiddleware, CacheOptions, InMemoryStore};
///
/// let store = Arc::new(InMemoryStore::new());
/// let mut router = Router::new();
/// router.layer(CacheMiddleware::new(store));
/// router
///     .get("/report", |_ctx| async { Response::new(StatusCode::Ok).body("slow") })
///     .cache(CacheOptions::new(30).cache_control("public"));
/// ```
pub struct CacheMiddleware<S: ?Sized> {
    store: Arc<S>,
    vary: Arc<[String]>,
}

impl<S> CacheMiddleware<S>
where
    S: CacheStore + ?Sized + 'static,
{
    /// Creates the middleware over `store`, varying on [`DEFAULT_VARY`].
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            vary: DEFAULT_VARY.iter().map(|name| name.to_string()).collect(),
        }
    }

    /// Replaces the vary header names used by routes that do not set their own.
    #[must_use]
    pub fn vary<I, N>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        self.vary = names.into_iter().map(Into::into).collect();
        self
    }
}

impl<S> Middleware for CacheMiddleware<S>
where
    S: CacheStore + ?Sized + 'static,
{
    fn handle(&self, ctx: Context, next: Next) -> BoxFuture<Response> {
        let engine = Engine {
            store: Arc::clone(&self.store),
            default_vary: Arc::clone(&self.vary),
        };

        Box::pin(async move {
            let path = ctx.request().path().to_owned();
            match engine.process(ctx, next).await {
                Ok(response) => response,
                Err(err) => {
                    error!(path = %path, error = %err, "cached response could not be served");
                    Response::new(StatusCode::InternalServerError)
                }
            }
        })
    }
}

// Per-request state moved into the handler future.
struct Engine<S: ?Sized> {
    store: Arc<S>,
    default_vary: Arc<[String]>,
}

impl<S> Engine<S>
where
    S: CacheStore + ?Sized,
{
    async fn process(self, ctx: Context, next: Next) -> Result<Response, CacheError> {
        let options = ctx
            .extensions()
            .get::<CacheOptions>()
            .cloned()
            .unwrap_or_default();

        if options.expiry == 0 {
            return Ok(next.run(ctx).await);
        }

        let vary = options
            .vary
            .clone()
            .unwrap_or_else(|| self.default_vary.to_vec());

        let request = ctx.request().clone();
        let method = request.method();
        let headers = request.headers();
        let reads = method.is_read();

        let request_etag = headers.get("etag").map(parse_etag_value);
        let conditional = headers.contains("if-none-match") || headers.contains("if-match");

        let mut key = match request_etag {
            Some(tag) => tag.to_owned(),
            None => generate_key(&request, &vary),
        };

        let entry = match self.store.get(&key) {
            Ok(entry) => entry,
            Err(err) => {
                if !err.is_not_found() {
                    debug!(key = %key, error = %err, "cache lookup failed, treating as miss");
                }
                CacheEntry::empty(key.as_str())
            }
        };

        if reads && entry.is_fresh() {
            match request_etag {
                Some(_) if !conditional => {
                    debug!(key = %key, "etag matches fresh entry");
                    return not_modified(&entry);
                }
                Some(_) => {}
                None => {
                    debug!(key = %key, method = %method, "serving fresh cache entry");
                    let mut response = codec::deserialize(entry.body())?;
                    stamp_validators(&mut response, &entry);
                    response.set_header("Vary", vary.join(","));
                    if *method == Method::Head {
                        response.clear_body();
                        response.set_status(StatusCode::NotModified);
                    }
                    return Ok(response);
                }
            }
        }

        if let Some(tag) = headers.get("if-none-match") {
            if self.store.get(parse_etag_value(tag)).is_ok() {
                if method.is_mutating() {
                    debug!(key = %key, method = %method, "if-none-match hit on a write");
                    return Ok(Response::new(StatusCode::PreconditionFailed));
                }
                if reads && entry.is_fresh() {
                    return not_modified(&entry);
                }
            }
        }

        if let Some(tag) = headers.get("if-match") {
            if self.store.get(parse_etag_value(tag)).is_err() {
                if reads && entry.is_fresh() {
                    return not_modified(&entry);
                }
                debug!(key = %key, method = %method, "if-match miss");
                return Ok(Response::new(StatusCode::PreconditionFailed));
            }
        }

        debug!(key = %key, method = %method, "cache miss, invoking handler");
        let mut response = next.run(ctx).await;

        response.set_header("cache-control", options.cache_control_header());

        let declared: Vec<String> = response
            .headers()
            .get_all("vary")
            .flat_map(|line| line.split(','))
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_owned)
            .collect();
        if response.headers().contains("vary") {
            key = generate_key(&request, &declared);
        } else {
            response.set_header("vary", vary.join(","));
        }

        if let Some(tag) = response.headers().get("etag") {
            key = parse_etag_value(tag).to_owned();
        }

        let body = codec::serialize(&response);
        let entry = if entry.is_empty() {
            CacheEntry::new(key, body, options.expiry)
        } else {
            let mut entry = entry;
            entry.set_ttl(options.expiry);
            entry.replace_body(body);
            entry
        };

        let id = entry.id().to_owned();
        if let Err(err) = self.store.set(entry) {
            warn!(key = %id, error = %err, "failed to store response");
        }

        Ok(response)
    }
}

// Stored response without its body, answered as 304 Not Modified.
fn not_modified(entry: &CacheEntry) -> Result<Response, CacheError> {
    let mut response = codec::deserialize(entry.body())?;
    response.clear_body();
    response.set_status(StatusCode::NotModified);
    stamp_validators(&mut response, entry);
    Ok(response)
}

fn stamp_validators(response: &mut Response, entry: &CacheEntry) {
    let age = age_seconds(entry.updated_at(), Utc::now());
    response.set_header("Last-Modified", format_http_date(entry.updated_at()));
    response.set_header("Age", age.to_string());
}
