//! Dropping cached representations when a resource changes.

use std::sync::Arc;

use tracing::debug;

use super::{CacheOptions, CollectableStore, DEFAULT_VARY, generate_key_for};
use crate::{
    Method, Response,
    context::Context,
    middleware::{BoxFuture, Middleware, Next},
};

/// Removes the cached `GET` entry of a resource after a successful write to it.
///
/// Only routes whose [`CacheOptions::invalidate`] is set are affected, and
/// only for POST, PUT, PATCH and DELETE requests answered with a `2xx`
/// status. The entry is looked up under the key a `GET` to the same path,
/// query and vary headers would have used; entries stored under a response
/// `ETag` are left alone.
pub struct InvalidationMiddleware<S: ?Sized> {
    store: Arc<S>,
    vary: Arc<[String]>,
}

impl<S> InvalidationMiddleware<S>
where
    S: CollectableStore + ?Sized + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            vary: DEFAULT_VARY.iter().map(|name| name.to_string()).collect(),
        }
    }

    /// Vary header names for routes that do not set their own; must match the
    /// list given to the [`CacheMiddleware`](super::CacheMiddleware).
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

impl<S> Middleware for InvalidationMiddleware<S>
where
    S: CollectableStore + ?Sized + 'static,
{
    fn handle(&self, ctx: Context, next: Next) -> BoxFuture<Response> {
        let vary = ctx
            .extensions()
            .get::<CacheOptions>()
            .filter(|options| options.invalidate && ctx.request().method().is_mutating())
            .map(|options| options.vary.clone().unwrap_or_else(|| self.vary.to_vec()));

        let Some(vary) = vary else {
            return Box::pin(next.run(ctx));
        };

        let store = Arc::clone(&self.store);
        let request = ctx.request().clone();

        Box::pin(async move {
            let response = next.run(ctx).await;

            if response.status().is_success() {
                let key = generate_key_for(&Method::Get, &request, &vary);
                if store.remove(&key).is_some() {
                    debug!(key = %key, method = %request.method(), path = %request.path(), "invalidated cache entry");
                }
            }

            response
        })
    }
}
