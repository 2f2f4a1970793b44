//! The middleware chain a matched request runs through.
//!
//! A [`Middleware`] gets the request [`Context`] and a [`Next`] handle. It can
//! answer on its own, or call [`Next::run`] and reshape what comes back. The
//! last link is the route's [`Endpoint`]. The response cache in
//! [`crate::cache`] is one such layer.

use std::{pin::Pin, sync::Arc};

use crate::{Response, context::Context};

pub type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send>>;

/// The handler of the matched route.
pub type Endpoint = Arc<dyn Fn(Context) -> BoxFuture<Response> + Send + Sync + 'static>;

/// One link of the chain, shared between requests.
pub type MiddlewareHandler =
    Arc<dyn Fn(Context, Next) -> BoxFuture<Response> + Send + Sync + 'static>;

pub fn from_middleware<M>(middleware: Arc<M>) -> MiddlewareHandler
where
    M: Middleware + 'static,
{
    Arc::new(move |ctx: Context, next: Next| middleware.handle(ctx, next))
}

/// The rest of the chain for one request. Consumed by [`run`](Self::run), so a
/// layer forwards a request at most once.
pub struct Next {
    middlewares: Arc<[MiddlewareHandler]>,
    position: usize,
    endpoint: Endpoint,
}

impl Next {
    pub fn new(middlewares: Arc<[MiddlewareHandler]>, endpoint: Endpoint) -> Self {
        Self {
            middlewares,
            position: 0,
            endpoint,
        }
    }

    /// Hands `ctx` to the following layer, or to the endpoint after the last one.
    pub async fn run(mut self, ctx: Context) -> Response {
        match self.middlewares.get(self.position).cloned() {
            Some(layer) => {
                self.position += 1;
                layer(ctx, self).await
            }
            None => (self.endpoint)(ctx).await,
        }
    }
}

/// A layer wrapped around every matched route.
///
/// Implementations are shared across tasks and must not hold `&mut` state
/// across an `.await`.
pub trait Middleware: Send + Sync {
    fn handle(&self, ctx: Context, next: Next) -> BoxFuture<Response>;
}
