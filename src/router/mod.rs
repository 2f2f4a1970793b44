//! Request routing with per-route cache settings.
//!
//! [`Router`] maps a method and an exact path to a handler. A trailing slash
//! is ignored on both sides, so `/users/` and `/users` name the same route.
//! Routes are matched in registration order and the first hit wins.
//!
//! A matched request runs through every middleware installed with
//! [`Router::layer`] before it reaches the handler, and carries the route's
//! [`CacheOptions`] (if any) in its context extensions.

use std::sync::Arc;

use crate::cache::CacheOptions;
use crate::context::Context;
use crate::middleware::{BoxFuture, Endpoint, Middleware, MiddlewareHandler, Next, from_middleware};
use crate::{Method, Request, Response, StatusCode};

/// Conversion trait for async handler functions.
///
/// Any `Fn(Context) -> impl Future<Output = Response> + Send` that is also
/// `Send + Sync + 'static` implements this trait through the blanket impl below.
pub trait IntoHandler: Send + Sync + 'static {
    fn call(&self, ctx: Context) -> BoxFuture<Response>;
}

impl<T, F> IntoHandler for T
where
    T: Fn(Context) -> F + Send + Sync + 'static,
    F: Future<Output = Response> + Send + 'static,
{
    fn call(&self, ctx: Context) -> BoxFuture<Response> {
        Box::pin((self)(ctx))
    }
}

fn normalize(path: &str) -> &str {
    match path.strip_suffix('/') {
        Some(trimmed) if !trimmed.is_empty() => trimmed,
        _ => path,
    }
}

/// A registered route. Returned by the registration helpers on [`Router`] so
/// cache settings can be attached in place.
pub struct Route {
    method: Method,
    path: String,
    handler: Endpoint,
    cache: Option<CacheOptions>,
}

impl Route {
    /// Attaches cache settings to this route.
    ///
    /// ```rust
    /// use conditional_cache::{Response, Router, StatusCode};
    /// use conditional_cache::cache::CacheOptions;
    ///
    /// let mut router = Router::new();
    /// router
    ///     .get("/report", |_ctx| async { Response::new(StatusCode::Ok) })
    ///     .cache(CacheOptions::new(60));
    /// ```
    pub fn cache(&mut self, options: CacheOptions) -> &mut Self {
        self.cache = Some(options);
        self
    }

    fn matches(&self, method: &Method, path: &str) -> bool {
        &self.method == method && self.path == normalize(path)
    }
}

/// Dispatches requests to registered handlers through a shared middleware chain.
///
/// When no route matches, `404 Not Found` is returned without running any
/// middleware.
#[derive(Default)]
pub struct Router {
    routes: Vec<Route>,
    middlewares: Arc<[MiddlewareHandler]>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a middleware to the chain every matched request runs through.
    ///
    /// The first layer installed sees the request first and the response last.
    pub fn layer<M>(&mut self, middleware: M) -> &mut Self
    where
        M: Middleware + 'static,
    {
        let mut chain = self.middlewares.to_vec();
        chain.push(from_middleware(Arc::new(middleware)));
        self.middlewares = chain.into();
        self
    }

    pub fn get(&mut self, path: &str, handler: impl IntoHandler) -> &mut Route {
        self.add(Method::Get, path, handler)
    }

    pub fn head(&mut self, path: &str, handler: impl IntoHandler) -> &mut Route {
        self.add(Method::Head, path, handler)
    }

    pub fn post(&mut self, path: &str, handler: impl IntoHandler) -> &mut Route {
        self.add(Method::Post, path, handler)
    }

    pub fn put(&mut self, path: &str, handler: impl IntoHandler) -> &mut Route {
        self.add(Method::Put, path, handler)
    }

    pub fn patch(&mut self, path: &str, handler: impl IntoHandler) -> &mut Route {
        self.add(Method::Patch, path, handler)
    }

    pub fn delete(&mut self, path: &str, handler: impl IntoHandler) -> &mut Route {
        self.add(Method::Delete, path, handler)
    }

    /// Registers a handler for an arbitrary method.
    pub fn add(&mut self, method: Method, path: &str, handler: impl IntoHandler) -> &mut Route {
        let handler: Endpoint = Arc::new(move |ctx| handler.call(ctx));
        self.routes.push(Route {
            method,
            path: normalize(path).to_owned(),
            handler,
            cache: None,
        });
        let last = self.routes.len() - 1;
        &mut self.routes[last]
    }

    /// Runs `request` through the middleware chain and the first matching handler.
    pub async fn route(&self, request: Request) -> Response {
        let Some(route) = self
            .routes
            .iter()
            .find(|route| route.matches(request.method(), request.path()))
        else {
            return Response::new(StatusCode::NotFound);
        };

        let mut ctx = Context::new(request);
        if let Some(options) = &route.cache {
            ctx.extensions_mut().insert(options.clone());
        }

        Next::new(Arc::clone(&self.middlewares), Arc::clone(&route.handler))
            .run(ctx)
            .await
    }
}
