//! # conditional-cache
//!
//! An HTTP response cache for middleware pipelines, with `ETag`, `If-Match`,
//! `If-None-Match`, `Last-Modified` and `Age` handling.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use conditional_cache::cache::{CacheMiddleware, CacheOptions, InMemoryStore};
//! use conditional_cache::{Headers, Method, Request, Response, Router, StatusCode};
//!
//! #[tokio::main]
//! async fn main() {
//!     let store = Arc::new(InMemoryStore::new());
//!
//!     let mut router = Router::new();
//!     router.layer(CacheMiddleware::new(store));
//!     router
//!         .get("/hello", |_ctx| async {
//!             Response::new(StatusCode::Ok).body("Hello, World!")
//!         })
//!         .cache(CacheOptions::new(10));
//!
//!     let first = router.route(Request::from_parts(Method::Get, "/hello", Headers::new())).await;
//!     assert_eq!(first.headers().get("cache-control"), Some("max-age=10"));
//!
//!     let cached = router.route(Request::from_parts(Method::Get, "/hello", Headers::new())).await;
//!     assert_eq!(cached.headers().get("age"), Some("0"));
//!     assert_eq!(cached.content(), b"Hello, World!");
//! }
//! ```

pub mod cache;
pub mod context;
pub mod http;
pub mod middleware;
pub mod router;

// ── Convenience re-exports ────────────────────────────────────────────────────
pub use http::{Headers, Method, Request, Response, StatusCode};
pub use router::Router;
