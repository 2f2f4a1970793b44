//! Response caching with HTTP conditional-request semantics.
//!
//! ## Pieces
//!
//! - [`generate_key`] — derives a cache key from method, path, query and the
//!   route's vary headers.
//! - [`CacheEntry`] — a serialized response with its TTL and timestamps.
//! - [`CacheStore`] / [`CollectableStore`] — storage traits, implemented by
//!   [`InMemoryStore`] and [`CollectableInMemoryStore`].
//! - [`codec`] — the byte layout of a stored response.
//! - [`CacheMiddleware`] — decides per request whether to serve from the
//!   store, answer `304`/`412`, or call the handler and store its response.
//! - [`InvalidationMiddleware`] — drops a resource's cached `GET` after a
//!   successful write.
//!
//! Routes opt in through [`CacheOptions`]. Stores are created by the host and
//! shared with the middleware through an [`Arc`](std::sync::Arc).

pub mod codec;
mod entry;
mod error;
mod invalidation;
mod key;
mod middleware;
mod options;
mod store;
mod validators;

pub use entry::CacheEntry;
pub use error::CacheError;
pub use invalidation::InvalidationMiddleware;
pub use key::{generate_key, generate_key_for};
pub use middleware::{CacheMiddleware, DEFAULT_VARY};
pub use options::CacheOptions;
pub use store::{CacheStore, CollectableInMemoryStore, CollectableStore, InMemoryStore};
pub use validators::{format_http_date, parse_etag_value};
