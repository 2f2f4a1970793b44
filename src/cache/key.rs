//! Cache key derivation.
//!
//! A key is the hex SHA-256 digest of `"<METHOD>:<path>:<query>"` followed by
//! the values of each vary header, in the order the caller lists them.

use sha2::{Digest, Sha256};

use crate::{Method, Request};

/// Derives the cache key for `request`.
///
/// `HEAD` is keyed as `GET` so both methods share one slot. Each header in
/// `vary` contributes all of its values concatenated without a delimiter; an
/// absent header contributes nothing.
///
/// ```
/// use conditional_cache::{Headers, Method, Request};
/// use conditional_cache::cache::generate_key;
///
/// let vary = ["accept", "accept-language"];
/// let get = Request::from_parts(Method::Get, "/items?page=1", Headers::new());
/// let head = Request::from_parts(Method::Head, "/items?page=1", Headers::new());
///
/// assert_eq!(generate_key(&get, &vary), generate_key(&head, &vary));
/// assert_eq!(generate_key(&get, &vary).len(), 64);
/// ```
pub fn generate_key<S: AsRef<str>>(request: &Request, vary: &[S]) -> String {
    generate_key_for(request.method(), request, vary)
}

/// Derives the key `request` would have if it had been sent with `method`.
///
/// Used to find the `GET` entry of a resource while handling a mutating
/// request to the same path.
pub fn generate_key_for<S: AsRef<str>>(method: &Method, request: &Request, vary: &[S]) -> String {
    let method = match method {
        Method::Head => &Method::Get,
        other => other,
    };

    let mut canonical = format!(
        "{}:{}:{}",
        method,
        request.path(),
        request.query_string().unwrap_or("")
    );

    for name in vary {
        for value in request.headers().get_all(name.as_ref()) {
            canonical.push_str(value);
        }
    }

    hex::encode(Sha256::digest(canonical.as_bytes()))
}
