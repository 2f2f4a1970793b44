//! Cache Entry Module
//!
//! The stored unit: serialized response bytes plus TTL and freshness timestamps.

use bytes::Bytes;
use chrono::{DateTime, TimeDelta, Utc};

/// A single cached response.
///
/// The body is opaque to the entry; the middleware fills it with the output
/// of [`codec::serialize`](super::codec::serialize). `updated_at` and
/// `expires_at` only ever change together, through
/// [`replace_body`](Self::replace_body).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    id: String,
    body: Bytes,
    ttl: u64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl CacheEntry {
    /// Creates a live entry that expires `ttl` seconds from now.
    pub fn new(id: impl Into<String>, body: impl Into<Bytes>, ttl: u64) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            body: body.into(),
            ttl,
            created_at: now,
            updated_at: now,
            expires_at: expiry_after(now, ttl),
        }
    }

    /// Creates the placeholder used when a key has no entry yet: zero bytes,
    /// zero TTL.
    pub fn empty(id: impl Into<String>) -> Self {
        Self::new(id, Bytes::new(), 0)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    pub fn ttl(&self) -> u64 {
        self.ttl
    }

    /// Changes the TTL used by the next [`replace_body`](Self::replace_body).
    ///
    /// `expires_at` is left alone until the body is replaced.
    pub fn set_ttl(&mut self, ttl: u64) {
        self.ttl = ttl;
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Swaps in a new body and restarts the freshness window from now.
    pub fn replace_body(&mut self, body: impl Into<Bytes>) {
        let now = Utc::now();
        self.body = body.into();
        self.updated_at = now;
        self.expires_at = expiry_after(now, self.ttl);
    }

    /// `true` once `expires_at` lies in the past.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at < now
    }

    /// `true` for the zero-length placeholder created by [`empty`](Self::empty).
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// `true` when the entry holds a response that may still be served.
    pub fn is_fresh(&self) -> bool {
        !self.is_empty() && !self.is_expired()
    }

    /// Shifts every timestamp into the past, as if the entry had been written
    /// `by` ago.
    #[cfg(test)]
    pub(crate) fn backdate(&mut self, by: TimeDelta) {
        self.created_at -= by;
        self.updated_at -= by;
        self.expires_at -= by;
    }
}

fn expiry_after(from: DateTime<Utc>, ttl: u64) -> DateTime<Utc> {
    let ttl = i64::try_from(ttl)
        .ok()
        .and_then(TimeDelta::try_seconds)
        .unwrap_or(TimeDelta::MAX);
    from.checked_add_signed(ttl)
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_entry_is_fresh() {
        let entry = CacheEntry::new("1", &b"test_data"[..], 30);
        assert_eq!(entry.id(), "1");
        assert_eq!(entry.ttl(), 30);
        assert!(!entry.is_empty());
        assert!(!entry.is_expired());
        assert!(entry.is_fresh());
        assert_eq!(entry.created_at(), entry.updated_at());
        assert_eq!(entry.expires_at() - entry.updated_at(), TimeDelta::seconds(30));
    }

    #[test]
    fn empty_entry_is_never_fresh() {
        let entry = CacheEntry::empty("1");
        assert!(entry.is_empty());
        assert_eq!(entry.ttl(), 0);
        assert!(!entry.is_fresh());
        assert!(entry.is_expired_at(entry.expires_at() + TimeDelta::milliseconds(1)));
    }

    #[test]
    fn expiry_boundary_is_exclusive() {
        let entry = CacheEntry::new("1", &b"x"[..], 10);
        assert!(!entry.is_expired_at(entry.expires_at()));
        assert!(entry.is_expired_at(entry.expires_at() + TimeDelta::seconds(1)));
    }

    #[test]
    fn replace_body_recomputes_timestamps() {
        let mut entry = CacheEntry::new("1", &b"old"[..], 10);
        entry.backdate(TimeDelta::seconds(60));
        let created = entry.created_at();
        assert!(entry.is_expired());

        entry.set_ttl(20);
        entry.replace_body(&b"new"[..]);

        assert_eq!(entry.body().as_ref(), b"new");
        assert_eq!(entry.created_at(), created);
        assert!(entry.updated_at() > created);
        assert_eq!(entry.expires_at() - entry.updated_at(), TimeDelta::seconds(20));
        assert!(entry.is_fresh());
    }

    #[test]
    fn set_ttl_alone_keeps_expiry() {
        let mut entry = CacheEntry::new("1", &b"x"[..], 10);
        let expires = entry.expires_at();
        entry.set_ttl(100);
        assert_eq!(entry.expires_at(), expires);
    }

    #[test]
    fn huge_ttl_saturates() {
        let entry = CacheEntry::new("1", &b"x"[..], u64::MAX);
        assert!(!entry.is_expired());
    }
}
