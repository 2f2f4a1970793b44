//! Ordered, multi-value header map.

/// Header fields in insertion order. Names compare case-insensitively and a
/// name may repeat.
///
/// Values are stored the way an HTTP/1.1 head carries them: surrounding
/// spaces and tabs are dropped, and control characters other than tab are
/// replaced by a space (RFC 9110 §5.5). A value read back from a parsed head
/// is therefore identical to the one that was written.
///
/// ```
/// use conditional_cache::Headers;
///
/// let mut headers = Headers::new();
/// headers.insert("Vary", "accept");
/// headers.insert("vary", " origin ");
///
/// let all: Vec<_> = headers.get_all("VARY").collect();
/// assert_eq!(all, vec!["accept", "origin"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    inner: Vec<(String, String)>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: Vec::with_capacity(capacity),
        }
    }

    /// Appends a field, keeping any earlier values under the same name.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.inner.push((name.into(), field_value(value.into())));
    }

    /// Replaces every field named `name` with one field at the end.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        self.remove(&name);
        self.inner.push((name, field_value(value.into())));
    }

    /// First value under `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.get_all(name).next()
    }

    pub fn get_all<'a, 'n>(&'a self, name: &'n str) -> impl Iterator<Item = &'a str> {
        self.inner
            .iter()
            .filter(move |(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Drops every field named `name`; `true` if there was one.
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.inner.len();
        self.inner.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        self.inner.len() < before
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Number of fields, counting repeated names.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.inner.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

fn field_value(value: String) -> String {
    let clean = |c: char| c == '\t' || !c.is_ascii_control();
    let padded = |c: char| c == ' ' || c == '\t';

    if value.chars().all(clean) && !value.starts_with(padded) && !value.ends_with(padded) {
        return value;
    }

    let replaced: String = value
        .chars()
        .map(|c| if clean(c) { c } else { ' ' })
        .collect();
    replaced.trim_matches(padded).to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_case_insensitive() {
        let mut h = Headers::new();
        h.insert("Content-Type", "text/plain");
        assert_eq!(h.get("content-type"), Some("text/plain"));
        assert_eq!(h.get("CONTENT-TYPE"), Some("text/plain"));
        assert!(h.contains("content-TYPE"));
        assert!(!h.contains("x-missing"));
    }

    #[test]
    fn repeated_names_keep_order() {
        let mut h = Headers::new();
        h.insert("Set-Cookie", "a=1");
        h.insert("X-Other", "x");
        h.insert("set-cookie", "b=2");
        let vals: Vec<_> = h.get_all("set-cookie").collect();
        assert_eq!(vals, vec!["a=1", "b=2"]);
        assert_eq!(h.len(), 3);

        assert!(h.remove("SET-COOKIE"));
        assert!(!h.remove("set-cookie"));
        assert_eq!(h.len(), 1);
    }

    #[test]
    fn set_replaces_all_values() {
        let mut h = Headers::new();
        h.insert("Vary", "accept");
        h.insert("ETag", "\"1\"");
        h.insert("vary", "origin");
        h.set("Vary", "accept-language");

        let vals: Vec<_> = h.get_all("vary").collect();
        assert_eq!(vals, vec!["accept-language"]);
        let names: Vec<_> = h.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["ETag", "Vary"]);
    }

    #[test]
    fn values_are_trimmed() {
        let mut h = Headers::new();
        h.insert("x-pad", " v ");
        h.insert("x-tab", "\ta\tb\t");
        h.set("x-blank", "  \t ");
        assert_eq!(h.get("x-pad"), Some("v"));
        assert_eq!(h.get("x-tab"), Some("a\tb"));
        assert_eq!(h.get("x-blank"), Some(""));
    }

    #[test]
    fn control_characters_become_spaces() {
        let mut h = Headers::new();
        h.insert("x-split", "a\r\nb\0c\n");
        assert_eq!(h.get("x-split"), Some("a  b c"));
    }

    #[test]
    fn clean_values_are_untouched() {
        let mut h = Headers::new();
        h.insert("x-text", "caf\u{e9}, \"quoted\" value");
        assert_eq!(h.get("x-text"), Some("caf\u{e9}, \"quoted\" value"));
    }
}
