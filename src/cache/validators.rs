//! Validator header helpers: entity tags and HTTP dates.

use chrono::{DateTime, Utc};

/// RFC 1123 date layout used by `Last-Modified` (always GMT).
const HTTP_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Strips the weak-validator marker and surrounding quotes from an entity tag.
///
/// ```
/// use conditional_cache::cache::parse_etag_value;
///
/// assert_eq!(parse_etag_value("\"d\""), "d");
/// assert_eq!(parse_etag_value("W/\"d\""), "d");
/// assert_eq!(parse_etag_value("plain"), "plain");
/// ```
pub fn parse_etag_value(raw: &str) -> &str {
    let raw = raw.trim();
    let raw = raw.strip_prefix("W/").unwrap_or(raw);
    raw.trim_matches('"')
}

/// Formats a timestamp as an HTTP date, e.g. `Mon, 18 Dec 2000 10:01:01 GMT`.
pub fn format_http_date(at: DateTime<Utc>) -> String {
    at.format(HTTP_DATE_FORMAT).to_string()
}

/// Whole seconds elapsed between `since` and `now`, never negative.
pub(crate) fn age_seconds(since: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (now - since).num_seconds().max(0)
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 10, 1, 1).unwrap()
    }

    #[test]
    fn http_date_weekdays_and_months() {
        assert_eq!(format_http_date(at(2000, 12, 18)), "Mon, 18 Dec 2000 10:01:01 GMT");
        assert_eq!(format_http_date(at(2000, 12, 24)), "Sun, 24 Dec 2000 10:01:01 GMT");
        assert_eq!(format_http_date(at(2000, 2, 24)), "Thu, 24 Feb 2000 10:01:01 GMT");
        assert_eq!(format_http_date(at(2000, 9, 24)), "Sun, 24 Sep 2000 10:01:01 GMT");
    }

    #[test]
    fn http_date_pads_single_digit_day() {
        assert_eq!(format_http_date(at(2001, 1, 2)), "Tue, 02 Jan 2001 10:01:01 GMT");
    }

    #[test]
    fn etag_variants() {
        assert_eq!(parse_etag_value("\"abc\""), "abc");
        assert_eq!(parse_etag_value("W/\"abc\""), "abc");
        assert_eq!(parse_etag_value(" \"abc\" "), "abc");
        assert_eq!(parse_etag_value("existing_etag"), "existing_etag");
    }

    #[test]
    fn age_is_clamped() {
        let now = at(2000, 1, 1);
        assert_eq!(age_seconds(now - Duration::seconds(42), now), 42);
        assert_eq!(age_seconds(now + Duration::seconds(5), now), 0);
    }
}
