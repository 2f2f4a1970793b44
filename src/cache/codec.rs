//! Response codec — HTTP/1.1 wire layout for cached responses.
//!
//! A stored response is its status line, its header lines in insertion order,
//! a blank line, and the raw body. Unlike a response sent on a socket, no
//! `Content-Length` or `Connection` header is added, so decoding yields the
//! exact response that was encoded.

use bytes::{BufMut, Bytes, BytesMut};

use super::CacheError;
use crate::http::{Headers, Response, StatusCode};

/// Encodes `response` for storage in a [`CacheEntry`](super::CacheEntry).
pub fn serialize(response: &Response) -> Bytes {
    let status = response.status();
    let headers = response.headers();
    let body = response.content();

    let mut buf = BytesMut::with_capacity(64 + headers.len() * 48 + body.len());

    buf.put(format!("HTTP/1.1 {} {}\r\n", status.as_u16(), status.canonical_reason()).as_bytes());
    for (name, value) in headers.iter() {
        buf.put(format!("{name}: {value}\r\n").as_bytes());
    }
    buf.put(&b"\r\n"[..]);
    buf.put(body);

    buf.freeze()
}

/// Decodes bytes produced by [`serialize`].
///
/// # Errors
///
/// [`CacheError::Decode`] when the head is malformed or truncated, the status
/// code is unknown, or a header value is not UTF-8.
pub fn deserialize(bytes: &[u8]) -> Result<Response, CacheError> {
    let mut raw_headers = vec![httparse::EMPTY_HEADER; header_lines(bytes)];
    let mut raw = httparse::Response::new(&mut raw_headers);

    let body_offset = match raw.parse(bytes)? {
        httparse::Status::Complete(offset) => offset,
        httparse::Status::Partial => {
            return Err(CacheError::Decode("truncated response head".into()));
        }
    };

    let code = raw
        .code
        .ok_or_else(|| CacheError::Decode("missing status code".into()))?;
    let status = StatusCode::from_u16(code)
        .ok_or_else(|| CacheError::Decode(format!("unsupported status code {code}")))?;

    let mut headers = Headers::with_capacity(raw.headers.len());
    for header in raw.headers.iter() {
        let value = std::str::from_utf8(header.value).map_err(|e| {
            CacheError::Decode(format!("header {} is not valid UTF-8: {e}", header.name))
        })?;
        headers.insert(header.name, value);
    }

    Ok(Response::from_parts(status, headers, &bytes[body_offset..]))
}

// Upper bound on the header count of an encoded head: one per line break
// before the blank line that ends it.
fn header_lines(bytes: &[u8]) -> usize {
    let head = bytes
        .windows(4)
        .position(|window| window == b"\r\n\r\n")
        .map_or(bytes, |end| &bytes[..end]);
    head.iter().filter(|&&byte| byte == b'\n').count()
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn layout_is_plain_http() {
        let response = Response::new(StatusCode::Ok).header("test", "ok").body("test");
        let bytes = serialize(&response);
        assert_eq!(&bytes[..], b"HTTP/1.1 200 OK\r\ntest: ok\r\n\r\ntest");
    }

    #[test]
    fn round_trip_keeps_order_and_multi_values() {
        let response = Response::new(StatusCode::Created)
            .header("Set-Cookie", "a=1")
            .header("ETag", "W/\"1\"")
            .header("set-cookie", "b=2")
            .body_bytes(vec![0_u8, 159, 146, 150, b'\r', b'\n']);

        let decoded = deserialize(&serialize(&response)).unwrap();

        assert_eq!(decoded, response);
        let cookies: Vec<_> = decoded.headers().get_all("set-cookie").collect();
        assert_eq!(cookies, vec!["a=1", "b=2"]);
    }

    #[test]
    fn empty_body_round_trips() {
        let response = Response::new(StatusCode::NoContent);
        assert_eq!(deserialize(&serialize(&response)).unwrap(), response);
    }

    #[test]
    fn many_headers_round_trip() {
        let mut response = Response::new(StatusCode::Ok).body("test");
        for i in 0..300 {
            response.add_header(format!("x-h{i}"), i.to_string());
        }

        let decoded = deserialize(&serialize(&response)).unwrap();

        assert_eq!(decoded.headers().len(), 300);
        assert_eq!(decoded, response);
    }

    #[test]
    fn padded_values_round_trip_trimmed() {
        let response = Response::new(StatusCode::Ok)
            .header("x-pad", " v ")
            .header("x-tab", "\tinner\tvalue\t")
            .header("x-blank", "   ");

        assert_eq!(response.headers().get("x-pad"), Some("v"));
        let decoded = deserialize(&serialize(&response)).unwrap();

        assert_eq!(decoded, response);
        assert_eq!(decoded.headers().get("x-tab"), Some("inner\tvalue"));
        assert_eq!(decoded.headers().get("x-blank"), Some(""));
    }

    #[test]
    fn line_breaks_in_values_cannot_split_the_head() {
        let response = Response::new(StatusCode::Ok)
            .header("x-split", "a\r\nx-injected: 1")
            .body("test");

        let decoded = deserialize(&serialize(&response)).unwrap();

        assert_eq!(decoded, response);
        assert!(!decoded.headers().contains("x-injected"));
    }

    #[test]
    fn garbage_is_a_decode_error() {
        assert!(matches!(
            deserialize(b"not a response at all\r\n\r\n"),
            Err(CacheError::Decode(_))
        ));
    }

    #[test]
    fn truncated_head_is_a_decode_error() {
        assert!(matches!(
            deserialize(b"HTTP/1.1 200 OK\r\ntest: ok\r\n"),
            Err(CacheError::Decode(_))
        ));
    }

    #[test]
    fn unknown_status_is_a_decode_error() {
        assert!(matches!(
            deserialize(b"HTTP/1.1 299 Odd\r\n\r\n"),
            Err(CacheError::Decode(_))
        ));
    }

    fn status_strategy() -> impl Strategy<Value = StatusCode> {
        prop::sample::select(vec![
            StatusCode::Ok,
            StatusCode::Created,
            StatusCode::NotModified,
            StatusCode::NotFound,
            StatusCode::PreconditionFailed,
            StatusCode::InternalServerError,
        ])
    }

    fn header_strategy() -> impl Strategy<Value = (String, String)> {
        ("[A-Za-z][A-Za-z0-9-]{0,15}", "[ \t\r\n!-~\u{a0}-\u{2fff}]{0,32}")
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_round_trip(
            status in status_strategy(),
            headers in prop::collection::vec(header_strategy(), 0..12),
            body in prop::collection::vec(any::<u8>(), 0..512),
        ) {
            let mut response = Response::new(status).body_bytes(body);
            for (name, value) in headers {
                response.add_header(name, value);
            }

            let decoded = deserialize(&serialize(&response)).unwrap();
            prop_assert_eq!(decoded, response);
        }
    }
}
