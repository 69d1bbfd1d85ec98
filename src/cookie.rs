//! Cookie module
//!
//! Sets the fixed demo cookie on outbound responses and parses the
//! inbound `Cookie` header(s) for the diagnostic dump.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{HeaderValue, COOKIE, SET_COOKIE};
use hyper::{HeaderMap, Response};

pub const TEST_COOKIE: &str = "testcookiename=testcookievalue";

/// Append the fixed `testcookiename=testcookievalue` cookie to a response.
/// Mutates headers only; never touches the body.
pub fn set_test_cookie(response: &mut Response<Full<Bytes>>) {
    response
        .headers_mut()
        .append(SET_COOKIE, HeaderValue::from_static(TEST_COOKIE));
}

/// Collect the client's cookies as name/value pairs, in header order.
/// Malformed fragments (no `=`) are skipped.
pub fn parse_cookies(headers: &HeaderMap) -> Vec<(String, String)> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|header| header.split(';'))
        .filter_map(|pair| {
            let (name, value) = pair.trim().split_once('=')?;
            Some((name.to_string(), value.to_string()))
        })
        .collect()
}

/// Stringify cookies as `[name=value other=value]` for the dump.
pub fn format_cookies(cookies: &[(String, String)]) -> String {
    let pairs: Vec<String> = cookies
        .iter()
        .map(|(name, value)| format!("{name}={value}"))
        .collect();
    format!("[{}]", pairs.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_test_cookie() {
        let mut response = Response::new(Full::new(Bytes::new()));
        set_test_cookie(&mut response);

        let cookie = response.headers().get(SET_COOKIE).unwrap();
        assert_eq!(cookie, "testcookiename=testcookievalue");
    }

    #[test]
    fn test_set_test_cookie_keeps_body() {
        let mut response = Response::new(Full::new(Bytes::from("body")));
        set_test_cookie(&mut response);
        assert_eq!(response.headers().len(), 1);
    }

    #[test]
    fn test_parse_cookies() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("a=1; b=2"));

        let cookies = parse_cookies(&headers);
        assert_eq!(
            cookies,
            vec![
                ("a".to_string(), "1".to_string()),
                ("b".to_string(), "2".to_string())
            ]
        );
    }

    #[test]
    fn test_parse_cookies_skips_malformed() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("a=1; junk; b=2"));

        let cookies = parse_cookies(&headers);
        assert_eq!(cookies.len(), 2);
    }

    #[test]
    fn test_parse_cookies_no_header() {
        assert!(parse_cookies(&HeaderMap::new()).is_empty());
    }

    #[test]
    fn test_format_cookies() {
        let cookies = vec![("testcookiename".to_string(), "testcookievalue".to_string())];
        assert_eq!(format_cookies(&cookies), format!("[{TEST_COOKIE}]"));
        assert_eq!(format_cookies(&[]), "[]");
    }
}
