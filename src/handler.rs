use crate::config::AppState;
use crate::form::{self, FormError, FormMap};
use crate::router::RouteTarget;
use crate::{cookie, logger, response};
use http_body_util::{BodyExt, Full};
use hyper::body::Bytes;
use hyper::header::CONTENT_TYPE;
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::sync::Arc;
use tokio::fs;

const ITEM_NOTE: &str = "This is long JSON data for calculation for bytes.";

pub async fn handle_request(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    if state.config.logging.access_log {
        logger::log_request(req.method(), req.uri(), req.version());
    }

    let path = decode_path(req.uri().path());
    let response = match state.router.route(&path) {
        Some(RouteTarget::Home) => home_handler(&state.config.resources.home_page).await,
        Some(RouteTarget::Item) => item_handler(&path),
        Some(RouteTarget::Generic) => generic_handler(req, &path).await,
        None => response::build_404_response(),
    };
    Ok(response)
}

/// Percent-decode a request path, so `/item/%61` routes and matches like
/// `/item/a`. `+` is left alone (it only means a space in form data).
/// A malformed escape or non-UTF-8 result leaves the path as received.
fn decode_path(path: &str) -> String {
    if !path.contains('%') {
        return path.to_string();
    }

    let bytes = path.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'%' => match bytes.get(i + 1..i + 3) {
                Some(&[hi, lo]) => match (form::hex_digit(hi), form::hex_digit(lo)) {
                    (Some(hi), Some(lo)) => {
                        out.push((hi << 4) | lo);
                        i += 3;
                    }
                    _ => return path.to_string(),
                },
                _ => return path.to_string(),
            },
            b => {
                out.push(b);
                i += 1;
            }
        }
    }
    String::from_utf8(out).unwrap_or_else(|_| path.to_string())
}

/// Serve the home page file verbatim. This route does not set the
/// demo cookie.
async fn home_handler(home_page: &str) -> Response<Full<Bytes>> {
    match fs::read(home_page).await {
        Ok(contents) => response::build_html_response(contents),
        Err(e) => response::build_500_response(format!("home.html file error {e}")),
    }
}

/// Respond to `/item/<token>` with two JSON lines, or the default 404
/// body when the path does not match. Both outcomes carry the cookie.
fn item_handler(path: &str) -> Response<Full<Bytes>> {
    let mut response = match match_item_path(path) {
        Some(name) => response::build_json_response(render_item_body(path, name)),
        None => response::build_404_response(),
    };
    cookie::set_test_cookie(&mut response);
    response
}

/// Extract the token from `/item/<token>`. The token must be one or more
/// word characters (ASCII letters, digits, underscore) with nothing after.
fn match_item_path(path: &str) -> Option<&str> {
    let token = path.strip_prefix("/item/")?;
    if !token.is_empty() && token.bytes().all(is_word_byte) {
        Some(token)
    } else {
        None
    }
}

const fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

fn render_item_body(path: &str, name: &str) -> String {
    let record = serde_json::json!({ "name": name, "what": "item" });
    let matches = serde_json::json!([path, name, ITEM_NOTE]);
    format!("{record}\n{matches}\n")
}

/// Echo a plain-text diagnostic dump of the request: method, URI, path,
/// parsed form fields and client cookies. The only failure is a form
/// parse error, surfaced as a 500.
async fn generic_handler(req: Request<hyper::body::Incoming>, path: &str) -> Response<Full<Bytes>> {
    let method = req.method().clone();
    let uri = req.uri().clone();
    let cookies = cookie::parse_cookies(req.headers());
    let has_form_body = matches!(method, Method::POST | Method::PUT | Method::PATCH)
        && req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("application/x-www-form-urlencoded"));

    let body = if has_form_body {
        match req.collect().await {
            Ok(collected) => Some(collected.to_bytes()),
            Err(e) => {
                let mut response =
                    response::build_500_response(format!("error parsing url {e}"));
                cookie::set_test_cookie(&mut response);
                return response;
            }
        }
    } else {
        None
    };

    let form = std::str::from_utf8(body.as_deref().unwrap_or_default())
        .map_err(|_| FormError::InvalidUtf8)
        .and_then(|body| form::parse_form(uri.query(), has_form_body.then_some(body)));

    let mut response = match form {
        Ok(form) => {
            let dump = render_dump(method.as_str(), &uri.to_string(), path, &form, &cookies);
            response::build_plain_text_response(dump)
        }
        Err(e) => response::build_500_response(format!("error parsing url {e}")),
    };
    cookie::set_test_cookie(&mut response);
    response
}

fn render_dump(
    method: &str,
    request_uri: &str,
    path: &str,
    form: &FormMap,
    cookies: &[(String, String)],
) -> String {
    format!(
        "FooWebHandler says ... \n \
         request.Method     '{method}'\n \
         request.RequestURI '{request_uri}'\n \
         request.URL.Path   '{path}'\n \
         request.Form       '{form}'\n \
         request.Cookies()  '{cookies}'\n",
        form = form::format_form(form),
        cookies = cookie::format_cookies(cookies),
    )
}
