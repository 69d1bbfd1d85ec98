use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;

/// Body of the default 404. The item handler emits the same bytes on a
/// pattern mismatch so the two paths are indistinguishable on the wire.
pub const NOT_FOUND_BODY: &str = "404 page not found";

pub fn build_html_response(html: Vec<u8>) -> Response<Full<Bytes>> {
    Response::builder()
        .status(200)
        .header("Content-Type", "text/html; charset=utf-8")
        .body(Full::new(Bytes::from(html)))
        .expect("Failed to build response")
}

pub fn build_plain_text_response(body: String) -> Response<Full<Bytes>> {
    Response::builder()
        .status(200)
        .header("Content-Type", "text/plain")
        .body(Full::new(Bytes::from(body)))
        .expect("Failed to build response")
}

pub fn build_json_response(body: String) -> Response<Full<Bytes>> {
    Response::builder()
        .status(200)
        .header("Content-Type", "application/json")
        .body(Full::new(Bytes::from(body)))
        .expect("Failed to build response")
}

pub fn build_404_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(404)
        .header("Content-Type", "text/plain; charset=utf-8")
        .header("X-Content-Type-Options", "nosniff")
        .body(Full::new(Bytes::from(NOT_FOUND_BODY)))
        .expect("Failed to build 404 response")
}

pub fn build_500_response(message: String) -> Response<Full<Bytes>> {
    Response::builder()
        .status(500)
        .header("Content-Type", "text/plain; charset=utf-8")
        .header("X-Content-Type-Options", "nosniff")
        .body(Full::new(Bytes::from(message)))
        .expect("Failed to build 500 response")
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_bytes(response: Response<Full<Bytes>>) -> Bytes {
        response.into_body().collect().await.unwrap().to_bytes()
    }

    #[test]
    fn test_html_response() {
        let response = build_html_response(b"<p>hi</p>".to_vec());
        assert_eq!(response.status(), 200);
        assert_eq!(
            response.headers()["Content-Type"],
            "text/html; charset=utf-8"
        );
    }

    #[test]
    fn test_plain_text_response() {
        let response = build_plain_text_response("dump".to_string());
        assert_eq!(response.status(), 200);
        assert_eq!(response.headers()["Content-Type"], "text/plain");
    }

    #[test]
    fn test_json_response() {
        let response = build_json_response("{}".to_string());
        assert_eq!(response.status(), 200);
        assert_eq!(response.headers()["Content-Type"], "application/json");
    }

    #[tokio::test]
    async fn test_404_response() {
        let response = build_404_response();
        assert_eq!(response.status(), 404);
        assert_eq!(
            response.headers()["Content-Type"],
            "text/plain; charset=utf-8"
        );
        assert_eq!(body_bytes(response).await, NOT_FOUND_BODY.as_bytes());
    }

    #[tokio::test]
    async fn test_500_response() {
        let response = build_500_response("home.html file error oops".to_string());
        assert_eq!(response.status(), 500);
        let body = body_bytes(response).await;
        assert!(body.starts_with(b"home.html file error"));
    }
}
