//! HTTP response building module
//!
//! Builders for the responses the dispatcher produces on its own.

use hyper::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use hyper::{Response, StatusCode};

use super::body::{self, ResponseBody};

/// Header advertising the framework
pub const POWERED_BY: &str = "x-powered-by";

/// Assemble a response from its parts
pub fn build_response(
    status: StatusCode,
    headers: Option<HeaderMap>,
    body: ResponseBody,
) -> Response<ResponseBody> {
    let mut response = Response::new(body);
    *response.status_mut() = status;
    if let Some(headers) = headers {
        response.headers_mut().extend(headers);
    }
    response
}

/// Build 400 Bad Request response
pub fn build_400_response() -> Response<ResponseBody> {
    build_text_response(StatusCode::BAD_REQUEST, "Bad Request")
}

/// Build 500 Internal Server Error response
pub fn build_500_response() -> Response<ResponseBody> {
    build_text_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
}

fn build_text_response(status: StatusCode, text: &'static str) -> Response<ResponseBody> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("text/plain"));
    build_response(status, Some(headers), body::full(text))
}

/// `x-powered-by` value for this build
pub fn powered_by_value() -> HeaderValue {
    HeaderValue::from_static(concat!("Revers v", env!("CARGO_PKG_VERSION")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    #[tokio::test]
    async fn test_build_400_response() {
        let resp = build_400_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(resp.headers()[CONTENT_TYPE], "text/plain");
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"Bad Request");
    }

    #[test]
    fn test_build_response_keeps_headers() {
        let mut headers = HeaderMap::new();
        headers.insert("x-request", HeaderValue::from_static("1"));
        let resp = build_response(StatusCode::ACCEPTED, Some(headers), body::empty());
        assert_eq!(resp.status(), StatusCode::ACCEPTED);
        assert_eq!(resp.headers()["x-request"], "1");
    }

    #[test]
    fn test_powered_by_value() {
        let value = powered_by_value();
        assert_eq!(value.to_str().unwrap(), format!("Revers v{}", crate::VERSION));
    }
}
