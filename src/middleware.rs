use axum::{
    body::Body,
    http::{HeaderValue, Method, Request},
    middleware::Next,
    response::Response,
};

/// Private Network Access preflight support. Browsers block a public origin
/// from reaching a loopback/private address unless the preflight response
/// carries `Access-Control-Allow-Private-Network: true`.
pub async fn private_network_preflight(req: Request<Body>, next: Next) -> Response {
    let requested = req.method() == Method::OPTIONS
        && req
            .headers()
            .contains_key("access-control-request-private-network");

    let mut response = next.run(req).await;

    if requested {
        response.headers_mut().insert(
            "access-control-allow-private-network",
            HeaderValue::from_static("true"),
        );
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{routing::get, Router};
    use tower::ServiceExt;

    fn test_app() -> Router {
        Router::new()
            .route("/", get(|| async { "ok" }))
            .layer(axum::middleware::from_fn(private_network_preflight))
    }

    #[tokio::test]
    async fn test_header_added_on_pna_preflight() {
        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri("/")
            .header("access-control-request-private-network", "true")
            .body(Body::empty())
            .unwrap();

        let response = test_app().oneshot(request).await.unwrap();

        assert_eq!(
            response
                .headers()
                .get("access-control-allow-private-network")
                .and_then(|v| v.to_str().ok()),
            Some("true")
        );
    }

    #[tokio::test]
    async fn test_header_absent_on_plain_request() {
        let request = Request::builder()
            .method(Method::GET)
            .uri("/")
            .body(Body::empty())
            .unwrap();

        let response = test_app().oneshot(request).await.unwrap();

        assert!(response
            .headers()
            .get("access-control-allow-private-network")
            .is_none());
    }
}
