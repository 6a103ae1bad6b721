//! End-to-end forwarding through a real listener and mock backends.

use axum::body::Body;
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use concierge::config::{ProxyConfig, RouteConfig};

mod common;

fn config_for(routes: &[(&str, RouteConfig)]) -> ProxyConfig {
    let mut config = ProxyConfig::default();
    for (name, route) in routes {
        config.routes.insert(name.to_string(), route.clone());
    }
    config
}

#[tokio::test]
async fn test_get_is_forwarded_and_relayed() {
    let backend = common::start_json_backend(200, r#"{"id":1}"#).await;
    let proxy = common::start_proxy(config_for(&[("serviceA", RouteConfig::to(backend.url()))])).await;

    let res = common::client()
        .get(proxy.url("/proxy/serviceA/todos/1"))
        .send()
        .await
        .expect("Proxy unreachable");

    assert_eq!(res.status(), 200);
    assert_eq!(res.headers()["content-type"], "application/json");
    assert_eq!(res.text().await.unwrap(), r#"{"id":1}"#);

    let seen = backend.requests();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].method, "GET");
    assert_eq!(seen[0].target, "/todos/1");
    assert_eq!(seen[0].headers["x-forwarded-by"], "Concierge-Proxy");
    assert_eq!(seen[0].headers["accept"], "application/json");
    assert!(seen[0].body.is_empty());
}

#[tokio::test]
async fn test_query_string_passes_through_verbatim() {
    let backend = common::start_json_backend(200, "[]").await;
    let proxy = common::start_proxy(config_for(&[("serviceA", RouteConfig::to(backend.url()))])).await;

    common::client()
        .get(proxy.url("/proxy/serviceA/search?z=1&a=%20b&a=c&flag"))
        .send()
        .await
        .unwrap();

    assert_eq!(backend.requests()[0].target, "/search?z=1&a=%20b&a=c&flag");
}

#[tokio::test]
async fn test_route_root_maps_to_backend_root() {
    let backend = common::start_json_backend(200, "{}").await;
    let target = format!("{}/api", backend.url());
    let proxy = common::start_proxy(config_for(&[("serviceA", RouteConfig::to(target))])).await;

    let client = common::client();
    client.get(proxy.url("/proxy/serviceA")).send().await.unwrap();
    client.get(proxy.url("/proxy/serviceA?page=2")).send().await.unwrap();

    let seen = backend.requests();
    assert_eq!(seen[0].target, "/api/");
    assert_eq!(seen[1].target, "/api/?page=2");
}

#[tokio::test]
async fn test_soap_body_forwarded_with_json_override() {
    let backend = common::start_backend(|_, _| async {
        (
            StatusCode::OK,
            [("content-type", "text/xml")],
            "<Envelope><Body><GetProductResponse><name>Sample Product</name></GetProductResponse></Body></Envelope>",
        )
            .into_response()
    })
    .await;
    let proxy = common::start_proxy(config_for(&[("serviceA", RouteConfig::to(backend.url()))])).await;

    let envelope = "<Envelope><Body><GetProductRequest><productId>12345</productId></GetProductRequest></Body></Envelope>";
    let res = common::client()
        .post(proxy.url("/proxy/serviceA/soap/products"))
        .header("content-type", "text/xml")
        .header("soapaction", "http://example.org/webservice/GetProduct")
        .body(envelope)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 200);
    let body = res.text().await.unwrap();
    assert!(body.contains("GetProductResponse"));
    assert!(body.contains("Sample Product"));

    let seen = &backend.requests()[0];
    assert_eq!(seen.method, "POST");
    assert_eq!(seen.target, "/soap/products");
    assert_eq!(seen.body, envelope.as_bytes());
    assert_eq!(seen.headers["soapaction"], "http://example.org/webservice/GetProduct");
    // JSON routes override the caller's content type on purpose.
    assert_eq!(seen.headers["content-type"], "application/json");
}

#[tokio::test]
async fn test_non_json_route_keeps_caller_content_type() {
    let backend = common::start_json_backend(200, "ok").await;
    let route = RouteConfig {
        json: false,
        ..RouteConfig::to(backend.url())
    };
    let proxy = common::start_proxy(config_for(&[("soap", route)])).await;

    common::client()
        .post(proxy.url("/proxy/soap/products"))
        .header("content-type", "text/xml")
        .header("accept", "text/xml")
        .body("<Envelope/>")
        .send()
        .await
        .unwrap();

    let seen = &backend.requests()[0];
    assert_eq!(seen.headers["content-type"], "text/xml");
    assert_eq!(seen.headers["accept"], "text/xml");
}

#[tokio::test]
async fn test_unknown_and_disabled_routes_never_forward() {
    let backend = common::start_json_backend(200, "{}").await;
    let disabled = RouteConfig {
        enabled: false,
        ..RouteConfig::to(backend.url())
    };
    let proxy = common::start_proxy(config_for(&[
        ("serviceA", RouteConfig::to(backend.url())),
        ("serviceB", disabled),
    ]))
    .await;

    let client = common::client();
    let res = client.get(proxy.url("/proxy/serviceB/todos/1")).send().await.unwrap();
    assert_eq!(res.status(), 404);
    let res = client.get(proxy.url("/proxy/serviceC/todos/1")).send().await.unwrap();
    assert_eq!(res.status(), 404);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "route not found: serviceC");
    let res = client.get(proxy.url("/proxy/")).send().await.unwrap();
    assert_eq!(res.status(), 400);
    let res = client.get(proxy.url("/somewhere/else")).send().await.unwrap();
    assert_eq!(res.status(), 404);

    assert_eq!(backend.hits(), 0);
}

#[tokio::test]
async fn test_methods_and_caller_headers_preserved() {
    let backend = common::start_json_backend(204, "").await;
    let proxy = common::start_proxy(config_for(&[("serviceA", RouteConfig::to(backend.url()))])).await;

    let res = common::client()
        .delete(proxy.url("/proxy/serviceA/items/7"))
        .header("authorization", "Bearer token")
        .header("x-correlation", "abc")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 204);

    let seen = &backend.requests()[0];
    assert_eq!(seen.method, "DELETE");
    assert_eq!(seen.headers["authorization"], "Bearer token");
    assert_eq!(seen.headers["x-correlation"], "abc");
    assert!(!seen.headers.contains_key("x-concierge-request-id"));
    // Host is regenerated for the backend, not copied from the caller.
    assert_eq!(seen.headers["host"], backend.addr.to_string());
}

#[tokio::test]
async fn test_backend_errors_relayed_verbatim() {
    let backend = common::start_json_backend(500, r#"{"error":"boom"}"#).await;
    let proxy = common::start_proxy(config_for(&[("serviceA", RouteConfig::to(backend.url()))])).await;

    let res = common::client()
        .get(proxy.url("/proxy/serviceA/explode"))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 500);
    assert_eq!(res.text().await.unwrap(), r#"{"error":"boom"}"#);
}

#[tokio::test]
async fn test_cached_route_hits_backend_once() {
    let backend = common::start_json_backend(200, r#"{"id":1}"#).await;
    let mut route = RouteConfig::to(backend.url());
    route.caching.enabled = true;
    route.caching.ttl_secs = 60;
    let proxy = common::start_proxy(config_for(&[("serviceA", route)])).await;

    let client = common::client();
    for _ in 0..3 {
        let res = client.get(proxy.url("/proxy/serviceA/todos/1")).send().await.unwrap();
        assert_eq!(res.text().await.unwrap(), r#"{"id":1}"#);
    }
    client.get(proxy.url("/proxy/serviceA/todos/2")).send().await.unwrap();

    assert_eq!(backend.hits(), 2);
}

#[tokio::test]
async fn test_streamed_backend_response_relayed() {
    let backend = common::start_backend(|_, _| async {
        let chunks = futures_util::stream::iter([
            Ok::<_, std::io::Error>("hello"),
            Ok("world"),
        ]);
        Response::builder()
            .status(StatusCode::OK)
            .header("content-type", "text/plain")
            .header("x-backend-version", "7")
            .header("set-cookie", "a=1")
            .header("set-cookie", "b=2")
            .body(Body::from_stream(chunks))
            .unwrap()
    })
    .await;
    let proxy = common::start_proxy(config_for(&[("serviceA", RouteConfig::to(backend.url()))])).await;

    let res = common::client()
        .get(proxy.url("/proxy/serviceA/stream"))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 200);
    assert_eq!(res.headers()["x-backend-version"], "7");
    let cookies: Vec<_> = res.headers().get_all("set-cookie").iter().collect();
    assert_eq!(cookies, ["a=1", "b=2"]);
    assert!(!res.headers().contains_key("transfer-encoding"));
    assert_eq!(res.headers()["content-length"], "10");
    assert_eq!(res.text().await.unwrap(), "helloworld");
}

#[tokio::test]
async fn test_head_request_relays_headers_without_body() {
    let backend = common::start_backend(|_, _| async {
        (StatusCode::OK, [("x-backend-version", "7")], "").into_response()
    })
    .await;
    let proxy = common::start_proxy(config_for(&[("serviceA", RouteConfig::to(backend.url()))])).await;

    let res = common::client()
        .head(proxy.url("/proxy/serviceA/todos/1"))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 200);
    assert_eq!(res.headers()["x-backend-version"], "7");
    assert!(res.bytes().await.unwrap().is_empty());
    assert_eq!(backend.requests()[0].method, Method::HEAD);
}
