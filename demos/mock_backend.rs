//! Pretend backend for trying the proxy locally.
//!
//! Pair it with `concierge.example.toml`:
//! ```text
//! cargo run --example mock_backend
//! cargo run -- --config concierge.example.toml
//! curl http://127.0.0.1:8080/proxy/serviceA/todos/1
//! ```

use axum::{
    extract::Path,
    http::{header, HeaderMap},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::net::SocketAddr;

#[tokio::main]
async fn main() {
    let app = Router::new()
        .route("/todos/{id}", get(todo))
        .route("/users/{id}", get(user))
        .route("/soap/products", post(soap_product));

    let addr = SocketAddr::from(([127, 0, 0, 1], 3000));
    println!("Mock backend is listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}

async fn todo(Path(id): Path<u64>) -> impl IntoResponse {
    Json(json!({ "id": id, "title": "Write the proxy", "completed": false }))
}

async fn user(Path(id): Path<u64>) -> impl IntoResponse {
    Json(json!({ "id": id, "name": "Ada" }))
}

async fn soap_product(headers: HeaderMap, body: String) -> impl IntoResponse {
    let action = headers
        .get("soapaction")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("none");
    println!("SOAP call ({}): {}", action, body);

    (
        [(header::CONTENT_TYPE, "text/xml")],
        "<Envelope><Body><GetProductResponse><name>Sample Product</name></GetProductResponse></Body></Envelope>",
    )
}
