use std::sync::Arc;

use axum::body::Body;
use axum::http::Request;
use axum::routing::RouterIntoService;
use techflow_api::{build_router, catalog::Catalog, db::Db, mailer::LogMailer, AppState};

pub fn app_with_db(db: Db) -> RouterIntoService<Body, ()> {
    let state = AppState { db, catalog: Arc::new(Catalog::default()), mailer: Arc::new(LogMailer) };
    build_router(state).into_service()
}

pub fn app() -> RouterIntoService<Body, ()> {
    app_with_db(Db::in_memory())
}

pub fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

pub fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder().method(method).uri(uri).body(Body::empty()).expect("request")
}

pub async fn read_body(response: axum::response::Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body")
        .to_vec()
}

pub async fn read_json(response: axum::response::Response) -> serde_json::Value {
    serde_json::from_slice(&read_body(response).await).expect("json")
}
