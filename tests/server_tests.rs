use anipe::server::{router, ServiceKind};
use anipe::{LocalStorage, ServiceContext};
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

fn offline_app(kind: ServiceKind) -> (Router, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let storage = LocalStorage::new(temp_dir.path().to_string_lossy().to_string());
    let ctx = ServiceContext::offline(Arc::new(storage));
    (router(kind, ctx), temp_dir)
}

async fn call(app: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(match body {
            Some(value) => Body::from(value.to_string()),
            None => Body::empty(),
        })
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

#[tokio::test]
async fn test_health_endpoints_name_their_service() {
    let cases = [
        (ServiceKind::Opportunity, "anip-opportunity-identifier"),
        (ServiceKind::Product, "anip-product-generator"),
        (ServiceKind::SalesPage, "anip-sales-page-generator"),
        (ServiceKind::Social, "anip-social-media-poster"),
    ];
    for (kind, name) in cases {
        let (app, _dir) = offline_app(kind);
        let (status, body) = call(app, "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "status": "healthy", "service": name }));
    }
}

#[tokio::test]
async fn test_combined_router_nests_each_service() {
    let (app, _dir) = offline_app(ServiceKind::All);

    let (status, body) = call(app.clone(), "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["service"], "anipe");

    let (_, body) = call(app.clone(), "GET", "/sales-page/health", None).await;
    assert_eq!(body["service"], "anip-sales-page-generator");

    let (status, _) = call(app, "GET", "/opportunity/favicon.ico", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_identify_stores_opportunity() {
    let (app, dir) = offline_app(ServiceKind::Opportunity);

    let (status, body) = call(
        app,
        "POST",
        "/identify",
        Some(json!({ "query": "Future of Work predictions" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["opportunity"]["ai_powered"], false);
    assert!(body["opportunity"]["debug_error"]
        .as_str()
        .unwrap()
        .starts_with("AI generation failed"));

    let path = body["storage_path"].as_str().unwrap();
    let file_name = path.rsplit('/').next().unwrap();
    assert!(dir.path().join("opportunities").join(file_name).exists());
}

#[tokio::test]
async fn test_store_rejects_empty_body() {
    let (app, _dir) = offline_app(ServiceKind::Opportunity);
    let (status, body) = call(app, "POST", "/store", Some(json!({}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "status": "error", "message": "No data provided" }));
}

#[tokio::test]
async fn test_product_requires_opportunity() {
    let (app, _dir) = offline_app(ServiceKind::Product);
    let (status, body) = call(app, "POST", "/generate", None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "No opportunity data provided");
}

#[tokio::test]
async fn test_product_generate_writes_markdown() {
    let (app, dir) = offline_app(ServiceKind::Product);
    let (status, body) = call(
        app,
        "POST",
        "/generate",
        Some(json!({
            "opportunity": {
                "niche_topic": "Grant writing for rural clinics",
                "target_audience": "Clinic administrators"
            }
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["opportunity"]["target_audience"], "Clinic administrators");
    let entries: Vec<_> = std::fs::read_dir(dir.path().join("products"))
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    assert_eq!(entries.len(), 1);
    assert!(entries[0].starts_with("Grant_writing_for_rural_clinics_"));
}

#[tokio::test]
async fn test_sales_page_requires_content() {
    let (app, _dir) = offline_app(ServiceKind::SalesPage);
    let (status, body) = call(
        app,
        "POST",
        "/generate",
        Some(json!({ "opportunity": { "niche_topic": "x" }, "product_content": "" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "No product content provided");
}

#[tokio::test]
async fn test_sales_page_generate() {
    let (app, dir) = offline_app(ServiceKind::SalesPage);
    let (status, body) = call(
        app,
        "POST",
        "/generate",
        Some(json!({
            "opportunity": { "niche_topic": "Grant writing", "keywords": ["grants"] },
            "product_content": "# Executive Summary\n\nBody text"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let filename = body["filename"].as_str().unwrap();
    assert!(filename.starts_with("Grant_writing_"));
    assert!(dir.path().join("sales-pages").join(filename).exists());
    assert!(body["page_url"].as_str().unwrap().starts_with("file://"));
    assert!(body["html_content"].as_str().unwrap().ends_with("..."));
}

#[tokio::test]
async fn test_promote_requires_url() {
    let (app, _dir) = offline_app(ServiceKind::Social);
    let (status, body) = call(
        app,
        "POST",
        "/promote",
        Some(json!({ "product_data": { "niche_topic": "x" } })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Sales page URL required");
}

#[tokio::test]
async fn test_invalid_json_is_bad_request() {
    let (app, _dir) = offline_app(ServiceKind::Social);
    let request = Request::builder()
        .method("POST")
        .uri("/promote")
        .body(Body::from("{not json"))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
