//! HTTP front end. Each pipeline stage is its own router so stages can be
//! deployed separately, or all together under one listener.

use crate::core::context::ServiceContext;
use crate::core::opportunity::{IdentifyRequest, OpportunityService};
use crate::core::product::{ProductRequest, ProductService};
use crate::core::sales_page::{SalesPageRequest, SalesPageService};
use crate::core::social::{PromoteRequest, SocialService};
use crate::utils::error::{AnipeError, Result};
use crate::utils::logger::request_span;
use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::{Request, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::fmt;
use std::str::FromStr;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceKind {
    Opportunity,
    Product,
    SalesPage,
    Social,
    All,
}

impl ServiceKind {
    pub fn service_name(&self) -> &'static str {
        match self {
            ServiceKind::Opportunity => "anip-opportunity-identifier",
            ServiceKind::Product => "anip-product-generator",
            ServiceKind::SalesPage => "anip-sales-page-generator",
            ServiceKind::Social => "anip-social-media-poster",
            ServiceKind::All => "anipe",
        }
    }
}

impl FromStr for ServiceKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "opportunity" => Ok(ServiceKind::Opportunity),
            "product" => Ok(ServiceKind::Product),
            "sales-page" | "sales_page" => Ok(ServiceKind::SalesPage),
            "social" => Ok(ServiceKind::Social),
            "all" => Ok(ServiceKind::All),
            other => Err(format!(
                "unknown service '{}': expected opportunity, product, sales-page, social or all",
                other
            )),
        }
    }
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.service_name())
    }
}

impl IntoResponse for AnipeError {
    fn into_response(self) -> Response {
        let status = if self.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        if status.is_server_error() {
            tracing::error!(
                "Request failed: {} (Category: {:?}, Severity: {:?})",
                self,
                self.category(),
                self.severity()
            );
        } else {
            tracing::warn!("Rejected request: {}", self);
        }
        let body = json!({ "status": "error", "message": self.user_friendly_message() });
        (status, Json(body)).into_response()
    }
}

/// 空 body 視為 `None`，其餘必須是合法 JSON
fn parse_body(body: &Bytes) -> Result<Option<Value>> {
    if body.iter().all(|b| b.is_ascii_whitespace()) {
        return Ok(None);
    }
    serde_json::from_slice(body)
        .map(Some)
        .map_err(|e| AnipeError::bad_request(format!("Invalid JSON body: {}", e)))
}

/// Decodes a request record, rejecting missing or `null` bodies with `empty_message`.
fn parse_request<T: DeserializeOwned>(body: &Bytes, empty_message: &str) -> Result<T> {
    match parse_body(body)? {
        None | Some(Value::Null) => Err(AnipeError::bad_request(empty_message)),
        Some(value) => serde_json::from_value(value)
            .map_err(|e| AnipeError::bad_request(format!("Invalid request: {}", e))),
    }
}

fn health(kind: ServiceKind) -> Json<Value> {
    Json(json!({ "status": "healthy", "service": kind.service_name() }))
}

async fn identify(State(service): State<OpportunityService>, body: Bytes) -> Result<Response> {
    let request: IdentifyRequest = match parse_body(&body)? {
        Some(value) if !value.is_null() => serde_json::from_value(value)
            .map_err(|e| AnipeError::bad_request(format!("Invalid request: {}", e)))?,
        _ => IdentifyRequest::default(),
    };
    let identified = service.identify_and_store(request.query).await?;
    Ok(Json(identified).into_response())
}

async fn store(State(service): State<OpportunityService>, body: Bytes) -> Result<Response> {
    let data = parse_body(&body)?.unwrap_or(Value::Null);
    let stored = service.store_results(&data).await?;
    Ok(Json(stored).into_response())
}

async fn favicon() -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn generate_product(State(service): State<ProductService>, body: Bytes) -> Result<Response> {
    let request: ProductRequest = parse_request(&body, "No opportunity data provided")?;
    let product = service.generate(request).await?;
    Ok(Json(product).into_response())
}

async fn generate_sales_page(
    State(service): State<SalesPageService>,
    body: Bytes,
) -> Result<Response> {
    let request: SalesPageRequest = parse_request(&body, "No data provided")?;
    let page = service.generate(request).await?;
    Ok(Json(page).into_response())
}

async fn promote(State(service): State<SocialService>, body: Bytes) -> Result<Response> {
    let request: PromoteRequest = parse_request(&body, "No data provided")?;
    let outcome = service.promote(request).await?;
    Ok(Json(outcome).into_response())
}

pub fn opportunity_router(ctx: ServiceContext) -> Router {
    Router::new()
        .route("/identify", post(identify))
        .route("/store", post(store))
        .route("/health", get(|| async { health(ServiceKind::Opportunity) }))
        .route("/favicon.ico", get(favicon))
        .with_state(OpportunityService::new(ctx))
}

pub fn product_router(ctx: ServiceContext) -> Router {
    Router::new()
        .route("/generate", post(generate_product))
        .route("/health", get(|| async { health(ServiceKind::Product) }))
        .with_state(ProductService::new(ctx))
}

pub fn sales_page_router(ctx: ServiceContext) -> Router {
    Router::new()
        .route("/generate", post(generate_sales_page))
        .route("/health", get(|| async { health(ServiceKind::SalesPage) }))
        .with_state(SalesPageService::new(ctx))
}

pub fn social_router(ctx: ServiceContext) -> Router {
    Router::new()
        .route("/promote", post(promote))
        .route("/health", get(|| async { health(ServiceKind::Social) }))
        .with_state(SocialService::new(ctx))
}

pub fn router(kind: ServiceKind, ctx: ServiceContext) -> Router {
    let app = match kind {
        ServiceKind::Opportunity => opportunity_router(ctx),
        ServiceKind::Product => product_router(ctx),
        ServiceKind::SalesPage => sales_page_router(ctx),
        ServiceKind::Social => social_router(ctx),
        ServiceKind::All => Router::new()
            .nest("/opportunity", opportunity_router(ctx.clone()))
            .nest("/product", product_router(ctx.clone()))
            .nest("/sales-page", sales_page_router(ctx.clone()))
            .nest("/social", social_router(ctx))
            .route("/health", get(|| async { health(ServiceKind::All) })),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let trace = TraceLayer::new_for_http()
        .make_span_with(move |request: &Request<Body>| request_span(kind, request));

    app.layer(cors).layer(trace)
}

pub async fn serve(kind: ServiceKind, ctx: ServiceContext, host: &str, port: u16) -> Result<()> {
    let app = router(kind, ctx);
    let listener = tokio::net::TcpListener::bind((host, port)).await?;
    tracing::info!(service = kind.service_name(), "listening on http://{}:{}", host, port);
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_kind_parsing() {
        assert_eq!("sales-page".parse::<ServiceKind>().unwrap(), ServiceKind::SalesPage);
        assert_eq!("ALL".parse::<ServiceKind>().unwrap(), ServiceKind::All);
        assert!("billing".parse::<ServiceKind>().is_err());
        assert_eq!(ServiceKind::Social.to_string(), "anip-social-media-poster");
    }

    #[test]
    fn test_parse_body() {
        assert!(parse_body(&Bytes::from_static(b"  \n")).unwrap().is_none());
        assert_eq!(
            parse_body(&Bytes::from_static(b"{\"a\":1}")).unwrap(),
            Some(json!({"a": 1}))
        );
        assert!(parse_body(&Bytes::from_static(b"{oops")).unwrap_err().is_client_error());
    }

    #[test]
    fn test_parse_request_rejects_null() {
        let err = parse_request::<PromoteRequest>(&Bytes::from_static(b"null"), "No data provided")
            .unwrap_err();
        assert_eq!(err.user_friendly_message(), "No data provided");
    }
}
