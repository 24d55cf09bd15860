use super::responder::StreamingResponder;
use crate::error::AppError;
use actix_web::{get, http::header, web, HttpRequest, HttpResponse, Responder};
use std::net::SocketAddr;
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(ping_route)
        .service(regions_route)
        .service(health_route);
}

/// Runs one full ping cycle and streams a result per region as it completes
#[get("/ping")]
pub async fn ping_route(
    req: HttpRequest,
    responder: web::Data<StreamingResponder>,
) -> Result<HttpResponse, AppError> {
    StreamingResponder::ensure_streaming_supported(req.version())?;

    let client = client_address(&req);
    let span = info_span!(
        "ping",
        request_id = %Uuid::new_v4().simple(),
        client = client.as_deref().unwrap_or("-")
    );

    let events = async {
        info!("starting new ping request");
        responder.start(client.as_deref(), span.clone()).await
    }
    .instrument(span.clone())
    .await;

    Ok(HttpResponse::Ok()
        .content_type("text/event-stream")
        .insert_header((header::CACHE_CONTROL, "no-cache"))
        .insert_header((header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"))
        .streaming(events))
}

/// Configured targets as JSON
#[get("/regions")]
pub async fn regions_route(responder: web::Data<StreamingResponder>) -> impl Responder {
    HttpResponse::Ok().json(responder.targets())
}

/// Health check route
/// This route returns no content, the response status is enough.
#[get("/health")]
pub async fn health_route() -> impl Responder {
    HttpResponse::Ok()
}

fn client_address(req: &HttpRequest) -> Option<String> {
    let forwarded = req
        .headers()
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok());
    resolve_client_address(forwarded, req.peer_addr())
}

/// First `X-Forwarded-For` entry when present, otherwise the peer IP
pub fn resolve_client_address(forwarded: Option<&str>, peer: Option<SocketAddr>) -> Option<String> {
    forwarded
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|first| !first.is_empty())
        .map(str::to_string)
        .or_else(|| peer.map(|addr| addr.ip().to_string()))
}
