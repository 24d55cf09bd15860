//! HTTP surface: the streaming ping endpoint plus region listing and health

pub mod responder;
pub mod routes;

pub use responder::{PingEventStream, StreamingResponder};
pub use routes::routes;

use crate::{
    error::Result,
    executor::ExecutionConfig,
    models::Config,
    probe::{HttpRegionProbe, IcmpClientProbe},
    regions::StaticRegions,
};
use actix_web::{web, App, HttpServer};
use std::sync::Arc;
use tracing::info;

/// Wire the production collaborators from configuration
pub fn build_responder(config: &Config) -> Result<StreamingResponder> {
    let targets = StaticRegions::from_config(config);
    let region_probe = HttpRegionProbe::from_config(config)?;
    let client_probe = IcmpClientProbe::new(config.client_ping_timeout());

    Ok(StreamingResponder::new(
        Arc::new(targets),
        Arc::new(region_probe),
        Arc::new(client_probe),
        ExecutionConfig::from(config),
    )
    .with_client_ping_timeout(config.client_ping_timeout()))
}

/// Bind and serve until the process is stopped
pub async fn run_server(config: &Config, responder: StreamingResponder) -> Result<()> {
    let addr = config.listen_addr()?;
    let responder = web::Data::new(responder);

    info!(%addr, regions = responder.targets().len(), "listening");

    HttpServer::new(move || {
        App::new()
            .app_data(responder.clone())
            .configure(routes)
    })
    .bind(addr)?
    .run()
    .await?;

    Ok(())
}
