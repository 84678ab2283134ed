use actix_web::{web, HttpResponse};

use crate::config::GatewayConfig;
use crate::error::GatewayError;
use crate::models::channel::ProbeInput;
use crate::routes::parse_body;
use crate::services::channel_service;
use crate::services::hostaway::interface::HostawayApi;

/// Read-only: lists upstream channels so the direct-booking id can be found.
pub async fn list<A: HostawayApi + 'static>(
    api: web::Data<A>,
    config: web::Data<GatewayConfig>,
) -> Result<HttpResponse, GatewayError> {
    let channels = channel_service::list_channels(api.get_ref(), config.get_ref()).await?;
    Ok(HttpResponse::Ok().json(channels))
}

pub async fn probe<A: HostawayApi + 'static>(
    api: web::Data<A>,
    config: web::Data<GatewayConfig>,
    body: web::Bytes,
) -> Result<HttpResponse, GatewayError> {
    let input: ProbeInput = parse_body(&body)?;
    let stay = input.stay.validate()?;

    let report =
        channel_service::probe(api.get_ref(), config.get_ref(), &stay, &input.candidates()).await?;

    Ok(HttpResponse::Ok().json(report))
}
