use actix_web::{web, HttpResponse};

use crate::config::GatewayConfig;
use crate::error::GatewayError;
use crate::models::booking::BookingInput;
use crate::routes::parse_body;
use crate::services::booking_service;
use crate::services::hostaway::interface::HostawayApi;

pub async fn create<A: HostawayApi + 'static>(
    api: web::Data<A>,
    config: web::Data<GatewayConfig>,
    body: web::Bytes,
) -> Result<HttpResponse, GatewayError> {
    let input: BookingInput = parse_body(&body)?;
    let (stay, guest) = input.validate()?;

    let confirmation = booking_service::book(api.get_ref(), config.get_ref(), &stay, &guest).await?;

    Ok(HttpResponse::Ok().json(confirmation))
}
