use actix_web::{web, HttpResponse};

use crate::config::GatewayConfig;
use crate::error::GatewayError;
use crate::models::stay::StayInput;
use crate::routes::parse_body;
use crate::services::hostaway::interface::HostawayApi;
use crate::services::quote_service;

pub async fn quote<A: HostawayApi + 'static>(
    api: web::Data<A>,
    config: web::Data<GatewayConfig>,
    body: web::Bytes,
) -> Result<HttpResponse, GatewayError> {
    let input: StayInput = parse_body(&body)?;
    let stay = input.validate()?;

    let quote = quote_service::quote(api.get_ref(), config.get_ref(), &stay).await?;

    Ok(HttpResponse::Ok().json(quote))
}
