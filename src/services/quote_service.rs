use log::{info, warn};
use serde_json::Value;

use crate::config::GatewayConfig;
use crate::error::GatewayError;
use crate::models::quote::{PriceDetails, PriceQuote};
use crate::models::stay::Stay;
use crate::services::hostaway::interface::HostawayApi;
use crate::services::hostaway::models::{parse_price_details, PriceDetailsRequest};
use crate::services::pricing_service::PricingService;
use crate::services::token_service::acquire_token;

/// A quote plus what booking needs to carry forward from the same upstream reply.
#[derive(Debug, Clone)]
pub struct PricedStay {
    pub quote: PriceQuote,
    pub finance_field: Option<Value>,
    pub raw: Value,
}

/// Calls priceDetails and returns the parsed reply with its raw body.
pub async fn fetch_price_details<A: HostawayApi>(
    api: &A,
    token: &str,
    listing_id: &str,
    request: &PriceDetailsRequest,
) -> Result<(PriceDetails, Value), GatewayError> {
    let response = api.price_details(token, listing_id, request).await?;

    if !response.is_success() {
        let message = response.message_or("unknown");
        warn!("priceDetails returned {}: {}", response.status, message);
        return Err(GatewayError::Upstream {
            status: response.status,
            context: "Hostaway priceDetails failed",
            message,
            details: response.body,
            sent: None,
        });
    }

    Ok((parse_price_details(&response.body), response.body))
}

/// Prices a validated stay with an already acquired token.
pub async fn price_stay<A: HostawayApi>(
    api: &A,
    config: &GatewayConfig,
    token: &str,
    listing_id: &str,
    stay: &Stay,
) -> Result<PricedStay, GatewayError> {
    let request = PriceDetailsRequest::for_stay(stay, config.direct_channel_id);
    let (details, raw) = fetch_price_details(api, token, listing_id, &request).await?;

    let breakdown = PricingService::breakdown(
        &details,
        stay.nights,
        config.pricing_policy,
        config.discount_pct,
    )
    .map_err(|e| e.with_raw(&raw))?;

    info!(
        "Quoted listing {} for {} nights: {} {} ({})",
        listing_id, stay.nights, breakdown.total_price, details.currency, config.pricing_policy
    );

    Ok(PricedStay {
        quote: PriceQuote {
            currency: details.currency,
            nights: stay.nights,
            policy: config.pricing_policy,
            breakdown,
        },
        finance_field: details.finance_field,
        raw,
    })
}

/// validate → authenticate → price, for the configured listing.
pub async fn quote<A: HostawayApi>(
    api: &A,
    config: &GatewayConfig,
    stay: &Stay,
) -> Result<PriceQuote, GatewayError> {
    let listing_id = config.listing_id()?;
    let token = acquire_token(api, config).await?;

    let priced = price_stay(api, config, &token, listing_id, stay).await?;
    Ok(priced.quote)
}
