use log::{info, warn};

use crate::config::GatewayConfig;
use crate::error::GatewayError;
use crate::models::booking::{BookingConfirmation, Guest, ReservationPayload, RESERVATION_SOURCE};
use crate::models::stay::Stay;
use crate::services::hostaway::interface::HostawayApi;
use crate::services::quote_service::price_stay;
use crate::services::token_service::acquire_token;

pub fn build_reservation(
    config: &GatewayConfig,
    listing_id: i64,
    stay: &Stay,
    guest: &Guest,
    total_price: f64,
    finance_field: serde_json::Value,
) -> ReservationPayload {
    ReservationPayload {
        channel_id: config.reservation_channel_id,
        listing_map_id: listing_id,
        listing_id,
        source: RESERVATION_SOURCE.to_string(),
        arrival_date: stay.arrival_str(),
        departure_date: stay.departure_str(),
        number_of_guests: stay.guests,
        guest_name: guest.full_name.clone(),
        guest_email: guest.email.clone(),
        guest_phone: guest.phone.clone(),
        first_name: guest.first_name.clone(),
        last_name: guest.last_name.clone(),
        total_price,
        finance_field,
    }
}

async fn verify_listing<A: HostawayApi>(
    api: &A,
    token: &str,
    listing_id: i64,
) -> Result<(), GatewayError> {
    let response = api.get_listing(token, &listing_id.to_string()).await?;
    if response.is_success() {
        return Ok(());
    }

    warn!("Listing {} verification failed with {}", listing_id, response.status);
    Err(GatewayError::ListingVerification {
        listing_id,
        details: response.body,
    })
}

/// Prices the stay and submits a reservation with the computed total.
/// A failed reservation is reported as-is; nothing is rolled back or retried.
pub async fn book<A: HostawayApi>(
    api: &A,
    config: &GatewayConfig,
    stay: &Stay,
    guest: &Guest,
) -> Result<BookingConfirmation, GatewayError> {
    let listing_id = config.numeric_listing_id()?;
    let token = acquire_token(api, config).await?;

    if config.verify_listing {
        verify_listing(api, &token, listing_id).await?;
    }

    let priced = price_stay(api, config, &token, &listing_id.to_string(), stay)
        .await
        .map_err(GatewayError::into_price_calculation)?;

    let finance_field = match priced.finance_field {
        Some(field) => field,
        None => {
            return Err(GatewayError::PriceCalculation {
                status: 502,
                message: "Missing totalPrice/financeField in priceDetails response".to_string(),
                details: priced.raw,
            })
        }
    };

    let total_price = priced.quote.breakdown.total_price;
    let payload = build_reservation(config, listing_id, stay, guest, total_price, finance_field);

    let response = api.create_reservation(&token, &payload).await?;
    if !response.is_success() {
        let message = response.message_or("Unknown error");
        warn!("Reservation create returned {}: {}", response.status, message);
        return Err(GatewayError::Upstream {
            status: response.status,
            context: "Hostaway reservation create failed",
            message,
            details: response.body,
            sent: Some(payload.summary()),
        });
    }

    info!(
        "Reservation created on listing {} for {} nights at {} {}",
        listing_id, stay.nights, total_price, priced.quote.currency
    );

    Ok(BookingConfirmation {
        message: format!(
            "Booking request created ({} total sent to Hostaway)",
            config.pricing_policy
        ),
        nights: stay.nights,
        channel_id: config.reservation_channel_id,
        currency: priced.quote.currency,
        total_price,
        hostaway: response.body,
    })
}
