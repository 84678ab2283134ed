use log::info;
use serde_json::Value;

use crate::config::GatewayConfig;
use crate::error::GatewayError;
use crate::models::channel::{
    BestGuess, ChannelList, ChannelSummary, ProbeOutcome, ProbeReport, ProbeResult,
};
use crate::models::stay::Stay;
use crate::services::hostaway::interface::HostawayApi;
use crate::services::hostaway::models::{
    channel_list, parse_price_details, unwrap_envelope, PriceDetailsRequest,
};
use crate::services::pricing_service::PricingService;
use crate::services::token_service::acquire_token;

pub async fn list_channels<A: HostawayApi>(
    api: &A,
    config: &GatewayConfig,
) -> Result<ChannelList, GatewayError> {
    let token = acquire_token(api, config).await?;
    let response = api.list_channels(&token).await?;

    if !response.is_success() {
        return Err(GatewayError::Upstream {
            status: response.status,
            context: "Hostaway /v1/channels failed",
            message: response.message_or("unknown"),
            details: response.body,
            sent: None,
        });
    }

    let channels: Vec<ChannelSummary> = match channel_list(&response.body) {
        Some(items) => items.iter().map(ChannelSummary::from_raw).collect(),
        None => {
            return Err(GatewayError::BadUpstreamResponse {
                message: "Unexpected channels response shape".to_string(),
                raw: response.body,
            })
        }
    };

    Ok(ChannelList {
        count: channels.len(),
        channels,
    })
}

/// Prices the stay once for `channel_id` (or without one) using the
/// component-sum rule. Upstream rejections become failed outcomes; only
/// transport errors abort the probe.
async fn probe_channel<A: HostawayApi>(
    api: &A,
    token: &str,
    listing_id: &str,
    stay: &Stay,
    channel_id: Option<i64>,
) -> Result<ProbeOutcome, GatewayError> {
    let request = PriceDetailsRequest::for_stay(stay, channel_id);
    let payload_sent = serde_json::to_value(&request).unwrap_or_default();
    let response = api.price_details(token, listing_id, &request).await?;

    let failed = |status: u16, message: String, raw: Value| ProbeOutcome {
        channel_id,
        ok: false,
        payload_sent: payload_sent.clone(),
        result: ProbeResult::Failed {
            status,
            message,
            raw,
        },
    };

    if !response.is_success() {
        let message = response.message_or("unknown");
        return Ok(failed(response.status, message, response.body));
    }

    let details = parse_price_details(&response.body);
    let components = match details.components.as_deref() {
        Some(components) => components,
        None => {
            return Ok(failed(
                502,
                "Missing components[] in response".to_string(),
                response.body,
            ))
        }
    };

    let accommodation = PricingService::accommodation_subtotal(components);
    let other = PricingService::included_other_total(components);

    Ok(ProbeOutcome {
        channel_id,
        ok: true,
        payload_sent,
        result: ProbeResult::Priced {
            currency: details.currency.clone(),
            accommodation_subtotal: PricingService::round2(accommodation),
            other_included_total: PricingService::round2(other),
            total_price: PricingService::round2(accommodation + other),
            components: unwrap_envelope(&response.body)
                .get("components")
                .cloned()
                .unwrap_or(Value::Null),
        },
    })
}

/// Successful candidate with the lowest accommodation subtotal; first wins ties.
pub fn best_guess(results: &[ProbeOutcome]) -> Option<BestGuess> {
    results
        .iter()
        .filter_map(|outcome| match (&outcome.result, outcome.channel_id) {
            (
                ProbeResult::Priced {
                    currency,
                    accommodation_subtotal,
                    other_included_total,
                    total_price,
                    ..
                },
                Some(channel_id),
            ) => Some(BestGuess {
                channel_id,
                accommodation_subtotal: *accommodation_subtotal,
                other_included_total: *other_included_total,
                total_price: *total_price,
                currency: currency.clone(),
            }),
            _ => None,
        })
        .min_by(|a, b| a.accommodation_subtotal.total_cmp(&b.accommodation_subtotal))
}

/// Prices a baseline and every candidate channel in turn.
pub async fn probe<A: HostawayApi>(
    api: &A,
    config: &GatewayConfig,
    stay: &Stay,
    candidates: &[i64],
) -> Result<ProbeReport, GatewayError> {
    let listing_id = config.listing_id()?;
    let token = acquire_token(api, config).await?;

    let baseline = probe_channel(api, &token, listing_id, stay, None).await?;

    let mut results = Vec::with_capacity(candidates.len());
    for channel_id in candidates {
        results.push(probe_channel(api, &token, listing_id, stay, Some(*channel_id)).await?);
    }

    let best = best_guess(&results);
    info!(
        "Probed {} channels for listing {}; best guess {:?}",
        candidates.len(),
        listing_id,
        best.as_ref().map(|b| b.channel_id)
    );

    Ok(ProbeReport {
        listing_id: listing_id.to_string(),
        nights: stay.nights,
        guests: stay.guests,
        arrival: stay.arrival_str(),
        departure: stay.departure_str(),
        baseline,
        probed_count: candidates.len(),
        results,
        best_guess: best,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn priced(channel_id: i64, accommodation: f64) -> ProbeOutcome {
        ProbeOutcome {
            channel_id: Some(channel_id),
            ok: true,
            payload_sent: Value::Null,
            result: ProbeResult::Priced {
                currency: "CHF".to_string(),
                accommodation_subtotal: accommodation,
                other_included_total: 20.0,
                total_price: accommodation + 20.0,
                components: Value::Null,
            },
        }
    }

    #[test]
    fn test_best_guess_prefers_lowest_accommodation() {
        let failed = ProbeOutcome {
            channel_id: Some(2001),
            ok: false,
            payload_sent: Value::Null,
            result: ProbeResult::Failed {
                status: 400,
                message: "bad channel".to_string(),
                raw: Value::Null,
            },
        };
        let results = vec![priced(2013, 300.0), failed, priced(2020, 270.0), priced(2000, 270.0)];

        let best = best_guess(&results).unwrap();
        assert_eq!(best.channel_id, 2020);
        assert_eq!(best.total_price, 290.0);
    }

    #[test]
    fn test_best_guess_none_when_all_failed() {
        assert!(best_guess(&[]).is_none());
    }
}
