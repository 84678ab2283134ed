use serde::Serialize;
use serde_json::Value;

use crate::models::quote::{PriceComponent, PriceDetails, DEFAULT_CURRENCY};
use crate::models::stay::{coerce_number, is_present, Stay};

/// Body of `POST /v1/listings/{id}/calendar/priceDetails`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceDetailsRequest {
    pub starting_date: String,
    pub ending_date: String,
    pub number_of_guests: u32,
    pub version: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<i64>,
}

impl PriceDetailsRequest {
    pub fn for_stay(stay: &Stay, channel_id: Option<i64>) -> Self {
        Self {
            starting_date: stay.arrival_str(),
            ending_date: stay.departure_str(),
            number_of_guests: stay.guests,
            version: 2,
            channel_id,
        }
    }
}

/// Form fields of the client-credentials grant.
#[derive(Debug, Serialize)]
pub struct TokenRequest<'a> {
    pub grant_type: &'static str,
    pub client_id: &'a str,
    pub client_secret: &'a str,
    pub scope: &'static str,
}

/// Hostaway wraps payloads inconsistently: `result`, `data.result`, `data`, or bare.
pub fn unwrap_envelope(raw: &Value) -> &Value {
    let candidates = [
        raw.get("result"),
        raw.get("data").and_then(|d| d.get("result")),
        raw.get("data"),
    ];
    candidates
        .into_iter()
        .flatten()
        .find(|v| is_present(v))
        .unwrap_or(raw)
}

/// First present value of `key`, looked up in the unwrapped result, then the
/// root, then `data`.
fn lookup<'a>(raw: &'a Value, key: &str) -> Option<&'a Value> {
    [
        unwrap_envelope(raw).get(key),
        raw.get(key),
        raw.get("data").and_then(|d| d.get(key)),
    ]
    .into_iter()
    .flatten()
    .find(|v| is_present(v))
}

pub fn parse_price_details(raw: &Value) -> PriceDetails {
    let result = unwrap_envelope(raw);

    let currency = lookup(raw, "currency")
        .and_then(Value::as_str)
        .unwrap_or(DEFAULT_CURRENCY)
        .to_string();

    let components = result
        .get("components")
        .and_then(Value::as_array)
        .map(|items| items.iter().map(PriceComponent::from_raw).collect());

    PriceDetails {
        currency,
        total_price: lookup(raw, "totalPrice").and_then(coerce_number),
        components,
        finance_field: lookup(raw, "financeField").cloned(),
    }
}

/// Access token from a token-endpoint reply, if any.
pub fn access_token(body: &Value) -> Option<String> {
    body.get("access_token")
        .and_then(Value::as_str)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

/// Channel array at `result` (or `result.channels`).
pub fn channel_list(raw: &Value) -> Option<&Vec<Value>> {
    let result = unwrap_envelope(raw);
    result
        .as_array()
        .or_else(|| result.get("channels").and_then(Value::as_array))
}
