use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::stay::coerce_number;

pub const ACCOMMODATION: &str = "accommodation";
pub const DISCOUNT: &str = "discount";
pub const DEFAULT_CURRENCY: &str = "CHF";

/// How the final total is derived from an upstream price breakdown.
/// Exactly one policy is active per deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PricingPolicy {
    /// Accommodation plus every other component except upstream discounts.
    #[default]
    ComponentSum,
    /// Website discount on the accommodation subtotal only; fees untouched.
    AccommodationDiscount,
    /// Website discount on the upstream grand total.
    TotalDiscount,
    /// Upstream grand total as-is.
    UpstreamTotal,
}

impl PricingPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            PricingPolicy::ComponentSum => "component_sum",
            PricingPolicy::AccommodationDiscount => "accommodation_discount",
            PricingPolicy::TotalDiscount => "total_discount",
            PricingPolicy::UpstreamTotal => "upstream_total",
        }
    }

    pub fn applies_discount(&self) -> bool {
        matches!(
            self,
            PricingPolicy::AccommodationDiscount | PricingPolicy::TotalDiscount
        )
    }
}

impl fmt::Display for PricingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PricingPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "component_sum" => Ok(PricingPolicy::ComponentSum),
            "accommodation_discount" => Ok(PricingPolicy::AccommodationDiscount),
            "total_discount" => Ok(PricingPolicy::TotalDiscount),
            "upstream_total" => Ok(PricingPolicy::UpstreamTotal),
            other => Err(format!("unknown pricing policy: {}", other)),
        }
    }
}

/// One priced line item of an upstream breakdown.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceComponent {
    pub kind: Option<String>,
    /// Number or numeric string upstream.
    pub total: Value,
}

impl PriceComponent {
    pub fn new(kind: &str, total: f64) -> Self {
        PriceComponent {
            kind: Some(kind.to_string()),
            total: Value::from(total),
        }
    }

    /// Reads `type` and `total` off any JSON item. A `type` that is not a
    /// string leaves the component untyped; its total still counts.
    pub fn from_raw(raw: &Value) -> Self {
        PriceComponent {
            kind: raw.get("type").and_then(Value::as_str).map(str::to_string),
            total: raw.get("total").cloned().unwrap_or(Value::Null),
        }
    }

    pub fn is_kind(&self, kind: &str) -> bool {
        self.kind.as_deref() == Some(kind)
    }

    /// `None` when the total is missing or not a finite number.
    pub fn amount(&self) -> Option<f64> {
        coerce_number(&self.total)
    }
}

/// The parts of an upstream priceDetails response the gateway cares about.
#[derive(Debug, Clone)]
pub struct PriceDetails {
    pub currency: String,
    pub total_price: Option<f64>,
    pub components: Option<Vec<PriceComponent>>,
    /// Opaque; forwarded untouched to reservation create.
    pub finance_field: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceBreakdown {
    pub nightly_subtotal_base: Option<f64>,
    pub nightly_subtotal: Option<f64>,
    pub fees_total: Option<f64>,
    pub total_price_base: Option<f64>,
    pub total_price: f64,
    pub per_night: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_pct: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceQuote {
    pub currency: String,
    pub nights: i64,
    pub policy: PricingPolicy,
    pub breakdown: PriceBreakdown,
}
