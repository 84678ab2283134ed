use crate::error::GatewayError;
use crate::models::quote::{
    PriceBreakdown, PriceComponent, PriceDetails, PricingPolicy, ACCOMMODATION, DISCOUNT,
};

pub struct PricingService;

impl PricingService {
    /// Round to cents, half-up on the scaled value. The epsilon nudge keeps
    /// values like 1.005 from rounding down through float error.
    pub fn round2(amount: f64) -> f64 {
        if !amount.is_finite() {
            return amount;
        }
        ((amount + f64::EPSILON) * 100.0 + 0.5).floor() / 100.0
    }

    /// Sum of component totals matching `predicate`; unreadable totals are skipped.
    pub fn sum_where<F>(components: &[PriceComponent], predicate: F) -> f64
    where
        F: Fn(&PriceComponent) -> bool,
    {
        components
            .iter()
            .filter(|c| predicate(*c))
            .filter_map(PriceComponent::amount)
            .sum()
    }

    pub fn accommodation_subtotal(components: &[PriceComponent]) -> f64 {
        Self::sum_where(components, |c| c.is_kind(ACCOMMODATION))
    }

    /// Everything but accommodation and upstream discounts.
    pub fn included_other_total(components: &[PriceComponent]) -> f64 {
        Self::sum_where(components, |c| {
            !c.is_kind(ACCOMMODATION) && !c.is_kind(DISCOUNT)
        })
    }

    /// Everything but accommodation, discounts included.
    pub fn non_accommodation_total(components: &[PriceComponent]) -> f64 {
        Self::sum_where(components, |c| !c.is_kind(ACCOMMODATION))
    }

    /// Factor applied to a price for a percentage discount clamped to [0, 100].
    pub fn discount_multiplier(discount_pct: f64) -> f64 {
        1.0 - discount_pct.clamp(0.0, 100.0) / 100.0
    }

    /// Applies `policy` to an upstream breakdown.
    pub fn breakdown(
        details: &PriceDetails,
        nights: i64,
        policy: PricingPolicy,
        discount_pct: f64,
    ) -> Result<PriceBreakdown, GatewayError> {
        let multiplier = Self::discount_multiplier(discount_pct);
        let total_price_base = details.total_price.map(Self::round2);
        let discount_pct = policy
            .applies_discount()
            .then(|| Self::round2(discount_pct.clamp(0.0, 100.0)));

        let breakdown = match policy {
            PricingPolicy::ComponentSum | PricingPolicy::AccommodationDiscount => {
                let components = details.components.as_deref().ok_or_else(|| {
                    GatewayError::BadUpstreamResponse {
                        message: "Hostaway response missing components[]".to_string(),
                        raw: serde_json::Value::Null,
                    }
                })?;

                let accommodation = Self::accommodation_subtotal(components);
                if !accommodation.is_finite() || accommodation <= 0.0 {
                    return Err(GatewayError::BadUpstreamResponse {
                        message: "Could not compute accommodation subtotal from components"
                            .to_string(),
                        raw: serde_json::Value::Null,
                    });
                }

                let (nightly_subtotal, fees_total) = match policy {
                    PricingPolicy::AccommodationDiscount => (
                        Self::round2(accommodation * multiplier),
                        Self::non_accommodation_total(components),
                    ),
                    _ => (
                        Self::round2(accommodation),
                        Self::included_other_total(components),
                    ),
                };

                PriceBreakdown {
                    nightly_subtotal_base: Some(Self::round2(accommodation)),
                    nightly_subtotal: Some(nightly_subtotal),
                    fees_total: Some(Self::round2(fees_total)),
                    total_price_base,
                    total_price: Self::round2(nightly_subtotal + fees_total),
                    per_night: Some(Self::per_night(nightly_subtotal, nights)),
                    discount_pct,
                }
            }
            PricingPolicy::TotalDiscount | PricingPolicy::UpstreamTotal => {
                let total = details.total_price.ok_or_else(|| GatewayError::BadUpstreamResponse {
                    message: "Missing totalPrice in priceDetails response".to_string(),
                    raw: serde_json::Value::Null,
                })?;

                let applied = if policy == PricingPolicy::TotalDiscount {
                    multiplier
                } else {
                    1.0
                };

                let accommodation = details
                    .components
                    .as_deref()
                    .map(Self::accommodation_subtotal)
                    .filter(|a| *a > 0.0);
                let nightly_subtotal = accommodation.map(|a| Self::round2(a * applied));

                PriceBreakdown {
                    nightly_subtotal_base: accommodation.map(Self::round2),
                    nightly_subtotal,
                    fees_total: None,
                    total_price_base,
                    total_price: Self::round2(total * applied),
                    per_night: nightly_subtotal.map(|n| Self::per_night(n, nights)),
                    discount_pct,
                }
            }
        };

        Ok(breakdown)
    }

    fn per_night(subtotal: f64, nights: i64) -> f64 {
        Self::round2(subtotal / nights.max(1) as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn details(components: Option<Vec<PriceComponent>>, total_price: Option<f64>) -> PriceDetails {
        PriceDetails {
            currency: "CHF".to_string(),
            total_price,
            components,
            finance_field: None,
        }
    }

    fn sample_components() -> Vec<PriceComponent> {
        vec![
            PriceComponent::new("accommodation", 100.0),
            PriceComponent::new("cleaningFee", 20.0),
            PriceComponent::new("discount", -15.0),
        ]
    }

    #[test]
    fn test_round2() {
        assert_eq!(PricingService::round2(1.005), 1.01);
        assert_eq!(PricingService::round2(0.1 + 0.2), 0.3);
        assert_eq!(PricingService::round2(-15.0), -15.0);
        assert_eq!(PricingService::round2(99.994), 99.99);
    }

    #[test]
    fn test_round2_is_idempotent() {
        for value in [0.0, 0.01, 0.29, 1.1, 19.99, 90.0, 120.55, 1234.56, 99999.99] {
            let once = PricingService::round2(value);
            assert_eq!(PricingService::round2(once), once, "value {}", value);
        }
    }

    #[test]
    fn test_component_sum_excludes_upstream_discount() {
        let breakdown = PricingService::breakdown(
            &details(Some(sample_components()), Some(105.0)),
            2,
            PricingPolicy::ComponentSum,
            10.0,
        )
        .unwrap();

        assert_eq!(breakdown.total_price, 120.0);
        assert_eq!(breakdown.nightly_subtotal, Some(100.0));
        assert_eq!(breakdown.fees_total, Some(20.0));
        assert_eq!(breakdown.total_price_base, Some(105.0));
        assert_eq!(breakdown.per_night, Some(50.0));
        assert_eq!(breakdown.discount_pct, None);
    }

    #[test]
    fn test_total_discount() {
        let breakdown = PricingService::breakdown(
            &details(None, Some(100.0)),
            1,
            PricingPolicy::TotalDiscount,
            10.0,
        )
        .unwrap();

        assert_eq!(breakdown.total_price, 90.0);
        assert_eq!(breakdown.total_price_base, Some(100.0));
        assert_eq!(breakdown.discount_pct, Some(10.0));
    }

    #[test]
    fn test_accommodation_discount_leaves_fees_alone() {
        let components = vec![
            PriceComponent::new("accommodation", 300.0),
            PriceComponent::new("cleaningFee", 45.0),
        ];
        let breakdown = PricingService::breakdown(
            &details(Some(components), Some(345.0)),
            3,
            PricingPolicy::AccommodationDiscount,
            10.0,
        )
        .unwrap();

        assert_eq!(breakdown.nightly_subtotal_base, Some(300.0));
        assert_eq!(breakdown.nightly_subtotal, Some(270.0));
        assert_eq!(breakdown.fees_total, Some(45.0));
        assert_eq!(breakdown.total_price, 315.0);
        assert_eq!(breakdown.per_night, Some(90.0));
    }

    #[test]
    fn test_upstream_total_is_untouched() {
        let breakdown = PricingService::breakdown(
            &details(Some(sample_components()), Some(105.004)),
            2,
            PricingPolicy::UpstreamTotal,
            10.0,
        )
        .unwrap();

        assert_eq!(breakdown.total_price, 105.0);
        assert_eq!(breakdown.nightly_subtotal, Some(100.0));
        assert_eq!(breakdown.discount_pct, None);
    }

    #[test]
    fn test_discount_is_clamped() {
        assert_eq!(PricingService::discount_multiplier(150.0), 0.0);
        assert_eq!(PricingService::discount_multiplier(-5.0), 1.0);

        let breakdown = PricingService::breakdown(
            &details(None, Some(80.0)),
            1,
            PricingPolicy::TotalDiscount,
            150.0,
        )
        .unwrap();
        assert_eq!(breakdown.total_price, 0.0);
        assert_eq!(breakdown.discount_pct, Some(100.0));
    }

    #[test]
    fn test_component_policies_need_components() {
        let result = PricingService::breakdown(
            &details(None, Some(100.0)),
            1,
            PricingPolicy::ComponentSum,
            10.0,
        );
        assert!(matches!(result, Err(GatewayError::BadUpstreamResponse { .. })));
    }

    #[test]
    fn test_component_policies_need_accommodation() {
        let components = vec![PriceComponent::new("cleaningFee", 20.0)];
        let result = PricingService::breakdown(
            &details(Some(components), None),
            1,
            PricingPolicy::AccommodationDiscount,
            10.0,
        );
        assert!(matches!(result, Err(GatewayError::BadUpstreamResponse { .. })));
    }

    #[test]
    fn test_total_policies_need_total() {
        let result = PricingService::breakdown(
            &details(Some(sample_components()), None),
            1,
            PricingPolicy::TotalDiscount,
            10.0,
        );
        assert!(matches!(result, Err(GatewayError::BadUpstreamResponse { .. })));
    }

    #[test]
    fn test_unreadable_totals_are_skipped() {
        let mut components = sample_components();
        components.push(PriceComponent {
            kind: Some("cleaningFee".to_string()),
            total: serde_json::json!("n/a"),
        });
        assert_eq!(PricingService::included_other_total(&components), 20.0);
        assert_eq!(PricingService::non_accommodation_total(&components), 5.0);
    }
}
