use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

use crate::error::GatewayError;

pub const MIN_GUESTS: u32 = 1;
pub const MAX_GUESTS: u32 = 10;

fn iso_date_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid date pattern"))
}

/// Stay fields as posted by the front end; nothing is trusted yet.
#[derive(Debug, Default, Deserialize)]
pub struct StayInput {
    #[serde(default)]
    pub arrival: Value,
    #[serde(default)]
    pub departure: Value,
    #[serde(default)]
    pub guests: Value,
}

/// A validated stay: real calendar dates, at least one night, guests in range.
#[derive(Debug, Clone, PartialEq)]
pub struct Stay {
    pub arrival: NaiveDate,
    pub departure: NaiveDate,
    pub nights: i64,
    pub guests: u32,
}

impl Stay {
    pub fn arrival_str(&self) -> String {
        self.arrival.format("%Y-%m-%d").to_string()
    }

    pub fn departure_str(&self) -> String {
        self.departure.format("%Y-%m-%d").to_string()
    }
}

impl StayInput {
    pub fn validate(&self) -> Result<Stay, GatewayError> {
        let (arrival, departure) = match (self.arrival.as_str(), self.departure.as_str()) {
            (Some(a), Some(d)) if is_iso_date(a) && is_iso_date(d) => (a, d),
            _ => return Err(GatewayError::InvalidDateFormat),
        };

        // Shape is right but the date may still not exist (e.g. 2025-02-30).
        let arrival = NaiveDate::parse_from_str(arrival, "%Y-%m-%d")
            .map_err(|_| GatewayError::InvalidDates)?;
        let departure = NaiveDate::parse_from_str(departure, "%Y-%m-%d")
            .map_err(|_| GatewayError::InvalidDates)?;

        let nights = count_nights(arrival, departure).ok_or(GatewayError::InvalidDates)?;

        Ok(Stay {
            arrival,
            departure,
            nights,
            guests: clamp_guests(&self.guests),
        })
    }
}

pub fn is_iso_date(s: &str) -> bool {
    iso_date_pattern().is_match(s)
}

/// Whole nights between the two dates, or `None` when the stay is shorter than one night.
pub fn count_nights(arrival: NaiveDate, departure: NaiveDate) -> Option<i64> {
    let nights = (departure - arrival).num_days();
    (nights >= 1).then_some(nights)
}

/// Coerces any JSON value to a guest count in `[MIN_GUESTS, MAX_GUESTS]`.
/// Zero, non-numeric and missing values all count as one guest.
pub fn clamp_guests(value: &Value) -> u32 {
    let n = coerce_number(value).filter(|n| *n != 0.0).unwrap_or(1.0);
    n.clamp(MIN_GUESTS as f64, MAX_GUESTS as f64).trunc() as u32
}

/// Reads a JSON number or numeric string as a finite `f64`.
pub fn coerce_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) if !s.trim().is_empty() => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    n.is_finite().then_some(n)
}

/// True for values a form would treat as filled in.
pub fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::String(s) => !s.is_empty(),
        Value::Number(n) => n.as_f64().map_or(true, |n| n != 0.0),
        Value::Array(_) | Value::Object(_) => true,
    }
}
