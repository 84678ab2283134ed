use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::GatewayError;
use crate::models::stay::{is_present, Stay, StayInput};

pub const RESERVATION_SOURCE: &str = "website";

#[derive(Debug, Default, Deserialize)]
pub struct BookingInput {
    #[serde(flatten)]
    pub stay: StayInput,
    #[serde(default)]
    pub name: Value,
    #[serde(default)]
    pub email: Value,
    #[serde(default)]
    pub phone: Value,
}

/// Guest details after the required-field check.
#[derive(Debug, Clone, PartialEq)]
pub struct Guest {
    pub full_name: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
}

impl BookingInput {
    pub fn validate(&self) -> Result<(Stay, Guest), GatewayError> {
        let required: [(&'static str, &Value); 6] = [
            ("arrival", &self.stay.arrival),
            ("departure", &self.stay.departure),
            ("name", &self.name),
            ("email", &self.email),
            ("phone", &self.phone),
            ("guests", &self.stay.guests),
        ];
        if let Some((field, _)) = required.iter().find(|(_, value)| !is_present(value)) {
            return Err(GatewayError::MissingField(*field));
        }

        let stay = self.stay.validate()?;

        let full_name = text(&self.name);
        let (first_name, last_name) = split_name(&full_name);

        Ok((
            stay,
            Guest {
                full_name,
                first_name,
                last_name,
                email: text(&self.email),
                phone: text(&self.phone),
            },
        ))
    }
}

fn text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// First word is the first name; the rest (or `-`) is the last name.
pub fn split_name(full: &str) -> (String, String) {
    let mut parts = full.split_whitespace();
    let first = parts.next().unwrap_or_default().to_string();
    let rest = parts.collect::<Vec<_>>().join(" ");
    let last = if rest.is_empty() { "-".to_string() } else { rest };
    (first, last)
}

/// Body of the upstream reservation-create call.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationPayload {
    pub channel_id: i64,
    pub listing_map_id: i64,
    pub listing_id: i64,
    pub source: String,
    pub arrival_date: String,
    pub departure_date: String,
    pub number_of_guests: u32,
    pub guest_name: String,
    pub guest_email: String,
    pub guest_phone: String,
    pub first_name: String,
    pub last_name: String,
    pub total_price: f64,
    pub finance_field: Value,
}

impl ReservationPayload {
    /// What gets echoed back when the upstream rejects the reservation.
    pub fn summary(&self) -> Value {
        json!({
            "channelId": self.channel_id,
            "listingId": self.listing_id,
            "arrivalDate": self.arrival_date,
            "departureDate": self.departure_date,
            "totalPrice": self.total_price,
            "hasFinanceField": is_present(&self.finance_field),
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingConfirmation {
    pub message: String,
    pub nights: i64,
    pub channel_id: i64,
    pub currency: String,
    pub total_price: f64,
    pub hostaway: Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn booking(value: Value) -> BookingInput {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_split_name() {
        assert_eq!(split_name("Ana Maria Horvat"), ("Ana".into(), "Maria Horvat".into()));
        assert_eq!(split_name("  Ana   Horvat "), ("Ana".into(), "Horvat".into()));
        assert_eq!(split_name("Cher"), ("Cher".into(), "-".into()));
        assert_eq!(split_name(""), ("".into(), "-".into()));
    }

    #[test]
    fn test_first_missing_field_is_reported() {
        let input = booking(json!({
            "arrival": "2025-07-01",
            "departure": "2025-07-04",
            "name": "Ana Horvat",
            "phone": "+385 91 000 000",
            "guests": 2,
        }));
        match input.validate() {
            Err(GatewayError::MissingField(field)) => assert_eq!(field, "email"),
            other => panic!("unexpected {:?}", other),
        }

        let no_guests = booking(json!({
            "arrival": "2025-07-01",
            "departure": "2025-07-04",
            "name": "Ana Horvat",
            "email": "ana@example.com",
            "phone": "+385 91 000 000",
            "guests": 0,
        }));
        assert!(matches!(no_guests.validate(), Err(GatewayError::MissingField("guests"))));
    }

    #[test]
    fn test_valid_booking() {
        let input = booking(json!({
            "arrival": "2025-07-01",
            "departure": "2025-07-04",
            "name": "Ana Horvat",
            "email": "ana@example.com",
            "phone": "+385 91 000 000",
            "guests": "14",
        }));
        let (stay, guest) = input.validate().unwrap();

        assert_eq!(stay.nights, 3);
        assert_eq!(stay.guests, 10);
        assert_eq!(guest.first_name, "Ana");
        assert_eq!(guest.last_name, "Horvat");
        assert_eq!(guest.email, "ana@example.com");
    }

    #[test]
    fn test_date_errors_come_after_presence_checks() {
        let input = booking(json!({
            "arrival": "2025-07-04",
            "departure": "2025-07-01",
            "name": "Ana Horvat",
            "email": "ana@example.com",
            "phone": "+385 91 000 000",
            "guests": 2,
        }));
        assert!(matches!(input.validate(), Err(GatewayError::InvalidDates)));
    }
}
