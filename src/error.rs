use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::{json, Value};
use thiserror::Error;

use crate::services::hostaway::interface::HostawayError;

/// Every way a gateway request can fail, mapped onto the JSON error body the
/// front end reads (`error`, plus `message`/`details`/`hint` where useful).
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Invalid JSON body")]
    InvalidJson,

    #[error("Missing field: {0}")]
    MissingField(&'static str),

    #[error("arrival and departure must be YYYY-MM-DD")]
    InvalidDateFormat,

    #[error("Invalid dates")]
    InvalidDates,

    #[error("Method not allowed. Use {0}.")]
    MethodNotAllowed(&'static str),

    #[error("{0}")]
    Config(String),

    #[error("Token request failed: {0}")]
    Token(String),

    #[error("Listing verification failed")]
    ListingVerification { listing_id: i64, details: Value },

    #[error("{context}: {message}")]
    Upstream {
        status: u16,
        context: &'static str,
        message: String,
        details: Value,
        sent: Option<Value>,
    },

    #[error("{message}")]
    BadUpstreamResponse { message: String, raw: Value },

    #[error("Price calculation failed: {message}")]
    PriceCalculation {
        status: u16,
        message: String,
        details: Value,
    },

    #[error("Server crash: {0}")]
    Transport(#[from] HostawayError),
}

impl GatewayError {
    /// Attaches the upstream body to a malformed-response error.
    pub fn with_raw(self, body: &Value) -> GatewayError {
        match self {
            GatewayError::BadUpstreamResponse { message, .. } => GatewayError::BadUpstreamResponse {
                message,
                raw: body.clone(),
            },
            other => other,
        }
    }

    /// Folds a pricing failure into the shape the booking endpoint reports.
    pub fn into_price_calculation(self) -> GatewayError {
        match self {
            GatewayError::Upstream {
                status,
                message,
                details,
                ..
            } => GatewayError::PriceCalculation {
                status,
                message,
                details,
            },
            GatewayError::BadUpstreamResponse { message, raw } => GatewayError::PriceCalculation {
                status: 502,
                message,
                details: raw,
            },
            other => other,
        }
    }
}

impl ResponseError for GatewayError {
    fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::InvalidJson
            | GatewayError::MissingField(_)
            | GatewayError::InvalidDateFormat
            | GatewayError::InvalidDates
            | GatewayError::ListingVerification { .. } => StatusCode::BAD_REQUEST,
            GatewayError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            GatewayError::Config(_) | GatewayError::Transport(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            GatewayError::Token(_)
            | GatewayError::BadUpstreamResponse { .. }
            | GatewayError::PriceCalculation { .. } => StatusCode::BAD_GATEWAY,
            GatewayError::Upstream { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            GatewayError::InvalidDates => json!({
                "error": self.to_string(),
                "hint": "Departure must be after Arrival (min 1 night).",
            }),
            GatewayError::Token(message) => json!({
                "error": "Token request failed",
                "message": message,
            }),
            GatewayError::ListingVerification {
                listing_id,
                details,
            } => json!({
                "error": self.to_string(),
                "listingId": listing_id,
                "details": details,
            }),
            GatewayError::Upstream {
                context,
                message,
                details,
                sent,
                ..
            } => {
                let mut body = json!({
                    "error": context,
                    "message": message,
                    "details": details,
                });
                if let Some(sent) = sent {
                    body["sent"] = sent.clone();
                }
                body
            }
            GatewayError::BadUpstreamResponse { message, raw } => json!({
                "error": message,
                "raw": raw,
            }),
            GatewayError::PriceCalculation {
                status,
                message,
                details,
            } => json!({
                "error": "Price calculation failed",
                "status": status,
                "message": message,
                "details": details,
            }),
            GatewayError::Transport(err) => json!({
                "error": "Server crash",
                "details": err.to_string(),
            }),
            _ => json!({ "error": self.to_string() }),
        };

        HttpResponse::build(self.status_code()).json(body)
    }
}
