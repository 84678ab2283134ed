use serde_json::Value;
use thiserror::Error;

use crate::config::Credentials;
use crate::models::booking::ReservationPayload;

use super::models::PriceDetailsRequest;

#[derive(Debug, Error)]
pub enum HostawayError {
    #[error("Hostaway request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid Hostaway URL: {0}")]
    Url(String),
}

/// Status and JSON body of an upstream reply. Non-JSON bodies arrive as `{}`.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: u16,
    pub body: Value,
}

impl UpstreamResponse {
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Upstream `message`, else `error`, else the fallback.
    pub fn message_or(&self, fallback: &str) -> String {
        ["message", "error"]
            .iter()
            .filter_map(|key| self.body.get(*key))
            .find_map(|v| match v {
                Value::String(s) if !s.is_empty() => Some(s.clone()),
                Value::Null | Value::String(_) => None,
                other => Some(other.to_string()),
            })
            .unwrap_or_else(|| fallback.to_string())
    }
}

/// The upstream calls the gateway makes. Implementations only move bytes;
/// interpreting status codes and bodies is left to the services.
pub trait HostawayApi {
    async fn request_token(
        &self,
        credentials: &Credentials,
    ) -> Result<UpstreamResponse, HostawayError>;

    async fn price_details(
        &self,
        token: &str,
        listing_id: &str,
        request: &PriceDetailsRequest,
    ) -> Result<UpstreamResponse, HostawayError>;

    async fn get_listing(
        &self,
        token: &str,
        listing_id: &str,
    ) -> Result<UpstreamResponse, HostawayError>;

    async fn create_reservation(
        &self,
        token: &str,
        payload: &ReservationPayload,
    ) -> Result<UpstreamResponse, HostawayError>;

    async fn list_channels(&self, token: &str) -> Result<UpstreamResponse, HostawayError>;
}
