use log::{error, info};
use reqwest::{Client, RequestBuilder};
use serde_json::Value;
use url::Url;

use crate::config::Credentials;
use crate::models::booking::ReservationPayload;

use super::interface::{HostawayApi, HostawayError, UpstreamResponse};
use super::models::{PriceDetailsRequest, TokenRequest};

/// reqwest-backed Hostaway API. Cheap to clone; the connection pool is shared.
#[derive(Clone)]
pub struct HostawayClient {
    http_client: Client,
    base_url: Url,
}

impl HostawayClient {
    pub fn new(base_url: Url) -> Self {
        Self {
            http_client: Client::new(),
            base_url,
        }
    }

    /// `{base}/v1/<segments...>`, each segment percent-encoded on its own.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, HostawayError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| HostawayError::Url(self.base_url.to_string()))?
            .pop_if_empty()
            .push("v1")
            .extend(segments);
        Ok(url)
    }

    async fn send(&self, request: RequestBuilder) -> Result<UpstreamResponse, HostawayError> {
        let response = request.send().await.map_err(|e| {
            error!("Hostaway request error: {:?}", e);
            HostawayError::Transport(e)
        })?;

        let status = response.status().as_u16();
        let text = response.text().await?;
        let body = serde_json::from_str::<Value>(&text)
            .unwrap_or_else(|_| Value::Object(Default::default()));

        Ok(UpstreamResponse::new(status, body))
    }
}

impl HostawayApi for HostawayClient {
    async fn request_token(
        &self,
        credentials: &Credentials,
    ) -> Result<UpstreamResponse, HostawayError> {
        let url = self.endpoint(&["accessTokens"])?;
        info!("Requesting Hostaway access token for account {}", credentials.account_id);

        let form = TokenRequest {
            grant_type: "client_credentials",
            client_id: &credentials.account_id,
            client_secret: &credentials.api_key,
            scope: "general",
        };

        self.send(self.http_client.post(url).form(&form)).await
    }

    async fn price_details(
        &self,
        token: &str,
        listing_id: &str,
        request: &PriceDetailsRequest,
    ) -> Result<UpstreamResponse, HostawayError> {
        let url = self.endpoint(&["listings", listing_id, "calendar", "priceDetails"])?;
        info!(
            "Fetching priceDetails for listing {} ({} to {}, {} guests, channel {:?})",
            listing_id,
            request.starting_date,
            request.ending_date,
            request.number_of_guests,
            request.channel_id
        );

        self.send(self.http_client.post(url).bearer_auth(token).json(request))
            .await
    }

    async fn get_listing(
        &self,
        token: &str,
        listing_id: &str,
    ) -> Result<UpstreamResponse, HostawayError> {
        let url = self.endpoint(&["listings", listing_id])?;
        info!("Verifying listing {}", listing_id);

        self.send(self.http_client.get(url).bearer_auth(token)).await
    }

    async fn create_reservation(
        &self,
        token: &str,
        payload: &ReservationPayload,
    ) -> Result<UpstreamResponse, HostawayError> {
        let url = self.endpoint(&["reservations"])?;
        info!(
            "Creating reservation on listing {} ({} to {}, total {})",
            payload.listing_id, payload.arrival_date, payload.departure_date, payload.total_price
        );

        self.send(self.http_client.post(url).bearer_auth(token).json(payload))
            .await
    }

    async fn list_channels(&self, token: &str) -> Result<UpstreamResponse, HostawayError> {
        let url = self.endpoint(&["channels"])?;
        info!("Listing Hostaway channels");

        self.send(
            self.http_client
                .get(url)
                .bearer_auth(token)
                .header(reqwest::header::ACCEPT, "application/json"),
        )
        .await
    }
}
