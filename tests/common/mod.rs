#![allow(dead_code)]

use actix_web::{middleware::Logger, web, App};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Mutex;

use hostaway_gateway::config::{Credentials, GatewayConfig};
use hostaway_gateway::models::booking::ReservationPayload;
use hostaway_gateway::routes;
use hostaway_gateway::services::hostaway::interface::{HostawayApi, HostawayError, UpstreamResponse};
use hostaway_gateway::services::hostaway::models::PriceDetailsRequest;

pub const TEST_LISTING_ID: &str = "4242";
pub const TEST_TOKEN: &str = "test-token";

/// Every upstream call the fake saw, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Token { account_id: String },
    PriceDetails { listing_id: String, request: Value },
    Listing { listing_id: String },
    Reservation { token: String, payload: Value },
    Channels,
}

type PriceFn = Box<dyn Fn(&PriceDetailsRequest) -> UpstreamResponse>;

/// Scripted stand-in for the Hostaway API.
pub struct FakeHostaway {
    token: UpstreamResponse,
    price: PriceFn,
    listing: UpstreamResponse,
    reservation: UpstreamResponse,
    channels: UpstreamResponse,
    calls: Mutex<Vec<Call>>,
}

impl FakeHostaway {
    pub fn new() -> Self {
        Self {
            token: ok(json!({ "access_token": TEST_TOKEN, "token_type": "Bearer" })),
            price: Box::new(|_| ok(sample_price_body())),
            listing: ok(json!({ "status": "success", "result": { "id": 4242 } })),
            reservation: ok(json!({
                "status": "success",
                "result": { "id": 98765, "status": "new" }
            })),
            channels: ok(json!({
                "status": "success",
                "result": [
                    { "id": 2000, "name": "Airbnb", "type": "ota", "isActive": true },
                    { "channelId": 2020, "channelName": "Partner", "active": true }
                ]
            })),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_token(mut self, response: UpstreamResponse) -> Self {
        self.token = response;
        self
    }

    pub fn with_price<F>(mut self, price: F) -> Self
    where
        F: Fn(&PriceDetailsRequest) -> UpstreamResponse + 'static,
    {
        self.price = Box::new(price);
        self
    }

    pub fn with_price_response(self, response: UpstreamResponse) -> Self {
        self.with_price(move |_| response.clone())
    }

    pub fn with_listing(mut self, response: UpstreamResponse) -> Self {
        self.listing = response;
        self
    }

    pub fn with_reservation(mut self, response: UpstreamResponse) -> Self {
        self.reservation = response;
        self
    }

    pub fn with_channels(mut self, response: UpstreamResponse) -> Self {
        self.channels = response;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

impl HostawayApi for FakeHostaway {
    async fn request_token(
        &self,
        credentials: &Credentials,
    ) -> Result<UpstreamResponse, HostawayError> {
        self.record(Call::Token {
            account_id: credentials.account_id.clone(),
        });
        Ok(self.token.clone())
    }

    async fn price_details(
        &self,
        _token: &str,
        listing_id: &str,
        request: &PriceDetailsRequest,
    ) -> Result<UpstreamResponse, HostawayError> {
        self.record(Call::PriceDetails {
            listing_id: listing_id.to_string(),
            request: serde_json::to_value(request).unwrap(),
        });
        Ok((self.price)(request))
    }

    async fn get_listing(
        &self,
        _token: &str,
        listing_id: &str,
    ) -> Result<UpstreamResponse, HostawayError> {
        self.record(Call::Listing {
            listing_id: listing_id.to_string(),
        });
        Ok(self.listing.clone())
    }

    async fn create_reservation(
        &self,
        token: &str,
        payload: &ReservationPayload,
    ) -> Result<UpstreamResponse, HostawayError> {
        self.record(Call::Reservation {
            token: token.to_string(),
            payload: serde_json::to_value(payload).unwrap(),
        });
        Ok(self.reservation.clone())
    }

    async fn list_channels(&self, _token: &str) -> Result<UpstreamResponse, HostawayError> {
        self.record(Call::Channels);
        Ok(self.channels.clone())
    }
}

pub fn ok(body: Value) -> UpstreamResponse {
    UpstreamResponse::new(200, body)
}

pub fn sample_finance_field() -> Value {
    json!([
        { "name": "baseRate", "type": "price", "value": 100 },
        { "name": "cleaningFeeValue", "type": "fee", "value": 20 },
        { "name": "weeklyDiscount", "type": "discount", "value": -15 }
    ])
}

/// accommodation 100, cleaning fee 20, upstream discount -15; upstream total 105.
pub fn sample_price_body() -> Value {
    json!({
        "status": "success",
        "result": {
            "currency": "CHF",
            "totalPrice": 105,
            "components": [
                { "type": "accommodation", "name": "baseRate", "total": 100 },
                { "type": "cleaningFee", "name": "cleaningFee", "total": 20 },
                { "type": "discount", "name": "weeklyDiscount", "total": -15 }
            ],
            "financeField": sample_finance_field()
        }
    })
}

/// Credentials and listing set; `overrides` replace or (with "") unset values.
pub fn config_with(overrides: &[(&str, &str)]) -> GatewayConfig {
    let mut vars: HashMap<String, String> = [
        ("HOSTAWAY_ACCOUNT_ID", "12345"),
        ("HOSTAWAY_API_KEY", "test-api-key-0001"),
        ("HOSTAWAY_LISTING_ID", TEST_LISTING_ID),
    ]
    .iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();

    for (k, v) in overrides {
        vars.insert(k.to_string(), v.to_string());
    }

    GatewayConfig::from_lookup(|name| vars.get(name).cloned()).expect("valid test configuration")
}

pub fn test_config() -> GatewayConfig {
    config_with(&[])
}

pub fn create_app<A: HostawayApi + 'static>(
    api: web::Data<A>,
    config: GatewayConfig,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .wrap(routes::cors())
        .wrap(routes::default_headers())
        .wrap(Logger::default())
        .app_data(api)
        .app_data(web::Data::new(config))
        .configure(routes::config::<A>)
}

pub fn stay_body() -> Value {
    json!({ "arrival": "2025-07-01", "departure": "2025-07-03", "guests": 2 })
}

pub fn booking_body() -> Value {
    json!({
        "arrival": "2025-07-01",
        "departure": "2025-07-03",
        "guests": 2,
        "name": "Ana Maria Horvat",
        "email": "ana@example.com",
        "phone": "+385 91 000 0000"
    })
}
