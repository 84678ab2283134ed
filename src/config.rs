use std::{env, fmt};

use thiserror::Error;
use url::Url;

use crate::error::GatewayError;
use crate::models::quote::PricingPolicy;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_BASE_URL: &str = "https://api.hostaway.com";
pub const DEFAULT_DISCOUNT_PCT: f64 = 10.0;
/// Hostaway's partner/website channel.
pub const DEFAULT_RESERVATION_CHANNEL_ID: i64 = 2020;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value:?}")]
    InvalidValue { name: &'static str, value: String },

    #[error("Invalid HOSTAWAY_BASE_URL: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),
}

/// Client-credentials pair used for the token exchange.
#[derive(Clone)]
pub struct Credentials {
    pub account_id: String,
    pub api_key: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("account_id", &self.account_id)
            .field("api_key", &"***")
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub base_url: Url,
    pub account_id: Option<String>,
    pub api_key: Option<String>,
    pub listing_id: Option<String>,
    pub direct_channel_id: Option<i64>,
    pub discount_pct: f64,
    pub pricing_policy: PricingPolicy,
    pub reservation_channel_id: i64,
    pub verify_listing: bool,
    pub environment: String,
}

impl GatewayConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from any variable source. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let base_url = Url::parse(
            &get("HOSTAWAY_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        )?;

        let discount_pct = match get("WEBSITE_DISCOUNT_PCT") {
            Some(raw) => parse_number::<f64>("WEBSITE_DISCOUNT_PCT", raw)
                .and_then(|pct| {
                    if pct.is_finite() {
                        Ok(pct)
                    } else {
                        Err(ConfigError::InvalidValue {
                            name: "WEBSITE_DISCOUNT_PCT",
                            value: pct.to_string(),
                        })
                    }
                })?,
            None => DEFAULT_DISCOUNT_PCT,
        };

        let pricing_policy = match get("PRICING_POLICY") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue {
                name: "PRICING_POLICY",
                value: raw,
            })?,
            None => PricingPolicy::default(),
        };

        let direct_channel_id = get("HOSTAWAY_DIRECT_CHANNEL_ID")
            .map(|raw| parse_number::<i64>("HOSTAWAY_DIRECT_CHANNEL_ID", raw))
            .transpose()?;

        let reservation_channel_id = get("HOSTAWAY_RESERVATION_CHANNEL_ID")
            .map(|raw| parse_number::<i64>("HOSTAWAY_RESERVATION_CHANNEL_ID", raw))
            .transpose()?
            .unwrap_or(DEFAULT_RESERVATION_CHANNEL_ID);

        let verify_listing = match get("HOSTAWAY_VERIFY_LISTING") {
            Some(raw) => parse_flag(&raw).ok_or(ConfigError::InvalidValue {
                name: "HOSTAWAY_VERIFY_LISTING",
                value: raw,
            })?,
            None => false,
        };

        Ok(GatewayConfig {
            base_url,
            account_id: get("HOSTAWAY_ACCOUNT_ID"),
            api_key: get("HOSTAWAY_API_KEY"),
            listing_id: get("HOSTAWAY_LISTING_ID"),
            direct_channel_id,
            discount_pct,
            pricing_policy,
            reservation_channel_id,
            verify_listing,
            environment: get("RUST_ENV").unwrap_or_else(|| "development".to_string()),
        })
    }

    /// Fails before any network call when either half of the credentials is absent.
    pub fn credentials(&self) -> Result<Credentials, GatewayError> {
        match (&self.account_id, &self.api_key) {
            (Some(account_id), Some(api_key)) => Ok(Credentials {
                account_id: account_id.clone(),
                api_key: api_key.clone(),
            }),
            _ => Err(GatewayError::Config(
                "Missing HOSTAWAY_ACCOUNT_ID / HOSTAWAY_API_KEY env vars".to_string(),
            )),
        }
    }

    pub fn listing_id(&self) -> Result<&str, GatewayError> {
        self.listing_id
            .as_deref()
            .ok_or_else(|| GatewayError::Config("Missing HOSTAWAY_LISTING_ID env var".to_string()))
    }

    /// Reservation payloads carry the listing id as a number.
    pub fn numeric_listing_id(&self) -> Result<i64, GatewayError> {
        self.listing_id
            .as_deref()
            .and_then(|id| id.parse::<i64>().ok())
            .ok_or_else(|| {
                GatewayError::Config("Missing/invalid HOSTAWAY_LISTING_ID env var".to_string())
            })
    }
}

/// `HOST`/`PORT` for the listener. A `PORT` that is not a valid port number is an error.
pub fn bind_address() -> Result<(String, u16), ConfigError> {
    bind_address_from_lookup(|name| env::var(name).ok())
}

pub fn bind_address_from_lookup<F>(lookup: F) -> Result<(String, u16), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |name: &str| {
        lookup(name)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let host = get("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
    let port = get("PORT")
        .map(|raw| parse_number::<u16>("PORT", raw))
        .transpose()?
        .unwrap_or(DEFAULT_PORT);

    Ok((host, port))
}

fn parse_number<T: std::str::FromStr>(name: &'static str, raw: String) -> Result<T, ConfigError> {
    raw.parse::<T>()
        .map_err(|_| ConfigError::InvalidValue { name, value: raw })
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
