use log::warn;

use crate::config::GatewayConfig;
use crate::error::GatewayError;
use crate::services::hostaway::interface::HostawayApi;
use crate::services::hostaway::models::access_token;

/// Exchanges the configured account id and API key for a bearer token.
/// Nothing is cached: every request pays for its own token.
pub async fn acquire_token<A: HostawayApi>(
    api: &A,
    config: &GatewayConfig,
) -> Result<String, GatewayError> {
    let credentials = config.credentials()?;
    let response = api.request_token(&credentials).await?;

    match access_token(&response.body) {
        Some(token) if response.is_success() => Ok(token),
        _ => {
            let message = response.message_or("unknown");
            warn!(
                "Token request rejected with status {}: {}",
                response.status, message
            );
            Err(GatewayError::Token(message))
        }
    }
}
