use actix_web::{web, HttpResponse, Responder};
use serde::Serialize;
use std::collections::HashMap;

use crate::config::GatewayConfig;

#[derive(Serialize)]
struct HealthStatus {
    status: String,
    services: HashMap<String, ServiceStatus>,
    environment: String,
    version: String,
}

#[derive(Serialize, Clone)]
struct ServiceStatus {
    status: String,
    details: Option<String>,
}

pub async fn health_check(config: web::Data<GatewayConfig>) -> impl Responder {
    let mut health = HealthStatus {
        status: "ok".to_string(),
        services: HashMap::new(),
        environment: config.environment.clone(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    // Configuration only; no upstream call is made here
    let hostaway_result = check_hostaway(&config);
    health
        .services
        .insert("hostaway".to_string(), hostaway_result.clone());

    if hostaway_result.status != "ok" {
        health.status = "degraded".to_string();
    }

    HttpResponse::Ok().json(health)
}

fn check_hostaway(config: &GatewayConfig) -> ServiceStatus {
    let mut missing = Vec::new();

    if config.account_id.is_none() {
        missing.push("HOSTAWAY_ACCOUNT_ID");
    }
    if config.api_key.is_none() {
        missing.push("HOSTAWAY_API_KEY");
    }
    if config.listing_id.is_none() {
        missing.push("HOSTAWAY_LISTING_ID");
    }

    if !missing.is_empty() {
        return ServiceStatus {
            status: "error".to_string(),
            details: Some(format!("Missing configuration: {}", missing.join(", "))),
        };
    }

    let key = config.api_key.as_deref().unwrap_or_default();
    let masked_key = if key.is_ascii() && key.len() > 8 {
        format!("{}***{}", &key[0..4], &key[key.len() - 4..])
    } else {
        "***".to_string()
    };

    ServiceStatus {
        status: "ok".to_string(),
        details: Some(format!(
            "Hostaway configured ({}), listing {}, policy {}",
            masked_key,
            config.listing_id.as_deref().unwrap_or_default(),
            config.pricing_policy
        )),
    }
}
