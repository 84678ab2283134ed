use std::io;

use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;
use log::{error, info};

use hostaway_gateway::{
    config::{self, GatewayConfig},
    routes,
    services::hostaway::client::HostawayClient,
};

#[actix_web::main]
async fn main() -> io::Result<()> {
    if cfg!(debug_assertions) {
        dotenv::dotenv().ok();
    }

    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let (host, port) = config::bind_address().map_err(|e| {
        error!("Invalid bind address: {}", e);
        io::Error::new(io::ErrorKind::InvalidInput, e.to_string())
    })?;

    let config = GatewayConfig::from_env().map_err(|e| {
        error!("Invalid configuration: {}", e);
        io::Error::new(io::ErrorKind::InvalidInput, e.to_string())
    })?;
    info!(
        "Pricing policy {} against {} (listing {})",
        config.pricing_policy,
        config.base_url,
        config.listing_id.as_deref().unwrap_or("<unset>")
    );

    let client = web::Data::new(HostawayClient::new(config.base_url.clone()));
    let config = web::Data::new(config);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        App::new()
            .wrap(routes::cors())
            .wrap(routes::default_headers())
            .wrap(Logger::default())
            .app_data(client.clone())
            .app_data(config.clone())
            .configure(routes::config::<HostawayClient>)
    })
    .bind((host, port))?
    .run()
    .await
}
