use actix_cors::Cors;
use actix_web::{
    http::{header, Method},
    middleware::DefaultHeaders,
    web, HttpResponse,
};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::GatewayError;
use crate::services::hostaway::interface::HostawayApi;

pub mod book;
pub mod channels;
pub mod health;
pub mod price;

const ALLOWED_HEADERS: &str = "Content-Type, Authorization";
const ALLOWED_METHODS: &str = "POST, GET, OPTIONS";

/// Any origin may call the gateway; the site front end is served elsewhere.
/// Preflights fall through to the `OPTIONS` routes.
pub fn cors() -> Cors {
    Cors::default()
        .allow_any_origin()
        .send_wildcard()
        .disable_preflight()
        .allowed_methods(vec![Method::GET, Method::POST, Method::OPTIONS])
        .allowed_headers(vec![header::CONTENT_TYPE, header::AUTHORIZATION])
        .max_age(3600)
}

/// Reads a JSON request body. An empty body counts as `{}`, and so does any
/// JSON that is not an object; only unparseable bytes are rejected.
pub fn parse_body<T>(body: &[u8]) -> Result<T, GatewayError>
where
    T: DeserializeOwned + Default,
{
    if body.is_empty() {
        return Ok(T::default());
    }

    match serde_json::from_slice::<Value>(body) {
        Ok(value @ Value::Object(_)) => {
            serde_json::from_value(value).map_err(|_| GatewayError::InvalidJson)
        }
        Ok(_) => Ok(T::default()),
        Err(_) => Err(GatewayError::InvalidJson),
    }
}

/// `Access-Control-Allow-Origin: *` on every response, including requests
/// without an `Origin` header, which the CORS middleware leaves alone.
pub fn default_headers() -> DefaultHeaders {
    DefaultHeaders::new().add((header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"))
}

pub async fn preflight() -> HttpResponse {
    HttpResponse::NoContent()
        .insert_header((header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"))
        .insert_header((header::ACCESS_CONTROL_ALLOW_HEADERS, ALLOWED_HEADERS))
        .insert_header((header::ACCESS_CONTROL_ALLOW_METHODS, ALLOWED_METHODS))
        .finish()
}

async fn post_only() -> Result<HttpResponse, GatewayError> {
    Err(GatewayError::MethodNotAllowed("POST"))
}

async fn get_only() -> Result<HttpResponse, GatewayError> {
    Err(GatewayError::MethodNotAllowed("GET"))
}

pub fn config<A: HostawayApi + 'static>(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health::health_check))
        .service(
            web::scope("/api")
                .service(
                    web::resource("/price")
                        .route(web::post().to(price::quote::<A>))
                        .route(web::method(Method::OPTIONS).to(preflight))
                        .default_service(web::route().to(post_only)),
                )
                .service(
                    web::resource("/book")
                        .route(web::post().to(book::create::<A>))
                        .route(web::method(Method::OPTIONS).to(preflight))
                        .default_service(web::route().to(post_only)),
                )
                .service(
                    web::resource("/channels")
                        .route(web::get().to(channels::list::<A>))
                        .route(web::method(Method::OPTIONS).to(preflight))
                        .default_service(web::route().to(get_only)),
                )
                .service(
                    web::resource("/probe-channel")
                        .route(web::post().to(channels::probe::<A>))
                        .route(web::method(Method::OPTIONS).to(preflight))
                        .default_service(web::route().to(post_only)),
                ),
        );
}
