pub mod booking_service;
pub mod channel_service;
pub mod hostaway;
pub mod pricing_service;
pub mod quote_service;
pub mod token_service;
