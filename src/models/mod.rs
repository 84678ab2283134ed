pub mod booking;
pub mod channel;
pub mod quote;
pub mod stay;
