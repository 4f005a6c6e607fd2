pub mod auth;
pub mod booking;
pub mod gira;
pub mod staff;
