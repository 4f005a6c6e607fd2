pub mod auth_service;
pub mod booking_service;
pub mod export;
pub mod formatting;
pub mod gira_feed;
pub mod identity;
