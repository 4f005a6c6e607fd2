pub mod admin;
pub mod auth;
pub mod booking;
pub mod gira;
pub mod health;
pub mod pages;
