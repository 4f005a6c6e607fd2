pub mod classify;

pub mod sqlite_booking_repo;
pub mod sqlite_gira_repo;
pub mod sqlite_staff_repo;

pub mod postgres_booking_repo;
pub mod postgres_gira_repo;
pub mod postgres_staff_repo;
