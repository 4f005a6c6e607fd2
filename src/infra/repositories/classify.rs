use crate::domain::models::booking::BookingRejection;
use crate::error::AppError;

/// Message raised by the `bookings_capacity_guard` trigger on both backends.
pub const CAPACITY_MARKER: &str = "Capacidade máxima atingida";

/// Maps a failed booking insert to what the visitor should be told.
pub fn classify_booking_insert(err: sqlx::Error) -> AppError {
    if let Some(db_err) = err.as_database_error() {
        if db_err.message().contains(CAPACITY_MARKER) {
            return AppError::Booking(BookingRejection::SoldOut);
        }
        if db_err.is_unique_violation() {
            return AppError::Booking(BookingRejection::Duplicate);
        }
    }
    AppError::Database(err)
}

/// Message raised by the `giras_capacity_floor` trigger on both backends.
pub const CAPACITY_FLOOR_MARKER: &str = "Capacidade abaixo dos agendamentos";

pub const CAPACITY_BELOW_BOOKINGS: &str =
    "Não é possível reduzir a capacidade abaixo do número de agendamentos já realizados.";

/// Maps a failed gira update; a capacity below the booked seats is a conflict.
pub fn classify_gira_update(err: sqlx::Error) -> AppError {
    if let Some(db_err) = err.as_database_error()
        && db_err.message().contains(CAPACITY_FLOOR_MARKER)
    {
        return AppError::Conflict(CAPACITY_BELOW_BOOKINGS.into());
    }
    AppError::Database(err)
}
