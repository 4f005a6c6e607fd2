use crate::domain::models::{booking::Booking, gira::Gira, staff::StaffUser};
use crate::error::AppError;
use async_trait::async_trait;

#[async_trait]
pub trait GiraRepository: Send + Sync {
    /// Inserts the gira. When it is active every other gira is deactivated in the same transaction.
    async fn create(&self, gira: &Gira) -> Result<Gira, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Gira>, AppError>;
    /// The active gira with the soonest date.
    async fn find_active(&self) -> Result<Option<Gira>, AppError>;
    async fn is_active(&self, id: &str) -> Result<Option<bool>, AppError>;
    /// All giras, most recent date first.
    async fn list(&self) -> Result<Vec<Gira>, AppError>;
    /// Persists date, title, capacity, kind and active flag. Same activation rule as `create`.
    /// A capacity below the bookings already taken fails with `AppError::Conflict`.
    async fn update(&self, gira: &Gira) -> Result<Gira, AppError>;
}

#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Capacity and identity rejections from the database surface as `AppError::Booking`.
    async fn create(&self, booking: &Booking) -> Result<Booking, AppError>;
    async fn count_by_gira(&self, gira_id: &str) -> Result<i64, AppError>;
    async fn exists_identity(&self, gira_id: &str, identity_key: &str) -> Result<bool, AppError>;
    /// Oldest booking first.
    async fn list_by_gira(&self, gira_id: &str) -> Result<Vec<Booking>, AppError>;
}

#[async_trait]
pub trait StaffRepository: Send + Sync {
    async fn create(&self, user: &StaffUser) -> Result<StaffUser, AppError>;
    async fn find_by_username(&self, username: &str) -> Result<Option<StaffUser>, AppError>;
}
