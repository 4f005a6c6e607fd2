use std::sync::Arc;
use crate::domain::ports::{BookingRepository, GiraRepository, StaffRepository};
use crate::domain::services::{auth_service::AuthService, booking_service::BookingService, gira_feed::GiraFeed};
use crate::infra::factory::Repositories;
use crate::config::Config;
use crate::error::AppError;
use tera::Tera;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub gira_repo: Arc<dyn GiraRepository>,
    pub booking_repo: Arc<dyn BookingRepository>,
    pub staff_repo: Arc<dyn StaffRepository>,
    pub booking_service: Arc<BookingService>,
    pub auth_service: Arc<AuthService>,
    pub gira_feed: GiraFeed,
    pub templates: Arc<Tera>,
}

impl AppState {
    pub fn new(config: Config, repos: Repositories, templates: Tera) -> Result<Self, AppError> {
        let gira_feed = GiraFeed::new();
        let booking_service = Arc::new(BookingService::new(
            repos.gira_repo.clone(),
            repos.booking_repo.clone(),
            gira_feed.clone(),
        ));
        let auth_service = Arc::new(AuthService::new(repos.staff_repo.clone(), config.clone())?);

        Ok(Self {
            config,
            gira_repo: repos.gira_repo,
            booking_repo: repos.booking_repo,
            staff_repo: repos.staff_repo,
            booking_service,
            auth_service,
            gira_feed,
            templates: Arc::new(templates),
        })
    }
}
