use std::sync::Arc;
use tracing::{error, info, warn};
use crate::domain::{
    models::{
        booking::{Booking, BookingConfirmation, BookingInput, BookingRejection, NewBookingParams, MISSING_NAME_MESSAGE, SUCCESS_MESSAGE},
        gira::{Gira, GiraOccupancy},
    },
    ports::{BookingRepository, GiraRepository},
    services::{gira_feed::{GiraChange, GiraFeed}, identity::normalize_identity},
};
use crate::error::AppError;

/// Public booking workflow.
///
/// Every check here is advisory: two visitors can pass them at the same
/// time. The capacity trigger and the `(gira_id, identity_key)` unique index
/// decide the race, and their rejections come back as `AppError::Booking`.
pub struct BookingService {
    gira_repo: Arc<dyn GiraRepository>,
    booking_repo: Arc<dyn BookingRepository>,
    feed: GiraFeed,
}

impl BookingService {
    pub fn new(gira_repo: Arc<dyn GiraRepository>, booking_repo: Arc<dyn BookingRepository>, feed: GiraFeed) -> Self {
        Self { gira_repo, booking_repo, feed }
    }

    /// The gira currently open to the public, with its occupancy.
    pub async fn availability(&self) -> Result<Option<GiraOccupancy>, AppError> {
        match self.gira_repo.find_active().await? {
            Some(gira) => Ok(Some(self.occupancy(gira).await?)),
            None => Ok(None),
        }
    }

    pub async fn occupancy(&self, gira: Gira) -> Result<GiraOccupancy, AppError> {
        let booked = self.booking_repo.count_by_gira(&gira.id).await?;
        Ok(GiraOccupancy::new(gira, booked))
    }

    pub async fn submit(&self, input: BookingInput) -> Result<BookingConfirmation, AppError> {
        if input.name.trim().is_empty() {
            return Err(AppError::Validation(MISSING_NAME_MESSAGE.into()));
        }

        let gira = match input.gira_id.as_deref() {
            Some(id) => self.gira_repo.find_by_id(id).await?,
            None => self.gira_repo.find_active().await?,
        }
        .ok_or(AppError::Booking(BookingRejection::NoOpenGira))?;

        // The gira may have been switched off since the visitor loaded the page.
        match self.gira_repo.is_active(&gira.id).await {
            Ok(Some(true)) => {}
            Ok(_) => return Err(AppError::Booking(BookingRejection::GiraClosed)),
            Err(e) => {
                error!("Active flag re-check failed for gira {}: {}", gira.id, e);
                return Err(AppError::Booking(BookingRejection::GiraClosed));
            }
        }

        let booked = self.booking_repo.count_by_gira(&gira.id).await
            .map_err(|e| failed("count bookings", &gira.id, e))?;
        if gira.remaining(booked) == 0 {
            return Err(AppError::Booking(BookingRejection::SoldOut));
        }

        let identity_key = normalize_identity(&input.name);

        let duplicate = self.booking_repo.exists_identity(&gira.id, &identity_key).await
            .map_err(|e| failed("check duplicate identity", &gira.id, e))?;
        if duplicate {
            return Err(AppError::Booking(BookingRejection::Duplicate));
        }

        let booking = Booking::new(NewBookingParams {
            gira_id: gira.id.clone(),
            name: input.name,
            identity_key,
            first_visit: input.first_visit,
            phone: input.phone,
            email: input.email,
            notes: input.notes,
        });

        let created = match self.booking_repo.create(&booking).await {
            Ok(created) => created,
            Err(AppError::Booking(rejection)) => {
                warn!("Database rejected booking for gira {}: {:?}", gira.id, rejection);
                if rejection == BookingRejection::SoldOut {
                    self.refresh_count(&gira).await;
                }
                return Err(AppError::Booking(rejection));
            }
            Err(e) => return Err(failed("insert booking", &gira.id, e)),
        };

        let booked = match self.booking_repo.count_by_gira(&gira.id).await {
            Ok(count) => count,
            Err(e) => {
                warn!("Could not refresh booking count for gira {}: {}", gira.id, e);
                booked + 1
            }
        };
        let remaining = gira.remaining(booked);

        self.feed.publish(GiraChange::BookingCountChanged {
            gira_id: gira.id.clone(),
            booked,
            remaining,
        });

        info!("Booking {} confirmed for gira {} ({} seats left)", created.id, gira.id, remaining);

        Ok(BookingConfirmation {
            booking: created,
            booked,
            remaining,
            message: SUCCESS_MESSAGE,
        })
    }

    async fn refresh_count(&self, gira: &Gira) {
        match self.booking_repo.count_by_gira(&gira.id).await {
            Ok(booked) => self.feed.publish(GiraChange::BookingCountChanged {
                gira_id: gira.id.clone(),
                booked,
                remaining: gira.remaining(booked),
            }),
            Err(e) => warn!("Could not refresh booking count for gira {}: {}", gira.id, e),
        }
    }
}

fn failed(step: &str, gira_id: &str, e: AppError) -> AppError {
    error!("Booking step '{}' failed for gira {}: {}", step, gira_id, e);
    AppError::Booking(BookingRejection::Failed)
}
