use serde::Serialize;
use crate::domain::models::gira::GiraOccupancy;
use crate::domain::services::formatting::format_naive_date_br;

#[derive(Serialize)]
pub struct AvailabilityResponse {
    pub open: bool,
    pub gira: Option<GiraOccupancy>,
    /// Gira date as DD/MM/YYYY.
    pub display_date: Option<String>,
}

impl From<Option<GiraOccupancy>> for AvailabilityResponse {
    fn from(occupancy: Option<GiraOccupancy>) -> Self {
        Self {
            open: occupancy.is_some(),
            display_date: occupancy.as_ref().map(|o| format_naive_date_br(o.gira.date)),
            gira: occupancy,
        }
    }
}
