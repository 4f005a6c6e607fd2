use serde::{Deserialize, Serialize};
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;
use uuid::Uuid;

pub const DEFAULT_GIRA_TITLE: &str = "Gira de Domingo";

#[derive(Debug, Serialize, Deserialize, FromRow, Clone, PartialEq)]
pub struct Gira {
    pub id: String,
    pub date: NaiveDate,
    pub title: String,
    pub capacity: i32,
    pub kind: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

pub struct NewGiraParams {
    pub title: Option<String>,
    pub date: NaiveDate,
    pub capacity: i32,
    pub kind: Option<String>,
    pub active: bool,
}

impl Gira {
    pub fn new(params: NewGiraParams) -> Self {
        let title = params.title
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| DEFAULT_GIRA_TITLE.to_string());

        Self {
            id: Uuid::new_v4().to_string(),
            date: params.date,
            title,
            capacity: params.capacity,
            kind: params.kind.map(|k| k.trim().to_string()).filter(|k| !k.is_empty()),
            active: params.active,
            created_at: Utc::now(),
        }
    }

    /// Seats left once `booked` bookings exist. Never negative.
    pub fn remaining(&self, booked: i64) -> i64 {
        (i64::from(self.capacity) - booked).max(0)
    }
}

/// A gira together with its derived occupancy.
#[derive(Debug, Serialize, Clone)]
pub struct GiraOccupancy {
    #[serde(flatten)]
    pub gira: Gira,
    pub booked: i64,
    pub remaining: i64,
    pub sold_out: bool,
}

impl GiraOccupancy {
    pub fn new(gira: Gira, booked: i64) -> Self {
        let remaining = gira.remaining(booked);
        Self { gira, booked, remaining, sold_out: remaining == 0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gira(capacity: i32) -> Gira {
        Gira::new(NewGiraParams {
            title: None,
            date: NaiveDate::from_ymd_opt(2025, 12, 7).unwrap(),
            capacity,
            kind: None,
            active: true,
        })
    }

    #[test]
    fn remaining_is_capacity_minus_booked() {
        assert_eq!(gira(10).remaining(3), 7);
        assert_eq!(gira(10).remaining(10), 0);
    }

    #[test]
    fn remaining_never_goes_negative() {
        assert_eq!(gira(2).remaining(5), 0);
    }

    #[test]
    fn blank_title_falls_back_to_default() {
        let g = Gira::new(NewGiraParams {
            title: Some("   ".into()),
            date: NaiveDate::from_ymd_opt(2025, 12, 7).unwrap(),
            capacity: 1,
            kind: Some("".into()),
            active: false,
        });
        assert_eq!(g.title, DEFAULT_GIRA_TITLE);
        assert!(g.kind.is_none());
    }

    #[test]
    fn occupancy_flags_sold_out() {
        let occ = GiraOccupancy::new(gira(3), 3);
        assert!(occ.sold_out);
        assert_eq!(occ.remaining, 0);
    }
}
