use serde::Serialize;
use std::collections::HashMap;
use tera::{Context, Tera, Value};
use crate::api::dtos::requests::BookingFormRequest;
use crate::domain::models::{
    booking::{Booking, BookingConfirmation, BookingRejection},
    gira::{Gira, GiraOccupancy},
};
use crate::domain::services::formatting::{format_date_br, format_naive_date_br, format_timestamp_br};
use crate::error::AppError;
use chrono_tz::Tz;

pub const LOAD_GIRA_FAILED: &str = "Não foi possível carregar as informações de agendamento. Tente novamente em alguns instantes.";
pub const LOAD_GIRAS_FAILED: &str = "Não foi possível carregar as giras.";
pub const LOAD_ATTENDEES_FAILED: &str = "Não foi possível carregar os agendados desta gira.";

pub fn load_templates() -> Result<Tera, AppError> {
    let mut tera = Tera::default();
    tera.add_raw_templates(vec![
        ("base.html", include_str!("../../templates/base.html")),
        ("booking_form.html", include_str!("../../templates/booking_form.html")),
        ("index.html", include_str!("../../templates/index.html")),
        ("agendar.html", include_str!("../../templates/agendar.html")),
        ("admin_login.html", include_str!("../../templates/admin_login.html")),
        ("admin.html", include_str!("../../templates/admin.html")),
        ("not_found.html", include_str!("../../templates/not_found.html")),
    ])
    .map_err(|e| AppError::InternalWithMsg(format!("Failed to load templates: {}", e)))?;
    tera.register_filter("date_br", date_br_filter);
    Ok(tera)
}

/// `{{ gira.date | date_br }}` renders an ISO date as DD/MM/YYYY.
fn date_br_filter(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    let raw = value.as_str().ok_or_else(|| tera::Error::msg("date_br expects a date string"))?;
    // Anything unparseable is shown as stored.
    Ok(Value::String(format_date_br(raw).unwrap_or_else(|| raw.to_string())))
}

pub fn render(tera: &Tera, template: &str, context: &Context) -> Result<String, AppError> {
    tera.render(template, context)
        .map_err(|e| AppError::InternalWithMsg(format!("Failed to render {}: {:?}", template, e)))
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct BookingFormFields {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub first_visit: bool,
    pub notes: String,
}

impl Default for BookingFormFields {
    fn default() -> Self {
        Self {
            name: String::new(),
            phone: String::new(),
            email: String::new(),
            first_visit: true,
            notes: String::new(),
        }
    }
}

impl From<&BookingFormRequest> for BookingFormFields {
    fn from(form: &BookingFormRequest) -> Self {
        Self {
            name: form.name.clone(),
            phone: form.phone.clone().unwrap_or_default(),
            email: form.email.clone().unwrap_or_default(),
            first_visit: form.first_visit(),
            notes: form.notes.clone().unwrap_or_default(),
        }
    }
}

/// Everything the public booking pages show.
#[derive(Debug, Serialize, Clone, Default)]
pub struct BookingPageState {
    pub gira: Option<Gira>,
    pub display_date: Option<String>,
    pub booked: Option<i64>,
    pub remaining: Option<i64>,
    pub form: BookingFormFields,
    pub error: Option<String>,
    pub message: Option<String>,
}

impl BookingPageState {
    pub fn from_availability(occupancy: Option<GiraOccupancy>) -> Self {
        match occupancy {
            Some(occ) => Self {
                display_date: Some(format_naive_date_br(occ.gira.date)),
                booked: Some(occ.booked),
                remaining: Some(occ.remaining),
                gira: Some(occ.gira),
                ..Self::default()
            },
            None => Self::default(),
        }
    }

    pub fn load_failed() -> Self {
        Self {
            error: Some(LOAD_GIRA_FAILED.to_string()),
            ..Self::default()
        }
    }

    pub fn sold_out(&self) -> bool {
        matches!(self.remaining, Some(remaining) if remaining <= 0)
    }

    pub fn form_disabled(&self) -> bool {
        self.gira.is_none() || self.sold_out()
    }

    pub fn apply_success(&mut self, confirmation: &BookingConfirmation) {
        self.form = BookingFormFields::default();
        self.error = None;
        self.message = Some(confirmation.message.to_string());
        self.booked = Some(confirmation.booked);
        self.remaining = Some(confirmation.remaining);
    }

    /// Keeps what the visitor typed so the form can be resubmitted.
    pub fn apply_error(&mut self, form: BookingFormFields, err: &AppError) {
        self.form = form;
        self.message = None;
        self.error = Some(match err {
            AppError::Validation(_) | AppError::Booking(_) => err.public_message(),
            _ => BookingRejection::Failed.message().to_string(),
        });
    }

    pub fn context(&self) -> Result<Context, AppError> {
        let mut ctx = Context::from_serialize(self)
            .map_err(|e| AppError::InternalWithMsg(format!("Page context: {}", e)))?;
        ctx.insert("sold_out", &self.sold_out());
        ctx.insert("form_disabled", &self.form_disabled());
        Ok(ctx)
    }
}

#[derive(Debug, Serialize)]
pub struct AttendeeRow {
    pub name: String,
    pub first_visit: bool,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub notes: Option<String>,
    pub booked_at: String,
}

impl AttendeeRow {
    pub fn new(booking: Booking, tz: Tz) -> Self {
        Self {
            booked_at: format_timestamp_br(booking.created_at, tz),
            name: booking.name,
            first_visit: booking.first_visit,
            phone: booking.phone,
            email: booking.email,
            notes: booking.notes,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct GiraOption {
    pub id: String,
    pub label: String,
    pub selected: bool,
}

/// Staff dashboard: gira picker, selected gira summary and its attendees.
#[derive(Debug, Serialize, Default)]
pub struct AdminPageState {
    pub username: String,
    pub csrf_token: String,
    pub giras: Vec<GiraOption>,
    pub selected: Option<GiraOccupancy>,
    pub attendees: Vec<AttendeeRow>,
    pub error: Option<String>,
}

impl AdminPageState {
    pub fn gira_label(gira: &Gira) -> String {
        let mut label = format!("{} — {}", gira.title, format_naive_date_br(gira.date));
        if let Some(kind) = &gira.kind {
            label.push_str(&format!(" ({})", kind));
        }
        if gira.active {
            label.push_str(" • ativa");
        }
        label
    }

    pub fn context(&self) -> Result<Context, AppError> {
        let mut ctx = Context::from_serialize(self)
            .map_err(|e| AppError::InternalWithMsg(format!("Page context: {}", e)))?;
        ctx.insert("gira_count", &self.giras.len());
        ctx.insert("can_export", &(self.selected.is_some() && !self.attendees.is_empty()));
        Ok(ctx)
    }
}
