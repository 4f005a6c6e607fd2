use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Booking {
    pub id: String,
    pub gira_id: String,
    pub name: String,
    pub identity_key: String,
    pub first_visit: bool,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

pub struct NewBookingParams {
    pub gira_id: String,
    pub name: String,
    pub identity_key: String,
    pub first_visit: bool,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub notes: Option<String>,
}

impl Booking {
    pub fn new(params: NewBookingParams) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            gira_id: params.gira_id,
            name: params.name.trim().to_string(),
            identity_key: params.identity_key,
            first_visit: params.first_visit,
            phone: non_blank(params.phone),
            email: non_blank(params.email),
            notes: non_blank(params.notes),
            created_at: Utc::now(),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// What a visitor typed into the booking form.
#[derive(Debug, Deserialize, Clone)]
pub struct BookingInput {
    #[serde(default)]
    pub gira_id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default = "default_first_visit")]
    pub first_visit: bool,
    #[serde(default)]
    pub notes: Option<String>,
}

fn default_first_visit() -> bool {
    true
}

/// Outcome of a successful submission.
#[derive(Debug, Serialize)]
pub struct BookingConfirmation {
    pub booking: Booking,
    pub booked: i64,
    pub remaining: i64,
    pub message: &'static str,
}

pub const SUCCESS_MESSAGE: &str = "Seu agendamento foi realizado com sucesso para a gira ativa.";
pub const MISSING_NAME_MESSAGE: &str = "Por favor, preencha seu nome.";

/// Reasons the booking workflow turns a visitor away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingRejection {
    NoOpenGira,
    GiraClosed,
    SoldOut,
    Duplicate,
    Failed,
}

impl BookingRejection {
    pub fn code(&self) -> &'static str {
        match self {
            BookingRejection::NoOpenGira => "NO_OPEN_GIRA",
            BookingRejection::GiraClosed => "GIRA_CLOSED",
            BookingRejection::SoldOut => "SOLD_OUT",
            BookingRejection::Duplicate => "DUPLICATE",
            BookingRejection::Failed => "INTERNAL",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            BookingRejection::NoOpenGira => "No momento não há gira aberta para agendamento.",
            BookingRejection::GiraClosed => "Esta gira foi desativada no momento. Não é mais possível realizar agendamentos.",
            BookingRejection::SoldOut => "As vagas para esta gira já estão esgotadas. Escolha outra data ou aguarde a próxima abertura.",
            BookingRejection::Duplicate => "Já encontramos um agendamento em seu nome para esta gira. Caso precise ajustar algo, fale com a organização ao chegar.",
            BookingRejection::Failed => "Não foi possível concluir seu agendamento. Tente novamente em alguns instantes.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_optional_fields_become_none() {
        let booking = Booking::new(NewBookingParams {
            gira_id: "g".into(),
            name: "  Maria  ".into(),
            identity_key: "maria".into(),
            first_visit: true,
            phone: Some("   ".into()),
            email: Some("".into()),
            notes: Some(" cadeira de rodas ".into()),
        });
        assert_eq!(booking.name, "Maria");
        assert!(booking.phone.is_none());
        assert!(booking.email.is_none());
        assert_eq!(booking.notes.as_deref(), Some("cadeira de rodas"));
    }

    #[test]
    fn input_defaults_to_first_visit() {
        let input: BookingInput = serde_json::from_str(r#"{"name": "Ana"}"#).unwrap();
        assert!(input.first_visit);
        assert!(input.gira_id.is_none());
    }
}
