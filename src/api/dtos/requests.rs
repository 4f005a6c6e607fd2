use serde::Deserialize;
use crate::domain::models::booking::BookingInput;

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct CreateGiraRequest {
    pub title: Option<String>,
    pub date: String,
    pub capacity: i32,
    pub kind: Option<String>,
    pub active: Option<bool>,
}

#[derive(Deserialize)]
pub struct UpdateGiraRequest {
    pub date: Option<String>,
    pub capacity: Option<i32>,
    pub title: Option<String>,
    pub kind: Option<String>,
    pub active: Option<bool>,
}

/// Form-encoded body of the public booking pages.
#[derive(Deserialize, Default, Clone)]
#[serde(default)]
pub struct BookingFormRequest {
    pub gira_id: Option<String>,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    /// "sim" or "nao"
    pub first_visit: Option<String>,
    pub notes: Option<String>,
}

impl BookingFormRequest {
    pub fn first_visit(&self) -> bool {
        self.first_visit.as_deref() != Some("nao")
    }

    pub fn to_input(&self) -> BookingInput {
        BookingInput {
            gira_id: self.gira_id.clone().filter(|id| !id.trim().is_empty()),
            name: self.name.clone(),
            phone: self.phone.clone(),
            email: self.email.clone(),
            first_visit: self.first_visit(),
            notes: self.notes.clone(),
        }
    }
}

#[derive(Deserialize)]
pub struct AdminLoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Deserialize, Default)]
pub struct AdminPageQuery {
    pub gira: Option<String>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
pub struct AdminLogoutForm {
    pub csrf_token: String,
}
