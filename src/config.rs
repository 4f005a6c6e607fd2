use std::env;
use chrono_tz::Tz;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub jwt_secret_key: String, // Private key (PEM)
    pub jwt_public_key: String, // Public key (PEM)
    pub auth_issuer: String,
    pub staff_session_minutes: i64,
    pub display_timezone: Tz,
    pub admin_username: Option<String>,
    pub admin_password: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            port: env::var("PORT").unwrap_or_else(|_| "3000".to_string()).parse().expect("PORT must be a number"),
            jwt_secret_key: env::var("JWT_SECRET_KEY").expect("JWT_SECRET_KEY must be set (Ed25519 Private Key)"),
            jwt_public_key: env::var("JWT_PUBLIC_KEY").expect("JWT_PUBLIC_KEY must be set (Ed25519 Public Key)"),
            auth_issuer: env::var("AUTH_ISSUER").unwrap_or_else(|_| "https://agendamento.tuluz.local".to_string()),
            staff_session_minutes: env::var("STAFF_SESSION_MINUTES")
                .unwrap_or_else(|_| "480".to_string())
                .parse()
                .expect("STAFF_SESSION_MINUTES must be a number"),
            display_timezone: env::var("DISPLAY_TIMEZONE")
                .unwrap_or_else(|_| "America/Sao_Paulo".to_string())
                .parse()
                .expect("DISPLAY_TIMEZONE must be an IANA timezone name"),
            admin_username: env::var("ADMIN_USERNAME").ok().filter(|v| !v.trim().is_empty()),
            admin_password: env::var("ADMIN_PASSWORD").ok().filter(|v| !v.is_empty()),
        }
    }
}
