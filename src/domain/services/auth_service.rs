use std::sync::Arc;
use crate::domain::{
    models::{auth::Claims, staff::StaffUser},
    ports::StaffRepository,
};
use crate::error::AppError;
use crate::config::Config;
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;
use chrono::{Utc, Duration};
use rand::{distributions::Alphanumeric, Rng};
use tracing::{error, info};

pub const AUDIENCE: &str = "tuluz-staff";

/// Staff sign-in: argon2 password check and short-lived EdDSA session tokens.
pub struct AuthService {
    repo: Arc<dyn StaffRepository>,
    config: Config,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl AuthService {
    pub fn new(repo: Arc<dyn StaffRepository>, config: Config) -> Result<Self, AppError> {
        let encoding_key = EncodingKey::from_ed_pem(config.jwt_secret_key.as_bytes())
            .map_err(|e| AppError::InternalWithMsg(format!("Invalid JWT private key PEM: {}", e)))?;
        let decoding_key = DecodingKey::from_ed_pem(config.jwt_public_key.as_bytes())
            .map_err(|e| AppError::InternalWithMsg(format!("Invalid JWT public key PEM: {}", e)))?;

        Ok(Self { repo, config, encoding_key, decoding_key })
    }

    /// Checks the credentials and returns the staff member with a fresh `(access_jwt, csrf_token)` pair.
    pub async fn login(&self, username: &str, password: &str) -> Result<(StaffUser, String, String), AppError> {
        let user = self.repo.find_by_username(username.trim()).await?
            .ok_or(AppError::Unauthorized)?;

        let parsed_hash = PasswordHash::new(&user.password_hash)
            .map_err(|_| AppError::Internal)?;

        Argon2::default().verify_password(password.as_bytes(), &parsed_hash)
            .map_err(|_| AppError::Unauthorized)?;

        let (access_token, csrf_token) = self.issue_token(&user)?;
        info!("Staff member logged in: {}", user.id);
        Ok((user, access_token, csrf_token))
    }

    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        let mut validation = Validation::new(Algorithm::EdDSA);
        validation.set_audience(&[AUDIENCE]);
        validation.set_issuer(&[self.config.auth_issuer.as_str()]);

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|_| AppError::Unauthorized)
    }

    /// Creates the configured bootstrap account when it does not exist yet.
    pub async fn ensure_staff_account(&self, username: &str, password: &str) -> Result<(), AppError> {
        if self.repo.find_by_username(username).await?.is_some() {
            return Ok(());
        }
        let user = StaffUser::new(username.to_string(), hash_password(password)?);
        self.repo.create(&user).await?;
        info!("Created staff account '{}'", username);
        Ok(())
    }

    pub fn session_minutes(&self) -> i64 {
        self.config.staff_session_minutes
    }

    fn issue_token(&self, user: &StaffUser) -> Result<(String, String), AppError> {
        let csrf_token: String = rand::thread_rng().sample_iter(&Alphanumeric).take(32).map(char::from).collect();
        let now = Utc::now();
        let exp = (now + Duration::minutes(self.config.staff_session_minutes)).timestamp() as usize;

        let claims = Claims {
            iss: self.config.auth_issuer.clone(),
            sub: user.id.clone(),
            aud: AUDIENCE.to_string(),
            exp,
            iat: now.timestamp() as usize,
            jti: Uuid::new_v4().to_string(),
            username: user.username.clone(),
            csrf_token: csrf_token.clone(),
        };

        let access_token = encode(&Header::new(Algorithm::EdDSA), &claims, &self.encoding_key)
            .map_err(|e| {
                error!("JWT encoding failed: {}", e);
                AppError::Internal
            })?;

        Ok((access_token, csrf_token))
    }
}

pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::InternalWithMsg(format!("Password hashing failed: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashed_password_verifies() {
        let hash = hash_password("axé").unwrap();
        let parsed = PasswordHash::new(&hash).unwrap();
        assert!(Argon2::default().verify_password("axé".as_bytes(), &parsed).is_ok());
        assert!(Argon2::default().verify_password("axe".as_bytes(), &parsed).is_err());
    }
}
