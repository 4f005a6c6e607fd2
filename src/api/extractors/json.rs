use axum::{
    extract::{FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use tracing::debug;
use crate::error::AppError;

pub const INVALID_BODY_MESSAGE: &str = "Dados inválidos. Verifique as informações enviadas.";

/// `Json` whose rejection answers with the regular `{"error","code"}` body.
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(JsonBody(value)),
            Err(rejection) => {
                debug!(reason = %rejection.body_text(), "Rejected JSON body");
                Err(AppError::Validation(INVALID_BODY_MESSAGE.into()))
            }
        }
    }
}
