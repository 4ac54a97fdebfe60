use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde_json::Value;
use tracing::warn;

use super::dto::{validate_user_payload, ValidationErrors};
use super::repo_types::UserFields;

/// JSON body checked against the user payload rules before any handler runs.
pub struct ValidatedUser(pub UserFields);

#[async_trait]
impl<S> FromRequest<S> for ValidatedUser
where
    S: Send + Sync,
{
    type Rejection = ValidationErrors;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(body) = Json::<Value>::from_request(req, state)
            .await
            .map_err(|rejection: JsonRejection| {
                warn!(error = %rejection, "unreadable user payload");
                ValidationErrors::new(vec![rejection.body_text()])
            })?;

        let fields = validate_user_payload(&body).map_err(|errors| {
            warn!(errors = ?errors.message, "user payload failed validation");
            errors
        })?;

        Ok(ValidatedUser(fields))
    }
}
