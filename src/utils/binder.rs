use axum::{
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
    Json,
};
use serde::{de::DeserializeOwned, Deserialize};
use validator::Validate;

use crate::utils::ApiError;

/// User identifier bound from the `{userId}` path segment.
///
/// The id is required: `0` is treated the same as a missing id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct IdMeta {
    #[serde(rename = "userId")]
    pub user_id: i64,
}

impl<S> FromRequestParts<S> for IdMeta
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(meta) = Path::<IdMeta>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ApiError::Validation(rejection.body_text()))?;
        if meta.user_id == 0 {
            return Err(ApiError::Validation("userId is required".to_string()));
        }
        Ok(meta)
    }
}

/// JSON body that is deserialized and then field-validated
///
/// The `Content-Type` header is not checked. Malformed JSON, a missing
/// required field and a failed field rule all surface as [ApiError::Validation].
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::Validation(rejection.body_text()))?;
        let Json(value) = Json::<T>::from_bytes(&bytes)
            .map_err(|rejection| ApiError::Validation(rejection.body_text()))?;
        value.validate()?;
        Ok(ValidatedJson(value))
    }
}
