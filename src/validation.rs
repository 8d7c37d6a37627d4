use async_trait::async_trait;
use axum::{
    extract::{rejection::JsonRejection, FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
    Json,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tracing::debug;

use crate::shared::AppError;

/// Field-level validation failures
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{field} must be a positive integer, got {value}")]
    NotPositive { field: &'static str, value: i64 },

    #[error("{field} must not be empty")]
    Empty { field: &'static str },

    #[error("{field} is invalid: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Integer identifier that is strictly greater than zero
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct PositiveId(i64);

impl PositiveId {
    pub fn new(value: i64) -> Result<Self, ValidationError> {
        Self::for_field("id", value)
    }

    /// Validates `value`, naming `field` in the error
    pub fn for_field(field: &'static str, value: i64) -> Result<Self, ValidationError> {
        if value > 0 {
            Ok(Self(value))
        } else {
            Err(ValidationError::NotPositive { field, value })
        }
    }

    pub fn get(self) -> i64 {
        self.0
    }
}

impl TryFrom<i64> for PositiveId {
    type Error = ValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PositiveId> for i64 {
    fn from(id: PositiveId) -> Self {
        id.0
    }
}

impl fmt::Display for PositiveId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Text that contains at least one non-whitespace character
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NonEmptyName(String);

impl NonEmptyName {
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(ValidationError::Empty { field: "name" });
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl TryFrom<String> for NonEmptyName {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<NonEmptyName> for String {
    fn from(name: NonEmptyName) -> Self {
        name.0
    }
}

impl fmt::Display for NonEmptyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// JSON body extractor that reports decoding failures as `AppError`
///
/// Shape errors (missing fields, wrong types, failed `PositiveId`/`NonEmptyName`
/// checks) become `AppError::Validation`; anything else that stops the body from
/// being read becomes `AppError::BadRequest`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => {
                debug!(error = %rejection.body_text(), "Rejected request body");
                Err(AppError::from(rejection))
            }
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonDataError(e) => AppError::Validation(e.body_text()),
            other => AppError::BadRequest(other.body_text()),
        }
    }
}

/// Path extractor for a single `:id` segment that must be a `PositiveId`
#[derive(Debug, Clone, Copy)]
pub struct IdPath(pub PositiveId);

#[async_trait]
impl<S> FromRequestParts<S> for IdPath
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw): Path<String> = Path::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;

        let value: i64 = raw.parse().map_err(|_| ValidationError::Invalid {
            field: "id",
            reason: format!("'{}' is not an integer", raw),
        })?;

        Ok(Self(PositiveId::new(value)?))
    }
}
