use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UserError {
    #[error("User {0} not found")]
    NotFound(u64),

    #[error("User must be at least {min_age} years old")]
    UnderAge { min_age: u32 },

    #[error("'From' date must be less than 'To' date")]
    InvalidDateRange { from: NaiveDate, to: NaiveDate },

    /// Storage failure; the message is logged, never sent to clients
    #[error("Internal error: {0}")]
    Internal(String),
}

pub type UserResult<T> = Result<T, UserError>;

/// Convert UserError to AppError for standardized error responses
impl From<UserError> for AppError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound(_) => AppError::NotFound(err.to_string()),
            UserError::UnderAge { .. } | UserError::InvalidDateRange { .. } => {
                AppError::UnprocessableEntity(err.to_string())
            }
            UserError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for UserError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
