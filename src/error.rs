use arbe_events_shared::Error;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use validator::ValidationErrors;

pub const SERVER_ERROR_MESSAGE: &str = "An unexpected error occurred. Please try again later.";

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Domain(#[from] Error),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Internal server error")]
    InternalError(#[from] anyhow::Error),
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Domain(err.into())
    }
}

/// Flattens validator errors into their messages, field by field.
pub fn validation_messages(errors: &ValidationErrors) -> Vec<String> {
    let mut fields = errors.field_errors().into_iter().collect::<Vec<_>>();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    fields
        .into_iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| {
                error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid {field}."))
            })
        })
        .collect()
}

impl AppError {
    pub fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            AppError::Domain(Error::Validate(errors)) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                validation_messages(errors).join(" "),
            ),
            AppError::ValidationError(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg.to_owned()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.to_owned()),
            AppError::Domain(Error::NotFound(what)) => {
                (StatusCode::NOT_FOUND, format!("{what} not found"))
            }
            AppError::Domain(Error::Forbidden) => (
                StatusCode::FORBIDDEN,
                "You do not have permission to perform this action.".to_string(),
            ),
            AppError::Domain(Error::InvalidToken) => {
                (StatusCode::FORBIDDEN, "Security check failed".to_string())
            }
            AppError::Domain(Error::Server(e)) => {
                tracing::error!("Server error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    SERVER_ERROR_MESSAGE.to_string(),
                )
            }
            AppError::Domain(Error::Unknown(e)) | AppError::InternalError(e) => {
                tracing::error!("Internal error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    SERVER_ERROR_MESSAGE.to_string(),
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();

        (
            status,
            Json(json!({
                "success": false,
                "data": { "message": message },
            })),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (
                AppError::from(Error::NotFound("registration 4".to_string())),
                StatusCode::NOT_FOUND,
            ),
            (
                AppError::NotFound("No registrations to export.".to_string()),
                StatusCode::NOT_FOUND,
            ),
            (AppError::from(Error::Forbidden), StatusCode::FORBIDDEN),
            (AppError::from(Error::InvalidToken), StatusCode::FORBIDDEN),
            (
                AppError::ValidationError("Title is required.".to_string()),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                AppError::from(anyhow::anyhow!("disk full")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(error.status_and_message().0, expected);
        }
    }

    #[test]
    fn test_internal_message_is_generic() {
        let (_, message) = AppError::from(anyhow::anyhow!("disk full")).status_and_message();

        assert_eq!(message, SERVER_ERROR_MESSAGE);
    }

    #[test]
    fn test_invalid_token_message() {
        let (_, message) = AppError::from(Error::InvalidToken).status_and_message();

        assert_eq!(message, "Security check failed");
    }
}
