use crate::config::ConfigError;
use crate::diagnostic::{DiagnosticServiceError, ParseAnswerError};
use crate::telemetry::TelemetryError;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Server(axum::Error),
    Input(ParseAnswerError),
    Payload(JsonRejection),
    Diagnostic(DiagnosticServiceError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::Input(err) => write!(f, "invalid input: {}", err),
            AppError::Payload(err) => write!(f, "invalid request body: {}", err.body_text()),
            AppError::Diagnostic(err) => write!(f, "diagnostic error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
            AppError::Input(err) => Some(err),
            AppError::Payload(err) => Some(err),
            AppError::Diagnostic(err) => Some(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Input(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Payload(rejection) => rejection.status(),
            AppError::Diagnostic(err) => err.status_code(),
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::warn!(error = %self, "request failed");
        }
        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}

impl From<ParseAnswerError> for AppError {
    fn from(value: ParseAnswerError) -> Self {
        Self::Input(value)
    }
}

impl From<JsonRejection> for AppError {
    fn from(value: JsonRejection) -> Self {
        Self::Payload(value)
    }
}

impl From<DiagnosticServiceError> for AppError {
    fn from(value: DiagnosticServiceError) -> Self {
        Self::Diagnostic(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::{SessionError, StoreError};

    #[test]
    fn statuses_follow_the_wrapped_error() {
        let cases = [
            (
                AppError::Input(ParseAnswerError::UnknownQuestion("Q2".to_string())),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                AppError::Diagnostic(SessionError::AlreadyFinal.into()),
                StatusCode::CONFLICT,
            ),
            (
                AppError::Diagnostic(StoreError::NotFound.into()),
                StatusCode::NOT_FOUND,
            ),
            (
                AppError::Diagnostic(StoreError::Capacity(8).into()),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }

    #[test]
    fn input_errors_name_the_bad_token() {
        let err = AppError::from(ParseAnswerError::UnknownValue("maybe".to_string()));
        assert_eq!(err.to_string(), "invalid input: unknown answer 'maybe'");
    }
}
