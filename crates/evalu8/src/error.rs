use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use crate::workflows::screening::{
    AuditError, DataSourceError, RobustnessError, UnknownModelError,
};
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
    Audit(AuditError),
    Export(csv::Error),
    NoModelRun,
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::Audit(err) => write!(f, "audit error: {}", err),
            AppError::Export(err) => write!(f, "export error: {}", err),
            AppError::NoModelRun => write!(f, "no model has been run against the current batch"),
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
            AppError::Audit(err) => Some(err),
            AppError::Export(err) => Some(err),
            AppError::NoModelRun => None,
        }
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Audit(AuditError::UnknownModel(_))
            | AppError::Audit(AuditError::Robustness(_)) => StatusCode::BAD_REQUEST,
            AppError::Audit(AuditError::DataSource(DataSourceError::Io { .. })) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Audit(AuditError::DataSource(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::NoModelRun => StatusCode::CONFLICT,
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Server(_)
            | AppError::Export(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
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

impl From<AuditError> for AppError {
    fn from(value: AuditError) -> Self {
        Self::Audit(value)
    }
}

impl From<DataSourceError> for AppError {
    fn from(value: DataSourceError) -> Self {
        Self::Audit(value.into())
    }
}

impl From<UnknownModelError> for AppError {
    fn from(value: UnknownModelError) -> Self {
        Self::Audit(value.into())
    }
}

impl From<RobustnessError> for AppError {
    fn from(value: RobustnessError) -> Self {
        Self::Audit(value.into())
    }
}

impl From<csv::Error> for AppError {
    fn from(value: csv::Error) -> Self {
        Self::Export(value)
    }
}
