use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use fleetops_core::{FailureCause, FailureKind, ServiceError};

/// Application-level error type for HTTP handlers.
///
/// Wraps [`ServiceError`] for classified domain failures and adds
/// HTTP-specific variants. Implements [`IntoResponse`] to produce consistent
/// JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A classified failure from the foundation layer, already logged where
    /// it was classified.
    #[error(transparent)]
    Service(#[from] ServiceError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Service(err) => service_error_response(&err),
            AppError::BadRequest(msg) => {
                let body = json!({
                    "error": msg,
                    "code": "BAD_REQUEST",
                });
                (StatusCode::BAD_REQUEST, axum::Json(body)).into_response()
            }
        }
    }
}

/// Map a classified failure onto an HTTP response.
///
/// The kind alone picks the status class; the not-found flavour of a
/// validation failure gets 404 instead of 400. Internal failure detail is
/// never echoed to the client.
fn service_error_response(err: &ServiceError) -> Response {
    let (status, code, message) = match err.kind() {
        FailureKind::Validation if err.is_not_found() => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("{} not found", err.entity()),
        ),
        FailureKind::Validation => (
            StatusCode::BAD_REQUEST,
            "VALIDATION_ERROR",
            err.cause().to_string(),
        ),
        FailureKind::DependencyValidation => {
            (StatusCode::CONFLICT, "CONFLICT", err.cause().to_string())
        }
        FailureKind::Dependency | FailureKind::CriticalDependency | FailureKind::Service => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "INTERNAL_ERROR",
            "An internal error occurred".to_string(),
        ),
    };

    let mut body = json!({
        "error": message,
        "code": code,
    });
    if let FailureCause::Invalid(report) = err.cause() {
        if let Ok(violations) = serde_json::to_value(report.violations()) {
            body["violations"] = violations;
        }
    }

    (status, axum::Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use fleetops_core::{StorageError, StorageErrorKind, ValidationReport};
    use uuid::Uuid;

    use super::*;

    fn response_for(cause: FailureCause) -> Response {
        AppError::from(ServiceError::new("Car", cause)).into_response()
    }

    #[test]
    fn invalid_input_maps_to_bad_request() {
        let mut report = ValidationReport::new();
        report.add("plate_number", "value is required");

        let response = response_for(FailureCause::Invalid(report));
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn not_found_maps_to_404() {
        let response = response_for(FailureCause::NotFound(Uuid::nil()));
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn storage_conflicts_map_to_409() {
        for kind in [
            StorageErrorKind::UniqueConflict,
            StorageErrorKind::ConcurrencyConflict,
        ] {
            let response =
                response_for(FailureCause::Storage(StorageError::new(kind, "conflict")));
            assert_eq!(response.status(), StatusCode::CONFLICT, "{kind:?}");
        }
    }

    #[test]
    fn storage_faults_map_to_500() {
        for kind in [
            StorageErrorKind::Other,
            StorageErrorKind::ConnectivityFailure,
            StorageErrorKind::Unexpected,
        ] {
            let response = response_for(FailureCause::Storage(StorageError::new(kind, "boom")));
            assert_eq!(
                response.status(),
                StatusCode::INTERNAL_SERVER_ERROR,
                "{kind:?}"
            );
        }
    }

    #[test]
    fn service_error_converts_and_displays_transparently() {
        // The From conversion is what every handler's `?` relies on; the
        // wrapped failure's message must survive unchanged.
        let err: AppError = ServiceError::new("Car", FailureCause::NotFound(Uuid::nil())).into();
        assert!(err.to_string().contains("Car"));
        assert!(err.to_string().contains("validation"));
    }

    #[test]
    fn bad_request_variant_maps_to_400() {
        let response = AppError::BadRequest("path and body id differ".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
