//! Error API dan envelope respons `{success, message, data|errors}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};
use thiserror::Error;

use crate::store::StoreError;
use crate::validation::ValidationErrors;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Validasi gagal")]
    Validation(ValidationErrors),

    #[error("Data UMKM tidak ditemukan")]
    NotFound,

    #[error("Route tidak ditemukan")]
    RouteNotFound,

    #[error("{0}")]
    BadRequest(String),

    /// Gagal di lapisan penyimpanan; `message` tampil ke client.
    #[error("{message}")]
    Store {
        message: &'static str,
        #[source]
        source: StoreError,
    },
}

impl ApiError {
    pub fn store(message: &'static str) -> impl FnOnce(StoreError) -> ApiError {
        move |source| ApiError::Store { message, source }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound | ApiError::RouteNotFound => StatusCode::NOT_FOUND,
            ApiError::Store { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn errors(&self) -> Option<Value> {
        match self {
            ApiError::Validation(errors) => Some(json!(errors)),
            ApiError::Store { source: StoreError::ConstraintViolation { field, message }, .. } => {
                Some(json!({ field: [message] }))
            }
            ApiError::Store { .. } => Some(json!({ "database": ["Terjadi kesalahan pada server."] })),
            _ => None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Store { source, .. } => tracing::error!(error = %source, "{}", self),
            ApiError::Validation(errors) => tracing::debug!(?errors, "Validasi gagal"),
            _ => {}
        }

        let mut body = json!({
            "success": false,
            "message": self.to_string(),
        });
        if let Some(errors) = self.errors() {
            body["errors"] = errors;
        }

        (self.status_code(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::NotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::BadRequest("x".into()).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::Validation(ValidationErrors::default()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::store("Gagal menambahkan data UMKM")(StoreError::NotFound).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_constraint_violation_lists_field() {
        let err = ApiError::store("Gagal menambahkan data UMKM")(StoreError::duplicate_name());
        assert_eq!(err.to_string(), "Gagal menambahkan data UMKM");
        assert_eq!(
            err.errors(),
            Some(json!({ "nama_umkm": ["nama_umkm sudah digunakan."] }))
        );
    }

    #[test]
    fn test_not_found_has_no_errors_field() {
        assert_eq!(ApiError::NotFound.errors(), None);
    }
}
