use poem::http::StatusCode;
use poem_openapi::payload::Json;

use business::domain::errors::RepositoryError;
use business::domain::product::errors::ProductError;

use crate::api::error::{ErrorResponse, IntoErrorResponse};

impl IntoErrorResponse for ProductError {
    fn into_error_response(self) -> (StatusCode, Json<ErrorResponse>) {
        let (status, name, message) = match &self {
            ProductError::NotFound | ProductError::Repository(RepositoryError::NotFound) => {
                (StatusCode::NOT_FOUND, "NotFound", "product.not_found".to_string())
            }
            ProductError::Repository(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "DatabaseError",
                err.code().to_string(),
            ),
            validation => (
                StatusCode::BAD_REQUEST,
                "ValidationError",
                validation.to_string(),
            ),
        };

        (
            status,
            Json(ErrorResponse {
                name: name.to_string(),
                message,
            }),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_map_validation_errors_to_bad_request() {
        let (status, json) = ProductError::InvalidPrice.into_error_response();

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json.0.name, "ValidationError");
        assert_eq!(json.0.message, "product.invalid_price");
    }

    #[test]
    fn should_map_not_found_to_404() {
        let (status, json) = ProductError::NotFound.into_error_response();

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json.0.name, "NotFound");
    }

    #[test]
    fn should_expose_exhausted_retries_as_database_error() {
        let (status, json) =
            ProductError::Repository(RepositoryError::retries_exhausted(3)).into_error_response();

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json.0.name, "DatabaseError");
        assert_eq!(json.0.message, "repository.retries_exhausted");
    }
}
