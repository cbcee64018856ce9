use poem::http::StatusCode;
use poem_openapi::{Object, payload::Json};

/// Error body returned by every endpoint.
///
/// `name` is the error kind (`ValidationError`, `NotFound`, `DatabaseError`,
/// `InternalError`); `message` is a code-style identifier.
#[derive(Object, Debug)]
pub struct ErrorResponse {
    pub name: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn invalid_id() -> Json<Self> {
        Json(Self {
            name: "ValidationError".to_string(),
            message: "product.invalid_id".to_string(),
        })
    }
}

pub trait IntoErrorResponse {
    fn into_error_response(self) -> (StatusCode, Json<ErrorResponse>);
}
