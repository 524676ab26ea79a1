use axum::response::{IntoResponse, Response};
use flick_dal::movie::ListError;
use http::{Method, StatusCode};
use tracing::{debug, error};

use crate::rest_api::{decode::DecodeError, envelope::envelope};

pub type ApiResult<T> = std::result::Result<T, ApiError>;

const NOT_FOUND_MESSAGE: &str = "the requested resource could not be found";
const SERVER_ERROR_MESSAGE: &str =
    "the server encountered a problem and could not process your request";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("DAL error: {0}")]
    DalError(#[from] flick_dal::Error),

    #[error("Invalid request body: {0}")]
    InvalidBody(#[from] DecodeError),

    #[error("Resource not found")]
    ResourceNotFound,

    #[error("Method {0} not allowed")]
    MethodNotAllowed(Method),
}

impl From<ListError> for ApiError {
    fn from(value: ListError) -> Self {
        debug!("Discarding {} rows listed before failure", value.partial.len());
        ApiError::DalError(value.source)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::DalError(flick_dal::Error::RecordNotFound(entity)) => {
                debug!("Record not found: {entity}");
                envelope("error", NOT_FOUND_MESSAGE)
                    .with_status(StatusCode::NOT_FOUND)
                    .into_response()
            }
            ApiError::DalError(flick_dal::Error::DatabaseError(e)) => {
                error!("Database error: {e}");
                envelope("error", SERVER_ERROR_MESSAGE)
                    .with_status(StatusCode::INTERNAL_SERVER_ERROR)
                    .into_response()
            }
            ApiError::InvalidBody(e) => envelope("error", e.to_string())
                .with_status(StatusCode::BAD_REQUEST)
                .into_response(),
            ApiError::ResourceNotFound => envelope("error", NOT_FOUND_MESSAGE)
                .with_status(StatusCode::NOT_FOUND)
                .into_response(),
            ApiError::MethodNotAllowed(method) => envelope(
                "error",
                format!("the {method} method is not supported for this resource"),
            )
            .with_status(StatusCode::METHOD_NOT_ALLOWED)
            .into_response(),
        }
    }
}

pub async fn not_found() -> ApiError {
    ApiError::ResourceNotFound
}

pub async fn method_not_allowed(method: Method) -> ApiError {
    ApiError::MethodNotAllowed(method)
}
