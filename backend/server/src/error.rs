use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use contract::{ErrorBody, MISSING_CAR_MODEL_CODE};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("carModel is required in the request body")]
    MissingCarModel,

    #[error("AI service configuration error on server")]
    GenerativeUnconfigured,

    #[error("Too many requests, please try again later")]
    RateLimited,

    #[error("Internal error: {0}")]
    InternalError(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = match self {
            AppError::MissingCarModel => (StatusCode::BAD_REQUEST, Some(MISSING_CAR_MODEL_CODE)),
            AppError::RateLimited => (StatusCode::TOO_MANY_REQUESTS, None),
            AppError::GenerativeUnconfigured | AppError::InternalError { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, None)
            }
        };

        let body = ErrorBody {
            error: self.to_string(),
            code: code.map(str::to_string),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_model_maps_to_400_with_code() {
        let response = AppError::MissingCarModel.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn unconfigured_maps_to_500() {
        let response = AppError::GenerativeUnconfigured.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn rate_limited_maps_to_429() {
        let response = AppError::RateLimited.into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    }
}
