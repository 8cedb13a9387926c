pub mod gallery;
pub use gallery::GalleryService;

use crate::api::models::ApiResponse;
use axum::{Json, http::StatusCode, response::IntoResponse};

pub struct AppError(pub common::Error);

impl AppError {
    pub fn bad_request(message: String) -> Self {
        AppError(common::Error::InvalidInput(message))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status_code = match self.0 {
            common::Error::InvalidInput(_) => StatusCode::BAD_REQUEST,
            common::Error::TokenNotListed(_) => StatusCode::NOT_FOUND,
            common::Error::ChainUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            common::Error::FetchTimeout(_)
            | common::Error::FetchHttp(_)
            | common::Error::FetchParse(_)
            | common::Error::InvalidPointer(_)
            | common::Error::MissingImage(_)
            | common::Error::MissingName(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(ApiResponse::<()>::error(self.0.to_string()));
        (status_code, body).into_response()
    }
}

impl From<common::Error> for AppError {
    fn from(err: common::Error) -> Self {
        AppError(err)
    }
}
