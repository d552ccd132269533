use axum::{
    extract::{
        multipart::MultipartRejection, rejection::PathRejection, FromRequest, FromRequestParts,
        Multipart, Path, Request,
    },
    http::request::Parts,
    response::{IntoResponse, Response},
};

use crate::core::error::AppError;

/// Multipart extractor that rejects with the structured error body
pub struct AppMultipart(pub Multipart);

impl<S> FromRequest<S> for AppMultipart
where
    S: Send + Sync,
{
    type Rejection = AppMultipartRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Multipart::from_request(req, state).await {
            Ok(multipart) => Ok(Self(multipart)),
            Err(rejection) => Err(AppMultipartRejection(rejection)),
        }
    }
}

pub struct AppMultipartRejection(MultipartRejection);

impl IntoResponse for AppMultipartRejection {
    fn into_response(self) -> Response {
        let message = match self.0 {
            MultipartRejection::InvalidBoundary(err) => {
                format!("Expected multipart/form-data: {}", err)
            }
            _ => "Failed to parse multipart form".to_string(),
        };

        AppError::BadRequest(message).into_response()
    }
}

/// Record id taken from the path; anything that isn't an integer names no record
pub struct RecordId(pub i64);

impl<S> FromRequestParts<S> for RecordId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<String>::from_request_parts(parts, state).await {
            Ok(Path(raw)) => raw
                .parse::<i64>()
                .map(Self)
                .map_err(|_| AppError::NotFound(format!("UMKM record '{}' not found", raw))),
            Err(rejection) => Err(path_rejection(rejection)),
        }
    }
}

fn path_rejection(rejection: PathRejection) -> AppError {
    AppError::BadRequest(format!("Invalid path: {}", rejection.body_text()))
}
