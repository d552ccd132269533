use std::sync::Arc;

use axum::{extract::State, Json};

use crate::core::error::{AppError, Result};
use crate::core::extractor::RecordId;
use crate::features::umkm::dtos::UmkmResponseDto;
use crate::features::umkm::services::UmkmService;
use crate::shared::types::{ApiResponse, Meta};

/// List all UMKM records
///
/// Records are ordered newest first regardless of the storage backend.
#[utoipa::path(
    get,
    path = "/api/umkm",
    responses(
        (status = 200, description = "List of UMKM records", body = ApiResponse<Vec<UmkmResponseDto>>),
        (status = 500, description = "Storage backend unavailable")
    ),
    tag = "umkm"
)]
pub async fn list_umkm(
    State(service): State<Arc<UmkmService>>,
) -> Result<Json<ApiResponse<Vec<UmkmResponseDto>>>> {
    let records: Vec<UmkmResponseDto> = service
        .list()
        .await
        .map_err(AppError::on_read)?
        .into_iter()
        .map(Into::into)
        .collect();

    let meta = Meta {
        total: records.len() as i64,
    };
    Ok(Json(ApiResponse::success(Some(records), None, Some(meta))))
}

/// Get a UMKM record by id
#[utoipa::path(
    get,
    path = "/api/umkm/{id}",
    params(
        ("id" = i64, Path, description = "Record id")
    ),
    responses(
        (status = 200, description = "Record found", body = ApiResponse<UmkmResponseDto>),
        (status = 404, description = "Record not found")
    ),
    tag = "umkm"
)]
pub async fn get_umkm(
    State(service): State<Arc<UmkmService>>,
    RecordId(id): RecordId,
) -> Result<Json<ApiResponse<UmkmResponseDto>>> {
    let record = service.get(id).await?;
    Ok(Json(ApiResponse::success(Some(record.into()), None, None)))
}
