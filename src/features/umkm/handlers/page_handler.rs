use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderName},
    response::{Html, Redirect},
};
use minijinja::context;

use crate::core::error::{AppError, Result};
use crate::core::extractor::{AppMultipart, RecordId};
use crate::features::umkm::dtos::{UmkmResponseDto, UmkmSubmission};
use crate::features::umkm::services::UmkmService;
use crate::shared::constants::EXPORT_FILENAME;
use crate::shared::templates::render_page;

/// Where every successful write sends the browser
const LIST_PAGE: &str = "/data";

/// Render the survey input form
pub async fn index_page() -> Result<Html<String>> {
    Ok(Html(render_page("index.html", context! {})?))
}

/// Create a record from the multipart survey form
pub async fn submit(
    State(service): State<Arc<UmkmService>>,
    AppMultipart(multipart): AppMultipart,
) -> Result<Redirect> {
    let submission = UmkmSubmission::from_multipart(multipart).await?;
    service.create(submission.form, submission.photo).await?;
    Ok(Redirect::to(LIST_PAGE))
}

/// Render all records, newest first
pub async fn data_page(State(service): State<Arc<UmkmService>>) -> Result<Html<String>> {
    let records: Vec<UmkmResponseDto> = service
        .list()
        .await
        .map_err(AppError::on_read)?
        .into_iter()
        .map(Into::into)
        .collect();

    Ok(Html(render_page("data.html", context! { records => records })?))
}

/// Download every record as CSV
pub async fn export_csv(
    State(service): State<Arc<UmkmService>>,
) -> Result<([(HeaderName, String); 2], Vec<u8>)> {
    let csv = service.export_csv().await.map_err(AppError::on_read)?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", EXPORT_FILENAME),
            ),
        ],
        csv,
    ))
}

/// Render the edit form pre-filled with the record
pub async fn edit_page(
    State(service): State<Arc<UmkmService>>,
    RecordId(id): RecordId,
) -> Result<Html<String>> {
    let record = UmkmResponseDto::from(service.get(id).await?);
    Ok(Html(render_page("edit.html", context! { record => record })?))
}

/// Update a record, replacing its photo only when a new one is uploaded
pub async fn edit_submit(
    State(service): State<Arc<UmkmService>>,
    RecordId(id): RecordId,
    AppMultipart(multipart): AppMultipart,
) -> Result<Redirect> {
    let submission = UmkmSubmission::from_multipart(multipart).await?;
    service.update(id, submission.form, submission.photo).await?;
    Ok(Redirect::to(LIST_PAGE))
}

/// Delete a record and its photo
pub async fn delete(
    State(service): State<Arc<UmkmService>>,
    RecordId(id): RecordId,
) -> Result<Redirect> {
    service.delete(id).await?;
    Ok(Redirect::to(LIST_PAGE))
}
