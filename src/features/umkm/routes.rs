use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::path::Path;
use std::sync::Arc;
use tower_http::services::ServeDir;

use crate::features::umkm::handlers::{api_handler, page_handler};
use crate::features::umkm::services::UmkmService;
use crate::shared::constants::UPLOADS_URL_PREFIX;

/// Create routes for the UMKM feature
///
/// HTML form pages, the CSV export, the JSON read API and the stored photos.
pub fn routes(service: Arc<UmkmService>, upload_dir: &Path, max_body_size: usize) -> Router {
    Router::new()
        .route("/", get(page_handler::index_page))
        .route("/submit", post(page_handler::submit))
        .route("/data", get(page_handler::data_page))
        .route("/export", get(page_handler::export_csv))
        .route(
            "/edit/{id}",
            get(page_handler::edit_page).post(page_handler::edit_submit),
        )
        .route("/delete/{id}", post(page_handler::delete))
        .route("/api/umkm", get(api_handler::list_umkm))
        .route("/api/umkm/{id}", get(api_handler::get_umkm))
        .layer(DefaultBodyLimit::max(max_body_size))
        .with_state(service)
        .nest_service(UPLOADS_URL_PREFIX, ServeDir::new(upload_dir))
}
