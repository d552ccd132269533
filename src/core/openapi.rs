use utoipa::{Modify, OpenApi};

use crate::features::umkm::{dtos as umkm_dtos, handlers::api_handler};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // UMKM records (read-only JSON)
        api_handler::list_umkm,
        api_handler::get_umkm,
    ),
    components(
        schemas(
            ApiResponse<umkm_dtos::UmkmResponseDto>,
            ApiResponse<Vec<umkm_dtos::UmkmResponseDto>>,
            Meta,
            umkm_dtos::UmkmResponseDto,
        )
    ),
    tags(
        (name = "umkm", description = "UMKM survey records"),
    ),
    info(
        title = "UMKM Survey API",
        version = "0.1.0",
        description = "Read API for UMKM survey records",
    )
)]
pub struct ApiDoc;

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_umkm_paths() {
        let doc = ApiDoc::openapi();

        assert!(doc.paths.paths.contains_key("/api/umkm"));
        assert!(doc.paths.paths.contains_key("/api/umkm/{id}"));
    }

    #[test]
    fn test_info_modifier_overrides_title() {
        let mut doc = ApiDoc::openapi();
        SwaggerInfoModifier {
            title: "Survei".into(),
            version: "9.9.9".into(),
            description: "d".into(),
        }
        .modify(&mut doc);

        assert_eq!(doc.info.title, "Survei");
        assert_eq!(doc.info.version, "9.9.9");
    }
}
