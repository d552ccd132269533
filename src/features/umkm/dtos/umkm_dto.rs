use axum::extract::Multipart;
use serde::{Deserialize, Serialize};
use tracing::debug;
use utoipa::ToSchema;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::features::umkm::models::{Umkm, UmkmFields};
use crate::shared::constants::UPLOADS_URL_PREFIX;
use crate::shared::validation::non_blank;

/// Text fields of the survey form, as submitted
#[derive(Debug, Default, Clone, Deserialize, Validate)]
pub struct UmkmForm {
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    #[validate(length(min = 1, message = "nama is required"))]
    pub nama: String,
    #[validate(length(min = 1, message = "nim is required"))]
    pub nim: String,
    #[validate(length(min = 1, message = "kelas is required"))]
    pub kelas: String,
    #[validate(length(min = 1, message = "umkm is required"))]
    pub umkm: String,
    #[validate(length(min = 1, message = "kategori is required"))]
    pub kategori: String,
    #[validate(length(min = 1, message = "pegawai is required"))]
    pub pegawai: String,
}

impl UmkmForm {
    /// Validate required fields and produce trimmed record fields
    pub fn into_fields(self) -> Result<UmkmFields> {
        let form = Self {
            latitude: non_blank(self.latitude),
            longitude: non_blank(self.longitude),
            nama: self.nama.trim().to_string(),
            nim: self.nim.trim().to_string(),
            kelas: self.kelas.trim().to_string(),
            umkm: self.umkm.trim().to_string(),
            kategori: self.kategori.trim().to_string(),
            pegawai: self.pegawai.trim().to_string(),
        };

        form.validate().map_err(|e| {
            let mut messages: Vec<String> = e
                .field_errors()
                .into_iter()
                .flat_map(|(field, errors)| {
                    errors.iter().map(move |err| {
                        err.message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| format!("{} is invalid", field))
                    })
                })
                .collect();
            messages.sort();
            AppError::Validation(messages)
        })?;

        Ok(UmkmFields {
            latitude: form.latitude,
            longitude: form.longitude,
            nama: form.nama,
            nim: form.nim,
            kelas: form.kelas,
            umkm: form.umkm,
            kategori: form.kategori,
            pegawai: form.pegawai,
        })
    }
}

/// An uploaded photo, not yet stored
#[derive(Debug, Clone)]
pub struct UploadedPhoto {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// A parsed multipart survey submission
#[derive(Debug, Default)]
pub struct UmkmSubmission {
    pub form: UmkmForm,
    pub photo: Option<UploadedPhoto>,
}

impl UmkmSubmission {
    /// Read all fields of a multipart survey form
    ///
    /// A `foto` part without a filename or without content is treated as
    /// "no photo chosen", which is what browsers send for an empty file input.
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self> {
        let mut submission = Self::default();

        while let Some(field) = multipart.next_field().await.map_err(|e| {
            debug!("Failed to read multipart field: {}", e);
            AppError::BadRequest(format!("Failed to read multipart data: {}", e))
        })? {
            let field_name = field.name().unwrap_or("").to_string();

            if field_name == "foto" {
                let filename = field.file_name().unwrap_or("").to_string();
                let data = field.bytes().await.map_err(|e| {
                    debug!("Failed to read photo bytes: {}", e);
                    AppError::BadRequest(format!("Failed to read photo data: {}", e))
                })?;

                if !filename.is_empty() && !data.is_empty() {
                    submission.photo = Some(UploadedPhoto {
                        filename,
                        bytes: data.to_vec(),
                    });
                }
                continue;
            }

            let text = field.text().await.map_err(|e| {
                AppError::BadRequest(format!("Failed to read field '{}': {}", field_name, e))
            })?;

            let form = &mut submission.form;
            match field_name.as_str() {
                "latitude" => form.latitude = Some(text),
                "longitude" => form.longitude = Some(text),
                "nama" => form.nama = text,
                "nim" => form.nim = text,
                "kelas" => form.kelas = text,
                "umkm" => form.umkm = text,
                "kategori" => form.kategori = text,
                "pegawai" => form.pegawai = text,
                _ => debug!("Ignoring unknown field: {}", field_name),
            }
        }

        Ok(submission)
    }
}

/// Response DTO for a UMKM record
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UmkmResponseDto {
    pub id: i64,
    #[schema(example = "-6.2088")]
    pub latitude: Option<String>,
    #[schema(example = "106.8456")]
    pub longitude: Option<String>,
    #[schema(example = "Budi")]
    pub nama: String,
    #[schema(example = "123")]
    pub nim: String,
    #[schema(example = "A")]
    pub kelas: String,
    #[schema(example = "Warung")]
    pub umkm: String,
    #[schema(example = "Makanan")]
    pub kategori: String,
    #[schema(example = "2")]
    pub pegawai: String,
    /// Stored photo filename
    #[schema(example = "20250101_120000_photo.jpg")]
    pub foto: Option<String>,
    /// Path under which the photo is served
    #[schema(example = "/uploads/20250101_120000_photo.jpg")]
    pub foto_url: Option<String>,
}

impl From<Umkm> for UmkmResponseDto {
    fn from(u: Umkm) -> Self {
        let foto_url = u
            .foto
            .as_ref()
            .map(|name| format!("{}/{}", UPLOADS_URL_PREFIX, name));

        Self {
            id: u.id,
            latitude: u.latitude,
            longitude: u.longitude,
            nama: u.nama,
            nim: u.nim,
            kelas: u.kelas,
            umkm: u.umkm,
            kategori: u.kategori,
            pegawai: u.pegawai,
            foto: u.foto,
            foto_url,
        }
    }
}
