use std::io::ErrorKind;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::core::error::{AppError, Result};
use crate::features::umkm::backends::UmkmBackend;
use crate::features::umkm::dtos::{UmkmForm, UploadedPhoto};
use crate::features::umkm::models::{NewUmkm, Umkm};
use crate::features::umkm::services::records_to_csv;
use crate::modules::storage::PhotoStore;

/// Service for UMKM record operations
///
/// Keeps each record and its photo file in step: a photo is never left
/// behind by a failed create, and a record never points at a missing photo.
pub struct UmkmService {
    backend: Arc<dyn UmkmBackend>,
    photos: Arc<PhotoStore>,
}

impl UmkmService {
    pub fn new(backend: Arc<dyn UmkmBackend>, photos: Arc<PhotoStore>) -> Self {
        Self { backend, photos }
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Create a record together with its photo
    ///
    /// The photo is saved first; if the backend rejects the row, the photo is
    /// removed again before the error is returned.
    pub async fn create(&self, form: UmkmForm, photo: Option<UploadedPhoto>) -> Result<Umkm> {
        let fields = form.into_fields()?;
        let photo = photo.ok_or_else(|| AppError::validation("foto is required"))?;

        let foto = self.photos.save(&photo.filename, &photo.bytes).await?;
        let record = NewUmkm { fields, foto };

        match self.backend.create(&record).await {
            Ok(id) => {
                info!(
                    "UMKM record created: id={}, foto={}, backend={}",
                    id,
                    record.foto,
                    self.backend.name()
                );
                Ok(Umkm::from_new(id, record))
            }
            Err(e) => {
                error!("Backend create failed, removing photo {}: {}", record.foto, e);
                if let Err(cleanup) = self.photos.delete(&record.foto).await {
                    error!("Failed to remove orphaned photo {}: {}", record.foto, cleanup);
                }
                Err(e)
            }
        }
    }

    /// List all records, newest first
    pub async fn list(&self) -> Result<Vec<Umkm>> {
        let mut records = self.backend.list().await?;
        records.sort_by(|a, b| b.id.cmp(&a.id));
        debug!("Listed {} UMKM records", records.len());
        Ok(records)
    }

    pub async fn get(&self, id: i64) -> Result<Umkm> {
        self.backend.get(id).await
    }

    /// CSV export of every record, in list order
    pub async fn export_csv(&self) -> Result<Vec<u8>> {
        let records = self.list().await?;
        let csv = records_to_csv(&records)?;
        info!("Exported {} UMKM records to CSV", records.len());
        Ok(csv)
    }

    /// Update a record, optionally replacing its photo
    ///
    /// The old photo is removed only after the row points at the new one.
    /// If the row update fails, the new photo is removed and the old photo
    /// stays referenced.
    pub async fn update(
        &self,
        id: i64,
        form: UmkmForm,
        photo: Option<UploadedPhoto>,
    ) -> Result<Umkm> {
        let fields = form.into_fields()?;
        let mut current = self.backend.get(id).await?;
        let old_foto = current.foto.clone();

        let new_foto = match photo {
            Some(photo) => Some(self.photos.save(&photo.filename, &photo.bytes).await?),
            None => None,
        };

        if let Err(e) = self
            .backend
            .update(id, &fields, new_foto.as_deref())
            .await
        {
            if let Some(ref foto) = new_foto {
                error!("Backend update failed, removing new photo {}: {}", foto, e);
                if let Err(cleanup) = self.photos.delete(foto).await {
                    error!("Failed to remove unused photo {}: {}", foto, cleanup);
                }
            }
            return Err(e);
        }

        current.apply(&fields, new_foto.as_deref());

        if let (Some(new), Some(old)) = (new_foto.as_deref(), old_foto.as_deref()) {
            if new != old {
                self.remove_replaced_photo(old).await;
            }
        }

        info!(
            "UMKM record updated: id={}, photo_replaced={}",
            id,
            new_foto.is_some()
        );
        Ok(current)
    }

    /// Delete a record, then its photo
    ///
    /// A backend failure leaves the photo untouched. A photo that is already
    /// gone, or whose stored name does not resolve inside the upload
    /// directory, does not make the delete fail.
    pub async fn delete(&self, id: i64) -> Result<()> {
        let record = self.backend.get(id).await?;

        self.backend.delete(id).await?;

        if let Some(foto) = record.foto.as_deref() {
            match self.photos.delete(foto).await {
                Ok(()) => {}
                Err(AppError::Io(e)) if e.kind() == ErrorKind::InvalidInput => {
                    warn!(
                        "UMKM record {} deleted; photo {:?} is outside the upload directory: {}",
                        id, foto, e
                    );
                }
                Err(e) => {
                    error!(
                        "UMKM record {} deleted but its photo {} could not be removed: {}",
                        id, foto, e
                    );
                    return Err(e);
                }
            }
        }

        info!("UMKM record deleted: id={}, foto={:?}", id, record.foto);
        Ok(())
    }

    /// Best-effort removal of a photo that no record references any more
    async fn remove_replaced_photo(&self, old: &str) {
        if !self.photos.exists(old).await {
            debug!("Replaced photo already absent: {}", old);
            return;
        }

        if let Err(e) = self.photos.delete(old).await {
            warn!("Replaced photo {} left on disk: {}", old, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{sample_form, sample_photo, MemoryBackend};
    use regex::Regex;
    use tempfile::TempDir;

    struct Fixture {
        _dir: TempDir,
        backend: Arc<MemoryBackend>,
        photos: Arc<PhotoStore>,
        service: UmkmService,
    }

    fn fixture() -> Fixture {
        let dir = TempDir::new().unwrap();
        let backend = Arc::new(MemoryBackend::default());
        let photos = Arc::new(PhotoStore::new(dir.path()));
        let service = UmkmService::new(backend.clone(), photos.clone());
        Fixture {
            _dir: dir,
            backend,
            photos,
            service,
        }
    }

    fn stored_files(photos: &PhotoStore) -> Vec<String> {
        std::fs::read_dir(photos.dir())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect()
    }

    #[tokio::test]
    async fn test_create_then_get_returns_fields_and_existing_photo() {
        let f = fixture();

        let created = f
            .service
            .create(sample_form(), Some(sample_photo("photo.jpg")))
            .await
            .unwrap();
        let fetched = f.service.get(created.id).await.unwrap();

        assert_eq!(fetched.nama, "Budi");
        assert_eq!(fetched.nim, "123");
        assert_eq!(fetched.kelas, "A");
        assert_eq!(fetched.umkm, "Warung");
        assert_eq!(fetched.kategori, "Makanan");
        assert_eq!(fetched.pegawai, "2");
        let foto = fetched.foto.unwrap();
        assert!(Regex::new(r"^\d{8}_\d{6}_photo\.jpg$").unwrap().is_match(&foto));
        assert!(f.photos.exists(&foto).await);
    }

    #[tokio::test]
    async fn test_create_rejects_missing_fields_before_saving_photo() {
        let f = fixture();
        let form = UmkmForm {
            nim: " ".into(),
            ..sample_form()
        };

        let result = f.service.create(form, Some(sample_photo("photo.jpg"))).await;

        assert!(matches!(result, Err(AppError::Validation(_))));
        assert!(stored_files(&f.photos).is_empty());
        assert_eq!(f.backend.len(), 0);
    }

    #[tokio::test]
    async fn test_create_requires_photo() {
        let f = fixture();

        let result = f.service.create(sample_form(), None).await;

        match result {
            Err(AppError::Validation(errors)) => assert_eq!(errors, vec!["foto is required"]),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_create_failure_leaves_no_orphan_photo() {
        let f = fixture();
        f.backend.fail_writes(true);

        let result = f
            .service
            .create(sample_form(), Some(sample_photo("photo.jpg")))
            .await;

        assert!(matches!(result, Err(AppError::Persistence(_))));
        assert!(stored_files(&f.photos).is_empty());
    }

    #[tokio::test]
    async fn test_create_aborts_when_photo_cannot_be_saved() {
        let f = fixture();
        let service = UmkmService::new(
            f.backend.clone(),
            Arc::new(PhotoStore::new(f.photos.dir().join("missing"))),
        );

        let result = service
            .create(sample_form(), Some(sample_photo("photo.jpg")))
            .await;

        assert!(matches!(result, Err(AppError::Io(_))));
        assert_eq!(f.backend.len(), 0);
    }

    #[tokio::test]
    async fn test_list_is_newest_first() {
        let f = fixture();
        for name in ["a.jpg", "b.jpg", "c.jpg"] {
            f.service
                .create(sample_form(), Some(sample_photo(name)))
                .await
                .unwrap();
        }

        let ids: Vec<i64> = f.service.list().await.unwrap().iter().map(|r| r.id).collect();

        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[tokio::test]
    async fn test_export_csv_has_one_line_per_record() {
        let f = fixture();
        for name in ["a.jpg", "b.jpg"] {
            f.service
                .create(sample_form(), Some(sample_photo(name)))
                .await
                .unwrap();
        }

        let csv = String::from_utf8(f.service.export_csv().await.unwrap()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("2,"));
        assert!(lines[2].ends_with("_a.jpg"));
    }

    #[tokio::test]
    async fn test_update_without_photo_preserves_foto() {
        let f = fixture();
        let created = f
            .service
            .create(sample_form(), Some(sample_photo("photo.jpg")))
            .await
            .unwrap();

        let form = UmkmForm {
            umkm: "Warung Kopi".into(),
            ..sample_form()
        };
        let updated = f.service.update(created.id, form, None).await.unwrap();

        assert_eq!(updated.umkm, "Warung Kopi");
        assert_eq!(updated.foto, created.foto);
        let stored = f.service.get(created.id).await.unwrap();
        assert_eq!(stored.foto, created.foto);
        assert!(f.photos.exists(created.foto.as_deref().unwrap()).await);
    }

    #[tokio::test]
    async fn test_update_with_photo_replaces_old_file() {
        let f = fixture();
        let created = f
            .service
            .create(sample_form(), Some(sample_photo("old.jpg")))
            .await
            .unwrap();
        let old = created.foto.clone().unwrap();

        let updated = f
            .service
            .update(created.id, sample_form(), Some(sample_photo("new.jpg")))
            .await
            .unwrap();
        let new = updated.foto.clone().unwrap();

        assert!(new.ends_with("new.jpg"));
        assert!(f.photos.exists(&new).await);
        assert!(!f.photos.exists(&old).await);
        assert_eq!(f.service.get(created.id).await.unwrap().foto, Some(new));
    }

    #[tokio::test]
    async fn test_update_failure_keeps_old_photo_referenced() {
        let f = fixture();
        let created = f
            .service
            .create(sample_form(), Some(sample_photo("old.jpg")))
            .await
            .unwrap();
        let old = created.foto.clone().unwrap();
        f.backend.fail_writes(true);

        let result = f
            .service
            .update(created.id, sample_form(), Some(sample_photo("new.jpg")))
            .await;

        assert!(matches!(result, Err(AppError::Persistence(_))));
        assert!(f.photos.exists(&old).await);
        assert_eq!(f.service.get(created.id).await.unwrap().foto, Some(old.clone()));
        assert_eq!(stored_files(&f.photos), vec![old]);
    }

    #[tokio::test]
    async fn test_update_missing_record_has_no_side_effects() {
        let f = fixture();

        let result = f
            .service
            .update(404, sample_form(), Some(sample_photo("new.jpg")))
            .await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
        assert!(stored_files(&f.photos).is_empty());
    }

    #[tokio::test]
    async fn test_delete_twice_is_not_found_and_photo_is_gone() {
        let f = fixture();
        let created = f
            .service
            .create(sample_form(), Some(sample_photo("photo.jpg")))
            .await
            .unwrap();
        let foto = created.foto.clone().unwrap();

        f.service.delete(created.id).await.unwrap();
        assert!(!f.photos.exists(&foto).await);

        let second = f.service.delete(created.id).await;
        assert!(matches!(second, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_succeeds_when_photo_already_missing() {
        let f = fixture();
        let created = f
            .service
            .create(sample_form(), Some(sample_photo("photo.jpg")))
            .await
            .unwrap();
        f.photos.delete(created.foto.as_deref().unwrap()).await.unwrap();

        f.service.delete(created.id).await.unwrap();

        assert!(matches!(
            f.service.get(created.id).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_tolerates_foto_outside_upload_directory() {
        let f = fixture();
        let record = NewUmkm {
            fields: sample_form().into_fields().unwrap(),
            foto: "umkm/abc.jpg".to_string(),
        };
        let id = f.backend.create(&record).await.unwrap();

        f.service.delete(id).await.unwrap();

        assert_eq!(f.backend.len(), 0);
        assert!(matches!(f.service.get(id).await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_backend_failure_keeps_photo() {
        let f = fixture();
        let created = f
            .service
            .create(sample_form(), Some(sample_photo("photo.jpg")))
            .await
            .unwrap();
        f.backend.fail_writes(true);

        let result = f.service.delete(created.id).await;

        assert!(matches!(result, Err(AppError::Persistence(_))));
        assert!(f.photos.exists(created.foto.as_deref().unwrap()).await);
    }
}
