use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use crate::core::error::{AppError, Result};
use crate::features::umkm::backends::UmkmBackend;
use crate::features::umkm::dtos::{UmkmForm, UploadedPhoto};
use crate::features::umkm::models::{NewUmkm, Umkm, UmkmFields};

/// In-memory backend with switchable write failures
#[derive(Default)]
pub struct MemoryBackend {
    records: Mutex<BTreeMap<i64, Umkm>>,
    next_id: Mutex<i64>,
    fail_writes: AtomicBool,
    fail_reads: AtomicBool,
}

impl MemoryBackend {
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    fn check_writes(&self) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AppError::Persistence("simulated write failure".to_string()));
        }
        Ok(())
    }

    fn check_reads(&self) -> Result<()> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(AppError::Persistence("simulated read failure".to_string()));
        }
        Ok(())
    }
}

fn missing(id: i64) -> AppError {
    AppError::NotFound(format!("UMKM record {} not found", id))
}

#[async_trait]
impl UmkmBackend for MemoryBackend {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn create(&self, record: &NewUmkm) -> Result<i64> {
        self.check_writes()?;
        let mut next_id = self.next_id.lock().unwrap();
        *next_id += 1;
        let id = *next_id;
        self.records
            .lock()
            .unwrap()
            .insert(id, Umkm::from_new(id, record.clone()));
        Ok(id)
    }

    async fn list(&self) -> Result<Vec<Umkm>> {
        self.check_reads()?;
        // Oldest first, so callers have to do their own ordering
        Ok(self.records.lock().unwrap().values().cloned().collect())
    }

    async fn get(&self, id: i64) -> Result<Umkm> {
        self.check_reads()?;
        self.records
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or_else(|| missing(id))
    }

    async fn update(&self, id: i64, fields: &UmkmFields, new_foto: Option<&str>) -> Result<()> {
        self.check_writes()?;
        let mut records = self.records.lock().unwrap();
        let record = records.get_mut(&id).ok_or_else(|| missing(id))?;
        record.apply(fields, new_foto);
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<()> {
        self.check_writes()?;
        self.records
            .lock()
            .unwrap()
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| missing(id))
    }
}

pub fn sample_form() -> UmkmForm {
    UmkmForm {
        latitude: Some("-6.2088".to_string()),
        longitude: Some("106.8456".to_string()),
        nama: "Budi".to_string(),
        nim: "123".to_string(),
        kelas: "A".to_string(),
        umkm: "Warung".to_string(),
        kategori: "Makanan".to_string(),
        pegawai: "2".to_string(),
    }
}

pub fn sample_photo(filename: &str) -> UploadedPhoto {
    UploadedPhoto {
        filename: filename.to_string(),
        bytes: b"\xFF\xD8\xFF\xE0fake-jpeg".to_vec(),
    }
}
