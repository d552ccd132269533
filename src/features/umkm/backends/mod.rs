//! Persistence backends for UMKM records
//!
//! Both backends honour the same contract so the record service never needs
//! to know which one it is talking to. Failures are mapped to
//! [`AppError::Persistence`] or [`AppError::NotFound`] before they leave here.
//!
//! [`AppError::Persistence`]: crate::core::error::AppError::Persistence
//! [`AppError::NotFound`]: crate::core::error::AppError::NotFound

mod api_backend;
mod postgres_backend;

pub use api_backend::ApiUmkmBackend;
pub use postgres_backend::PgUmkmBackend;

use async_trait::async_trait;

use crate::core::error::Result;
use crate::features::umkm::models::{NewUmkm, Umkm, UmkmFields};

#[async_trait]
pub trait UmkmBackend: Send + Sync {
    /// Short identifier used in logs
    fn name(&self) -> &'static str;

    /// Insert a record whose photo is already stored; returns the new id
    async fn create(&self, record: &NewUmkm) -> Result<i64>;

    async fn list(&self) -> Result<Vec<Umkm>>;

    async fn get(&self, id: i64) -> Result<Umkm>;

    /// Overwrite the text fields; `foto` changes only when `new_foto` is given
    async fn update(&self, id: i64, fields: &UmkmFields, new_foto: Option<&str>) -> Result<()>;

    async fn delete(&self, id: i64) -> Result<()>;
}

pub(crate) fn not_found(id: i64) -> crate::core::error::AppError {
    crate::core::error::AppError::NotFound(format!("UMKM record {} not found", id))
}
