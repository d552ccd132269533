use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, error, info};

use super::{not_found, UmkmBackend};
use crate::core::error::{AppError, Result};
use crate::features::umkm::models::{NewUmkm, Umkm, UmkmFields};

const SELECT_COLUMNS: &str =
    "id, latitude, longitude, nama, nim, kelas, umkm, kategori, pegawai, foto";

/// Relational backend over a PostgreSQL pool
pub struct PgUmkmBackend {
    pool: PgPool,
}

impl PgUmkmBackend {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn db_error(action: &str, e: sqlx::Error) -> AppError {
    error!("Failed to {}: {:?}", action, e);
    AppError::Persistence(format!("Failed to {}", action))
}

#[async_trait]
impl UmkmBackend for PgUmkmBackend {
    fn name(&self) -> &'static str {
        "database"
    }

    async fn create(&self, record: &NewUmkm) -> Result<i64> {
        let fields = &record.fields;

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO umkm (latitude, longitude, nama, nim, kelas, umkm, kategori, pegawai, foto)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id
            "#,
        )
        .bind(&fields.latitude)
        .bind(&fields.longitude)
        .bind(&fields.nama)
        .bind(&fields.nim)
        .bind(&fields.kelas)
        .bind(&fields.umkm)
        .bind(&fields.kategori)
        .bind(&fields.pegawai)
        .bind(&record.foto)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("insert UMKM record", e))?;

        info!("UMKM record inserted: id={}, foto={}", id, record.foto);
        Ok(id)
    }

    async fn list(&self) -> Result<Vec<Umkm>> {
        let query = format!("SELECT {} FROM umkm ORDER BY id DESC", SELECT_COLUMNS);

        sqlx::query_as::<_, Umkm>(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("list UMKM records", e))
    }

    async fn get(&self, id: i64) -> Result<Umkm> {
        let query = format!("SELECT {} FROM umkm WHERE id = $1", SELECT_COLUMNS);

        sqlx::query_as::<_, Umkm>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("get UMKM record", e))?
            .ok_or_else(|| not_found(id))
    }

    async fn update(&self, id: i64, fields: &UmkmFields, new_foto: Option<&str>) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE umkm
            SET latitude = COALESCE($2, latitude),
                longitude = COALESCE($3, longitude),
                nama = $4,
                nim = $5,
                kelas = $6,
                umkm = $7,
                kategori = $8,
                pegawai = $9,
                foto = COALESCE($10, foto),
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&fields.latitude)
        .bind(&fields.longitude)
        .bind(&fields.nama)
        .bind(&fields.nim)
        .bind(&fields.kelas)
        .bind(&fields.umkm)
        .bind(&fields.kategori)
        .bind(&fields.pegawai)
        .bind(new_foto)
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("update UMKM record", e))?;

        if result.rows_affected() == 0 {
            return Err(not_found(id));
        }

        debug!("UMKM record updated: id={}, new_foto={:?}", id, new_foto);
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM umkm WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("delete UMKM record", e))?;

        if result.rows_affected() == 0 {
            return Err(not_found(id));
        }

        info!("UMKM record deleted: id={}", id);
        Ok(())
    }
}
