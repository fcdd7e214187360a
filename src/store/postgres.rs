use async_trait::async_trait;

use crate::database::Database;
use crate::models::umkm::{Umkm, UmkmFields};

use super::{StoreError, StoreResult, UmkmStore};

const UNIQUE_VIOLATION: &str = "23505";

pub struct PgUmkmStore {
    db: Database,
}

impl PgUmkmStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

fn map_write_error(err: sqlx::Error) -> StoreError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) => {
            StoreError::duplicate_name()
        }
        _ => StoreError::Database(err),
    }
}

#[async_trait]
impl UmkmStore for PgUmkmStore {
    async fn list_all(&self) -> StoreResult<Vec<Umkm>> {
        let rows = sqlx::query_as::<_, Umkm>("SELECT * FROM umkm ORDER BY id")
            .fetch_all(&self.db)
            .await?;

        Ok(rows)
    }

    async fn insert(&self, fields: UmkmFields) -> StoreResult<i32> {
        let nama_umkm = fields.nama_umkm.ok_or_else(StoreError::missing_name)?;

        let id: i32 = sqlx::query_scalar(
            "INSERT INTO umkm (nama_umkm, pemilik, alamat, kategori, kontak, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, NOW(), NOW())
             RETURNING id"
        )
        .bind(&nama_umkm)
        .bind(&fields.pemilik)
        .bind(&fields.alamat)
        .bind(&fields.kategori)
        .bind(&fields.kontak)
        .fetch_one(&self.db)
        .await
        .map_err(map_write_error)?;

        Ok(id)
    }

    async fn find_by_id(&self, id: i32) -> StoreResult<Option<Umkm>> {
        let umkm = sqlx::query_as::<_, Umkm>("SELECT * FROM umkm WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db)
            .await?;

        Ok(umkm)
    }

    async fn find_by_name(&self, nama_umkm: &str, exclude_id: Option<i32>) -> StoreResult<Option<Umkm>> {
        let umkm = sqlx::query_as::<_, Umkm>(
            "SELECT * FROM umkm WHERE nama_umkm = $1 AND ($2::INT IS NULL OR id != $2) LIMIT 1"
        )
        .bind(nama_umkm)
        .bind(exclude_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(umkm)
    }

    async fn update(&self, id: i32, fields: UmkmFields) -> StoreResult<Umkm> {
        let umkm = sqlx::query_as::<_, Umkm>(
            "UPDATE umkm SET
             nama_umkm = COALESCE($1, nama_umkm),
             pemilik = COALESCE($2, pemilik),
             alamat = COALESCE($3, alamat),
             kategori = COALESCE($4, kategori),
             kontak = COALESCE($5, kontak),
             updated_at = NOW()
             WHERE id = $6
             RETURNING *"
        )
        .bind(&fields.nama_umkm)
        .bind(&fields.pemilik)
        .bind(&fields.alamat)
        .bind(&fields.kategori)
        .bind(&fields.kontak)
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .map_err(map_write_error)?;

        umkm.ok_or(StoreError::NotFound)
    }

    async fn delete(&self, id: i32) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM umkm WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }

        Ok(())
    }
}
