//! Akses data tabel `umkm`.
//!
//! Handler hanya bergantung pada trait [`UmkmStore`], sehingga backend
//! Postgres dan backend memori bisa saling menggantikan.

pub mod memory;
pub mod postgres;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::umkm::{Umkm, UmkmFields};

pub use memory::MemoryUmkmStore;
pub use postgres::PgUmkmStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// Store yang dibagikan ke semua handler.
pub type SharedStore = Arc<dyn UmkmStore>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Data UMKM tidak ditemukan")]
    NotFound,

    /// Constraint tabel dilanggar (misal nama_umkm duplikat).
    #[error("{field}: {message}")]
    ConstraintViolation { field: String, message: String },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl StoreError {
    pub fn duplicate_name() -> Self {
        StoreError::ConstraintViolation {
            field: "nama_umkm".to_string(),
            message: "nama_umkm sudah digunakan.".to_string(),
        }
    }

    pub fn missing_name() -> Self {
        StoreError::ConstraintViolation {
            field: "nama_umkm".to_string(),
            message: "nama_umkm wajib diisi.".to_string(),
        }
    }
}

#[async_trait]
pub trait UmkmStore: Send + Sync {
    /// Semua record, urut berdasarkan id.
    async fn list_all(&self) -> StoreResult<Vec<Umkm>>;

    /// Simpan record baru dan kembalikan id-nya.
    async fn insert(&self, fields: UmkmFields) -> StoreResult<i32>;

    async fn find_by_id(&self, id: i32) -> StoreResult<Option<Umkm>>;

    /// Cari record dengan nama yang sama, selain record `exclude_id`.
    async fn find_by_name(&self, nama_umkm: &str, exclude_id: Option<i32>) -> StoreResult<Option<Umkm>>;

    /// Terapkan field ke record yang ada dan refresh `updated_at`.
    async fn update(&self, id: i32, fields: UmkmFields) -> StoreResult<Umkm>;

    async fn delete(&self, id: i32) -> StoreResult<()>;
}
