use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::models::umkm::{Umkm, UmkmFields};

use super::{StoreError, StoreResult, UmkmStore};

#[derive(Default)]
struct Table {
    // id tidak pernah dipakai ulang, walau record sudah dihapus
    last_id: i32,
    rows: BTreeMap<i32, Umkm>,
}

impl Table {
    fn name_taken(&self, nama_umkm: &str, exclude_id: Option<i32>) -> Option<&Umkm> {
        self.rows
            .values()
            .find(|row| row.nama_umkm == nama_umkm && Some(row.id) != exclude_id)
    }
}

/// Backend tanpa database, dipakai untuk test dan `UMKM_STORE=memory`.
#[derive(Default)]
pub struct MemoryUmkmStore {
    table: RwLock<Table>,
}

impl MemoryUmkmStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UmkmStore for MemoryUmkmStore {
    async fn list_all(&self) -> StoreResult<Vec<Umkm>> {
        let table = self.table.read().await;
        Ok(table.rows.values().cloned().collect())
    }

    async fn insert(&self, fields: UmkmFields) -> StoreResult<i32> {
        let nama_umkm = fields.nama_umkm.ok_or_else(StoreError::missing_name)?;

        let mut table = self.table.write().await;
        if table.name_taken(&nama_umkm, None).is_some() {
            return Err(StoreError::duplicate_name());
        }

        table.last_id += 1;
        let id = table.last_id;
        let now = Utc::now();
        table.rows.insert(
            id,
            Umkm {
                id,
                nama_umkm,
                pemilik: fields.pemilik,
                alamat: fields.alamat,
                kategori: fields.kategori,
                kontak: fields.kontak,
                created_at: Some(now),
                updated_at: Some(now),
            },
        );

        Ok(id)
    }

    async fn find_by_id(&self, id: i32) -> StoreResult<Option<Umkm>> {
        let table = self.table.read().await;
        Ok(table.rows.get(&id).cloned())
    }

    async fn find_by_name(&self, nama_umkm: &str, exclude_id: Option<i32>) -> StoreResult<Option<Umkm>> {
        let table = self.table.read().await;
        Ok(table.name_taken(nama_umkm, exclude_id).cloned())
    }

    async fn update(&self, id: i32, fields: UmkmFields) -> StoreResult<Umkm> {
        let mut table = self.table.write().await;

        if let Some(nama_umkm) = &fields.nama_umkm {
            if table.name_taken(nama_umkm, Some(id)).is_some() {
                return Err(StoreError::duplicate_name());
            }
        }

        let row = table.rows.get_mut(&id).ok_or(StoreError::NotFound)?;
        fields.apply_to(row);
        row.updated_at = Some(Utc::now());

        Ok(row.clone())
    }

    async fn delete(&self, id: i32) -> StoreResult<()> {
        let mut table = self.table.write().await;
        table.rows.remove(&id).map(|_| ()).ok_or(StoreError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(nama: &str) -> UmkmFields {
        UmkmFields {
            nama_umkm: Some(nama.to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_insert_assigns_increasing_ids() {
        let store = MemoryUmkmStore::new();
        let first = store.insert(named("Toko Bunga")).await.unwrap();
        let second = store.insert(named("Warung Kopi")).await.unwrap();

        assert_eq!(first, 1);
        assert_eq!(second, 2);

        let row = store.find_by_id(first).await.unwrap().unwrap();
        assert_eq!(row.nama_umkm, "Toko Bunga");
        assert!(row.created_at.is_some());
        assert_eq!(row.created_at, row.updated_at);
    }

    #[tokio::test]
    async fn test_ids_are_not_reused_after_delete() {
        let store = MemoryUmkmStore::new();
        let first = store.insert(named("Toko Bunga")).await.unwrap();
        store.delete(first).await.unwrap();

        let second = store.insert(named("Toko Bunga")).await.unwrap();
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn test_insert_rejects_duplicate_name() {
        let store = MemoryUmkmStore::new();
        store.insert(named("Toko Bunga")).await.unwrap();

        let err = store.insert(named("Toko Bunga")).await.unwrap_err();
        assert!(matches!(err, StoreError::ConstraintViolation { ref field, .. } if field == "nama_umkm"));
        assert_eq!(store.list_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_insert_requires_name() {
        let store = MemoryUmkmStore::new();
        let err = store.insert(UmkmFields::default()).await.unwrap_err();
        assert!(matches!(err, StoreError::ConstraintViolation { .. }));
    }

    #[tokio::test]
    async fn test_update_keeps_created_at() {
        let store = MemoryUmkmStore::new();
        let id = store.insert(named("Toko Bunga")).await.unwrap();
        let before = store.find_by_id(id).await.unwrap().unwrap();

        let after = store
            .update(
                id,
                UmkmFields {
                    kontak: Some("08123".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(after.created_at, before.created_at);
        assert!(after.updated_at >= before.updated_at);
        assert_eq!(after.kontak.as_deref(), Some("08123"));
        assert_eq!(after.nama_umkm, "Toko Bunga");
    }

    #[tokio::test]
    async fn test_update_and_delete_missing_id() {
        let store = MemoryUmkmStore::new();
        assert!(matches!(
            store.update(42, named("Apa Saja")).await,
            Err(StoreError::NotFound)
        ));
        assert!(matches!(store.delete(42).await, Err(StoreError::NotFound)));
    }

    #[tokio::test]
    async fn test_find_by_name_excludes_self() {
        let store = MemoryUmkmStore::new();
        let id = store.insert(named("Toko Bunga")).await.unwrap();

        assert!(store.find_by_name("Toko Bunga", None).await.unwrap().is_some());
        assert!(store.find_by_name("Toko Bunga", Some(id)).await.unwrap().is_none());
    }
}
