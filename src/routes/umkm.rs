use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use serde_json::{json, Value};

use crate::error::{ApiError, ApiResult};
use crate::routes::payload::{parse_id, FieldPayload};
use crate::store::{SharedStore, StoreError};
use crate::validation::{self, Mode};

type UmkmResponse = ApiResult<(StatusCode, Json<Value>)>;

fn respond(status: StatusCode, message: &str, data: impl serde::Serialize) -> UmkmResponse {
    Ok((
        status,
        Json(json!({
            "success": true,
            "message": message,
            "data": data
        })),
    ))
}

// Get all UMKM
pub async fn get_all_umkm(State(store): State<SharedStore>) -> UmkmResponse {
    let umkm = store
        .list_all()
        .await
        .map_err(ApiError::store("Gagal mengambil data UMKM"))?;

    respond(StatusCode::OK, "Data UMKM berhasil diambil", umkm)
}

// Get UMKM by ID
pub async fn get_umkm_by_id(
    State(store): State<SharedStore>,
    Path(id): Path<String>,
) -> UmkmResponse {
    let id = parse_id(&id)?;

    let umkm = store
        .find_by_id(id)
        .await
        .map_err(ApiError::store("Gagal mengambil data UMKM"))?
        .ok_or(ApiError::NotFound)?;

    respond(StatusCode::OK, "Data UMKM berhasil diambil", umkm)
}

// Create new UMKM
pub async fn create_umkm(
    State(store): State<SharedStore>,
    FieldPayload(payload): FieldPayload,
) -> UmkmResponse {
    // Validasi input, termasuk cek nama_umkm yang sudah ada
    let fields = validation::validate(&*store, &payload, Mode::Create)
        .await
        .map_err(ApiError::store("Gagal menambahkan data UMKM"))?
        .map_err(ApiError::Validation)?;

    // Insert UMKM baru; constraint database tetap bisa menolak nama ganda
    let id = store
        .insert(fields)
        .await
        .map_err(ApiError::store("Gagal menambahkan data UMKM"))?;

    let umkm = store
        .find_by_id(id)
        .await
        .map_err(ApiError::store("Gagal menambahkan data UMKM"))?
        .ok_or(ApiError::NotFound)?;

    tracing::info!(id, nama_umkm = %umkm.nama_umkm, "UMKM ditambahkan");
    respond(StatusCode::CREATED, "Data UMKM berhasil ditambahkan", umkm)
}

// Update UMKM
pub async fn update_umkm(
    State(store): State<SharedStore>,
    Path(id): Path<String>,
    FieldPayload(payload): FieldPayload,
) -> UmkmResponse {
    let id = parse_id(&id)?;

    // Cek apakah UMKM dengan ID tersebut ada
    store
        .find_by_id(id)
        .await
        .map_err(ApiError::store("Gagal mengubah data UMKM"))?
        .ok_or(ApiError::NotFound)?;

    let fields = validation::validate(&*store, &payload, Mode::Update { id })
        .await
        .map_err(ApiError::store("Gagal mengubah data UMKM"))?
        .map_err(ApiError::Validation)?;

    if fields.is_empty() {
        tracing::debug!(id, "Update tanpa field, hanya updated_at yang diperbarui");
    }

    let umkm = store.update(id, fields).await.map_err(|err| match err {
        StoreError::NotFound => ApiError::NotFound,
        err => ApiError::store("Gagal mengubah data UMKM")(err),
    })?;

    tracing::info!(id, "UMKM diubah");
    respond(StatusCode::OK, "Data UMKM berhasil diubah", umkm)
}

// Delete UMKM
pub async fn delete_umkm(
    State(store): State<SharedStore>,
    Path(id): Path<String>,
) -> UmkmResponse {
    let id = parse_id(&id)?;

    let umkm = store
        .find_by_id(id)
        .await
        .map_err(ApiError::store("Gagal menghapus data UMKM"))?
        .ok_or(ApiError::NotFound)?;

    store.delete(id).await.map_err(|err| match err {
        StoreError::NotFound => ApiError::NotFound,
        err => ApiError::store("Gagal menghapus data UMKM")(err),
    })?;

    tracing::info!(id, "UMKM dihapus");
    respond(StatusCode::OK, "Data UMKM berhasil dihapus", umkm)
}
