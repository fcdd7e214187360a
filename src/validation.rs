//! Aturan validasi field UMKM.
//!
//! Semua aturan dievaluasi terpisah dan pelanggarannya dikumpulkan per field,
//! jadi client menerima seluruh kesalahan sekaligus.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::models::umkm::{UmkmFields, WRITABLE_FIELDS};
use crate::store::{StoreResult, UmkmStore};

pub const NAMA_MIN_LENGTH: usize = 3;

/// Pemetaan field -> daftar pesan pelanggaran.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.entry(field.to_string()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// nama_umkm wajib ada.
    Create,
    /// Hanya field yang dikirim yang dicek; keunikan nama mengabaikan record ini.
    Update { id: i32 },
}

fn max_length(field: &str) -> Option<usize> {
    match field {
        "nama_umkm" | "pemilik" => Some(100),
        "kategori" => Some(50),
        "kontak" => Some(20),
        _ => None,
    }
}

/// Cek aturan yang tidak butuh database. Field di luar [`WRITABLE_FIELDS`]
/// diabaikan.
pub fn check_fields(payload: &Map<String, Value>, mode: Mode) -> (UmkmFields, ValidationErrors) {
    let mut errors = ValidationErrors::default();
    let mut values: BTreeMap<&str, String> = BTreeMap::new();

    for field in WRITABLE_FIELDS {
        match payload.get(field) {
            None | Some(Value::Null) => {}
            Some(Value::String(text)) => {
                if let Some(max) = max_length(field) {
                    if text.chars().count() > max {
                        errors.add(field, format!("Kolom {field} maksimal {max} karakter."));
                    }
                }
                values.insert(field, text.clone());
            }
            Some(_) => errors.add(field, format!("Kolom {field} harus berupa teks.")),
        }
    }

    // `null` sama dengan tidak dikirim
    let nama_required = mode == Mode::Create
        || matches!(payload.get("nama_umkm"), Some(value) if !value.is_null());
    match values.get("nama_umkm") {
        Some(nama) if !nama.trim().is_empty() => {
            // Panjang dihitung dari nilai mentah yang akan disimpan
            if nama.chars().count() < NAMA_MIN_LENGTH {
                errors.add(
                    "nama_umkm",
                    format!("Kolom nama_umkm minimal {NAMA_MIN_LENGTH} karakter."),
                );
            }
        }
        _ if nama_required && errors.get("nama_umkm").is_none() => {
            errors.add("nama_umkm", "Kolom nama_umkm wajib diisi.");
        }
        _ => {}
    }

    let fields = UmkmFields {
        nama_umkm: values.remove("nama_umkm"),
        pemilik: values.remove("pemilik"),
        alamat: values.remove("alamat"),
        kategori: values.remove("kategori"),
        kontak: values.remove("kontak"),
    };

    (fields, errors)
}

/// Jalankan semua aturan, termasuk keunikan nama_umkm terhadap isi store.
pub async fn validate(
    store: &dyn UmkmStore,
    payload: &Map<String, Value>,
    mode: Mode,
) -> StoreResult<Result<UmkmFields, ValidationErrors>> {
    let (fields, mut errors) = check_fields(payload, mode);

    if let Some(nama) = fields.nama_umkm.as_deref().filter(|n| !n.trim().is_empty()) {
        let exclude_id = match mode {
            Mode::Create => None,
            Mode::Update { id } => Some(id),
        };
        if store.find_by_name(nama, exclude_id).await?.is_some() {
            errors.add("nama_umkm", "Kolom nama_umkm sudah digunakan.");
        }
    }

    if errors.is_empty() {
        Ok(Ok(fields))
    } else {
        Ok(Err(errors))
    }
}
