use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use chrono::{DateTime, Utc};

/// Kolom yang boleh diisi lewat create/update, urut sesuai skema.
pub const WRITABLE_FIELDS: [&str; 5] = ["nama_umkm", "pemilik", "alamat", "kategori", "kontak"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Umkm {
    pub id: i32,
    pub nama_umkm: String,
    pub pemilik: Option<String>,
    pub alamat: Option<String>,
    pub kategori: Option<String>,
    pub kontak: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Nilai field yang dikirim client. `None` berarti field tidak dikirim.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct UmkmFields {
    pub nama_umkm: Option<String>,
    pub pemilik: Option<String>,
    pub alamat: Option<String>,
    pub kategori: Option<String>,
    pub kontak: Option<String>,
}

impl UmkmFields {
    pub fn is_empty(&self) -> bool {
        self.nama_umkm.is_none()
            && self.pemilik.is_none()
            && self.alamat.is_none()
            && self.kategori.is_none()
            && self.kontak.is_none()
    }

    /// Terapkan field yang dikirim ke record yang sudah ada.
    pub fn apply_to(self, umkm: &mut Umkm) {
        if let Some(nama_umkm) = self.nama_umkm {
            umkm.nama_umkm = nama_umkm;
        }
        if self.pemilik.is_some() {
            umkm.pemilik = self.pemilik;
        }
        if self.alamat.is_some() {
            umkm.alamat = self.alamat;
        }
        if self.kategori.is_some() {
            umkm.kategori = self.kategori;
        }
        if self.kontak.is_some() {
            umkm.kontak = self.kontak;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Umkm {
        Umkm {
            id: 1,
            nama_umkm: "Toko Bunga".to_string(),
            pemilik: Some("Sari".to_string()),
            alamat: None,
            kategori: Some("Florist".to_string()),
            kontak: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_apply_only_touches_sent_fields() {
        let mut umkm = sample();
        UmkmFields {
            alamat: Some("Jl. Mawar 1".to_string()),
            ..Default::default()
        }
        .apply_to(&mut umkm);

        assert_eq!(umkm.alamat.as_deref(), Some("Jl. Mawar 1"));
        assert_eq!(umkm.nama_umkm, "Toko Bunga");
        assert_eq!(umkm.pemilik.as_deref(), Some("Sari"));
    }

    #[test]
    fn test_is_empty() {
        assert!(UmkmFields::default().is_empty());
        let fields = UmkmFields {
            kontak: Some("0812".to_string()),
            ..Default::default()
        };
        assert!(!fields.is_empty());
    }
}
