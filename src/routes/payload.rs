use std::collections::HashMap;

use axum::{
    async_trait,
    body::{Body, Bytes},
    extract::{Form, FromRequest, Multipart, Request},
    http::{header, Method},
    Json,
};
use serde_json::{Map, Value};

use crate::error::ApiError;

/// Body request sebagai peta field, dari JSON, form urlencoded, atau multipart.
#[derive(Debug, Default)]
pub struct FieldPayload(pub Map<String, Value>);

fn content_type(req: &Request) -> String {
    req.headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_ascii_lowercase()
}

#[async_trait]
impl<S> FromRequest<S> for FieldPayload
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = content_type(&req);

        if content_type.starts_with("application/x-www-form-urlencoded") {
            return form_fields(req, state).await;
        }

        if content_type.starts_with("multipart/form-data") {
            return multipart_fields(req, state).await;
        }

        if content_type.starts_with("application/json") {
            let Json(map) = Json::<Map<String, Value>>::from_request(req, state)
                .await
                .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
            return Ok(FieldPayload(map));
        }

        // Tanpa content-type: body kosong, JSON mentah, atau urlencoded mentah
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(FieldPayload::default());
        }

        if let Ok(map) = serde_json::from_slice(&bytes) {
            return Ok(FieldPayload(map));
        }

        // Form membaca query string untuk GET, jadi method harus non-GET
        let req = axum::http::Request::builder()
            .method(Method::POST)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(bytes))
            .map_err(|_| ApiError::BadRequest("Format body tidak dikenali.".to_string()))?;
        form_fields(req, state).await
    }
}

async fn form_fields<S: Send + Sync>(req: Request, state: &S) -> Result<FieldPayload, ApiError> {
    let Form(fields) = Form::<HashMap<String, String>>::from_request(req, state)
        .await
        .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;

    let map = fields
        .into_iter()
        .map(|(key, value)| (key, Value::String(value)))
        .collect();
    Ok(FieldPayload(map))
}

async fn multipart_fields<S: Send + Sync>(req: Request, state: &S) -> Result<FieldPayload, ApiError> {
    let mut multipart = Multipart::from_request(req, state)
        .await
        .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;

    let mut map = Map::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(e.to_string()))?
    {
        // Field file diabaikan, hanya field teks yang dibaca
        if field.file_name().is_some() {
            continue;
        }
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        let value = field
            .text()
            .await
            .map_err(|e| ApiError::BadRequest(e.to_string()))?;
        map.insert(name, Value::String(value));
    }

    Ok(FieldPayload(map))
}

/// Id dari path hanya boleh berisi digit.
pub fn parse_id(raw: &str) -> Result<i32, ApiError> {
    let invalid = || ApiError::BadRequest(format!("Id UMKM tidak valid: {raw}"));
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    raw.parse().map_err(|_| invalid())
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn extract(content_type: Option<&str>, body: &'static str) -> Result<FieldPayload, ApiError> {
        let mut builder = axum::http::Request::builder().method("POST").uri("/");
        if let Some(content_type) = content_type {
            builder = builder.header(header::CONTENT_TYPE, content_type);
        }
        FieldPayload::from_request(builder.body(Body::from(body)).unwrap(), &()).await
    }

    #[tokio::test]
    async fn test_form_body() {
        let FieldPayload(map) = extract(
            Some("application/x-www-form-urlencoded"),
            "nama_umkm=Toko+Bunga&kategori=Florist",
        )
        .await
        .unwrap();

        assert_eq!(map["nama_umkm"], "Toko Bunga");
        assert_eq!(map["kategori"], "Florist");
    }

    #[tokio::test]
    async fn test_json_body() {
        let FieldPayload(map) = extract(Some("application/json"), r#"{"alamat":"Jl. Mawar 1"}"#)
            .await
            .unwrap();
        assert_eq!(map["alamat"], "Jl. Mawar 1");
    }

    #[tokio::test]
    async fn test_missing_content_type() {
        let FieldPayload(map) = extract(None, "").await.unwrap();
        assert!(map.is_empty());

        let FieldPayload(map) = extract(None, r#"{"kontak":"0812"}"#).await.unwrap();
        assert_eq!(map["kontak"], "0812");

    }

    #[tokio::test]
    async fn test_missing_content_type_falls_back_to_urlencoded() {
        let FieldPayload(map) = extract(None, "alamat=Jl.+Mawar+1&kontak=0812").await.unwrap();
        assert_eq!(map["alamat"], "Jl. Mawar 1");
        assert_eq!(map["kontak"], "0812");
    }

    #[tokio::test]
    async fn test_multipart_body() {
        let body = "--XX\r\n\
Content-Disposition: form-data; name=\"nama_umkm\"\r\n\r\n\
Toko Bunga\r\n\
--XX\r\n\
Content-Disposition: form-data; name=\"kategori\"\r\n\r\n\
Florist\r\n\
--XX--\r\n";
        let FieldPayload(map) = extract(Some("multipart/form-data; boundary=XX"), body)
            .await
            .unwrap();

        assert_eq!(map["nama_umkm"], "Toko Bunga");
        assert_eq!(map["kategori"], "Florist");
    }

    #[tokio::test]
    async fn test_malformed_json_rejected() {
        let result = extract(Some("application/json"), "{").await;
        assert!(matches!(result, Err(ApiError::BadRequest(_))));
    }

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("42").unwrap(), 42);
        for raw in ["abc", "+5", "-1", "", " 5", "99999999999"] {
            assert!(matches!(parse_id(raw), Err(ApiError::BadRequest(_))), "{raw:?}");
        }
    }
}
