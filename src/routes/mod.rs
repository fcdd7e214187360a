pub mod payload;
pub mod umkm;

use axum::{
    middleware,
    response::Json,
    routing::get,
    Router,
};
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;

use crate::error::ApiError;
use crate::middleware::{cors::cors_middleware, request_id::request_id_middleware};
use crate::store::SharedStore;

use umkm::{create_umkm, delete_umkm, get_all_umkm, get_umkm_by_id, update_umkm};

async fn index() -> Json<Value> {
    Json(json!({
        "success": true,
        "message": "Selamat datang di UMKM API",
        "data": {
            "name": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
            "endpoints": ["/api/umkm", "/api/umkm/:id"]
        }
    }))
}

async fn handle_404() -> ApiError {
    ApiError::RouteNotFound
}

/// Router lengkap beserta middleware CORS, request id dan tracing.
pub fn create_app(store: SharedStore) -> Router {
    Router::new()
        .route("/", get(index))
        // UMKM routes
        .route("/api/umkm", get(get_all_umkm).post(create_umkm))
        .route(
            "/api/umkm/:id",
            get(get_umkm_by_id).put(update_umkm).delete(delete_umkm),
        )
        .fallback(handle_404)
        .with_state(store)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(cors_middleware))
        .layer(middleware::from_fn(request_id_middleware))
}
