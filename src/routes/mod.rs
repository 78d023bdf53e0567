// routes/mod.rs
// Route handlers and the router that wires them behind tenant resolution.

use std::sync::Arc;

use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use crate::{state::AppState, tenant::require_tenant};

mod helpers;
pub mod empresa;
pub mod planes;
pub mod preferencias;
pub mod propuestas;

pub use empresa::*;
pub use planes::*;
pub use preferencias::*;
pub use propuestas::*;

pub async fn health() -> &'static str {
    "ok"
}

pub fn router(state: Arc<AppState>) -> Router {
    let tenant_scoped = Router::new()
        .route("/api/empresa", get(empresa_actual))
        .route("/api/planes", get(planes_index).post(planes_create))
        .route("/api/planes/calcular", post(planes_calcular))
        .route(
            "/api/planes/{id}",
            get(planes_show).put(planes_update).delete(planes_delete),
        )
        .route("/api/planes/{id}/cambios", post(planes_cambios))
        .route("/api/planes/{id}/resumen", get(planes_resumen))
        .route("/planes/{id}", get(planes_page))
        .route(
            "/api/propuestas",
            get(propuestas_index).post(propuestas_create),
        )
        .route("/api/propuestas/{id}", get(propuestas_show))
        .route("/api/propuestas/{id}/purge", put(propuestas_purge))
        .route("/api/propuestas/{id}/estado", put(propuestas_estado))
        .route("/api/propuestas/{id}/etapa", post(propuestas_etapa))
        .route("/api/tablero", get(tablero))
        .route(
            "/api/preferencias/{usuario}",
            get(preferencias_show).put(preferencias_update),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), require_tenant));

    Router::new()
        .route("/health", get(health))
        .merge(tenant_scoped)
        .with_state(state)
}
