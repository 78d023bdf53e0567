use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    preferences::{AlmacenPreferencias, Preferencias, preferencias_de},
    state::AppState,
    tenant::Tenant,
};

use super::helpers::internal;

fn clean_usuario(usuario: &str) -> Result<String, StatusCode> {
    let usuario = usuario.trim().to_lowercase();
    if usuario.is_empty() {
        Err(StatusCode::BAD_REQUEST)
    } else {
        Ok(usuario)
    }
}

pub async fn preferencias_show(
    tenant: Tenant,
    State(state): State<Arc<AppState>>,
    Path(usuario): Path<String>,
) -> Result<Json<Preferencias>, StatusCode> {
    let usuario = clean_usuario(&usuario)?;
    preferencias_de(state.as_ref(), tenant.company_id(), &usuario)
        .await
        .map(Json)
        .map_err(internal)
}

pub async fn preferencias_update(
    tenant: Tenant,
    State(state): State<Arc<AppState>>,
    Path(usuario): Path<String>,
    Json(preferencias): Json<Preferencias>,
) -> Result<Json<Preferencias>, StatusCode> {
    let usuario = clean_usuario(&usuario)?;
    state
        .guardar(tenant.company_id(), &usuario, preferencias)
        .await
        .map_err(internal)?;
    Ok(Json(preferencias))
}
