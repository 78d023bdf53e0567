// routes/propuestas.rs
// Proposals, PURGE scoring and the Kanban board.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{
    models::Propuesta,
    money::format_money,
    pipeline::{EstadoPropuesta, EtapaPipeline, TableroKanban, mover_tarjeta},
    purge::{NivelLead, PurgeScore},
    state::{
        AppState, create_propuesta, get_propuesta_by_id, list_propuestas,
        update_propuesta_estado, update_propuesta_purge,
    },
    tenant::Tenant,
};

use super::helpers::*;

#[derive(Serialize)]
pub struct PropuestaRow {
    id: String,
    titulo: String,
    contacto: String,
    precio_total: f64,
    moneda: String,
    precio: String,
    estado: EstadoPropuesta,
    estado_label: &'static str,
    cerrada: bool,
    etapa: EtapaPipeline,
    purge: PurgeScore,
    purge_total: u8,
    nivel: NivelLead,
    nivel_label: &'static str,
}

impl PropuestaRow {
    fn from_propuesta(p: Propuesta) -> Option<Self> {
        let id = p.id?;
        Some(Self {
            id: id.to_hex(),
            precio: format_money(Some(p.precio_total), &p.moneda),
            titulo: p.titulo,
            contacto: p.contacto,
            precio_total: p.precio_total,
            moneda: p.moneda,
            estado: p.estado,
            estado_label: p.estado.label(),
            cerrada: p.estado.es_final(),
            etapa: p.etapa,
            purge_total: p.purge.total(),
            nivel: p.purge.nivel(),
            nivel_label: p.purge.nivel().label(),
            purge: p.purge,
        })
    }
}

#[derive(Deserialize)]
pub struct PropuestaBody {
    titulo: String,
    #[serde(default)]
    contacto: String,
    #[serde(default)]
    precio_total: f64,
    #[serde(default)]
    moneda: String,
}

#[derive(Deserialize)]
pub struct EtapaBody {
    etapa: EtapaPipeline,
}

#[derive(Deserialize)]
pub struct EstadoBody {
    estado: EstadoPropuesta,
}

async fn load_propuesta(
    state: &AppState,
    tenant: &Tenant,
    id: &str,
) -> Result<Propuesta, StatusCode> {
    let oid = parse_object_id(id)?;
    match get_propuesta_by_id(state, &oid).await.map_err(internal)? {
        Some(p) if tenant.owns(&p.company_id) => Ok(p),
        _ => Err(StatusCode::NOT_FOUND),
    }
}

async fn row_for(state: &AppState, tenant: &Tenant, id: &str) -> Result<Json<PropuestaRow>, StatusCode> {
    let propuesta = load_propuesta(state, tenant, id).await?;
    PropuestaRow::from_propuesta(propuesta)
        .map(Json)
        .ok_or(StatusCode::INTERNAL_SERVER_ERROR)
}

pub async fn propuestas_index(
    tenant: Tenant,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<PropuestaRow>>, StatusCode> {
    let rows = list_propuestas(&state, tenant.company_id())
        .await
        .map_err(internal)?
        .into_iter()
        .filter_map(PropuestaRow::from_propuesta)
        .collect();
    Ok(Json(rows))
}

pub async fn propuestas_create(
    tenant: Tenant,
    State(state): State<Arc<AppState>>,
    Json(body): Json<PropuestaBody>,
) -> Result<impl IntoResponse, StatusCode> {
    let titulo = body.titulo.trim();
    if titulo.is_empty() || !body.precio_total.is_finite() || body.precio_total < 0.0 {
        return Err(StatusCode::BAD_REQUEST);
    }
    let id = create_propuesta(
        &state,
        tenant.company_id(),
        titulo,
        body.contacto.trim(),
        body.precio_total,
        &body.moneda,
    )
    .await
    .map_err(internal)?;
    let row = row_for(&state, &tenant, &id.to_hex()).await?;
    Ok((StatusCode::CREATED, row))
}

pub async fn propuestas_show(
    tenant: Tenant,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<PropuestaRow>, StatusCode> {
    row_for(&state, &tenant, &id).await
}

pub async fn propuestas_purge(
    tenant: Tenant,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(purge): Json<PurgeScore>,
) -> Result<Json<PropuestaRow>, StatusCode> {
    let propuesta = load_propuesta(&state, &tenant, &id).await?;
    let oid = propuesta.id.ok_or(StatusCode::INTERNAL_SERVER_ERROR)?;
    update_propuesta_purge(&state, &oid, purge)
        .await
        .map_err(internal)?;
    row_for(&state, &tenant, &id).await
}

pub async fn propuestas_estado(
    tenant: Tenant,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<EstadoBody>,
) -> Result<Json<PropuestaRow>, StatusCode> {
    let propuesta = load_propuesta(&state, &tenant, &id).await?;
    let oid = propuesta.id.ok_or(StatusCode::INTERNAL_SERVER_ERROR)?;
    update_propuesta_estado(&state, &oid, body.estado)
        .await
        .map_err(internal)?;
    row_for(&state, &tenant, &id).await
}

async fn tablero_de(state: &AppState, tenant: &Tenant) -> Result<TableroKanban, StatusCode> {
    let propuestas = list_propuestas(state, tenant.company_id())
        .await
        .map_err(internal)?;
    Ok(TableroKanban::desde(&propuestas))
}

pub async fn tablero(
    tenant: Tenant,
    State(state): State<Arc<AppState>>,
) -> Result<Json<TableroKanban>, StatusCode> {
    tablero_de(&state, &tenant).await.map(Json)
}

/// Drag-and-drop stage change. On a failed write the response carries the
/// restored board so the client can re-render it.
pub async fn propuestas_etapa(
    tenant: Tenant,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<EtapaBody>,
) -> Result<Response, StatusCode> {
    let propuesta = load_propuesta(&state, &tenant, &id).await?;
    let oid = propuesta.id.ok_or(StatusCode::INTERNAL_SERVER_ERROR)?;

    let mut tablero = tablero_de(&state, &tenant).await?;
    match mover_tarjeta(&mut tablero, &oid.to_hex(), body.etapa, state.as_ref()).await {
        Ok(()) => Ok(Json(tablero).into_response()),
        Err(err) => {
            warn!(propuesta = %oid, error = %err, "stage change rejected");
            Ok((StatusCode::INTERNAL_SERVER_ERROR, Json(tablero)).into_response())
        }
    }
}
