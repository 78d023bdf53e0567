// routes/planes.rs
// Payment plans: CRUD, editing commands, computed summary and the breakdown page.

use std::sync::Arc;

use askama::Template;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse},
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    models::PlanPago,
    money::format_money,
    plan::{CambioPlan, Cobertura, EditorPlan, MAX_CUOTAS, PlanDetalle, VistaPlan},
    state::{
        AppState, PlanPagoInput, create_plan_pago, delete_plan_pago, get_plan_by_id,
        get_propuesta_by_id, list_planes, save_plan_edits, update_plan_pago,
    },
    tenant::Tenant,
};

use super::helpers::*;

#[derive(Serialize)]
pub struct PlanPagoRow {
    id: String,
    nombre: String,
    propuesta_id: Option<String>,
    precio_total: f64,
    moneda: String,
    precio: String,
    detalle: PlanDetalle,
}

impl PlanPagoRow {
    fn from_plan(plan: PlanPago) -> Option<Self> {
        let id = plan.id?;
        Some(Self {
            id: id.to_hex(),
            nombre: plan.nombre,
            propuesta_id: plan.propuesta_id.map(|p| p.to_hex()),
            precio: format_money(Some(plan.precio_total), &plan.moneda),
            precio_total: plan.precio_total,
            moneda: plan.moneda,
            detalle: plan.detalle,
        })
    }
}

#[derive(Deserialize)]
pub struct PlanPagoBody {
    #[serde(default)]
    nombre: String,
    #[serde(default)]
    precio_total: f64,
    #[serde(default)]
    moneda: String,
    #[serde(default)]
    detalle: Option<PlanDetalle>,
    #[serde(default)]
    propuesta_id: Option<String>,
}

#[derive(Deserialize)]
pub struct CalcularBody {
    precio_total: f64,
    #[serde(default)]
    moneda: Option<String>,
    #[serde(default)]
    detalle: PlanDetalle,
}

/// Loads a plan owned by the active tenant; other tenants' plans are 404.
async fn load_plan(state: &AppState, tenant: &Tenant, id: &str) -> Result<PlanPago, StatusCode> {
    let oid = parse_object_id(id)?;
    match get_plan_by_id(state, &oid).await.map_err(internal)? {
        Some(plan) if tenant.owns(&plan.company_id) => Ok(plan),
        _ => Err(StatusCode::NOT_FOUND),
    }
}

async fn input_from_body(
    state: &AppState,
    tenant: &Tenant,
    body: PlanPagoBody,
) -> Result<PlanPagoInput, StatusCode> {
    if !body.precio_total.is_finite() || body.precio_total < 0.0 {
        return Err(StatusCode::BAD_REQUEST);
    }
    if body.detalle.as_ref().is_some_and(PlanDetalle::excede_cuotas) {
        return Err(StatusCode::BAD_REQUEST);
    }
    let propuesta_id = parse_optional_object_id(body.propuesta_id.as_deref())?;
    if let Some(pid) = propuesta_id.as_ref() {
        match get_propuesta_by_id(state, pid).await.map_err(internal)? {
            Some(p) if tenant.owns(&p.company_id) => {}
            _ => return Err(StatusCode::BAD_REQUEST),
        }
    }

    let nombre = body.nombre.trim();
    Ok(PlanPagoInput {
        nombre: if nombre.is_empty() {
            "Plan de pago".to_string()
        } else {
            nombre.to_string()
        },
        precio_total: body.precio_total,
        moneda: body.moneda,
        detalle: body.detalle.unwrap_or_else(PlanDetalle::nuevo),
        propuesta_id,
    })
}

pub async fn planes_calcular(
    tenant: Tenant,
    Json(body): Json<CalcularBody>,
) -> Result<Json<VistaPlan>, StatusCode> {
    if body.detalle.excede_cuotas() {
        return Err(StatusCode::BAD_REQUEST);
    }
    let moneda = body
        .moneda
        .map(|m| m.trim().to_uppercase())
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| tenant.default_currency().to_string());
    Ok(Json(VistaPlan::construir(
        body.precio_total,
        &moneda,
        body.detalle,
        primera_cuota(),
    )))
}

pub async fn planes_index(
    tenant: Tenant,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<PlanPagoRow>>, StatusCode> {
    let rows = list_planes(&state, tenant.company_id())
        .await
        .map_err(internal)?
        .into_iter()
        .filter_map(PlanPagoRow::from_plan)
        .collect();
    Ok(Json(rows))
}

pub async fn planes_create(
    tenant: Tenant,
    State(state): State<Arc<AppState>>,
    Json(body): Json<PlanPagoBody>,
) -> Result<impl IntoResponse, StatusCode> {
    let input = input_from_body(&state, &tenant, body).await?;
    let id = create_plan_pago(&state, tenant.company_id(), input)
        .await
        .map_err(internal)?;
    let plan = get_plan_by_id(&state, &id)
        .await
        .map_err(internal)?
        .and_then(PlanPagoRow::from_plan)
        .ok_or(StatusCode::INTERNAL_SERVER_ERROR)?;
    Ok((StatusCode::CREATED, Json(plan)))
}

pub async fn planes_show(
    tenant: Tenant,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<PlanPagoRow>, StatusCode> {
    let plan = load_plan(&state, &tenant, &id).await?;
    PlanPagoRow::from_plan(plan)
        .map(Json)
        .ok_or(StatusCode::INTERNAL_SERVER_ERROR)
}

pub async fn planes_update(
    tenant: Tenant,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<PlanPagoBody>,
) -> Result<Json<PlanPagoRow>, StatusCode> {
    let plan = load_plan(&state, &tenant, &id).await?;
    let oid = plan.id.ok_or(StatusCode::INTERNAL_SERVER_ERROR)?;
    let input = input_from_body(&state, &tenant, body).await?;
    update_plan_pago(&state, &oid, tenant.company_id(), input)
        .await
        .map_err(internal)?;
    planes_show(tenant, State(state), Path(id)).await
}

pub async fn planes_delete(
    tenant: Tenant,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, StatusCode> {
    let plan = load_plan(&state, &tenant, &id).await?;
    let oid = plan.id.ok_or(StatusCode::INTERNAL_SERVER_ERROR)?;
    delete_plan_pago(&state, &oid).await.map_err(internal)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Applies form edits in order, persists the result and returns the new view.
pub async fn planes_cambios(
    tenant: Tenant,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(cambios): Json<Vec<CambioPlan>>,
) -> Result<Json<VistaPlan>, StatusCode> {
    let plan = load_plan(&state, &tenant, &id).await?;
    let oid = plan.id.ok_or(StatusCode::INTERNAL_SERVER_ERROR)?;

    if cambios
        .iter()
        .any(|c| matches!(c, CambioPlan::Cuotas(n) if *n > MAX_CUOTAS))
    {
        return Err(StatusCode::BAD_REQUEST);
    }

    let total_cambios = cambios.len();
    let mut editor = EditorPlan::new(plan.precio_total, plan.moneda, plan.detalle);
    editor.aplicar_todos(cambios);
    let (precio_total, moneda, detalle) = editor.into_parts();
    if !precio_total.is_finite() || precio_total < 0.0 {
        return Err(StatusCode::BAD_REQUEST);
    }

    save_plan_edits(&state, &oid, precio_total, &moneda, &detalle)
        .await
        .map_err(internal)?;
    info!(plan = %oid, cambios = total_cambios, "plan edits saved");

    Ok(Json(VistaPlan::construir(
        precio_total,
        &moneda,
        detalle,
        primera_cuota(),
    )))
}

pub async fn planes_resumen(
    tenant: Tenant,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<VistaPlan>, StatusCode> {
    let plan = load_plan(&state, &tenant, &id).await?;
    Ok(Json(VistaPlan::construir(
        plan.precio_total,
        &plan.moneda,
        plan.detalle,
        primera_cuota(),
    )))
}

#[derive(Template)]
#[template(path = "planes/detalle.html")]
struct PlanPageTemplate {
    empresa: String,
    nombre: String,
    moneda: String,
    precio: String,
    filas: Vec<FilaConcepto>,
    totales: Option<TotalesView>,
    cuotas: Vec<CuotaRow>,
}

struct FilaConcepto {
    concepto: &'static str,
    regla: String,
    monto: String,
}

struct TotalesView {
    total: String,
    porcentaje: String,
    estado: &'static str,
    mensaje: &'static str,
    diferencia: Option<String>,
}

struct CuotaRow {
    numero: u32,
    fecha: String,
    monto: String,
}

fn regla(tipo: &str, valor: f64, moneda: &str) -> String {
    if tipo == "valor" {
        format!("Monto fijo {}", format_money(Some(valor), moneda))
    } else {
        format!("{valor}% del precio")
    }
}

pub async fn planes_page(
    tenant: Tenant,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Html<String>, StatusCode> {
    let plan = load_plan(&state, &tenant, &id).await?;
    let vista = VistaPlan::construir(
        plan.precio_total,
        &plan.moneda,
        plan.detalle.clone(),
        primera_cuota(),
    );
    let moneda = vista.moneda.clone();

    let mut filas = Vec::new();
    if let Some(f) = vista.formateado.as_ref() {
        let d = &vista.detalle;
        let mut push = |concepto, item: Option<(&str, f64)>, monto: &String| {
            if let Some((tipo, valor)) = item {
                filas.push(FilaConcepto {
                    concepto,
                    regla: regla(tipo, valor, &moneda),
                    monto: monto.clone(),
                });
            }
        };
        push("Reserva", d.reserva.map(|c| (c.tipo.as_str(), c.valor)), &f.reserva);
        push("Separación", d.separacion.map(|c| (c.tipo.as_str(), c.valor)), &f.separacion);
        push("Inicial", d.inicial.map(|c| (c.tipo.as_str(), c.valor)), &f.inicial);
        push(
            "Contra entrega",
            d.contra_entrega.map(|c| (c.tipo.as_str(), c.valor)),
            &f.contra_entrega,
        );
        if let Some(fin) = d.financiamiento {
            filas.push(FilaConcepto {
                concepto: "Financiamiento",
                regla: match fin.plazo_meses {
                    Some(meses) => {
                        format!("{}% {} a {} meses", fin.porcentaje, fin.tipo.label(), meses)
                    }
                    None => format!("{}% {}", fin.porcentaje, fin.tipo.label()),
                },
                monto: f.financiamiento.clone(),
            });
        }
    }

    let totales = match (vista.formateado.as_ref(), vista.cobertura) {
        (Some(f), Some(cobertura)) => Some(TotalesView {
            total: f.total.clone(),
            porcentaje: f.porcentaje_total.clone(),
            estado: match cobertura {
                Cobertura::Completa => "completa",
                Cobertura::Faltante(_) => "faltante",
                Cobertura::Excedente(_) => "excedente",
            },
            mensaje: cobertura.mensaje(),
            diferencia: match cobertura {
                Cobertura::Completa => None,
                Cobertura::Faltante(d) | Cobertura::Excedente(d) => {
                    Some(format_money(Some(d), &moneda))
                }
            },
        }),
        _ => None,
    };

    let cuotas = vista
        .cronograma_inicial
        .iter()
        .map(|c| CuotaRow {
            numero: c.numero,
            fecha: c.fecha.format("%d/%m/%Y").to_string(),
            monto: format_money(Some(c.monto), &moneda),
        })
        .collect();

    render(PlanPageTemplate {
        empresa: tenant.name().to_string(),
        nombre: plan.nombre,
        precio: format_money(Some(plan.precio_total), &moneda),
        moneda,
        filas,
        totales,
        cuotas,
    })
}
