use anyhow::{Context, Result};
use futures::stream::TryStreamExt;
use bson::{doc, oid::ObjectId};
use tracing::info;

use crate::models::PlanPago;
use crate::plan::PlanDetalle;

use super::{AppState, ahora, company_default_currency};

/// Editable fields of a payment plan.
#[derive(Debug, Clone)]
pub struct PlanPagoInput {
    pub nombre: String,
    pub precio_total: f64,
    /// Empty means the company's default currency.
    pub moneda: String,
    pub detalle: PlanDetalle,
    pub propuesta_id: Option<ObjectId>,
}

pub async fn list_planes(state: &AppState, company_id: &ObjectId) -> Result<Vec<PlanPago>> {
    let mut cursor = state
        .planes
        .find(doc! { "company_id": company_id })
        .sort(doc! { "created_at": -1 })
        .await?;
    let mut items = Vec::new();
    while let Some(plan) = cursor.try_next().await? {
        items.push(plan);
    }
    Ok(items)
}

pub async fn get_plan_by_id(state: &AppState, id: &ObjectId) -> Result<Option<PlanPago>> {
    state
        .planes
        .find_one(doc! { "_id": id })
        .await
        .map_err(Into::into)
}

async fn resolve_currency(state: &AppState, company_id: &ObjectId, moneda: &str) -> Result<String> {
    if moneda.trim().is_empty() {
        company_default_currency(state, company_id).await
    } else {
        Ok(moneda.trim().to_uppercase())
    }
}

pub async fn create_plan_pago(
    state: &AppState,
    company_id: &ObjectId,
    input: PlanPagoInput,
) -> Result<ObjectId> {
    let moneda = resolve_currency(state, company_id, &input.moneda).await?;

    let res = state
        .planes
        .insert_one(PlanPago {
            id: None,
            company_id: *company_id,
            propuesta_id: input.propuesta_id,
            nombre: input.nombre,
            precio_total: input.precio_total,
            moneda,
            detalle: input.detalle,
            created_at: Some(ahora()),
            updated_at: None,
        })
        .await?;
    let id = res
        .inserted_id
        .as_object_id()
        .context("plan insert missing _id")?;
    info!(plan = %id, company = %company_id, "plan de pago created");
    Ok(id)
}

pub async fn update_plan_pago(
    state: &AppState,
    id: &ObjectId,
    company_id: &ObjectId,
    input: PlanPagoInput,
) -> Result<()> {
    let moneda = resolve_currency(state, company_id, &input.moneda).await?;
    let detalle = bson::to_bson(&input.detalle).context("serializing plan detalle")?;

    state
        .planes
        .update_one(
            doc! { "_id": id, "company_id": company_id },
            doc! { "$set": {
                "nombre": input.nombre,
                "precio_total": input.precio_total,
                "moneda": moneda,
                "detalle": detalle,
                "propuesta_id": input.propuesta_id,
                "updated_at": ahora(),
            } },
        )
        .await?;
    info!(plan = %id, "plan de pago updated");
    Ok(())
}

/// Stores the result of an editing session (price, currency and breakdown).
pub async fn save_plan_edits(
    state: &AppState,
    id: &ObjectId,
    precio_total: f64,
    moneda: &str,
    detalle: &PlanDetalle,
) -> Result<()> {
    let detalle = bson::to_bson(detalle).context("serializing plan detalle")?;
    state
        .planes
        .update_one(
            doc! { "_id": id },
            doc! { "$set": {
                "precio_total": precio_total,
                "moneda": moneda,
                "detalle": detalle,
                "updated_at": ahora(),
            } },
        )
        .await?;
    Ok(())
}

pub async fn delete_plan_pago(state: &AppState, id: &ObjectId) -> Result<()> {
    state.planes.delete_one(doc! { "_id": id }).await?;
    info!(plan = %id, "plan de pago deleted");
    Ok(())
}
