use anyhow::{Context, Result, bail};
use futures::stream::TryStreamExt;
use bson::{doc, oid::ObjectId};
use std::str::FromStr;

use crate::models::Propuesta;
use crate::pipeline::{EstadoPropuesta, EtapaPipeline, RepositorioEtapas};
use crate::purge::PurgeScore;

use super::{AppState, ahora, company_default_currency};

pub async fn list_propuestas(state: &AppState, company_id: &ObjectId) -> Result<Vec<Propuesta>> {
    let mut cursor = state
        .propuestas
        .find(doc! { "company_id": company_id })
        .sort(doc! { "created_at": 1 })
        .await?;
    let mut items = Vec::new();
    while let Some(p) = cursor.try_next().await? {
        items.push(p);
    }
    Ok(items)
}

pub async fn get_propuesta_by_id(state: &AppState, id: &ObjectId) -> Result<Option<Propuesta>> {
    state
        .propuestas
        .find_one(doc! { "_id": id })
        .await
        .map_err(Into::into)
}

pub async fn create_propuesta(
    state: &AppState,
    company_id: &ObjectId,
    titulo: &str,
    contacto: &str,
    precio_total: f64,
    moneda: &str,
) -> Result<ObjectId> {
    let moneda = if moneda.trim().is_empty() {
        company_default_currency(state, company_id).await?
    } else {
        moneda.trim().to_uppercase()
    };

    let res = state
        .propuestas
        .insert_one(Propuesta {
            id: None,
            company_id: *company_id,
            titulo: titulo.to_string(),
            contacto: contacto.to_string(),
            precio_total,
            moneda,
            estado: EstadoPropuesta::Borrador,
            etapa: EtapaPipeline::Prospecto,
            purge: PurgeScore::default(),
            created_at: Some(ahora()),
            updated_at: None,
        })
        .await?;
    res.inserted_id
        .as_object_id()
        .context("propuesta insert missing _id")
}

pub async fn update_propuesta_estado(
    state: &AppState,
    id: &ObjectId,
    estado: EstadoPropuesta,
) -> Result<()> {
    state
        .propuestas
        .update_one(
            doc! { "_id": id },
            doc! { "$set": {
                "estado": estado.as_str(),
                "updated_at": ahora(),
            } },
        )
        .await?;
    Ok(())
}

pub async fn update_propuesta_etapa(
    state: &AppState,
    id: &ObjectId,
    etapa: EtapaPipeline,
) -> Result<()> {
    let res = state
        .propuestas
        .update_one(
            doc! { "_id": id },
            doc! { "$set": {
                "etapa": etapa.as_str(),
                "updated_at": ahora(),
            } },
        )
        .await?;
    if res.matched_count == 0 {
        bail!("propuesta {id} not found");
    }
    Ok(())
}

pub async fn update_propuesta_purge(
    state: &AppState,
    id: &ObjectId,
    purge: PurgeScore,
) -> Result<()> {
    let purge = bson::to_bson(&purge).context("serializing purge score")?;
    state
        .propuestas
        .update_one(
            doc! { "_id": id },
            doc! { "$set": {
                "purge": purge,
                "updated_at": ahora(),
            } },
        )
        .await?;
    Ok(())
}

impl RepositorioEtapas for AppState {
    async fn guardar_etapa(&self, id: &str, etapa: EtapaPipeline) -> Result<()> {
        let oid = ObjectId::from_str(id).context("invalid propuesta id")?;
        update_propuesta_etapa(self, &oid, etapa).await
    }
}
