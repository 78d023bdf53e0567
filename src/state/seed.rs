use anyhow::Result;
use bson::{doc, oid::ObjectId};
use mongodb::Database;
use std::fs;
use tracing::{info, warn};

use crate::models::SeedCompany;
use crate::pipeline::{EstadoPropuesta, EtapaPipeline};
use crate::plan::{ConceptoInicial, ConceptoPlan, Financiamiento, PlanDetalle, TipoMonto};
use crate::purge::PurgeScore;

use super::{
    AppState, PlanPagoInput, create_company, create_plan_pago, create_propuesta,
    update_propuesta_estado, update_propuesta_etapa, update_propuesta_purge,
};

const COLLECTIONS: [&str; 4] = ["companies", "planes_pago", "propuestas", "preferencias"];

pub(super) async fn ensure_collections(db: &Database) -> Result<()> {
    let existing = db.list_collection_names().await?;
    for name in COLLECTIONS {
        if !existing.iter().any(|e| e == name) {
            db.create_collection(name).await?;
        }
    }
    Ok(())
}

pub(super) async fn is_database_empty(state: &AppState) -> Result<bool> {
    let count = state.companies.estimated_document_count().await?;
    Ok(count == 0)
}

/// Reads the seed file; a missing file yields a single demo agency.
pub(super) fn load_seed_companies(path: &str) -> Result<Vec<SeedCompany>> {
    match fs::read_to_string(path) {
        Ok(contents) => {
            let parsed = serde_json::from_str::<Vec<SeedCompany>>(&contents)?;
            Ok(parsed)
        }
        Err(err) => {
            warn!(path, error = %err, "companies seed file not readable; using demo company");
            Ok(vec![SeedCompany {
                name: "Inmobiliaria Demo".into(),
                slug: Some("demo".into()),
                default_currency: None,
            }])
        }
    }
}

pub(super) async fn seed_companies(
    state: &AppState,
    companies: &[SeedCompany],
) -> Result<Vec<ObjectId>> {
    let mut ids = Vec::new();
    for company in companies {
        let existing = state
            .companies
            .find_one(doc! { "name": company.name.as_str() })
            .await?;
        let id = match existing.and_then(|c| c.id) {
            Some(id) => id,
            None => {
                create_company(
                    state,
                    &company.name,
                    company.slug.as_deref().unwrap_or(""),
                    company.default_currency.as_deref().unwrap_or(""),
                )
                .await?
            }
        };
        ids.push(id);
    }
    info!(count = ids.len(), "companies seeded");
    Ok(ids)
}

/// A handful of proposals across stages plus a fully covered plan.
pub(super) async fn seed_sample_pipeline(state: &AppState, company_id: &ObjectId) -> Result<()> {
    let samples = [
        (
            "Apartamento Torre Mar 4B",
            "Laura Méndez",
            200000.0,
            EtapaPipeline::Negociacion,
            EstadoPropuesta::Enviada,
            PurgeScore::new(4, 4, 4, 5, 3),
        ),
        (
            "Villa Los Prados",
            "Carlos Rivas",
            450000.0,
            EtapaPipeline::Visita,
            EstadoPropuesta::Borrador,
            PurgeScore::new(3, 2, 3, 3, 2),
        ),
        (
            "Local comercial Av. Central",
            "Grupo Norte",
            120000.0,
            EtapaPipeline::Prospecto,
            EstadoPropuesta::Borrador,
            PurgeScore::new(1, 1, 2, 2, 1),
        ),
    ];

    let mut first = None;
    for (titulo, contacto, precio, etapa, estado, purge) in samples {
        let id = create_propuesta(state, company_id, titulo, contacto, precio, "").await?;
        update_propuesta_etapa(state, &id, etapa).await?;
        update_propuesta_estado(state, &id, estado).await?;
        update_propuesta_purge(state, &id, purge).await?;
        if first.is_none() {
            first = Some(id);
        }
    }

    let detalle = PlanDetalle {
        reserva: Some(ConceptoPlan::porcentaje(5.0)),
        separacion: Some(ConceptoPlan::porcentaje(5.0)),
        inicial: Some(ConceptoInicial {
            tipo: TipoMonto::Porcentaje,
            valor: 20.0,
            cuotas: 4,
        }),
        contra_entrega: Some(ConceptoPlan::porcentaje(70.0)),
        financiamiento: Some(Financiamiento::default()),
    };
    create_plan_pago(
        state,
        company_id,
        PlanPagoInput {
            nombre: "Plan estándar Torre Mar".into(),
            precio_total: 200000.0,
            moneda: String::new(),
            detalle,
            propuesta_id: first,
        },
    )
    .await?;
    Ok(())
}
