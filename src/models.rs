// models.rs
// Documents stored in MongoDB. Every business document is scoped to a company (tenant).

use bson::{DateTime, oid::ObjectId};
use serde::{Deserialize, Serialize};

use crate::pipeline::{EstadoPropuesta, EtapaPipeline};
use crate::plan::PlanDetalle;
use crate::preferences::Preferencias;
use crate::purge::PurgeScore;

/// Company definition as stored in companies.json.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedCompany {
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub default_currency: Option<String>,
}

/// Tenant: a real-estate agency.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Company {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub slug: String,
    pub default_currency: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime>,
}

fn default_true() -> bool {
    true
}

/// Payment plan; `detalle` keeps the breakdown exactly as edited.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanPago {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub company_id: ObjectId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub propuesta_id: Option<ObjectId>,
    pub nombre: String,
    pub precio_total: f64,
    pub moneda: String,
    #[serde(default)]
    pub detalle: PlanDetalle,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime>,
}

/// Sales proposal tracked on the Kanban board.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Propuesta {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub company_id: ObjectId,
    pub titulo: String,
    pub contacto: String,
    pub precio_total: f64,
    pub moneda: String,
    #[serde(default)]
    pub estado: EstadoPropuesta,
    #[serde(default)]
    pub etapa: EtapaPipeline,
    #[serde(default)]
    pub purge: PurgeScore,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreferenciasDoc {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub company_id: ObjectId,
    pub usuario: String,
    pub preferencias: Preferencias,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime>,
}
