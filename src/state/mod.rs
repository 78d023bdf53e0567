// state module: AppState, initialization, and re-exports of submodules.

use anyhow::Result;
use bson::DateTime;
use chrono::Utc;
use mongodb::{Client, Collection};
use tracing::info;

use crate::config::AppConfig;
use crate::models::{Company, PlanPago, PreferenciasDoc, Propuesta};

mod companies;
mod planes;
mod preferencias;
mod propuestas;
mod seed;

pub use companies::*;
pub use planes::*;
pub use propuestas::*;

#[derive(Clone)]
pub struct AppState {
    pub companies: Collection<Company>,
    pub planes: Collection<PlanPago>,
    pub propuestas: Collection<Propuesta>,
    pub preferencias: Collection<PreferenciasDoc>,
    pub default_currency: String,
}

/// Timestamp for `created_at`/`updated_at` fields.
pub(crate) fn ahora() -> DateTime {
    DateTime::from_chrono(Utc::now())
}

pub async fn init_state_with(config: &AppConfig) -> Result<AppState> {
    let client = Client::with_uri_str(&config.mongodb_uri).await?;
    let db = client.database(&config.mongodb_db);

    seed::ensure_collections(&db).await?;

    let state = AppState {
        companies: db.collection::<Company>("companies"),
        planes: db.collection::<PlanPago>("planes_pago"),
        propuestas: db.collection::<Propuesta>("propuestas"),
        preferencias: db.collection::<PreferenciasDoc>("preferencias"),
        default_currency: config.default_currency.clone(),
    };

    // Only seed when the database is effectively empty (no companies).
    if seed::is_database_empty(&state).await? {
        info!(db = %config.mongodb_db, "seeding empty database");
        let companies = seed::load_seed_companies(&config.companies_file)?;
        let company_ids = seed::seed_companies(&state, &companies).await?;
        if let Some(first) = company_ids.first() {
            seed::seed_sample_pipeline(&state, first).await?;
        }
    }

    Ok(state)
}
