// preferences.rs
// Per-user view preferences, stored through an injected collaborator.

use std::{collections::HashMap, future::Future, sync::Mutex};

use anyhow::{Result, anyhow};
use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Vista {
    #[default]
    Kanban,
    Lista,
}

impl Vista {
    pub fn alternar(self) -> Self {
        match self {
            Vista::Kanban => Vista::Lista,
            Vista::Lista => Vista::Kanban,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Preferencias {
    #[serde(default)]
    pub vista_actividades: Vista,
    #[serde(default)]
    pub vista_propuestas: Vista,
}

pub trait AlmacenPreferencias {
    fn cargar(
        &self,
        company_id: &ObjectId,
        usuario: &str,
    ) -> impl Future<Output = Result<Option<Preferencias>>> + Send;

    fn guardar(
        &self,
        company_id: &ObjectId,
        usuario: &str,
        preferencias: Preferencias,
    ) -> impl Future<Output = Result<()>> + Send;
}

/// Loads preferences, falling back to defaults when none are stored.
pub async fn preferencias_de<A>(almacen: &A, company_id: &ObjectId, usuario: &str) -> Result<Preferencias>
where
    A: AlmacenPreferencias + Sync,
{
    Ok(almacen
        .cargar(company_id, usuario)
        .await?
        .unwrap_or_default())
}

/// In-process store, used where no database is available.
#[derive(Default)]
pub struct MemoriaPreferencias {
    datos: Mutex<HashMap<(ObjectId, String), Preferencias>>,
}

impl AlmacenPreferencias for MemoriaPreferencias {
    async fn cargar(&self, company_id: &ObjectId, usuario: &str) -> Result<Option<Preferencias>> {
        let datos = self
            .datos
            .lock()
            .map_err(|_| anyhow!("preferences lock poisoned"))?;
        Ok(datos.get(&(*company_id, usuario.to_string())).copied())
    }

    async fn guardar(
        &self,
        company_id: &ObjectId,
        usuario: &str,
        preferencias: Preferencias,
    ) -> Result<()> {
        let mut datos = self
            .datos
            .lock()
            .map_err(|_| anyhow!("preferences lock poisoned"))?;
        datos.insert((*company_id, usuario.to_string()), preferencias);
        Ok(())
    }
}
