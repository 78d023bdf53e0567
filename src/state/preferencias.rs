use anyhow::Result;
use bson::{doc, oid::ObjectId};

use crate::preferences::{AlmacenPreferencias, Preferencias};

use super::{AppState, ahora};

impl AlmacenPreferencias for AppState {
    async fn cargar(&self, company_id: &ObjectId, usuario: &str) -> Result<Option<Preferencias>> {
        let found = self
            .preferencias
            .find_one(doc! { "company_id": company_id, "usuario": usuario })
            .await?;
        Ok(found.map(|d| d.preferencias))
    }

    async fn guardar(
        &self,
        company_id: &ObjectId,
        usuario: &str,
        preferencias: Preferencias,
    ) -> Result<()> {
        let preferencias = bson::to_bson(&preferencias)?;
        self.preferencias
            .update_one(
                doc! { "company_id": company_id, "usuario": usuario },
                doc! { "$set": {
                    "preferencias": preferencias,
                    "updated_at": ahora(),
                } },
            )
            .upsert(true)
            .await?;
        Ok(())
    }
}
