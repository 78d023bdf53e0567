use axum::Json;
use serde::Serialize;

use crate::tenant::Tenant;

#[derive(Serialize)]
pub struct EmpresaActual {
    id: String,
    name: String,
    slug: String,
    default_currency: String,
}

/// GET /api/empresa -> company resolved for this request.
pub async fn empresa_actual(tenant: Tenant) -> Json<EmpresaActual> {
    Json(EmpresaActual {
        id: tenant.company_id().to_hex(),
        name: tenant.name().to_string(),
        slug: tenant.slug().to_string(),
        default_currency: tenant.default_currency().to_string(),
    })
}
