// tenant.rs
// Tenant middleware to scope routes to one company and extractor to access it.

use std::sync::Arc;

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, StatusCode, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use futures::future::BoxFuture;
use bson::oid::ObjectId;
use tracing::error;

use crate::models::Company;
use crate::state::{AppState, get_company_by_slug};

pub const TENANT_HEADER: &str = "x-tenant";

#[derive(Clone, Debug)]
pub struct TenantData {
    pub company_id: ObjectId,
    pub slug: String,
    pub name: String,
    pub default_currency: String,
}

impl TryFrom<Company> for TenantData {
    type Error = ();

    fn try_from(company: Company) -> Result<Self, Self::Error> {
        Ok(Self {
            company_id: company.id.ok_or(())?,
            slug: company.slug,
            name: company.name,
            default_currency: company.default_currency,
        })
    }
}

pub async fn require_tenant(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, Response> {
    let Some(slug) = tenant_slug(request.headers()) else {
        return Err(unauthorized_response());
    };

    let company = match get_company_by_slug(&state, &slug).await {
        Ok(Some(c)) if c.is_active => c,
        Ok(_) => return Err(unauthorized_response()),
        Err(err) => {
            error!(error = %err, slug = %slug, "tenant lookup failed");
            return Err((StatusCode::INTERNAL_SERVER_ERROR, "tenant lookup failed").into_response());
        }
    };

    let tenant = TenantData::try_from(company).map_err(|_| unauthorized_response())?;
    request.extensions_mut().insert(tenant);
    Ok(next.run(request).await)
}

pub struct Tenant(pub TenantData);

impl Tenant {
    pub fn company_id(&self) -> &ObjectId {
        &self.0.company_id
    }

    pub fn slug(&self) -> &str {
        &self.0.slug
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn default_currency(&self) -> &str {
        &self.0.default_currency
    }

    pub fn owns(&self, company_id: &ObjectId) -> bool {
        &self.0.company_id == company_id
    }
}

#[allow(refining_impl_trait)]
impl<S> FromRequestParts<S> for Tenant
where
    S: Send + Sync,
{
    type Rejection = Response;

    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> BoxFuture<'static, Result<Self, Self::Rejection>> {
        let data = parts
            .extensions
            .get::<TenantData>()
            .cloned()
            .ok_or_else(unauthorized_response);

        Box::pin(async move { data.map(Tenant) })
    }
}

fn unauthorized_response() -> Response {
    (StatusCode::UNAUTHORIZED, "unknown tenant").into_response()
}

/// Subdomain wins (`acme.example.com`, `acme.localhost`); otherwise the `x-tenant` header.
pub fn tenant_slug(headers: &HeaderMap) -> Option<String> {
    if let Some(sub) = headers
        .get("host")
        .and_then(|h| h.to_str().ok())
        .and_then(subdomain)
    {
        return Some(sub);
    }

    headers
        .get(TENANT_HEADER)
        .and_then(|h| h.to_str().ok())
        .map(|v| v.trim().to_lowercase())
        .filter(|v| !v.is_empty())
}

fn subdomain(host: &str) -> Option<String> {
    let host_no_port = host.split(':').next().unwrap_or(host);
    if host_no_port.parse::<std::net::Ipv4Addr>().is_ok() {
        return None;
    }
    let parts: Vec<&str> = host_no_port.split('.').collect();
    let has_local_sub = parts.len() == 2 && parts[1].eq_ignore_ascii_case("localhost");
    let has_std_sub = parts.len() >= 3;
    if (has_std_sub || has_local_sub) && !parts[0].eq_ignore_ascii_case("www") {
        Some(parts[0].to_lowercase())
    } else {
        None
    }
}
