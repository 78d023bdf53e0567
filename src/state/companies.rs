use anyhow::{Context, Result};
use futures::stream::TryStreamExt;
use bson::{doc, oid::ObjectId};
use slug::slugify;

use crate::models::Company;

use super::{AppState, ahora};

pub async fn list_companies(state: &AppState) -> Result<Vec<Company>> {
    let mut cursor = state.companies.find(doc! {}).await?;
    let mut companies = Vec::new();
    while let Some(company) = cursor.try_next().await? {
        companies.push(company);
    }
    Ok(companies)
}

pub async fn get_company_by_id(state: &AppState, id: &ObjectId) -> Result<Option<Company>> {
    state
        .companies
        .find_one(doc! { "_id": id })
        .await
        .map_err(Into::into)
}

pub async fn get_company_by_slug(state: &AppState, slug: &str) -> Result<Option<Company>> {
    state
        .companies
        .find_one(doc! { "slug": slug.to_lowercase() })
        .await
        .map_err(Into::into)
}

pub async fn create_company(
    state: &AppState,
    name: &str,
    slug: &str,
    default_currency: &str,
) -> Result<ObjectId> {
    let slug = if slug.trim().is_empty() {
        slugify(name)
    } else {
        slugify(slug)
    };

    let currency = if default_currency.trim().is_empty() {
        state.default_currency.clone()
    } else {
        default_currency.trim().to_uppercase()
    };

    let res = state
        .companies
        .insert_one(Company {
            id: None,
            name: name.to_string(),
            slug,
            default_currency: currency,
            is_active: true,
            created_at: Some(ahora()),
            updated_at: None,
        })
        .await?;

    res.inserted_id
        .as_object_id()
        .context("company insert missing _id")
}

pub async fn company_default_currency(state: &AppState, company_id: &ObjectId) -> Result<String> {
    let company = get_company_by_id(state, company_id)
        .await?
        .context("company not found for currency fallback")?;
    Ok(if company.default_currency.trim().is_empty() {
        state.default_currency.clone()
    } else {
        company.default_currency
    })
}
