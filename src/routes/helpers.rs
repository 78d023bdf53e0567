use std::{fmt::Display, str::FromStr};

use askama::Template;
use axum::{http::StatusCode, response::Html};
use chrono::{NaiveDate, Utc};
use bson::oid::ObjectId;
use tracing::error;

pub(super) fn render<T: Template>(tpl: T) -> Result<Html<String>, StatusCode> {
    tpl.render().map(Html).map_err(|err| {
        error!(error = %err, "template render failed");
        StatusCode::INTERNAL_SERVER_ERROR
    })
}

/// Logs a storage failure and maps it to 500.
pub(super) fn internal<E: Display>(err: E) -> StatusCode {
    error!(error = %err, "request failed");
    StatusCode::INTERNAL_SERVER_ERROR
}

pub(super) fn parse_object_id(value: &str) -> Result<ObjectId, StatusCode> {
    ObjectId::from_str(value.trim()).map_err(|_| StatusCode::BAD_REQUEST)
}

pub(super) fn parse_optional_object_id(value: Option<&str>) -> Result<Option<ObjectId>, StatusCode> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) => parse_object_id(v).map(Some),
        None => Ok(None),
    }
}

/// First installment falls on today's date.
pub(super) fn primera_cuota() -> NaiveDate {
    Utc::now().date_naive()
}
