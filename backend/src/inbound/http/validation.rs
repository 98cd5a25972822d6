//! Shared parsing helpers for inbound HTTP adapters.
//!
//! Request DTOs carry raw strings so malformed input becomes a structured
//! `VALIDATION-ERROR` naming the offending field rather than a framework
//! deserialisation failure.

use std::str::FromStr;

use chrono::NaiveDate;
use serde_json::json;
use uuid::Uuid;

use crate::domain::{Error, UnknownDecision};

/// Validation failure codes reported in error details.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidUuid,
    InvalidDate,
    InvalidDecision,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidUuid => "invalid_uuid",
            ErrorCode::InvalidDate => "invalid_date",
            ErrorCode::InvalidDecision => "invalid_decision",
        }
    }
}

/// Wire name of a request field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(self) -> &'static str {
        self.0
    }
}

fn field_error(field: FieldName, code: ErrorCode, message: String, value: Option<&str>) -> Error {
    let mut details = json!({
        "field": field.as_str(),
        "code": code.as_str(),
    });
    if let Some(value) = value {
        details["value"] = json!(value);
    }
    Error::invalid_request(message).with_details(details)
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    field_error(
        field,
        ErrorCode::MissingField,
        format!("missing required field: {}", field.as_str()),
        None,
    )
}

/// Unwrap a required field.
pub(crate) fn required<T>(value: Option<T>, field: FieldName) -> Result<T, Error> {
    value.ok_or_else(|| missing_field_error(field))
}

/// Parse a UUID into one of the typed identifiers.
pub(crate) fn parse_id<T: From<Uuid>>(value: &str, field: FieldName) -> Result<T, Error> {
    Uuid::parse_str(value).map(T::from).map_err(|_| {
        field_error(
            field,
            ErrorCode::InvalidUuid,
            format!("{} must be a valid UUID", field.as_str()),
            Some(value),
        )
    })
}

pub(crate) fn parse_optional_id<T: From<Uuid>>(
    value: Option<&str>,
    field: FieldName,
) -> Result<Option<T>, Error> {
    value.map(|raw| parse_id(raw, field)).transpose()
}

pub(crate) fn parse_id_list<T: From<Uuid>>(
    values: &[String],
    field: FieldName,
) -> Result<Vec<T>, Error> {
    values.iter().map(|value| parse_id(value, field)).collect()
}

/// Parse an ISO 8601 calendar date (`YYYY-MM-DD`).
pub(crate) fn parse_date(value: &str, field: FieldName) -> Result<NaiveDate, Error> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        field_error(
            field,
            ErrorCode::InvalidDate,
            format!("{} must be a date in YYYY-MM-DD form", field.as_str()),
            Some(value),
        )
    })
}

pub(crate) fn parse_optional_date(
    value: Option<&str>,
    field: FieldName,
) -> Result<Option<NaiveDate>, Error> {
    value.map(|raw| parse_date(raw, field)).transpose()
}

/// Parse one of the upper-case decision values.
pub(crate) fn parse_decision<T>(value: &str, field: FieldName) -> Result<T, Error>
where
    T: FromStr<Err = UnknownDecision>,
{
    value.parse().map_err(|err: UnknownDecision| {
        field_error(field, ErrorCode::InvalidDecision, err.to_string(), Some(value))
    })
}

pub(crate) fn parse_optional_decision<T>(
    value: Option<&str>,
    field: FieldName,
) -> Result<Option<T>, Error>
where
    T: FromStr<Err = UnknownDecision>,
{
    value.map(|raw| parse_decision(raw, field)).transpose()
}
