// src/utils/forms.rs

use chrono::NaiveDate;
use regex::Regex;
use std::sync::OnceLock;

use crate::error::AppError;

/// Browser forms submit untouched fields as empty strings; treat those as
/// absent so optional columns stay NULL instead of collecting "".
pub fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parses the `dt_nascimento` form field.
///
/// The field is optional; when present it must use the `YYYY-MM-DD` format
/// and a malformed value is rejected naming the field.
pub fn parse_birth_date(raw: Option<String>) -> Result<Option<NaiveDate>, AppError> {
    match non_empty(raw) {
        None => Ok(None),
        Some(value) => NaiveDate::parse_from_str(&value, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| {
                AppError::BadRequest("dt_nascimento must use the YYYY-MM-DD format".to_string())
            }),
    }
}

fn cpf_regex() -> &'static Regex {
    static CPF_RE: OnceLock<Regex> = OnceLock::new();
    CPF_RE.get_or_init(|| Regex::new(r"^\d{3}\.?\d{3}\.?\d{3}-?\d{2}$").expect("valid CPF regex"))
}

/// Parses the optional `cpf` form field, accepting the bare 11 digits or the
/// punctuated `XXX.XXX.XXX-XX` form.
pub fn parse_cpf(raw: Option<String>) -> Result<Option<String>, AppError> {
    match non_empty(raw) {
        None => Ok(None),
        Some(value) => {
            if cpf_regex().is_match(&value) {
                Ok(Some(value))
            } else {
                Err(AppError::BadRequest(
                    "cpf must be 11 digits, optionally punctuated as XXX.XXX.XXX-XX".to_string(),
                ))
            }
        }
    }
}

/// Canonical form of an email address: trimmed and lowercased, so the unique
/// index enforces case-insensitive uniqueness.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
