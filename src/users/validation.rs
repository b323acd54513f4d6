use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

use crate::users::{
    dto::UserForm,
    repo_types::{NewUser, UserChanges},
};

pub const MAX_FIELD_LEN: usize = 255;

/// A single field-level validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Violation {
    #[error("Invalid user id")]
    InvalidId,
    #[error("Name is required")]
    NameRequired,
    #[error("Name is too long")]
    NameTooLong,
    #[error("Email is required")]
    EmailRequired,
    #[error("Invalid email address")]
    EmailInvalidFormat,
    #[error("Email is too long")]
    EmailTooLong,
}

/// Every failing field, at most one violation each, in field order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violations(Vec<Violation>);

impl Violations {
    pub fn first(&self) -> Violation {
        // constructed only from a non-empty list
        self.0[0]
    }

    pub fn all(&self) -> &[Violation] {
        &self.0
    }
}

impl std::fmt::Display for Violations {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.first())
    }
}

impl std::error::Error for Violations {}

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s.]+(\.[^@\s.]+)+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

fn check_name(name: Option<&str>) -> Result<String, Violation> {
    let name = name.unwrap_or_default();
    if name.is_empty() {
        return Err(Violation::NameRequired);
    }
    if name.chars().count() > MAX_FIELD_LEN {
        return Err(Violation::NameTooLong);
    }
    Ok(name.to_string())
}

fn check_email(email: Option<&str>) -> Result<String, Violation> {
    let email = email.unwrap_or_default();
    if email.is_empty() {
        return Err(Violation::EmailRequired);
    }
    if !is_valid_email(email) {
        return Err(Violation::EmailInvalidFormat);
    }
    if email.chars().count() > MAX_FIELD_LEN {
        return Err(Violation::EmailTooLong);
    }
    Ok(email.to_string())
}

/// Parse a raw record id.
pub fn parse_id(raw: &str) -> Result<i32, Violation> {
    raw.trim().parse::<i32>().map_err(|_| Violation::InvalidId)
}

fn check_id(id: Option<&str>) -> Result<i32, Violation> {
    id.map_or(Err(Violation::InvalidId), parse_id)
}

fn collect<T>(result: Result<T, Violation>, violations: &mut Vec<Violation>) -> Option<T> {
    match result {
        Ok(v) => Some(v),
        Err(v) => {
            violations.push(v);
            None
        }
    }
}

/// Validate input for a create.
pub fn validate_new(form: &UserForm) -> Result<NewUser, Violations> {
    let mut violations = Vec::new();
    let name = collect(check_name(form.name.as_deref()), &mut violations);
    let email = collect(check_email(form.email.as_deref()), &mut violations);

    match (name, email) {
        (Some(name), Some(email)) => Ok(NewUser { name, email }),
        _ => Err(Violations(violations)),
    }
}

/// Validate input for an update; `id` is checked before the record fields.
pub fn validate_changes(form: &UserForm) -> Result<UserChanges, Violations> {
    let mut violations = Vec::new();
    let id = collect(check_id(form.id.as_deref()), &mut violations);
    let name = collect(check_name(form.name.as_deref()), &mut violations);
    let email = collect(check_email(form.email.as_deref()), &mut violations);

    match (id, name, email) {
        (Some(id), Some(name), Some(email)) => Ok(UserChanges { id, name, email }),
        _ => Err(Violations(violations)),
    }
}
