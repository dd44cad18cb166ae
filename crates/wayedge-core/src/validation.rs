//! Input shape validation.
//!
//! Validation is a pure pre-check: every operation validates its whole
//! input before touching the store, and reports every failing field at
//! once rather than stopping at the first.

use std::fmt;

use serde::Serialize;

/// Minimum length of a website name or tenant display name.
pub const MIN_NAME_LEN: usize = 2;
/// Minimum length of a domain string.
pub const MIN_DOMAIN_LEN: usize = 3;
/// Minimum length of a password (current or new).
pub const MIN_PASSWORD_LEN: usize = 8;

/// A single failing field, addressed by its path in the input
/// (e.g. `domains[2].domain`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Accumulated validation failures for one input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Returns true if any error was recorded for exactly `field`.
    pub fn has_field(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }

    /// Require at least `min` characters (not bytes).
    pub fn min_chars(&mut self, field: &str, value: &str, min: usize) {
        if value.chars().count() < min {
            self.push(field, format!("must contain at least {min} character(s)"));
        }
    }

    pub fn non_empty(&mut self, field: &str, value: &str) {
        self.min_chars(field, value, 1);
    }

    pub fn min_items(&mut self, field: &str, len: usize, min: usize) {
        if len < min {
            self.push(field, format!("must contain at least {min} element(s)"));
        }
    }

    pub fn email(&mut self, field: &str, value: &str) {
        if !is_plausible_email(value) {
            self.push(field, "invalid email");
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for e in &self.errors {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", e.field, e.message)?;
            first = false;
        }
        Ok(())
    }
}

/// Shape validation for client-submitted input.
pub trait Validate {
    /// Record failures under `prefix` (empty for a top-level input).
    fn validate_at(&self, prefix: &str, errors: &mut ValidationErrors);

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        self.validate_at("", &mut errors);
        errors.into_result()
    }
}

/// Join a field name onto a path prefix.
pub fn field_path(prefix: &str, field: &str) -> String {
    if prefix.is_empty() {
        field.to_string()
    } else {
        format!("{prefix}.{field}")
    }
}

/// Validate every element of a list, addressing each as `prefix[i]`.
pub fn validate_each<T: Validate>(prefix: &str, items: &[T], errors: &mut ValidationErrors) {
    for (i, item) in items.iter().enumerate() {
        item.validate_at(&format!("{prefix}[{i}]"), errors);
    }
}

fn is_plausible_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !value.chars().any(char::is_whitespace)
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty() && !tld.ends_with('.'))
}
