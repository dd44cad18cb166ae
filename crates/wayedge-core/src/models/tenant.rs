//! Tenant domain model.
//!
//! A tenant is the account that owns websites. Registration and login
//! live outside this crate; the console only resolves an already
//! established tenant identity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::validation::{MIN_NAME_LEN, MIN_PASSWORD_LEN, Validate, ValidationErrors, field_path};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tenant {
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Unique across all tenants.
    pub email: String,
    /// Argon2id PHC string.
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to provision a tenant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTenant {
    pub name: String,
    pub email: String,
    /// Raw password (hashed with Argon2id before storage).
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateTenant {
    pub name: Option<String>,
    pub email: Option<String>,
}

/// Account settings form: display name and email.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateProfile {
    pub name: String,
    pub email: String,
}

impl Validate for UpdateProfile {
    fn validate_at(&self, prefix: &str, errors: &mut ValidationErrors) {
        errors.min_chars(&field_path(prefix, "name"), &self.name, MIN_NAME_LEN);
        errors.email(&field_path(prefix, "email"), &self.email);
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangePassword {
    pub current_password: String,
    pub new_password: String,
}

impl Validate for ChangePassword {
    fn validate_at(&self, prefix: &str, errors: &mut ValidationErrors) {
        errors.min_chars(
            &field_path(prefix, "current_password"),
            &self.current_password,
            MIN_PASSWORD_LEN,
        );
        errors.min_chars(
            &field_path(prefix, "new_password"),
            &self.new_password,
            MIN_PASSWORD_LEN,
        );
    }
}
