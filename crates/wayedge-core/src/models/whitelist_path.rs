//! Path exempted from website protection.
//!
//! Only meaningful while the website's protection flag is on; zero
//! paths means every path is protected.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::reconcile::Keyed;
use crate::validation::{Validate, ValidationErrors, field_path};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WhitelistPath {
    pub id: Uuid,
    pub website_id: Uuid,
    pub path: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WhitelistPathFields {
    pub path: String,
}

impl WhitelistPathFields {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

impl Validate for WhitelistPathFields {
    fn validate_at(&self, prefix: &str, errors: &mut ValidationErrors) {
        errors.non_empty(&field_path(prefix, "path"), &self.path);
    }
}

impl Keyed for WhitelistPath {
    fn key(&self) -> Uuid {
        self.id
    }
}
