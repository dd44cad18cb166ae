//! Domain (hostname) bound to a website.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::reconcile::Keyed;
use crate::validation::{MIN_DOMAIN_LEN, Validate, ValidationErrors, field_path};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Domain {
    pub id: Uuid,
    pub website_id: Uuid,
    /// Not globally unique; two websites may list the same hostname.
    pub domain: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Mutable fields of a domain.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DomainFields {
    pub domain: String,
}

impl DomainFields {
    pub fn new(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
        }
    }
}

impl Validate for DomainFields {
    fn validate_at(&self, prefix: &str, errors: &mut ValidationErrors) {
        errors.min_chars(&field_path(prefix, "domain"), &self.domain, MIN_DOMAIN_LEN);
    }
}

impl Keyed for Domain {
    fn key(&self) -> Uuid {
        self.id
    }
}
