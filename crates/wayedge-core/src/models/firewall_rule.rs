//! Firewall rule: a regex pattern; matching requests are blocked.
//!
//! Zero rules means "allow all".

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::reconcile::Keyed;
use crate::validation::{Validate, ValidationErrors, field_path};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FirewallRule {
    pub id: Uuid,
    pub website_id: Uuid,
    pub pattern: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FirewallRuleFields {
    pub pattern: String,
}

impl FirewallRuleFields {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
        }
    }
}

impl Validate for FirewallRuleFields {
    fn validate_at(&self, prefix: &str, errors: &mut ValidationErrors) {
        errors.non_empty(&field_path(prefix, "pattern"), &self.pattern);
    }
}

impl Keyed for FirewallRule {
    fn key(&self) -> Uuid {
        self.id
    }
}
