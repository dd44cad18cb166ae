//! Website domain model.
//!
//! A website is a tenant's CDN configuration unit. Deleting a website
//! removes its domains, origins, firewall rules and whitelist paths.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::domain::{Domain, DomainFields};
use crate::models::firewall_rule::FirewallRule;
use crate::models::origin::{Origin, OriginFields};
use crate::models::whitelist_path::{WhitelistPath, WhitelistPathFields};
use crate::reconcile::Desired;
use crate::validation::{MIN_NAME_LEN, Validate, ValidationErrors, field_path, validate_each};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Website {
    pub id: Uuid,
    /// Owning tenant.
    pub tenant_id: Uuid,
    pub name: String,
    /// Protection ("Waytect") flag. Whitelist paths are exemptions from it.
    pub protection_enabled: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to create a website together with its initial
/// domains and, optionally, origins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateWebsite {
    pub name: String,
    pub domains: Vec<DomainFields>,
    #[serde(default)]
    pub origins: Option<Vec<OriginFields>>,
}

impl Validate for CreateWebsite {
    fn validate_at(&self, prefix: &str, errors: &mut ValidationErrors) {
        errors.min_chars(&field_path(prefix, "name"), &self.name, MIN_NAME_LEN);

        let domains = field_path(prefix, "domains");
        errors.min_items(&domains, self.domains.len(), 1);
        validate_each(&domains, &self.domains, errors);

        if let Some(origins) = &self.origins {
            validate_each(&field_path(prefix, "origins"), origins, errors);
        }
    }
}

/// General website fields. Only the name is editable here; child
/// collections have their own operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateWebsite {
    pub name: String,
}

impl Validate for UpdateWebsite {
    fn validate_at(&self, prefix: &str, errors: &mut ValidationErrors) {
        errors.min_chars(&field_path(prefix, "name"), &self.name, MIN_NAME_LEN);
    }
}

/// Desired protection state: the flag plus the full whitelist.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProtectionSettings {
    pub enabled: bool,
    pub paths: Vec<Desired<WhitelistPathFields>>,
}

impl Validate for ProtectionSettings {
    fn validate_at(&self, prefix: &str, errors: &mut ValidationErrors) {
        validate_each(&field_path(prefix, "paths"), &self.paths, errors);
    }
}

/// Website list entry: the website and its domains.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebsiteWithDomains {
    #[serde(flatten)]
    pub website: Website,
    pub domains: Vec<Domain>,
}

/// A website with every child collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebsiteDetail {
    #[serde(flatten)]
    pub website: Website,
    pub domains: Vec<Domain>,
    pub origins: Vec<Origin>,
    pub firewall_rules: Vec<FirewallRule>,
    pub whitelist_paths: Vec<WhitelistPath>,
}

/// Result of a firewall save: the website including its rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebsiteFirewall {
    #[serde(flatten)]
    pub website: Website,
    pub firewall_rules: Vec<FirewallRule>,
}

/// Result of a protection save: the website (with its flag) including
/// its whitelist paths.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebsiteProtection {
    #[serde(flatten)]
    pub website: Website,
    pub whitelist_paths: Vec<WhitelistPath>,
}

/// Per-tenant counters shown on the dashboard.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DashboardSummary {
    pub websites: u64,
    pub domains: u64,
}
