//! Repository trait definitions for data access abstraction.
//!
//! All repository operations are async. Website lookups always filter by
//! both the website id and the owning tenant id; child collections are
//! scoped by website id. Callers above this layer are expected to have
//! authorized the website before touching its children.

use uuid::Uuid;

use crate::error::WayedgeResult;
use crate::models::{
    domain::{Domain, DomainFields},
    firewall_rule::{FirewallRule, FirewallRuleFields},
    origin::{Origin, OriginFields},
    tenant::{CreateTenant, Tenant, UpdateTenant},
    website::{CreateWebsite, UpdateWebsite, Website, WebsiteWithDomains},
    whitelist_path::{WhitelistPath, WhitelistPathFields},
};
use crate::reconcile::{Keyed, ReconcilePlan};

// ---------------------------------------------------------------------------
// Tenants (global scope)
// ---------------------------------------------------------------------------

pub trait TenantRepository: Send + Sync {
    fn create(&self, input: CreateTenant) -> impl Future<Output = WayedgeResult<Tenant>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = WayedgeResult<Tenant>> + Send;
    fn get_by_email(&self, email: &str) -> impl Future<Output = WayedgeResult<Tenant>> + Send;
    fn update(
        &self,
        id: Uuid,
        input: UpdateTenant,
    ) -> impl Future<Output = WayedgeResult<Tenant>> + Send;
    /// Hash and store a new password.
    fn set_password(
        &self,
        id: Uuid,
        password: &str,
    ) -> impl Future<Output = WayedgeResult<()>> + Send;
}

// ---------------------------------------------------------------------------
// Websites (tenant scope)
// ---------------------------------------------------------------------------

pub trait WebsiteRepository: Send + Sync {
    /// Create the website with its initial domains and origins as one
    /// atomic write.
    fn create(
        &self,
        tenant_id: Uuid,
        input: CreateWebsite,
    ) -> impl Future<Output = WayedgeResult<Website>> + Send;
    /// Look up a website by id **and** owner. A website owned by another
    /// tenant is reported as not found.
    fn get_by_id(
        &self,
        tenant_id: Uuid,
        id: Uuid,
    ) -> impl Future<Output = WayedgeResult<Website>> + Send;
    fn count_by_tenant(&self, tenant_id: Uuid) -> impl Future<Output = WayedgeResult<u64>> + Send;
    /// The tenant's websites with their domains, newest first.
    fn list_with_domains(
        &self,
        tenant_id: Uuid,
    ) -> impl Future<Output = WayedgeResult<Vec<WebsiteWithDomains>>> + Send;
    fn update(
        &self,
        tenant_id: Uuid,
        id: Uuid,
        input: UpdateWebsite,
    ) -> impl Future<Output = WayedgeResult<Website>> + Send;
    /// Delete the website and every child record in one transaction.
    fn delete(&self, tenant_id: Uuid, id: Uuid) -> impl Future<Output = WayedgeResult<()>> + Send;
    /// Number of domains across all of the tenant's websites.
    fn count_domains_by_tenant(
        &self,
        tenant_id: Uuid,
    ) -> impl Future<Output = WayedgeResult<u64>> + Send;
}

// ---------------------------------------------------------------------------
// Child collections (website scope)
// ---------------------------------------------------------------------------

/// A website-scoped collection that is saved by identifier-keyed
/// reconciliation.
pub trait ChildRepository: Send + Sync {
    type Record: Keyed + Send;
    type Fields: Send;

    fn list_by_website(
        &self,
        website_id: Uuid,
    ) -> impl Future<Output = WayedgeResult<Vec<Self::Record>>> + Send;

    /// Apply `plan` in one transaction (delete, then update, then create)
    /// and return the collection as re-read after commit.
    ///
    /// Deletes and updates only ever match rows of `website_id`.
    fn apply_plan(
        &self,
        website_id: Uuid,
        plan: ReconcilePlan<Self::Fields>,
    ) -> impl Future<Output = WayedgeResult<Vec<Self::Record>>> + Send;
}

pub trait DomainRepository: ChildRepository<Record = Domain, Fields = DomainFields> {}

impl<T> DomainRepository for T where T: ChildRepository<Record = Domain, Fields = DomainFields> {}

pub trait FirewallRuleRepository:
    ChildRepository<Record = FirewallRule, Fields = FirewallRuleFields>
{
}

impl<T> FirewallRuleRepository for T where
    T: ChildRepository<Record = FirewallRule, Fields = FirewallRuleFields>
{
}

pub trait WhitelistPathRepository:
    ChildRepository<Record = WhitelistPath, Fields = WhitelistPathFields>
{
    /// Like [`ChildRepository::apply_plan`], additionally setting the
    /// website's protection flag inside the same transaction.
    fn apply_plan_with_protection(
        &self,
        website_id: Uuid,
        enabled: bool,
        plan: ReconcilePlan<WhitelistPathFields>,
    ) -> impl Future<Output = WayedgeResult<Vec<WhitelistPath>>> + Send;
}

/// Origins are saved by full replacement, never reconciled.
pub trait OriginRepository: Send + Sync {
    fn list_by_website(
        &self,
        website_id: Uuid,
    ) -> impl Future<Output = WayedgeResult<Vec<Origin>>> + Send;

    /// Delete every origin of the website and create `origins` fresh, in
    /// one transaction. Returns the new collection.
    fn replace_all(
        &self,
        website_id: Uuid,
        origins: Vec<OriginFields>,
    ) -> impl Future<Output = WayedgeResult<Vec<Origin>>> + Send;
}

// ---------------------------------------------------------------------------
// Store (bundle of repositories)
// ---------------------------------------------------------------------------

/// All repositories the console needs, bundled so services can be generic
/// over a single type parameter.
pub trait Store: Send + Sync {
    type Tenants: TenantRepository;
    type Websites: WebsiteRepository;
    type Domains: DomainRepository;
    type Origins: OriginRepository;
    type FirewallRules: FirewallRuleRepository;
    type WhitelistPaths: WhitelistPathRepository;

    fn tenants(&self) -> &Self::Tenants;
    fn websites(&self) -> &Self::Websites;
    fn domains(&self) -> &Self::Domains;
    fn origins(&self) -> &Self::Origins;
    fn firewall_rules(&self) -> &Self::FirewallRules;
    fn whitelist_paths(&self) -> &Self::WhitelistPaths;
}
