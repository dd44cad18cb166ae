//! Website service: the tenant-facing operations on websites and their
//! child collections.

use tracing::info;
use uuid::Uuid;
use wayedge_core::error::WayedgeResult;
use wayedge_core::models::domain::{Domain, DomainFields};
use wayedge_core::models::firewall_rule::FirewallRuleFields;
use wayedge_core::models::origin::{Origin, OriginFields};
use wayedge_core::models::website::{
    CreateWebsite, DashboardSummary, ProtectionSettings, UpdateWebsite, Website, WebsiteDetail,
    WebsiteFirewall, WebsiteProtection, WebsiteWithDomains,
};
use wayedge_core::reconcile::Desired;
use wayedge_core::repository::{
    ChildRepository, OriginRepository, Store, WebsiteRepository, WhitelistPathRepository,
};
use wayedge_core::validation::{Validate, ValidationErrors, validate_each};

use crate::collections::{plan_children, reconcile_children};
use crate::config::ConsoleConfig;
use crate::gate::{self, Caller, OwnedWebsite};
use crate::quota::QuotaEnforcer;

/// Website management service.
///
/// Generic over a [`Store`] so that the console has no dependency on the
/// database crate. Operations on an existing website take the
/// [`OwnedWebsite`] handle produced by [`WebsiteService::authorize`].
pub struct WebsiteService<S: Store> {
    store: S,
    quota: QuotaEnforcer,
}

impl<S: Store> WebsiteService<S> {
    pub fn new(store: S, config: &ConsoleConfig) -> Self {
        Self {
            store,
            quota: QuotaEnforcer::new(config.website_quota),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub async fn resolve_caller(&self, session_tenant: Option<Uuid>) -> WayedgeResult<Caller> {
        gate::resolve_caller(self.store.tenants(), session_tenant).await
    }

    pub async fn authorize(
        &self,
        caller: &Caller,
        website_id: Uuid,
    ) -> WayedgeResult<OwnedWebsite> {
        gate::authorize(self.store.websites(), caller, website_id).await
    }

    /// Create a website with its initial domains and origins.
    pub async fn create_website(
        &self,
        caller: &Caller,
        input: CreateWebsite,
    ) -> WayedgeResult<Website> {
        // 1. Shape check.
        input.validate()?;

        // 2. Quota.
        self.quota.check(self.store.websites(), caller).await?;

        // 3. Nested create.
        let domains = input.domains.len();
        let website = self
            .store
            .websites()
            .create(caller.tenant_id(), input)
            .await?;

        info!(
            tenant_id = %caller.tenant_id(),
            website_id = %website.id,
            domains,
            "Website created"
        );
        Ok(website)
    }

    pub async fn update_website_name(
        &self,
        website: &OwnedWebsite,
        input: UpdateWebsite,
    ) -> WayedgeResult<Website> {
        input.validate()?;

        let updated = self
            .store
            .websites()
            .update(website.tenant_id(), website.id(), input)
            .await?;

        info!(website_id = %website.id(), "Website renamed");
        Ok(updated)
    }

    /// Delete the website together with every child record.
    pub async fn delete_website(&self, website: OwnedWebsite) -> WayedgeResult<()> {
        self.store
            .websites()
            .delete(website.tenant_id(), website.id())
            .await?;

        info!(
            tenant_id = %website.tenant_id(),
            website_id = %website.id(),
            "Website deleted"
        );
        Ok(())
    }

    /// The caller's websites with their domains, newest first.
    pub async fn list_websites(&self, caller: &Caller) -> WayedgeResult<Vec<WebsiteWithDomains>> {
        self.store
            .websites()
            .list_with_domains(caller.tenant_id())
            .await
    }

    /// Authorize and load a website with every child collection.
    pub async fn get_website(
        &self,
        caller: &Caller,
        website_id: Uuid,
    ) -> WayedgeResult<WebsiteDetail> {
        let website = self.authorize(caller, website_id).await?;
        let id = website.id();

        Ok(WebsiteDetail {
            domains: self.store.domains().list_by_website(id).await?,
            origins: self.store.origins().list_by_website(id).await?,
            firewall_rules: self.store.firewall_rules().list_by_website(id).await?,
            whitelist_paths: self.store.whitelist_paths().list_by_website(id).await?,
            website: website.into_website(),
        })
    }

    pub async fn dashboard_summary(&self, caller: &Caller) -> WayedgeResult<DashboardSummary> {
        let websites = self.store.websites();
        Ok(DashboardSummary {
            websites: websites.count_by_tenant(caller.tenant_id()).await?,
            domains: websites.count_domains_by_tenant(caller.tenant_id()).await?,
        })
    }

    /// Save the website's domains by reconciliation. Returns the domains
    /// as persisted after the save.
    pub async fn reconcile_domains(
        &self,
        website: &OwnedWebsite,
        desired: Vec<Desired<DomainFields>>,
    ) -> WayedgeResult<Vec<Domain>> {
        let domains = reconcile_children(self.store.domains(), website, "domains", desired).await?;

        info!(website_id = %website.id(), count = domains.len(), "Domains saved");
        Ok(domains)
    }

    /// Save the website's firewall rules by reconciliation.
    pub async fn reconcile_firewall_rules(
        &self,
        website: &OwnedWebsite,
        desired: Vec<Desired<FirewallRuleFields>>,
    ) -> WayedgeResult<WebsiteFirewall> {
        let firewall_rules =
            reconcile_children(self.store.firewall_rules(), website, "firewall_rules", desired)
                .await?;

        info!(
            website_id = %website.id(),
            count = firewall_rules.len(),
            "Firewall rules saved"
        );
        Ok(WebsiteFirewall {
            website: self.reload(website).await?,
            firewall_rules,
        })
    }

    /// Save the protection flag and the whitelist paths in one
    /// transaction.
    pub async fn reconcile_whitelist_paths(
        &self,
        website: &OwnedWebsite,
        settings: ProtectionSettings,
    ) -> WayedgeResult<WebsiteProtection> {
        let repo = self.store.whitelist_paths();
        let plan = plan_children(repo, website, "paths", settings.paths).await?;
        let whitelist_paths = repo
            .apply_plan_with_protection(website.id(), settings.enabled, plan)
            .await?;

        info!(
            website_id = %website.id(),
            enabled = settings.enabled,
            count = whitelist_paths.len(),
            "Protection settings saved"
        );
        Ok(WebsiteProtection {
            website: self.reload(website).await?,
            whitelist_paths,
        })
    }

    /// Replace every origin of the website. Existing origins are removed
    /// and `origins` created fresh with new identifiers.
    pub async fn replace_origins(
        &self,
        website: &OwnedWebsite,
        origins: Vec<OriginFields>,
    ) -> WayedgeResult<Vec<Origin>> {
        // The whole list is checked before anything is deleted.
        let mut errors = ValidationErrors::new();
        errors.min_items("origins", origins.len(), 1);
        validate_each("origins", &origins, &mut errors);
        errors.into_result()?;

        let saved = self
            .store
            .origins()
            .replace_all(website.id(), origins)
            .await?;

        info!(website_id = %website.id(), count = saved.len(), "Origins replaced");
        Ok(saved)
    }

    async fn reload(&self, website: &OwnedWebsite) -> WayedgeResult<Website> {
        self.store
            .websites()
            .get_by_id(website.tenant_id(), website.id())
            .await
    }
}
