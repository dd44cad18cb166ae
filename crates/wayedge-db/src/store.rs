//! [`Store`] implementation bundling every SurrealDB repository over one
//! shared client.

use surrealdb::{Connection, Surreal};
use wayedge_core::repository::Store;

use crate::repository::{
    SurrealDomainRepository, SurrealFirewallRuleRepository, SurrealOriginRepository,
    SurrealTenantRepository, SurrealWebsiteRepository, SurrealWhitelistPathRepository,
};

#[derive(Clone)]
pub struct SurrealStore<C: Connection> {
    tenants: SurrealTenantRepository<C>,
    websites: SurrealWebsiteRepository<C>,
    domains: SurrealDomainRepository<C>,
    origins: SurrealOriginRepository<C>,
    firewall_rules: SurrealFirewallRuleRepository<C>,
    whitelist_paths: SurrealWhitelistPathRepository<C>,
}

impl<C: Connection> SurrealStore<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self::build(db, None)
    }

    /// Like [`SurrealStore::new`], with a server-side password pepper.
    pub fn with_pepper(db: Surreal<C>, pepper: Option<String>) -> Self {
        Self::build(db, pepper)
    }

    fn build(db: Surreal<C>, pepper: Option<String>) -> Self {
        let tenants = match pepper {
            Some(p) => SurrealTenantRepository::with_pepper(db.clone(), p),
            None => SurrealTenantRepository::new(db.clone()),
        };
        Self {
            tenants,
            websites: SurrealWebsiteRepository::new(db.clone()),
            domains: SurrealDomainRepository::new(db.clone()),
            origins: SurrealOriginRepository::new(db.clone()),
            firewall_rules: SurrealFirewallRuleRepository::new(db.clone()),
            whitelist_paths: SurrealWhitelistPathRepository::new(db),
        }
    }
}

impl<C: Connection> Store for SurrealStore<C> {
    type Tenants = SurrealTenantRepository<C>;
    type Websites = SurrealWebsiteRepository<C>;
    type Domains = SurrealDomainRepository<C>;
    type Origins = SurrealOriginRepository<C>;
    type FirewallRules = SurrealFirewallRuleRepository<C>;
    type WhitelistPaths = SurrealWhitelistPathRepository<C>;

    fn tenants(&self) -> &Self::Tenants {
        &self.tenants
    }

    fn websites(&self) -> &Self::Websites {
        &self.websites
    }

    fn domains(&self) -> &Self::Domains {
        &self.domains
    }

    fn origins(&self) -> &Self::Origins {
        &self.origins
    }

    fn firewall_rules(&self) -> &Self::FirewallRules {
        &self.firewall_rules
    }

    fn whitelist_paths(&self) -> &Self::WhitelistPaths {
        &self.whitelist_paths
    }
}
