//! SurrealDB repository implementations.

mod child;
mod domain;
mod firewall_rule;
mod origin;
mod tenant;
mod website;
mod whitelist_path;

pub use domain::SurrealDomainRepository;
pub use firewall_rule::SurrealFirewallRuleRepository;
pub use origin::SurrealOriginRepository;
pub use tenant::SurrealTenantRepository;
pub use website::SurrealWebsiteRepository;
pub use whitelist_path::SurrealWhitelistPathRepository;
