//! Console service configuration.

/// Default ceiling on websites per tenant.
pub const DEFAULT_WEBSITE_QUOTA: u64 = 30;

#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    /// Website creation is rejected once a tenant owns this many
    /// websites (default: 30).
    pub website_quota: u64,
    /// Optional pepper prepended to passwords before Argon2id hashing
    /// and verification. Must match the tenant store's pepper.
    pub pepper: Option<String>,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            website_quota: DEFAULT_WEBSITE_QUOTA,
            pepper: None,
        }
    }
}
