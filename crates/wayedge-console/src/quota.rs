//! Per-tenant website quota.

use tracing::warn;
use wayedge_core::error::{WayedgeError, WayedgeResult};
use wayedge_core::repository::WebsiteRepository;

use crate::gate::Caller;

/// Rejects website creation once a tenant owns `limit` websites.
///
/// The count is read before the create and the two are not atomic, so
/// concurrent creates by one tenant can overshoot the limit.
#[derive(Debug, Clone, Copy)]
pub struct QuotaEnforcer {
    limit: u64,
}

impl QuotaEnforcer {
    pub fn new(limit: u64) -> Self {
        Self { limit }
    }

    /// Whether one more website fits next to `current`.
    pub fn admits(&self, current: u64) -> bool {
        current < self.limit
    }

    pub async fn check<W: WebsiteRepository>(
        &self,
        websites: &W,
        caller: &Caller,
    ) -> WayedgeResult<()> {
        let current = websites.count_by_tenant(caller.tenant_id()).await?;
        if !self.admits(current) {
            warn!(
                tenant_id = %caller.tenant_id(),
                current,
                limit = self.limit,
                "Website quota reached"
            );
            return Err(WayedgeError::QuotaExceeded { limit: self.limit });
        }
        Ok(())
    }
}
