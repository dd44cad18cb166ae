//! Identity resolution and the website ownership gate.
//!
//! Every website-scoped operation goes through two steps:
//!
//! 1. [`resolve_caller`] turns the session's tenant id into a [`Caller`].
//!    A missing id, or one naming a tenant that no longer exists, is
//!    `Unauthorized`.
//! 2. [`authorize`] looks the website up by id **and** owner and yields
//!    an [`OwnedWebsite`]. Another tenant's website and a website that
//!    does not exist are indistinguishable: both are `NotFound` carrying
//!    only the id the caller supplied.
//!
//! Neither handle can be constructed outside this module, so a mutation
//! that takes an `OwnedWebsite` cannot run without the gate having
//! passed.

use uuid::Uuid;
use wayedge_core::error::{WayedgeError, WayedgeResult};
use wayedge_core::models::tenant::Tenant;
use wayedge_core::models::website::Website;
use wayedge_core::repository::{TenantRepository, WebsiteRepository};

/// A tenant whose identity has been resolved.
#[derive(Debug, Clone)]
pub struct Caller {
    tenant: Tenant,
}

impl Caller {
    pub fn tenant_id(&self) -> Uuid {
        self.tenant.id
    }
}

/// A website the caller was verified to own. Not `Clone`; deleting the
/// website consumes the handle.
#[derive(Debug)]
pub struct OwnedWebsite {
    website: Website,
}

impl OwnedWebsite {
    pub fn id(&self) -> Uuid {
        self.website.id
    }

    pub fn tenant_id(&self) -> Uuid {
        self.website.tenant_id
    }

    pub fn into_website(self) -> Website {
        self.website
    }
}

/// Resolve the session's tenant id into a [`Caller`].
pub async fn resolve_caller<T: TenantRepository>(
    tenants: &T,
    session_tenant: Option<Uuid>,
) -> WayedgeResult<Caller> {
    let Some(tenant_id) = session_tenant else {
        return Err(WayedgeError::Unauthorized);
    };

    match tenants.get_by_id(tenant_id).await {
        Ok(tenant) => Ok(Caller { tenant }),
        Err(WayedgeError::NotFound { .. }) => Err(WayedgeError::Unauthorized),
        Err(e) => Err(e),
    }
}

/// Confirm that `caller` owns `website_id`.
pub async fn authorize<W: WebsiteRepository>(
    websites: &W,
    caller: &Caller,
    website_id: Uuid,
) -> WayedgeResult<OwnedWebsite> {
    match websites.get_by_id(caller.tenant_id(), website_id).await {
        Ok(website) => Ok(OwnedWebsite { website }),
        Err(WayedgeError::NotFound { .. }) => Err(WayedgeError::not_found("website", website_id)),
        Err(e) => Err(e),
    }
}
