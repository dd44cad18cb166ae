//! Account settings: profile and password changes for the caller.

use tracing::info;
use uuid::Uuid;
use wayedge_core::error::{WayedgeError, WayedgeResult};
use wayedge_core::models::tenant::{ChangePassword, Tenant, UpdateProfile, UpdateTenant};
use wayedge_core::repository::TenantRepository;
use wayedge_core::validation::Validate;

use crate::config::ConsoleConfig;
use crate::error::ConsoleError;
use crate::gate::{self, Caller};
use crate::password;

/// Account service.
///
/// The pepper must match the one the tenant repository hashes with.
pub struct AccountService<T: TenantRepository> {
    tenants: T,
    pepper: Option<String>,
}

impl<T: TenantRepository> AccountService<T> {
    pub fn new(tenants: T, config: &ConsoleConfig) -> Self {
        Self {
            tenants,
            pepper: config.pepper.clone(),
        }
    }

    pub async fn resolve_caller(&self, session_tenant: Option<Uuid>) -> WayedgeResult<Caller> {
        gate::resolve_caller(&self.tenants, session_tenant).await
    }

    /// Change the caller's display name and email. An email already held
    /// by another tenant is rejected; keeping one's own email is fine.
    pub async fn update_profile(
        &self,
        caller: &Caller,
        input: UpdateProfile,
    ) -> WayedgeResult<Tenant> {
        input.validate()?;

        match self.tenants.get_by_email(&input.email).await {
            Ok(holder) if holder.id != caller.tenant_id() => {
                return Err(WayedgeError::AlreadyExists {
                    entity: "tenant email".into(),
                });
            }
            Ok(_) | Err(WayedgeError::NotFound { .. }) => {}
            Err(e) => return Err(e),
        }

        let tenant = self
            .tenants
            .update(
                caller.tenant_id(),
                UpdateTenant {
                    name: Some(input.name),
                    email: Some(input.email),
                },
            )
            .await?;

        info!(tenant_id = %tenant.id, "Profile updated");
        Ok(tenant)
    }

    /// Replace the caller's password after verifying the current one.
    pub async fn change_password(
        &self,
        caller: &Caller,
        input: ChangePassword,
    ) -> WayedgeResult<()> {
        // 1. Shape check.
        input.validate()?;

        // 2. Verify against the stored hash, not the caller snapshot.
        let tenant = self.tenants.get_by_id(caller.tenant_id()).await?;
        let valid = password::verify_password(
            &input.current_password,
            &tenant.password_hash,
            self.pepper.as_deref(),
        )?;
        if !valid {
            return Err(ConsoleError::PasswordMismatch.into());
        }

        // 3. Hash and store.
        self.tenants
            .set_password(tenant.id, &input.new_password)
            .await?;

        info!(tenant_id = %tenant.id, "Password changed");
        Ok(())
    }
}
