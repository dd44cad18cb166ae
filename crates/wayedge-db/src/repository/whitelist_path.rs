//! SurrealDB implementation of the whitelist path collection.

use surrealdb::{Connection, Surreal};
use uuid::Uuid;
use wayedge_core::error::WayedgeResult;
use wayedge_core::models::whitelist_path::{WhitelistPath, WhitelistPathFields};
use wayedge_core::reconcile::ReconcilePlan;
use wayedge_core::repository::{ChildRepository, WhitelistPathRepository};

use super::child::{ChildRowWithId, ChildTable};
use crate::error::DbError;

const WHITELIST_PATHS: ChildTable = ChildTable {
    table: "whitelist_path",
    column: "path",
};

impl ChildRowWithId {
    fn try_into_whitelist_path(self) -> Result<WhitelistPath, DbError> {
        let (id, website_id) = self.ids()?;
        Ok(WhitelistPath {
            id,
            website_id,
            path: self.value,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// SurrealDB implementation of the whitelist path repository.
#[derive(Clone)]
pub struct SurrealWhitelistPathRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealWhitelistPathRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> ChildRepository for SurrealWhitelistPathRepository<C> {
    type Record = WhitelistPath;
    type Fields = WhitelistPathFields;

    async fn list_by_website(&self, website_id: Uuid) -> WayedgeResult<Vec<WhitelistPath>> {
        let rows = WHITELIST_PATHS.list(&self.db, website_id).await?;
        rows.into_iter()
            .map(ChildRowWithId::try_into_whitelist_path)
            .collect::<Result<Vec<_>, DbError>>()
            .map_err(Into::into)
    }

    async fn apply_plan(
        &self,
        website_id: Uuid,
        plan: ReconcilePlan<WhitelistPathFields>,
    ) -> WayedgeResult<Vec<WhitelistPath>> {
        WHITELIST_PATHS
            .apply(&self.db, website_id, plan.map(|f| f.path), None)
            .await?;
        self.list_by_website(website_id).await
    }
}

impl<C: Connection> WhitelistPathRepository for SurrealWhitelistPathRepository<C> {
    async fn apply_plan_with_protection(
        &self,
        website_id: Uuid,
        enabled: bool,
        plan: ReconcilePlan<WhitelistPathFields>,
    ) -> WayedgeResult<Vec<WhitelistPath>> {
        WHITELIST_PATHS
            .apply(&self.db, website_id, plan.map(|f| f.path), Some(enabled))
            .await?;
        self.list_by_website(website_id).await
    }
}
