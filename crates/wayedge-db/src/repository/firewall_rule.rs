//! SurrealDB implementation of the firewall rule collection.

use surrealdb::{Connection, Surreal};
use uuid::Uuid;
use wayedge_core::error::WayedgeResult;
use wayedge_core::models::firewall_rule::{FirewallRule, FirewallRuleFields};
use wayedge_core::reconcile::ReconcilePlan;
use wayedge_core::repository::ChildRepository;

use super::child::{ChildRowWithId, ChildTable};
use crate::error::DbError;

const FIREWALL_RULES: ChildTable = ChildTable {
    table: "firewall_rule",
    column: "pattern",
};

impl ChildRowWithId {
    fn try_into_firewall_rule(self) -> Result<FirewallRule, DbError> {
        let (id, website_id) = self.ids()?;
        Ok(FirewallRule {
            id,
            website_id,
            pattern: self.value,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// SurrealDB implementation of the firewall rule repository.
#[derive(Clone)]
pub struct SurrealFirewallRuleRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealFirewallRuleRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> ChildRepository for SurrealFirewallRuleRepository<C> {
    type Record = FirewallRule;
    type Fields = FirewallRuleFields;

    async fn list_by_website(&self, website_id: Uuid) -> WayedgeResult<Vec<FirewallRule>> {
        let rows = FIREWALL_RULES.list(&self.db, website_id).await?;
        rows.into_iter()
            .map(ChildRowWithId::try_into_firewall_rule)
            .collect::<Result<Vec<_>, DbError>>()
            .map_err(Into::into)
    }

    async fn apply_plan(
        &self,
        website_id: Uuid,
        plan: ReconcilePlan<FirewallRuleFields>,
    ) -> WayedgeResult<Vec<FirewallRule>> {
        let plan = plan.map(|f| f.pattern);
        FIREWALL_RULES.apply(&self.db, website_id, plan, None).await?;
        self.list_by_website(website_id).await
    }
}
