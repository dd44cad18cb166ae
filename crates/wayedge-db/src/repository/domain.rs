//! SurrealDB implementation of the domain collection.

use surrealdb::{Connection, Surreal};
use uuid::Uuid;
use wayedge_core::error::WayedgeResult;
use wayedge_core::models::domain::{Domain, DomainFields};
use wayedge_core::reconcile::ReconcilePlan;
use wayedge_core::repository::ChildRepository;

use super::child::{ChildRowWithId, ChildTable};
use crate::error::DbError;

const DOMAINS: ChildTable = ChildTable {
    table: "domain",
    column: "domain",
};

impl ChildRowWithId {
    fn try_into_domain(self) -> Result<Domain, DbError> {
        let (id, website_id) = self.ids()?;
        Ok(Domain {
            id,
            website_id,
            domain: self.value,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// SurrealDB implementation of the domain repository.
#[derive(Clone)]
pub struct SurrealDomainRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealDomainRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> ChildRepository for SurrealDomainRepository<C> {
    type Record = Domain;
    type Fields = DomainFields;

    async fn list_by_website(&self, website_id: Uuid) -> WayedgeResult<Vec<Domain>> {
        let rows = DOMAINS.list(&self.db, website_id).await?;
        rows.into_iter()
            .map(ChildRowWithId::try_into_domain)
            .collect::<Result<Vec<_>, DbError>>()
            .map_err(Into::into)
    }

    async fn apply_plan(
        &self,
        website_id: Uuid,
        plan: ReconcilePlan<DomainFields>,
    ) -> WayedgeResult<Vec<Domain>> {
        let plan = plan.map(|f| f.domain);
        DOMAINS.apply(&self.db, website_id, plan, None).await?;
        self.list_by_website(website_id).await
    }
}
