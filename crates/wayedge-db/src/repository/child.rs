//! Shared SurrealDB plumbing for website-scoped child tables that carry
//! a single mutable text column (domains, firewall rules, whitelist
//! paths).

use chrono::{DateTime, Utc};
use serde_json::json;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::debug;
use uuid::Uuid;
use wayedge_core::reconcile::ReconcilePlan;

use crate::error::DbError;

/// Row for a child record, with its single text column aliased to
/// `value`.
#[derive(Debug, SurrealValue)]
pub(crate) struct ChildRowWithId {
    pub record_id: String,
    pub website_id: String,
    pub value: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ChildRowWithId {
    pub fn ids(&self) -> Result<(Uuid, Uuid), DbError> {
        Ok((
            parse_uuid(&self.record_id, "record")?,
            parse_uuid(&self.website_id, "website")?,
        ))
    }
}

pub(crate) fn parse_uuid(value: &str, what: &str) -> Result<Uuid, DbError> {
    Uuid::parse_str(value).map_err(|e| DbError::Decode(format!("invalid {what} UUID: {e}")))
}

/// Aborts the enclosing transaction once the website is gone, so no
/// child row can be written for a deleted parent.
pub(crate) const GUARD_WEBSITE: &str =
    "IF !record::exists(type::record('website', $website_id)) { \
         THROW 'website not found'; \
     };";

async fn website_exists<C: Connection>(db: &Surreal<C>, website_id: Uuid) -> Result<bool, DbError> {
    let mut result = db
        .query("SELECT VALUE meta::id(id) FROM type::record('website', $website_id)")
        .bind(("website_id", website_id.to_string()))
        .await?;
    let ids: Vec<String> = result.take(0)?;
    Ok(!ids.is_empty())
}

/// Classify a failed guarded write: a website that no longer exists is
/// `NotFound`, anything else is a query failure.
pub(crate) async fn guarded_failure<C: Connection>(
    db: &Surreal<C>,
    website_id: Uuid,
    err: surrealdb::Error,
) -> DbError {
    match website_exists(db, website_id).await {
        Ok(false) => DbError::NotFound {
            entity: "website".into(),
            id: website_id.to_string(),
        },
        Ok(true) => DbError::Query(err.to_string()),
        Err(e) => e,
    }
}

const SET_PROTECTION: &str = "UPDATE type::record('website', $website_id) \
     SET protection_enabled = $protection, updated_at = time::now();";

/// A child table and the name of its mutable column. Both are static
/// identifiers, never user input.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ChildTable {
    pub table: &'static str,
    pub column: &'static str,
}

impl ChildTable {
    pub async fn list<C: Connection>(
        &self,
        db: &Surreal<C>,
        website_id: Uuid,
    ) -> Result<Vec<ChildRowWithId>, DbError> {
        let query = format!(
            "SELECT meta::id(id) AS record_id, website_id, {column} AS value, \
             created_at, updated_at FROM {table} \
             WHERE website_id = $website_id \
             ORDER BY created_at ASC",
            table = self.table,
            column = self.column,
        );

        let mut result = db
            .query(query)
            .bind(("website_id", website_id.to_string()))
            .await?;

        Ok(result.take(0)?)
    }

    /// Apply a reconciliation plan as one transaction: delete, then
    /// update, then create. When `protection` is set, the website's
    /// protection flag is written first inside the same transaction.
    ///
    /// Fails with `NotFound` and writes nothing if the website no longer
    /// exists.
    pub async fn apply<C: Connection>(
        &self,
        db: &Surreal<C>,
        website_id: Uuid,
        plan: ReconcilePlan<String>,
        protection: Option<bool>,
    ) -> Result<(), DbError> {
        let deletes: Vec<String> = plan.to_delete.iter().map(Uuid::to_string).collect();
        let updates: Vec<serde_json::Value> = plan
            .to_update
            .into_iter()
            .map(|(id, value)| json!({ "id": id.to_string(), "value": value }))
            .collect();
        let creates: Vec<serde_json::Value> = plan
            .to_create
            .into_iter()
            .map(|value| json!({ "id": Uuid::new_v4().to_string(), "value": value }))
            .collect();

        debug!(
            table = self.table,
            website_id = %website_id,
            deletes = deletes.len(),
            updates = updates.len(),
            creates = creates.len(),
            "Applying reconciliation plan"
        );

        let query = format!(
            "BEGIN TRANSACTION; \
             {guard} \
             {prelude} \
             FOR $id IN $deletes {{ \
                 DELETE type::record('{table}', $id) WHERE website_id = $website_id; \
             }}; \
             FOR $row IN $updates {{ \
                 UPDATE type::record('{table}', $row.id) \
                 SET {column} = $row.value, updated_at = time::now() \
                 WHERE website_id = $website_id; \
             }}; \
             FOR $row IN $creates {{ \
                 CREATE type::record('{table}', $row.id) \
                 SET website_id = $website_id, {column} = $row.value; \
             }}; \
             COMMIT TRANSACTION;",
            guard = GUARD_WEBSITE,
            prelude = if protection.is_some() { SET_PROTECTION } else { "" },
            table = self.table,
            column = self.column,
        );

        let mut builder = db
            .query(query)
            .bind(("website_id", website_id.to_string()))
            .bind(("deletes", json!(deletes)))
            .bind(("updates", serde_json::Value::Array(updates)))
            .bind(("creates", serde_json::Value::Array(creates)));
        if let Some(enabled) = protection {
            builder = builder.bind(("protection", enabled));
        }

        if let Err(e) = builder.await?.check() {
            return Err(guarded_failure(db, website_id, e).await);
        }

        Ok(())
    }
}
