//! SurrealDB implementation of [`OriginRepository`].
//!
//! Origins are saved by delete-all-then-recreate-all; identifiers are
//! freshly assigned on every save.

use chrono::{DateTime, Utc};
use serde_json::json;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::debug;
use uuid::Uuid;
use wayedge_core::error::WayedgeResult;
use wayedge_core::models::origin::{Origin, OriginFields};
use wayedge_core::repository::OriginRepository;

use super::child::{GUARD_WEBSITE, guarded_failure, parse_uuid};
use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct OriginRowWithId {
    record_id: String,
    website_id: String,
    host: String,
    protocol: String,
    port: Option<i64>,
    created_at: DateTime<Utc>,
}

impl OriginRowWithId {
    fn try_into_origin(self) -> Result<Origin, DbError> {
        let port = self
            .port
            .map(u16::try_from)
            .transpose()
            .map_err(|e| DbError::Decode(format!("invalid origin port: {e}")))?;
        Ok(Origin {
            id: parse_uuid(&self.record_id, "origin")?,
            website_id: parse_uuid(&self.website_id, "website")?,
            host: self.host,
            protocol: self.protocol.parse().map_err(DbError::Decode)?,
            port,
            created_at: self.created_at,
        })
    }
}

/// Insert payload for one origin, with a fresh identifier. An absent
/// port is left out entirely so it is stored as NONE rather than NULL.
pub(crate) fn origin_payload(origin: OriginFields) -> serde_json::Value {
    let mut payload = json!({
        "id": Uuid::new_v4().to_string(),
        "host": origin.host,
        "protocol": origin.protocol.as_str(),
    });
    if let Some(port) = origin.port {
        payload["port"] = json!(port);
    }
    payload
}

/// SurrealDB implementation of the origin repository.
#[derive(Clone)]
pub struct SurrealOriginRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealOriginRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> OriginRepository for SurrealOriginRepository<C> {
    async fn list_by_website(&self, website_id: Uuid) -> WayedgeResult<Vec<Origin>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM origin \
                 WHERE website_id = $website_id \
                 ORDER BY created_at ASC",
            )
            .bind(("website_id", website_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<OriginRowWithId> = result.take(0).map_err(DbError::from)?;
        rows.into_iter()
            .map(OriginRowWithId::try_into_origin)
            .collect::<Result<Vec<_>, DbError>>()
            .map_err(Into::into)
    }

    async fn replace_all(
        &self,
        website_id: Uuid,
        origins: Vec<OriginFields>,
    ) -> WayedgeResult<Vec<Origin>> {
        let payload: Vec<serde_json::Value> = origins.into_iter().map(origin_payload).collect();

        debug!(
            website_id = %website_id,
            creates = payload.len(),
            "Replacing origins"
        );

        let query = format!(
            "BEGIN TRANSACTION; \
             {GUARD_WEBSITE} \
             DELETE origin WHERE website_id = $website_id; \
             FOR $row IN $origins {{ \
                 CREATE type::record('origin', $row.id) SET \
                     website_id = $website_id, host = $row.host, \
                     protocol = $row.protocol, port = $row.port; \
             }}; \
             COMMIT TRANSACTION;"
        );
        let result = self
            .db
            .query(query)
            .bind(("website_id", website_id.to_string()))
            .bind(("origins", serde_json::Value::Array(payload)))
            .await
            .map_err(DbError::from)?;
        if let Err(e) = result.check() {
            return Err(guarded_failure(&self.db, website_id, e).await.into());
        }

        self.list_by_website(website_id).await
    }
}
