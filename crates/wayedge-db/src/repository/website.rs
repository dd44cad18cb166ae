//! SurrealDB implementation of [`WebsiteRepository`].

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde_json::json;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;
use wayedge_core::error::WayedgeResult;
use wayedge_core::models::domain::Domain;
use wayedge_core::models::website::{CreateWebsite, UpdateWebsite, Website, WebsiteWithDomains};
use wayedge_core::repository::WebsiteRepository;

use super::child::parse_uuid;
use super::origin::origin_payload;
use crate::error::DbError;

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct WebsiteRow {
    tenant_id: String,
    name: String,
    protection_enabled: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl WebsiteRow {
    fn into_website(self, id: Uuid) -> Result<Website, DbError> {
        Ok(Website {
            id,
            tenant_id: parse_uuid(&self.tenant_id, "tenant")?,
            name: self.name,
            protection_enabled: self.protection_enabled,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct WebsiteRowWithId {
    record_id: String,
    tenant_id: String,
    name: String,
    protection_enabled: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl WebsiteRowWithId {
    fn try_into_website(self) -> Result<Website, DbError> {
        Ok(Website {
            id: parse_uuid(&self.record_id, "website")?,
            tenant_id: parse_uuid(&self.tenant_id, "tenant")?,
            name: self.name,
            protection_enabled: self.protection_enabled,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Debug, SurrealValue)]
struct DomainRowWithId {
    record_id: String,
    website_id: String,
    domain: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl DomainRowWithId {
    fn try_into_domain(self) -> Result<Domain, DbError> {
        Ok(Domain {
            id: parse_uuid(&self.record_id, "domain")?,
            website_id: parse_uuid(&self.website_id, "website")?,
            domain: self.domain,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Row struct for count queries.
#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

/// SurrealDB implementation of the website repository.
#[derive(Clone)]
pub struct SurrealWebsiteRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealWebsiteRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    async fn website_ids(&self, tenant_id: Uuid) -> Result<Vec<String>, DbError> {
        let mut result = self
            .db
            .query("SELECT VALUE meta::id(id) FROM website WHERE tenant_id = $tenant_id")
            .bind(("tenant_id", tenant_id.to_string()))
            .await?;
        Ok(result.take(0)?)
    }
}

impl<C: Connection> WebsiteRepository for SurrealWebsiteRepository<C> {
    async fn create(&self, tenant_id: Uuid, input: CreateWebsite) -> WayedgeResult<Website> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let domains: Vec<serde_json::Value> = input
            .domains
            .into_iter()
            .map(|d| json!({ "id": Uuid::new_v4().to_string(), "domain": d.domain }))
            .collect();
        let origins: Vec<serde_json::Value> = input
            .origins
            .unwrap_or_default()
            .into_iter()
            .map(origin_payload)
            .collect();

        // The website and its initial children are one nested write.
        let result = self
            .db
            .query(
                "BEGIN TRANSACTION; \
                 CREATE type::record('website', $id) SET \
                     tenant_id = $tenant_id, name = $name, \
                     protection_enabled = false; \
                 FOR $row IN $domains { \
                     CREATE type::record('domain', $row.id) SET \
                         website_id = $id, domain = $row.domain; \
                 }; \
                 FOR $row IN $origins { \
                     CREATE type::record('origin', $row.id) SET \
                         website_id = $id, host = $row.host, \
                         protocol = $row.protocol, port = $row.port; \
                 }; \
                 COMMIT TRANSACTION;",
            )
            .bind(("id", id_str))
            .bind(("tenant_id", tenant_id.to_string()))
            .bind(("name", input.name))
            .bind(("domains", serde_json::Value::Array(domains)))
            .bind(("origins", serde_json::Value::Array(origins)))
            .await
            .map_err(DbError::from)?;

        result.check().map_err(|e| DbError::Query(e.to_string()))?;

        self.get_by_id(tenant_id, id).await
    }

    async fn get_by_id(&self, tenant_id: Uuid, id: Uuid) -> WayedgeResult<Website> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query(
                "SELECT * FROM type::record('website', $id) \
                 WHERE tenant_id = $tenant_id",
            )
            .bind(("id", id_str.clone()))
            .bind(("tenant_id", tenant_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<WebsiteRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "website".into(),
            id: id_str,
        })?;

        Ok(row.into_website(id)?)
    }

    async fn count_by_tenant(&self, tenant_id: Uuid) -> WayedgeResult<u64> {
        let mut result = self
            .db
            .query(
                "SELECT count() AS total FROM website \
                 WHERE tenant_id = $tenant_id GROUP ALL",
            )
            .bind(("tenant_id", tenant_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<CountRow> = result.take(0).map_err(DbError::from)?;
        Ok(rows.first().map(|r| r.total).unwrap_or(0))
    }

    async fn list_with_domains(&self, tenant_id: Uuid) -> WayedgeResult<Vec<WebsiteWithDomains>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM website \
                 WHERE tenant_id = $tenant_id \
                 ORDER BY created_at DESC",
            )
            .bind(("tenant_id", tenant_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<WebsiteRowWithId> = result.take(0).map_err(DbError::from)?;
        let websites = rows
            .into_iter()
            .map(WebsiteRowWithId::try_into_website)
            .collect::<Result<Vec<_>, DbError>>()?;

        let website_ids: Vec<String> = websites.iter().map(|w| w.id.to_string()).collect();
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM domain \
                 WHERE website_id IN $website_ids \
                 ORDER BY created_at ASC",
            )
            .bind(("website_ids", json!(website_ids)))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<DomainRowWithId> = result.take(0).map_err(DbError::from)?;
        let mut by_website: HashMap<Uuid, Vec<Domain>> = HashMap::new();
        for row in rows {
            let domain = row.try_into_domain()?;
            by_website.entry(domain.website_id).or_default().push(domain);
        }

        Ok(websites
            .into_iter()
            .map(|website| WebsiteWithDomains {
                domains: by_website.remove(&website.id).unwrap_or_default(),
                website,
            })
            .collect())
    }

    async fn update(
        &self,
        tenant_id: Uuid,
        id: Uuid,
        input: UpdateWebsite,
    ) -> WayedgeResult<Website> {
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "UPDATE type::record('website', $id) SET \
                 name = $name, updated_at = time::now() \
                 WHERE tenant_id = $tenant_id",
            )
            .bind(("id", id_str.clone()))
            .bind(("tenant_id", tenant_id.to_string()))
            .bind(("name", input.name))
            .await
            .map_err(DbError::from)?;
        let mut result = result.check().map_err(|e| DbError::Query(e.to_string()))?;

        let rows: Vec<WebsiteRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "website".into(),
            id: id_str,
        })?;

        Ok(row.into_website(id)?)
    }

    async fn delete(&self, tenant_id: Uuid, id: Uuid) -> WayedgeResult<()> {
        // Children are only removed once ownership is confirmed.
        self.get_by_id(tenant_id, id).await?;

        self.db
            .query(
                "BEGIN TRANSACTION; \
                 DELETE domain WHERE website_id = $id; \
                 DELETE origin WHERE website_id = $id; \
                 DELETE firewall_rule WHERE website_id = $id; \
                 DELETE whitelist_path WHERE website_id = $id; \
                 DELETE type::record('website', $id) WHERE tenant_id = $tenant_id; \
                 COMMIT TRANSACTION;",
            )
            .bind(("id", id.to_string()))
            .bind(("tenant_id", tenant_id.to_string()))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| DbError::Query(e.to_string()))?;

        Ok(())
    }

    async fn count_domains_by_tenant(&self, tenant_id: Uuid) -> WayedgeResult<u64> {
        let website_ids = self.website_ids(tenant_id).await?;
        if website_ids.is_empty() {
            return Ok(0);
        }

        let mut result = self
            .db
            .query(
                "SELECT count() AS total FROM domain \
                 WHERE website_id IN $website_ids GROUP ALL",
            )
            .bind(("website_ids", json!(website_ids)))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<CountRow> = result.take(0).map_err(DbError::from)?;
        Ok(rows.first().map(|r| r.total).unwrap_or(0))
    }
}
