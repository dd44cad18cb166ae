//! Versioned console schema.
//!
//! Tables are SCHEMAFULL. Ids are UUID strings; the origin protocol and
//! the minimum domain length are enforced with ASSERTs.

use surrealdb::{Connection, Surreal};
use tracing::info;

use crate::error::DbError;

// -----------------------------------------------------------------------
// Migration tracking
// -----------------------------------------------------------------------

const MIGRATION_TABLE_DDL: &str = "\
DEFINE TABLE IF NOT EXISTS _migration SCHEMAFULL;
DEFINE FIELD IF NOT EXISTS version ON TABLE _migration TYPE int;
DEFINE FIELD IF NOT EXISTS name ON TABLE _migration TYPE string;
DEFINE FIELD IF NOT EXISTS applied_at ON TABLE _migration TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX IF NOT EXISTS idx_migration_version ON TABLE _migration \
    COLUMNS version UNIQUE;
";

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

static MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "initial_schema",
    sql: SCHEMA_V1,
}];

// -----------------------------------------------------------------------
// Schema v1
// -----------------------------------------------------------------------

const SCHEMA_V1: &str = "\
-- =======================================================================
-- Tenants (global scope)
-- =======================================================================
DEFINE TABLE tenant SCHEMAFULL;
DEFINE FIELD name ON TABLE tenant TYPE string;
DEFINE FIELD email ON TABLE tenant TYPE string;
DEFINE FIELD password_hash ON TABLE tenant TYPE string;
DEFINE FIELD created_at ON TABLE tenant TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE tenant TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_tenant_email ON TABLE tenant COLUMNS email UNIQUE;

-- =======================================================================
-- Websites (tenant scope)
-- =======================================================================
DEFINE TABLE website SCHEMAFULL;
DEFINE FIELD tenant_id ON TABLE website TYPE string;
DEFINE FIELD name ON TABLE website TYPE string;
DEFINE FIELD protection_enabled ON TABLE website TYPE bool \
    DEFAULT false;
DEFINE FIELD created_at ON TABLE website TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE website TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_website_tenant ON TABLE website COLUMNS tenant_id;

-- =======================================================================
-- Domains (website scope; hostnames are not unique)
-- =======================================================================
DEFINE TABLE domain SCHEMAFULL;
DEFINE FIELD website_id ON TABLE domain TYPE string;
DEFINE FIELD domain ON TABLE domain TYPE string \
    ASSERT string::len($value) >= 3;
DEFINE FIELD created_at ON TABLE domain TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE domain TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_domain_website ON TABLE domain COLUMNS website_id;

-- =======================================================================
-- Origins (website scope)
-- =======================================================================
DEFINE TABLE origin SCHEMAFULL;
DEFINE FIELD website_id ON TABLE origin TYPE string;
DEFINE FIELD host ON TABLE origin TYPE string \
    ASSERT string::len($value) >= 1;
DEFINE FIELD protocol ON TABLE origin TYPE string \
    ASSERT $value IN ['http', 'https'];
DEFINE FIELD port ON TABLE origin TYPE option<int>;
DEFINE FIELD created_at ON TABLE origin TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_origin_website ON TABLE origin COLUMNS website_id;

-- =======================================================================
-- Firewall rules (website scope)
-- =======================================================================
DEFINE TABLE firewall_rule SCHEMAFULL;
DEFINE FIELD website_id ON TABLE firewall_rule TYPE string;
DEFINE FIELD pattern ON TABLE firewall_rule TYPE string \
    ASSERT string::len($value) >= 1;
DEFINE FIELD created_at ON TABLE firewall_rule TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE firewall_rule TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_firewall_rule_website ON TABLE firewall_rule \
    COLUMNS website_id;

-- =======================================================================
-- Whitelist paths (website scope)
-- =======================================================================
DEFINE TABLE whitelist_path SCHEMAFULL;
DEFINE FIELD website_id ON TABLE whitelist_path TYPE string;
DEFINE FIELD path ON TABLE whitelist_path TYPE string \
    ASSERT string::len($value) >= 1;
DEFINE FIELD created_at ON TABLE whitelist_path TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE whitelist_path TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_whitelist_path_website ON TABLE whitelist_path \
    COLUMNS website_id;
";

/// Bring the schema up to date.
///
/// Each pending migration and its `_migration` record are written in one
/// transaction, so a failed migration is retried on the next start.
pub async fn run_migrations<C: Connection>(db: &Surreal<C>) -> Result<(), DbError> {
    db.query(MIGRATION_TABLE_DDL)
        .await?
        .check()
        .map_err(|e| DbError::Migration(e.to_string()))?;

    let current = current_version(db).await?;
    for migration in pending(current) {
        info!(version = migration.version, name = migration.name, "Applying migration");
        apply(db, migration).await?;
    }

    Ok(())
}

async fn current_version<C: Connection>(db: &Surreal<C>) -> Result<u32, DbError> {
    let mut result = db
        .query("SELECT VALUE version FROM _migration ORDER BY version DESC LIMIT 1")
        .await?;
    let versions: Vec<u32> = result.take(0)?;
    Ok(versions.first().copied().unwrap_or(0))
}

fn pending(current: u32) -> impl Iterator<Item = &'static Migration> {
    MIGRATIONS.iter().filter(move |m| m.version > current)
}

async fn apply<C: Connection>(db: &Surreal<C>, migration: &Migration) -> Result<(), DbError> {
    let query = format!(
        "BEGIN TRANSACTION; \
         {sql} \
         CREATE _migration SET version = $version, name = $name; \
         COMMIT TRANSACTION;",
        sql = migration.sql,
    );
    db.query(query)
        .bind(("version", migration.version))
        .bind(("name", migration.name))
        .await?
        .check()
        .map_err(|e| {
            DbError::Migration(format!("v{} {}: {e}", migration.version, migration.name))
        })?;
    Ok(())
}
