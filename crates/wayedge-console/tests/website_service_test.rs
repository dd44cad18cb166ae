//! Integration tests for the website service using in-memory SurrealDB.

use std::collections::HashSet;

use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};
use uuid::Uuid;
use wayedge_console::{Caller, ConsoleConfig, WebsiteService};
use wayedge_core::error::{WayedgeError, WayedgeResult};
use wayedge_core::models::domain::DomainFields;
use wayedge_core::models::firewall_rule::FirewallRuleFields;
use wayedge_core::models::origin::{OriginFields, Protocol};
use wayedge_core::models::tenant::CreateTenant;
use wayedge_core::models::website::{
    CreateWebsite, DashboardSummary, ProtectionSettings, UpdateWebsite, Website,
};
use wayedge_core::models::whitelist_path::WhitelistPathFields;
use wayedge_core::reconcile::{Desired, EntryId};
use wayedge_core::repository::{ChildRepository, OriginRepository, Store, TenantRepository};
use wayedge_db::SurrealStore;

type Service = WebsiteService<SurrealStore<Db>>;

async fn service() -> Service {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    wayedge_db::run_migrations(&db).await.unwrap();
    WebsiteService::new(SurrealStore::new(db), &ConsoleConfig::default())
}

async fn caller(service: &Service, email: &str) -> Caller {
    let tenant = service
        .store()
        .tenants()
        .create(CreateTenant {
            name: "Tenant".into(),
            email: email.into(),
            password: "correct-horse".into(),
        })
        .await
        .unwrap();
    service.resolve_caller(Some(tenant.id)).await.unwrap()
}

/// Rename through the gate, the way a request handler would.
async fn rename_as(
    service: &Service,
    caller: &Caller,
    website_id: Uuid,
    name: &str,
) -> WayedgeResult<Website> {
    let owned = service.authorize(caller, website_id).await?;
    service
        .update_website_name(&owned, UpdateWebsite { name: name.into() })
        .await
}

/// Delete through the gate, the way a request handler would.
async fn delete_as(service: &Service, caller: &Caller, website_id: Uuid) -> WayedgeResult<()> {
    let owned = service.authorize(caller, website_id).await?;
    service.delete_website(owned).await
}

fn site(name: &str, domains: &[&str]) -> CreateWebsite {
    CreateWebsite {
        name: name.into(),
        domains: domains.iter().map(|d| DomainFields::new(*d)).collect(),
        origins: None,
    }
}

// ---------------------------------------------------------------------------
// Identity and ownership
// ---------------------------------------------------------------------------

#[tokio::test]
async fn missing_or_unknown_identity_is_unauthorized() {
    let service = service().await;

    assert!(matches!(
        service.resolve_caller(None).await,
        Err(WayedgeError::Unauthorized)
    ));
    assert!(matches!(
        service.resolve_caller(Some(Uuid::new_v4())).await,
        Err(WayedgeError::Unauthorized)
    ));
}

#[tokio::test]
async fn foreign_website_is_not_found_and_untouched() {
    let service = service().await;
    let alice = caller(&service, "alice@example.com").await;
    let bob = caller(&service, "bob@example.com").await;

    let website = service
        .create_website(&alice, site("Shop", &["shop.example.com"]))
        .await
        .unwrap();

    let err = service.authorize(&bob, website.id).await.unwrap_err();
    let rendered = err.to_string();
    match err {
        WayedgeError::NotFound { entity, id } => {
            assert_eq!(entity, "website");
            assert_eq!(id, website.id.to_string());
        }
        other => panic!("expected NotFound, got {other:?}"),
    }
    // Nothing about the website leaks beyond the id bob supplied.
    assert!(!rendered.contains("Shop"));
    assert!(!rendered.contains(&alice.tenant_id().to_string()));
    assert!(!rendered.contains("shop.example.com"));
    assert!(matches!(
        service.get_website(&bob, website.id).await,
        Err(WayedgeError::NotFound { .. })
    ));

    let detail = service.get_website(&alice, website.id).await.unwrap();
    assert_eq!(detail.domains.len(), 1);
}

#[tokio::test]
async fn foreign_website_cannot_be_renamed_or_deleted() {
    let service = service().await;
    let alice = caller(&service, "alice@example.com").await;
    let bob = caller(&service, "bob@example.com").await;
    let website = service
        .create_website(&alice, site("Shop", &["shop.example.com"]))
        .await
        .unwrap();

    assert!(matches!(
        rename_as(&service, &bob, website.id, "Hijacked").await,
        Err(WayedgeError::NotFound { .. })
    ));
    assert!(matches!(
        delete_as(&service, &bob, website.id).await,
        Err(WayedgeError::NotFound { .. })
    ));

    let detail = service.get_website(&alice, website.id).await.unwrap();
    assert_eq!(detail.website.name, "Shop");
    assert_eq!(detail.domains.len(), 1);

    // The owner goes through the same path successfully.
    let renamed = rename_as(&service, &alice, website.id, "Store").await.unwrap();
    assert_eq!(renamed.name, "Store");
    delete_as(&service, &alice, website.id).await.unwrap();
}

#[tokio::test]
async fn unknown_website_is_not_found() {
    let service = service().await;
    let alice = caller(&service, "alice@example.com").await;

    assert!(matches!(
        service.authorize(&alice, Uuid::new_v4()).await,
        Err(WayedgeError::NotFound { .. })
    ));
}

// ---------------------------------------------------------------------------
// Website lifecycle
// ---------------------------------------------------------------------------

#[tokio::test]
async fn invalid_create_writes_nothing() {
    let service = service().await;
    let alice = caller(&service, "alice@example.com").await;

    let result = service
        .create_website(&alice, site("Shop", &["ok.example.com", "ab"]))
        .await;
    match result {
        Err(WayedgeError::Validation(errors)) => {
            assert!(errors.has_field("domains[1].domain"));
        }
        other => panic!("expected Validation, got {other:?}"),
    }

    assert!(service.list_websites(&alice).await.unwrap().is_empty());
}

#[tokio::test]
async fn quota_admits_up_to_limit() {
    let service = service().await;
    let alice = caller(&service, "alice@example.com").await;

    for i in 0..29 {
        service
            .create_website(&alice, site(&format!("Site {i}"), &["example.com"]))
            .await
            .unwrap();
    }

    // The 30th fits.
    service
        .create_website(&alice, site("Site 29", &["example.com"]))
        .await
        .unwrap();
    assert_eq!(service.dashboard_summary(&alice).await.unwrap().websites, 30);

    // The 31st does not.
    let result = service
        .create_website(&alice, site("Site 30", &["example.com"]))
        .await;
    assert!(matches!(
        result,
        Err(WayedgeError::QuotaExceeded { limit: 30 })
    ));
    assert_eq!(service.dashboard_summary(&alice).await.unwrap().websites, 30);
}

#[tokio::test]
async fn quota_is_per_tenant() {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    wayedge_db::run_migrations(&db).await.unwrap();
    let config = ConsoleConfig {
        website_quota: 1,
        ..Default::default()
    };
    let service = WebsiteService::new(SurrealStore::new(db), &config);
    let alice = caller(&service, "alice@example.com").await;
    let bob = caller(&service, "bob@example.com").await;

    service
        .create_website(&alice, site("Alice", &["alice.example.com"]))
        .await
        .unwrap();
    service
        .create_website(&bob, site("Bob", &["bob.example.com"]))
        .await
        .unwrap();
    assert!(matches!(
        service
            .create_website(&alice, site("Again", &["again.example.com"]))
            .await,
        Err(WayedgeError::QuotaExceeded { limit: 1 })
    ));
}

#[tokio::test]
async fn rename_validates_before_writing() {
    let service = service().await;
    let alice = caller(&service, "alice@example.com").await;
    let website = service
        .create_website(&alice, site("Shop", &["shop.example.com"]))
        .await
        .unwrap();
    let owned = service.authorize(&alice, website.id).await.unwrap();

    let rejected = service
        .update_website_name(&owned, UpdateWebsite { name: "x".into() })
        .await;
    assert!(matches!(rejected, Err(WayedgeError::Validation(_))));

    let renamed = service
        .update_website_name(&owned, UpdateWebsite { name: "Store".into() })
        .await
        .unwrap();
    assert_eq!(renamed.name, "Store");
}

#[tokio::test]
async fn list_and_dashboard() {
    let service = service().await;
    let alice = caller(&service, "alice@example.com").await;
    let bob = caller(&service, "bob@example.com").await;

    service
        .create_website(&alice, site("Old", &["old.example.com"]))
        .await
        .unwrap();
    service
        .create_website(&alice, site("New", &["new.example.com", "www.new.example.com"]))
        .await
        .unwrap();
    service
        .create_website(&bob, site("Bob", &["bob.example.com"]))
        .await
        .unwrap();

    let listed = service.list_websites(&alice).await.unwrap();
    let names: Vec<&str> = listed.iter().map(|w| w.website.name.as_str()).collect();
    assert_eq!(names, vec!["New", "Old"]);

    let summary = service.dashboard_summary(&alice).await.unwrap();
    assert_eq!(summary.websites, 2);
    assert_eq!(summary.domains, 3);
}

#[tokio::test]
async fn delete_cascades_to_children() {
    let service = service().await;
    let alice = caller(&service, "alice@example.com").await;
    let mut input = site("Shop", &["shop.example.com"]);
    input.origins = Some(vec![OriginFields::new("10.0.0.1", Protocol::Https, None)]);
    let website = service.create_website(&alice, input).await.unwrap();

    let owned = service.authorize(&alice, website.id).await.unwrap();
    service
        .reconcile_firewall_rules(&owned, vec![Desired::new(FirewallRuleFields::new("^/wp-admin"))])
        .await
        .unwrap();
    service
        .reconcile_whitelist_paths(
            &owned,
            ProtectionSettings {
                enabled: true,
                paths: vec![Desired::new(WhitelistPathFields::new("/healthz"))],
            },
        )
        .await
        .unwrap();

    service.delete_website(owned).await.unwrap();

    assert!(matches!(
        service.authorize(&alice, website.id).await,
        Err(WayedgeError::NotFound { .. })
    ));
    let summary = service.dashboard_summary(&alice).await.unwrap();
    assert_eq!(
        summary,
        DashboardSummary {
            websites: 0,
            domains: 0,
        }
    );
}

// ---------------------------------------------------------------------------
// Child collections
// ---------------------------------------------------------------------------

#[tokio::test]
async fn domains_reconcile_by_identifier() {
    let service = service().await;
    let alice = caller(&service, "alice@example.com").await;
    let website = service
        .create_website(&alice, site("Shop", &["a.example.com", "b.example.com"]))
        .await
        .unwrap();
    let owned = service.authorize(&alice, website.id).await.unwrap();
    let detail = service.get_website(&alice, website.id).await.unwrap();
    let a = detail.domains.iter().find(|d| d.domain == "a.example.com").unwrap();

    // Keep `a` by echoing its id, omit `b`, add `c`.
    let saved = service
        .reconcile_domains(
            &owned,
            vec![
                Desired::existing(a.id, DomainFields::new("a.example.com")),
                Desired::new(DomainFields::new("c.example.com")),
            ],
        )
        .await
        .unwrap();

    let names: HashSet<&str> = saved.iter().map(|d| d.domain.as_str()).collect();
    assert_eq!(names, HashSet::from(["a.example.com", "c.example.com"]));
    assert!(saved.iter().any(|d| d.id == a.id));
}

#[tokio::test]
async fn empty_domain_list_deletes_all() {
    let service = service().await;
    let alice = caller(&service, "alice@example.com").await;
    let website = service
        .create_website(&alice, site("Shop", &["a.example.com"]))
        .await
        .unwrap();
    let owned = service.authorize(&alice, website.id).await.unwrap();

    let saved = service.reconcile_domains(&owned, vec![]).await.unwrap();
    assert!(saved.is_empty());
}

#[tokio::test]
async fn resubmitting_domains_is_idempotent() {
    let service = service().await;
    let alice = caller(&service, "alice@example.com").await;
    let website = service
        .create_website(&alice, site("Shop", &["a.example.com", "b.example.com"]))
        .await
        .unwrap();
    let owned = service.authorize(&alice, website.id).await.unwrap();

    let first = service
        .get_website(&alice, website.id)
        .await
        .unwrap()
        .domains;
    let resubmit = first
        .iter()
        .map(|d| Desired::existing(d.id, DomainFields::new(d.domain.clone())))
        .collect();
    let second = service.reconcile_domains(&owned, resubmit).await.unwrap();

    let before: HashSet<Uuid> = first.iter().map(|d| d.id).collect();
    let after: HashSet<Uuid> = second.iter().map(|d| d.id).collect();
    assert_eq!(before, after);
}

#[tokio::test]
async fn foreign_domain_id_is_dropped() {
    let service = service().await;
    let alice = caller(&service, "alice@example.com").await;
    let bob = caller(&service, "bob@example.com").await;

    let alice_site = service
        .create_website(&alice, site("Alice", &["alice.example.com"]))
        .await
        .unwrap();
    let bob_site = service
        .create_website(&bob, site("Bob", &["bob.example.com"]))
        .await
        .unwrap();
    let bob_domain = service.get_website(&bob, bob_site.id).await.unwrap().domains[0].clone();

    let owned = service.authorize(&alice, alice_site.id).await.unwrap();
    let saved = service
        .reconcile_domains(
            &owned,
            vec![Desired::existing(bob_domain.id, DomainFields::new("hijack.example.com"))],
        )
        .await
        .unwrap();

    // Nothing was updated or created; alice's omitted domain was deleted.
    assert!(saved.is_empty());
    let untouched = service.get_website(&bob, bob_site.id).await.unwrap().domains;
    assert_eq!(untouched, vec![bob_domain]);
}

#[tokio::test]
async fn non_uuid_domain_id_is_dropped() {
    let service = service().await;
    let alice = caller(&service, "alice@example.com").await;
    let website = service
        .create_website(&alice, site("Shop", &["a.example.com"]))
        .await
        .unwrap();
    let owned = service.authorize(&alice, website.id).await.unwrap();

    let saved = service
        .reconcile_domains(
            &owned,
            vec![Desired {
                id: Some(EntryId::Opaque("999-unknown".into())),
                fields: DomainFields::new("x.example.com"),
            }],
        )
        .await
        .unwrap();

    // The stale id neither errors nor creates; the omitted domain is gone.
    assert!(saved.is_empty());
}

#[tokio::test]
async fn stale_handle_cannot_write_after_delete() {
    let service = service().await;
    let alice = caller(&service, "alice@example.com").await;
    let website = service
        .create_website(&alice, site("Shop", &["shop.example.com"]))
        .await
        .unwrap();
    let stale = service.authorize(&alice, website.id).await.unwrap();
    let owned = service.authorize(&alice, website.id).await.unwrap();
    service.delete_website(owned).await.unwrap();

    let domains = service
        .reconcile_domains(&stale, vec![Desired::new(DomainFields::new("orphan.example.com"))])
        .await;
    assert!(matches!(domains, Err(WayedgeError::NotFound { .. })));

    let rules = service
        .reconcile_firewall_rules(&stale, vec![Desired::new(FirewallRuleFields::new("^/x"))])
        .await;
    assert!(matches!(rules, Err(WayedgeError::NotFound { .. })));

    let protection = service
        .reconcile_whitelist_paths(
            &stale,
            ProtectionSettings {
                enabled: true,
                paths: vec![Desired::new(WhitelistPathFields::new("/healthz"))],
            },
        )
        .await;
    assert!(matches!(protection, Err(WayedgeError::NotFound { .. })));

    let origins = service
        .replace_origins(&stale, vec![OriginFields::new("10.0.0.1", Protocol::Https, None)])
        .await;
    assert!(matches!(origins, Err(WayedgeError::NotFound { .. })));

    let store = service.store();
    assert!(store.domains().list_by_website(website.id).await.unwrap().is_empty());
    assert!(store.firewall_rules().list_by_website(website.id).await.unwrap().is_empty());
    assert!(store.whitelist_paths().list_by_website(website.id).await.unwrap().is_empty());
    assert!(store.origins().list_by_website(website.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn invalid_domain_list_changes_nothing() {
    let service = service().await;
    let alice = caller(&service, "alice@example.com").await;
    let website = service
        .create_website(&alice, site("Shop", &["a.example.com"]))
        .await
        .unwrap();
    let owned = service.authorize(&alice, website.id).await.unwrap();

    let result = service
        .reconcile_domains(
            &owned,
            vec![
                Desired::new(DomainFields::new("fine.example.com")),
                Desired::new(DomainFields::new("x")),
            ],
        )
        .await;
    match result {
        Err(WayedgeError::Validation(errors)) => {
            assert!(errors.has_field("domains[1].domain"));
        }
        other => panic!("expected Validation, got {other:?}"),
    }

    let domains = service.get_website(&alice, website.id).await.unwrap().domains;
    assert_eq!(domains.len(), 1);
    assert_eq!(domains[0].domain, "a.example.com");
}

#[tokio::test]
async fn firewall_save_returns_website_with_rules() {
    let service = service().await;
    let alice = caller(&service, "alice@example.com").await;
    let website = service
        .create_website(&alice, site("Shop", &["shop.example.com"]))
        .await
        .unwrap();
    let owned = service.authorize(&alice, website.id).await.unwrap();

    let saved = service
        .reconcile_firewall_rules(
            &owned,
            vec![
                Desired::new(FirewallRuleFields::new("^/admin")),
                Desired::new(FirewallRuleFields::new("\\.env$")),
            ],
        )
        .await
        .unwrap();
    assert_eq!(saved.website.id, website.id);
    assert_eq!(saved.firewall_rules.len(), 2);

    let empty_pattern = service
        .reconcile_firewall_rules(&owned, vec![Desired::new(FirewallRuleFields::new(""))])
        .await;
    assert!(matches!(empty_pattern, Err(WayedgeError::Validation(_))));
}

#[tokio::test]
async fn protection_flag_and_paths_save_together() {
    let service = service().await;
    let alice = caller(&service, "alice@example.com").await;
    let website = service
        .create_website(&alice, site("Shop", &["shop.example.com"]))
        .await
        .unwrap();
    let owned = service.authorize(&alice, website.id).await.unwrap();

    let enabled = service
        .reconcile_whitelist_paths(
            &owned,
            ProtectionSettings {
                enabled: true,
                paths: vec![
                    Desired::new(WhitelistPathFields::new("/healthz")),
                    Desired::new(WhitelistPathFields::new("/api/webhooks")),
                ],
            },
        )
        .await
        .unwrap();
    assert!(enabled.website.protection_enabled);
    assert_eq!(enabled.whitelist_paths.len(), 2);

    let disabled = service
        .reconcile_whitelist_paths(
            &owned,
            ProtectionSettings {
                enabled: false,
                paths: vec![],
            },
        )
        .await
        .unwrap();
    assert!(!disabled.website.protection_enabled);
    assert!(disabled.whitelist_paths.is_empty());
}

#[tokio::test]
async fn origins_are_replaced_with_new_ids() {
    let service = service().await;
    let alice = caller(&service, "alice@example.com").await;
    let mut input = site("Shop", &["shop.example.com"]);
    input.origins = Some(vec![OriginFields::new("10.0.0.1", Protocol::Https, Some(443))]);
    let website = service.create_website(&alice, input).await.unwrap();
    let owned = service.authorize(&alice, website.id).await.unwrap();
    let before = service.get_website(&alice, website.id).await.unwrap().origins;

    let after = service
        .replace_origins(
            &owned,
            vec![OriginFields::new("10.0.0.1", Protocol::Https, Some(443))],
        )
        .await
        .unwrap();

    assert_eq!(after.len(), 1);
    assert_ne!(after[0].id, before[0].id);
    assert_eq!(after[0].port, Some(443));
}

#[tokio::test]
async fn invalid_origins_delete_nothing() {
    let service = service().await;
    let alice = caller(&service, "alice@example.com").await;
    let mut input = site("Shop", &["shop.example.com"]);
    input.origins = Some(vec![OriginFields::new("10.0.0.1", Protocol::Http, None)]);
    let website = service.create_website(&alice, input).await.unwrap();
    let owned = service.authorize(&alice, website.id).await.unwrap();

    let empty = service.replace_origins(&owned, vec![]).await;
    assert!(matches!(empty, Err(WayedgeError::Validation(_))));

    let blank_host = service
        .replace_origins(
            &owned,
            vec![
                OriginFields::new("10.0.0.2", Protocol::Http, None),
                OriginFields::new("", Protocol::Http, None),
            ],
        )
        .await;
    match blank_host {
        Err(WayedgeError::Validation(errors)) => assert!(errors.has_field("origins[1].host")),
        other => panic!("expected Validation, got {other:?}"),
    }

    let origins = service.get_website(&alice, website.id).await.unwrap().origins;
    assert_eq!(origins.len(), 1);
    assert_eq!(origins[0].host, "10.0.0.1");
}
