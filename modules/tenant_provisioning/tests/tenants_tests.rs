//! Integration tests for central tenant registration and bootstrap

use tenant_provisioning::contract::{PlanTier, ProvisioningError, SkipReason};
use tenant_provisioning::domain::catalog::{DEFAULT_MODULES, DEMO_USERS, TENANT_DEFINITIONS};
use tenant_provisioning::domain::TenantRepository;

mod common;
use common::{new_tenant, print_test_header, TestHarness};

#[tokio::test]
async fn bootstrap_registers_fixed_tenants_once() {
    print_test_header(
        "bootstrap_registers_fixed_tenants_once",
        "The fixed tenant set is created on the first run and skipped afterwards",
    );
    let harness = TestHarness::new();

    let first = harness.service.bootstrap_tenants(false).await.unwrap();
    assert_eq!(first.created, vec!["techco", "softwaredev", "smallbiz"]);
    assert_eq!(first.tally.created, TENANT_DEFINITIONS.len());
    assert!(first.tally.skipped.is_empty());

    for definition in TENANT_DEFINITIONS {
        let tenant = harness.tenants.find(definition.id).await.unwrap().unwrap();
        assert_eq!(tenant.plan, definition.plan);
        let domain = harness.tenants.find_domain(definition.id).await.unwrap().unwrap();
        assert_eq!(domain.domain, format!("{}.localhost", definition.id));

        let db = harness.db(definition.id);
        assert_eq!(db.users().len(), DEMO_USERS.len());
        assert_eq!(db.user_role_count(), DEMO_USERS.len());
        assert!(db.module_permissions().is_empty());
    }

    let second = harness.service.bootstrap_tenants(false).await.unwrap();
    assert!(second.created.is_empty());
    assert_eq!(second.tally.created, 0);
    assert_eq!(second.tally.skipped.len(), TENANT_DEFINITIONS.len());
    assert!(second.tally.skipped.iter().all(|s| matches!(
        &s.reason,
        SkipReason::TenantExists { tenant_id } if *tenant_id == s.subject
    )));
    assert_eq!(harness.db("techco").users().len(), DEMO_USERS.len());
}

#[tokio::test]
async fn bootstrap_with_defaults_seeds_each_tenant() {
    let harness = TestHarness::new();

    harness.service.bootstrap_tenants(true).await.unwrap();

    for definition in TENANT_DEFINITIONS {
        let db = harness.db(definition.id);
        let store = harness.store(definition.id);
        assert_eq!(
            store.modules.list_all().await.unwrap().len(),
            DEFAULT_MODULES.len()
        );
        assert_eq!(db.module_permissions().len(), 4 * DEFAULT_MODULES.len());
        assert_eq!(db.subscription_count(), 1);
        // sample data is never part of the bootstrap
        assert!(db.records().is_empty());
    }
}

#[tokio::test]
async fn tenant_databases_are_isolated() {
    let harness = TestHarness::new();
    harness.register("north").await;
    harness.register("south").await;

    harness.service.provision_access(Some("north")).await.unwrap();
    harness.service.provision_users(Some("north")).await.unwrap();

    assert_eq!(harness.db("north").users().len(), DEMO_USERS.len());
    assert!(harness.db("south").users().is_empty());
    assert!(harness
        .db("north")
        .users()
        .iter()
        .all(|u| u.email.ends_with("@north.test")));
}

#[tokio::test]
async fn registrar_rejects_duplicate_ids() {
    let harness = TestHarness::new();

    let handle = harness
        .service
        .registrar()
        .create_tenant(&new_tenant("acme"))
        .await
        .unwrap();
    assert_eq!(handle.tenant.id, "acme");
    assert_eq!(handle.tenant.plan, PlanTier::Professional);
    assert_eq!(handle.domain.tenant_id, "acme");
    assert_eq!(handle.domain.domain, "acme.localhost");

    let mut renamed = new_tenant("acme");
    renamed.name = "Acme Renamed".to_string();
    let err = harness
        .service
        .registrar()
        .create_tenant(&renamed)
        .await
        .unwrap_err();
    assert!(matches!(err, ProvisioningError::DuplicateTenant { tenant_id } if tenant_id == "acme"));

    let stored = harness.tenants.find("acme").await.unwrap().unwrap();
    assert_eq!(stored.name, "acme Inc");
}

#[tokio::test]
async fn domain_collision_is_a_hard_error() {
    let harness = TestHarness::new();
    harness.register("acme").await;

    let mut clash = new_tenant("acme2");
    clash.domain = "acme.localhost".to_string();
    let err = harness
        .service
        .registrar()
        .create_tenant(&clash)
        .await
        .unwrap_err();
    assert!(matches!(err, ProvisioningError::Storage(_)));
    assert!(harness.tenants.find("acme2").await.unwrap().is_none());
}
