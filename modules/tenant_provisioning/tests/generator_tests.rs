//! Integration tests for bulk synthetic data generation

use std::collections::HashSet;
use tenant_provisioning::contract::ProvisioningError;
use tenant_provisioning::domain::catalog::layouts::{default_dashboards, default_reports};
use tenant_provisioning::domain::catalog::DEFAULT_MODULES;
use tenant_provisioning::domain::{AuxiliaryKind, RecordKind, Scale};

mod common;
use common::{print_test_header, TestHarness};

const TENANT: &str = "acme";

/// Tenant with every default, roles and demo users
async fn seeded_harness() -> TestHarness {
    let harness = TestHarness::new();
    harness.register(TENANT).await;
    harness
        .service
        .provision_defaults(Some(TENANT), Some("full"), false)
        .await
        .unwrap();
    harness.service.provision_access(Some(TENANT)).await.unwrap();
    harness.service.provision_users(Some(TENANT)).await.unwrap();
    harness
}

#[tokio::test]
async fn generation_needs_a_base_user() {
    let harness = TestHarness::new();
    harness.register(TENANT).await;
    harness
        .service
        .provision_defaults(Some(TENANT), Some("starter"), false)
        .await
        .unwrap();

    let err = harness
        .service
        .generate_test_data(Some(TENANT), Some("small"), Some(1))
        .await
        .unwrap_err();
    assert!(matches!(err, ProvisioningError::NoBaseUser));
    assert!(harness.db(TENANT).records().is_empty());
}

#[tokio::test]
async fn invalid_scale_is_rejected() {
    let harness = seeded_harness().await;

    let err = harness
        .service
        .generate_test_data(Some(TENANT), Some("enormous"), None)
        .await
        .unwrap_err();
    assert!(matches!(err, ProvisioningError::InvalidScale { value } if value == "enormous"));
}

#[tokio::test]
async fn small_scale_creates_the_table_volumes() {
    print_test_header(
        "small_scale_creates_the_table_volumes",
        "Each record kind, report and dashboard count follows the small scale row",
    );
    let harness = seeded_harness().await;

    let report = harness
        .service
        .generate_test_data(Some(TENANT), Some("small"), Some(3))
        .await
        .unwrap();

    let volume = Scale::Small.volume();
    for kind in RecordKind::ORDER {
        assert_eq!(report.created_for(kind), volume.count(kind), "{:?}", kind);
    }
    assert!(report.skipped.is_empty());
    assert_eq!(report.reports, 5);
    assert_eq!(report.dashboards, 2);

    let db = harness.db(TENANT);
    assert_eq!(db.records().len(), report.total_records());
    assert_eq!(db.reports().len(), default_reports().len() + 5);
    assert_eq!(db.dashboards().len(), default_dashboards().len() + 2);

    let owner = db.users().iter().map(|u| u.id).min().unwrap();
    assert!(db.records().iter().all(|r| r.created_by == owner));
}

#[tokio::test]
async fn small_scale_fills_the_auxiliary_groups() {
    print_test_header(
        "small_scale_fills_the_auxiliary_groups",
        "Workflows, blueprints, email, audit trail, transfers and integrations",
    );
    let harness = seeded_harness().await;

    let report = harness
        .service
        .generate_test_data(Some(TENANT), Some("small"), Some(4))
        .await
        .unwrap();
    assert!(report.auxiliary_skipped.is_empty());

    let db = harness.db(TENANT);
    assert_eq!(db.workflows().len(), 3);
    let steps = db.workflow_steps();
    assert!((6..=15).contains(&steps.len()), "{} steps", steps.len());
    assert_eq!(report.auxiliary_for(AuxiliaryKind::WorkflowSteps), steps.len());
    for workflow in db.workflows() {
        let mut orders: Vec<i32> = steps
            .iter()
            .filter(|s| s.workflow_id == workflow.id)
            .map(|s| s.step_order)
            .collect();
        orders.sort();
        assert_eq!(orders, (1..=orders.len() as i32).collect::<Vec<_>>());
    }
    // 10 executions over 3 workflows, rounded up per workflow
    assert_eq!(db.workflow_executions().len(), 12);

    assert_eq!(db.blueprints().len(), 2);
    assert_eq!(db.blueprint_states().len(), 8);
    assert_eq!(db.blueprint_transitions().len(), 6);
    let finals: HashSet<i64> = db
        .blueprint_states()
        .iter()
        .filter(|s| s.is_final)
        .map(|s| s.id)
        .collect();
    assert!(db
        .blueprint_transitions()
        .iter()
        .all(|t| !finals.contains(&t.from_state_id)));

    assert_eq!(db.email_accounts().len(), 2);
    assert_eq!(db.email_messages().len(), 30);
    assert_eq!(db.email_templates().len(), 5);

    let records: HashSet<i64> = db.records().iter().map(|r| r.id).collect();
    let audit_logs = db.audit_logs();
    assert_eq!(audit_logs.len(), 100);
    assert!(audit_logs
        .iter()
        .all(|entry| entry.auditable_id.is_some_and(|id| records.contains(&id))));

    assert_eq!((db.imports().len(), db.exports().len()), (3, 3));
    assert_eq!(db.webhooks().len(), 3);

    let keys = db.api_keys();
    assert_eq!(keys.len(), 2);
    assert!(keys.iter().all(|k| k.prefix.starts_with("crm_") && k.key_hash.len() == 64));
}

#[tokio::test]
async fn records_are_inserted_in_bounded_batches() {
    let harness = seeded_harness().await;

    harness
        .service
        .generate_test_data(Some(TENANT), Some("medium"), Some(5))
        .await
        .unwrap();

    let db = harness.db(TENANT);
    let batches = db.batch_sizes();
    assert!(batches.iter().all(|size| (1..=100).contains(size)), "{:?}", batches);
    assert_eq!(batches.iter().sum::<usize>(), db.records().len());
    // 300 contacts split into three full batches
    assert!(batches.iter().filter(|size| **size == 100).count() >= 3);
}

#[tokio::test]
async fn kinds_without_a_module_are_skipped() {
    let harness = TestHarness::new();
    harness.register(TENANT).await;

    let store = harness.store(TENANT);
    for definition in DEFAULT_MODULES
        .iter()
        .filter(|m| ["organizations", "contacts"].contains(&m.api_name))
    {
        store.modules.create(&definition.to_new_module()).await.unwrap();
    }
    harness.service.provision_users(Some(TENANT)).await.unwrap();

    let report = harness
        .service
        .generate_test_data(Some(TENANT), Some("small"), Some(9))
        .await
        .unwrap();

    assert_eq!(report.created_for(RecordKind::Organizations), 25);
    assert_eq!(report.created_for(RecordKind::Contacts), 50);
    assert!(report.skipped.contains(&RecordKind::Deals));
    assert!(report.skipped.contains(&RecordKind::Invoices));
    assert!(!report.skipped.contains(&RecordKind::Events));
    assert_eq!(report.total_records(), 75);

    // reports and dashboards still find organizations and contacts
    assert_eq!(report.reports, 5);
    assert_eq!(report.dashboards, 2);

    // blueprints need deals or cases; workflows fall back to contacts
    assert_eq!(report.auxiliary_skipped, vec![AuxiliaryKind::Blueprints]);
    assert_eq!(report.auxiliary_for(AuxiliaryKind::Workflows), 3);
    let db = harness.db(TENANT);
    assert!(db.blueprints().is_empty());
    assert_eq!(db.webhooks().len(), 3);
    assert_eq!(db.imports().len(), 3);
}

#[tokio::test]
async fn deals_reference_sales_pipeline_stages() {
    let harness = seeded_harness().await;

    harness
        .service
        .generate_test_data(Some(TENANT), Some("small"), Some(11))
        .await
        .unwrap();

    let store = harness.store(TENANT);
    let deals = store.modules.find_by_api_name("deals").await.unwrap().unwrap();
    let pipeline = store
        .pipelines
        .find_pipeline(deals.id, "Sales Pipeline")
        .await
        .unwrap()
        .unwrap();
    let stage_ids: HashSet<String> = store
        .pipelines
        .list_stages(pipeline.id)
        .await
        .unwrap()
        .iter()
        .map(|s| s.id.to_string())
        .collect();

    let organizations: HashSet<i64> = {
        let orgs = store.modules.find_by_api_name("organizations").await.unwrap().unwrap();
        harness
            .db(TENANT)
            .records()
            .iter()
            .filter(|r| r.module_id == orgs.id)
            .map(|r| r.id)
            .collect()
    };

    let deal_rows: Vec<_> = harness
        .db(TENANT)
        .records()
        .into_iter()
        .filter(|r| r.module_id == deals.id)
        .collect();
    assert_eq!(deal_rows.len(), 20);
    for row in deal_rows {
        let stage = row.data["stage"].as_str().unwrap();
        assert!(stage_ids.contains(stage), "unknown stage {}", stage);
        let org = row.data["organization_id"].as_i64().unwrap();
        assert!(organizations.contains(&org));
    }
}

#[tokio::test]
async fn seed_makes_output_reproducible() {
    let names = |harness: &TestHarness| -> Vec<String> {
        harness
            .db(TENANT)
            .records()
            .iter()
            .filter_map(|r| r.data["name"].as_str().map(str::to_string))
            .take(25)
            .collect()
    };

    let first = seeded_harness().await;
    first
        .service
        .generate_test_data(Some(TENANT), Some("small"), Some(2024))
        .await
        .unwrap();
    let second = seeded_harness().await;
    second
        .service
        .generate_test_data(Some(TENANT), Some("small"), Some(2024))
        .await
        .unwrap();

    assert_eq!(names(&first), names(&second));
}

#[tokio::test]
async fn generation_adds_rows_on_every_run() {
    let harness = seeded_harness().await;

    harness
        .service
        .generate_test_data(Some(TENANT), Some("small"), None)
        .await
        .unwrap();
    let after_first = harness.db(TENANT).records().len();
    harness
        .service
        .generate_test_data(Some(TENANT), Some("small"), None)
        .await
        .unwrap();

    assert_eq!(harness.db(TENANT).records().len(), after_first * 2);
}
