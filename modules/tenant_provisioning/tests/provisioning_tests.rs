//! Integration tests for default data, access control, users and pipelines

use argon2::{password_hash::PasswordHash, Argon2, PasswordVerifier};
use serde_json::json;
use tenant_provisioning::contract::{
    AccessLevel, ModuleAccess, NewModulePermission, NewPipeline, ProvisioningError, SkipReason,
};
use tenant_provisioning::domain::catalog::layouts::{
    default_dashboards, default_reports, default_views,
};
use tenant_provisioning::domain::catalog::permissions::{PERMISSIONS, READ_ONLY_PERMISSIONS};
use tenant_provisioning::domain::catalog::{DEFAULT_MODULES, DEFAULT_PIPELINES};
use tenant_provisioning::domain::{AccessProvisioner, ProvisioningPlan, Step};

mod common;
use common::{print_test_header, TestHarness};

const TENANT: &str = "acme";

fn has_skip(tally: &tenant_provisioning::Tally, reason: &SkipReason) -> bool {
    tally.skipped.iter().any(|s| &s.reason == reason)
}

// ===== Orchestrator =====

#[tokio::test]
async fn full_preset_twice_creates_nothing_new() {
    print_test_header(
        "full_preset_twice_creates_nothing_new",
        "Re-running the full preset must leave row counts unchanged",
    );
    let harness = TestHarness::new();
    harness.register(TENANT).await;

    let first = harness
        .service
        .provision_defaults(Some(TENANT), Some("full"), false)
        .await
        .unwrap();
    assert!(first.total_created() > 0);

    let db = harness.db(TENANT);
    let counts = (
        db.stages().len(),
        db.views().len(),
        db.reports().len(),
        db.dashboards().len(),
        db.widgets().len(),
    );

    let second = harness
        .service
        .provision_defaults(Some(TENANT), Some("full"), false)
        .await
        .unwrap();
    assert_eq!(second.total_created(), 0);
    assert!(has_skip(
        second.step(Step::Subscription).unwrap(),
        &SkipReason::SubscriptionExists
    ));

    assert_eq!(
        counts,
        (
            db.stages().len(),
            db.views().len(),
            db.reports().len(),
            db.dashboards().len(),
            db.widgets().len(),
        )
    );
    assert_eq!(db.subscription_count(), 1);
}

#[tokio::test]
async fn full_preset_provisions_every_template() {
    let harness = TestHarness::new();
    harness.register(TENANT).await;

    let report = harness
        .service
        .provision_defaults(Some(TENANT), None, false)
        .await
        .unwrap();

    let steps: Vec<Step> = report.steps.iter().map(|s| s.step).collect();
    assert_eq!(
        steps,
        vec![
            Step::Subscription,
            Step::Modules,
            Step::Pipelines,
            Step::Views,
            Step::Reports,
            Step::Dashboards,
        ]
    );

    let db = harness.db(TENANT);
    let store = harness.store(TENANT);
    assert_eq!(store.modules.list_all().await.unwrap().len(), DEFAULT_MODULES.len());
    assert_eq!(db.views().len(), default_views().len());
    assert_eq!(db.reports().len(), default_reports().len());
    assert_eq!(db.dashboards().len(), default_dashboards().len());

    let expected_stages: usize = DEFAULT_PIPELINES.iter().map(|p| p.stages.len()).sum();
    assert_eq!(db.stages().len(), expected_stages);

    // every report widget found its report
    let dashboards = report.step(Step::Dashboards).unwrap();
    assert!(dashboards.skipped.is_empty(), "{:?}", dashboards.skipped);
}

#[tokio::test]
async fn starter_preset_skips_optional_groups() {
    let harness = TestHarness::new();
    harness.register(TENANT).await;

    let report = harness
        .service
        .provision_defaults(Some(TENANT), Some("starter"), false)
        .await
        .unwrap();

    let steps: Vec<Step> = report.steps.iter().map(|s| s.step).collect();
    assert_eq!(steps, vec![Step::Subscription, Step::Modules, Step::Views]);

    let db = harness.db(TENANT);
    assert!(db.stages().is_empty());
    assert!(db.reports().is_empty());
    assert!(db.dashboards().is_empty());
    assert_eq!(db.views().len(), default_views().len());
}

#[tokio::test]
async fn sample_data_runs_last_and_needs_a_user() {
    let harness = TestHarness::new();
    harness.register(TENANT).await;

    let err = harness
        .service
        .provision_defaults(Some(TENANT), Some("sales"), true)
        .await
        .unwrap_err();
    assert!(matches!(err, ProvisioningError::NoBaseUser));

    // earlier steps of the failed run stay committed
    assert_eq!(harness.db(TENANT).subscription_count(), 1);

    harness.service.provision_access(Some(TENANT)).await.unwrap();
    harness.service.provision_users(Some(TENANT)).await.unwrap();
    let report = harness
        .service
        .provision_defaults(Some(TENANT), Some("sales"), true)
        .await
        .unwrap();

    assert_eq!(report.steps.last().map(|s| s.step), Some(Step::SampleData));
    let sample = report.sample_data.unwrap();
    assert!(sample.total_records() > 0);
    assert_eq!(harness.db(TENANT).records().len(), sample.total_records());
}

#[tokio::test]
async fn invalid_preset_is_rejected_before_any_write() {
    let harness = TestHarness::new();
    harness.register(TENANT).await;

    let err = harness
        .service
        .provision_defaults(Some(TENANT), Some("enterprise"), false)
        .await
        .unwrap_err();
    assert!(matches!(err, ProvisioningError::InvalidPreset { value } if value == "enterprise"));
    assert_eq!(harness.db(TENANT).subscription_count(), 0);
}

#[tokio::test]
async fn tenant_context_is_required() {
    let harness = TestHarness::new();

    let err = harness
        .service
        .provision_defaults(None, None, false)
        .await
        .unwrap_err();
    assert!(matches!(err, ProvisioningError::NoTenantContext));

    let err = harness.service.provision_access(Some("ghost")).await.unwrap_err();
    assert!(matches!(err, ProvisioningError::UnknownTenant { tenant_id } if tenant_id == "ghost"));
}

#[tokio::test]
async fn dashboards_without_reports_skip_report_widgets() {
    let harness = TestHarness::new();
    harness.register(TENANT).await;

    let plan = ProvisioningPlan::from_steps(&[Step::Dashboards, Step::Modules]).unwrap();
    assert_eq!(plan.steps(), &[Step::Modules, Step::Dashboards]);

    let report = harness.orchestrator(TENANT).await.run(&plan).await.unwrap();
    let tally = report.step(Step::Dashboards).unwrap();
    assert!(tally
        .skipped
        .iter()
        .any(|s| matches!(s.reason, SkipReason::ReportMissing { .. })));
    assert_eq!(harness.db(TENANT).dashboards().len(), default_dashboards().len());
}

#[tokio::test]
async fn dashboard_widgets_stay_on_the_grid_without_overlap() {
    let harness = TestHarness::new();
    harness.register(TENANT).await;
    harness
        .service
        .provision_defaults(Some(TENANT), Some("full"), false)
        .await
        .unwrap();

    let db = harness.db(TENANT);
    for dashboard in db.dashboards() {
        let widgets: Vec<_> = db
            .widgets()
            .into_iter()
            .filter(|w| w.dashboard_id == dashboard.id)
            .collect();
        assert!(!widgets.is_empty(), "{} has no widgets", dashboard.name);

        for (i, a) in widgets.iter().enumerate() {
            let pa = a.grid_position;
            assert!(pa.x + pa.w <= 12, "{} overflows", a.title);
            for b in widgets.iter().skip(i + 1) {
                let pb = b.grid_position;
                let disjoint = pa.x + pa.w <= pb.x
                    || pb.x + pb.w <= pa.x
                    || pa.y + pa.h <= pb.y
                    || pb.y + pb.h <= pa.y;
                assert!(disjoint, "{} overlaps {}", a.title, b.title);
            }
        }
    }
}

// ===== Access =====

#[tokio::test]
async fn matrix_waits_for_modules() {
    let harness = TestHarness::new();
    harness.register(TENANT).await;

    let tally = harness.service.provision_access(Some(TENANT)).await.unwrap();
    assert!(has_skip(&tally, &SkipReason::NoModules));
    assert!(harness.db(TENANT).module_permissions().is_empty());

    harness
        .service
        .provision_defaults(Some(TENANT), Some("starter"), false)
        .await
        .unwrap();
    harness.service.provision_access(Some(TENANT)).await.unwrap();
    let rows = harness.db(TENANT).module_permissions().len();
    assert_eq!(rows, 4 * DEFAULT_MODULES.len());

    let again = harness.service.provision_access(Some(TENANT)).await.unwrap();
    assert_eq!(again.created, 0);
    assert_eq!(harness.db(TENANT).module_permissions().len(), rows);
}

#[tokio::test]
async fn matrix_without_roles_is_skipped() {
    let harness = TestHarness::new();
    harness.register(TENANT).await;

    let access = AccessProvisioner::new(harness.store(TENANT));
    let tally = access.provision_matrix().await.unwrap();
    assert!(has_skip(&tally, &SkipReason::NoRoles));
}

#[tokio::test]
async fn existing_module_permission_is_never_overwritten() {
    let harness = TestHarness::new();
    harness.register(TENANT).await;
    harness
        .service
        .provision_defaults(Some(TENANT), Some("starter"), false)
        .await
        .unwrap();

    let store = harness.store(TENANT);
    let access = AccessProvisioner::new(store.clone());
    access.provision_roles().await.unwrap();

    let admin = store.roles.find_role("admin").await.unwrap().unwrap();
    let deals = store.modules.find_by_api_name("deals").await.unwrap().unwrap();
    let custom = ModuleAccess {
        can_view: true,
        can_create: false,
        can_edit: false,
        can_delete: false,
        can_export: false,
        can_import: false,
        access_level: AccessLevel::Own,
        field_restrictions: vec!["amount".to_string()],
    };
    store
        .module_permissions
        .create(&NewModulePermission {
            role_id: admin.id,
            module_id: deals.id,
            access: custom.clone(),
        })
        .await
        .unwrap();

    access.provision_matrix().await.unwrap();

    let row = store
        .module_permissions
        .find(admin.id, deals.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.access, custom);
}

#[tokio::test]
async fn role_permission_sets_match_the_catalog() {
    let harness = TestHarness::new();
    harness.register(TENANT).await;

    harness.service.provision_access(Some(TENANT)).await.unwrap();
    harness.service.provision_access(Some(TENANT)).await.unwrap();

    let store = harness.store(TENANT);
    assert_eq!(store.roles.list_permissions().await.unwrap().len(), PERMISSIONS.len());
    assert_eq!(store.roles.list_roles().await.unwrap().len(), 4);

    let admin = store.roles.find_role("admin").await.unwrap().unwrap();
    assert_eq!(
        store.roles.role_permissions(admin.id).await.unwrap().len(),
        PERMISSIONS.len()
    );

    let viewer = store.roles.find_role("read_only").await.unwrap().unwrap();
    let mut granted: Vec<String> = store
        .roles
        .role_permissions(viewer.id)
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.name)
        .collect();
    granted.sort();
    let mut expected: Vec<String> = READ_ONLY_PERMISSIONS.iter().map(|s| s.to_string()).collect();
    expected.sort();
    assert_eq!(granted, expected);
}

// ===== Users =====

#[tokio::test]
async fn demo_users_are_upserted() {
    print_test_header(
        "demo_users_are_upserted",
        "A second run updates the four demo users instead of duplicating them",
    );
    let harness = TestHarness::new();
    harness.register(TENANT).await;
    harness.service.provision_access(Some(TENANT)).await.unwrap();

    let first = harness.service.provision_users(Some(TENANT)).await.unwrap();
    assert_eq!(first.created, 4);
    let second = harness.service.provision_users(Some(TENANT)).await.unwrap();
    assert_eq!((second.created, second.existing), (0, 4));

    let db = harness.db(TENANT);
    assert_eq!(db.users().len(), 4);
    assert_eq!(db.user_role_count(), 4);

    let admin = db
        .users()
        .into_iter()
        .find(|u| u.email == "admin@acme.test")
        .unwrap();
    let hash = PasswordHash::new(&admin.password_hash).unwrap();
    assert!(Argon2::default().verify_password(b"secret", &hash).is_ok());
}

#[tokio::test]
async fn demo_users_without_roles_report_the_missing_role() {
    let harness = TestHarness::new();
    harness.register(TENANT).await;

    let tally = harness.service.provision_users(Some(TENANT)).await.unwrap();
    assert_eq!(tally.created, 4);
    assert!(has_skip(
        &tally,
        &SkipReason::RoleMissing {
            name: "sales_rep".to_string()
        }
    ));
    assert_eq!(harness.db(TENANT).user_role_count(), 0);
}

// ===== Pipelines =====

#[tokio::test]
async fn pipeline_rerun_keeps_settings_and_stage_order() {
    let harness = TestHarness::new();
    harness.register(TENANT).await;
    harness
        .service
        .provision_defaults(Some(TENANT), Some("starter"), false)
        .await
        .unwrap();

    let store = harness.store(TENANT);
    let deals = store.modules.find_by_api_name("deals").await.unwrap().unwrap();
    let custom = json!({ "show_totals": false, "custom": true });
    store
        .pipelines
        .create_pipeline(&NewPipeline {
            module_id: deals.id,
            name: "Sales Pipeline".to_string(),
            stage_field_api_name: "stage".to_string(),
            settings: custom.clone(),
            created_by: None,
        })
        .await
        .unwrap();

    harness.service.provision_pipelines(Some(TENANT)).await.unwrap();
    let pipeline = store
        .pipelines
        .find_pipeline(deals.id, "Sales Pipeline")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(pipeline.settings, custom);

    let stages = store.pipelines.list_stages(pipeline.id).await.unwrap();
    let orders: Vec<i32> = stages.iter().map(|s| s.display_order).collect();
    assert_eq!(orders, (0..stages.len() as i32).collect::<Vec<_>>());

    let again = harness.service.provision_pipelines(Some(TENANT)).await.unwrap();
    assert_eq!(again.created, 0);
    assert_eq!(store.pipelines.list_stages(pipeline.id).await.unwrap(), stages);
    assert_eq!(store.pipelines.list_for_module(deals.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn pipelines_skip_missing_modules() {
    let harness = TestHarness::new();
    harness.register(TENANT).await;

    let store = harness.store(TENANT);
    let deals = DEFAULT_MODULES
        .iter()
        .find(|m| m.api_name == "deals")
        .unwrap();
    store.modules.create(&deals.to_new_module()).await.unwrap();

    let tally = harness.service.provision_pipelines(Some(TENANT)).await.unwrap();
    assert_eq!(tally.skipped.len(), DEFAULT_PIPELINES.len() - 1);
    assert!(has_skip(
        &tally,
        &SkipReason::ModuleMissing {
            api_name: "cases".to_string()
        }
    ));
    let deals = store.modules.find_by_api_name("deals").await.unwrap().unwrap();
    assert!(store
        .pipelines
        .find_pipeline(deals.id, "Sales Pipeline")
        .await
        .unwrap()
        .is_some());
}
