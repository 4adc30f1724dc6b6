//! Integration tests for the SeaORM repositories against SQLite

use serde_json::json;
use std::sync::Arc;
use tenant_provisioning::contract::{
    NewApiKey, NewEmailAccount, NewEmailMessage, NewModuleRecord, NewPipeline, NewUser,
    NewWorkflow, NewWorkflowStep,
};
use tenant_provisioning::domain::catalog::{DEFAULT_MODULES, DEMO_USERS, TENANT_DEFINITIONS};
use tenant_provisioning::domain::{TenantRepository, TenantStore};
use tenant_provisioning::infra::storage::{
    self, tenant_store, SeaOrmTenantRepository, SeaOrmTenantStoreFactory,
};
use tenant_provisioning::{Config, Service};

mod common;
use common::{new_tenant, print_test_header, test_config};

async fn central_repo() -> SeaOrmTenantRepository {
    let db = storage::connect("sqlite::memory:").await.unwrap();
    storage::migrate_central(&db).await.unwrap();
    SeaOrmTenantRepository::new(Arc::new(db))
}

async fn tenant_db() -> TenantStore {
    let db = storage::connect("sqlite::memory:").await.unwrap();
    storage::migrate_tenant(&db).await.unwrap();
    tenant_store(Arc::new(db))
}

#[tokio::test]
async fn migrations_are_repeatable() {
    let db = storage::connect("sqlite::memory:").await.unwrap();
    storage::migrate_central(&db).await.unwrap();
    storage::migrate_central(&db).await.unwrap();

    let db = storage::connect("sqlite::memory:").await.unwrap();
    storage::migrate_tenant(&db).await.unwrap();
    storage::migrate_tenant(&db).await.unwrap();
}

// ===== Central database =====

#[tokio::test]
async fn tenant_insert_binds_one_domain() {
    let repo = central_repo().await;

    let (tenant, domain) = repo.insert(&new_tenant("acme")).await.unwrap();
    assert_eq!(tenant.id, "acme");
    assert_eq!(domain.tenant_id, "acme");

    let found = repo.find("acme").await.unwrap().unwrap();
    assert_eq!(found.limits.max_users, 25);
    assert_eq!(found.limits.max_storage_mb, 10_240);
    assert_eq!(
        repo.find_domain("acme").await.unwrap().unwrap().domain,
        "acme.localhost"
    );
    assert!(repo.find("other").await.unwrap().is_none());
}

#[tokio::test]
async fn tenant_unique_keys_are_enforced() {
    let repo = central_repo().await;
    repo.insert(&new_tenant("acme")).await.unwrap();

    assert!(repo.insert(&new_tenant("acme")).await.is_err());

    let mut clash = new_tenant("beta");
    clash.domain = "acme.localhost".to_string();
    assert!(repo.insert(&clash).await.is_err());
    // the failed insert left no half-registered tenant behind
    assert!(repo.find("beta").await.unwrap().is_none());
    assert_eq!(repo.list_all().await.unwrap().len(), 1);
}

// ===== Tenant database =====

#[tokio::test]
async fn role_permissions_are_replaced_on_sync() {
    let store = tenant_db().await;

    let view = store.roles.create_permission("view contacts", "web").await.unwrap();
    let edit = store.roles.create_permission("edit contacts", "web").await.unwrap();
    let delete = store.roles.create_permission("delete contacts", "web").await.unwrap();
    let role = store.roles.create_role("manager", "web").await.unwrap();

    store
        .roles
        .sync_permissions(role.id, &[view.id, edit.id])
        .await
        .unwrap();
    store
        .roles
        .sync_permissions(role.id, &[edit.id, delete.id])
        .await
        .unwrap();

    let mut granted: Vec<String> = store
        .roles
        .role_permissions(role.id)
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.name)
        .collect();
    granted.sort();
    assert_eq!(granted, vec!["delete contacts", "edit contacts"]);

    assert!(store.roles.create_role("manager", "web").await.is_err());
}

#[tokio::test]
async fn user_update_and_role_assignment() {
    let store = tenant_db().await;
    let role = store.roles.create_role("admin", "web").await.unwrap();

    let mut user = store
        .users
        .create(&NewUser {
            name: "Admin".to_string(),
            email: "admin@acme.test".to_string(),
            password_hash: "old".to_string(),
        })
        .await
        .unwrap();

    user.name = "Admin User".to_string();
    user.password_hash = "new".to_string();
    let updated = store.users.update(&user).await.unwrap();
    assert_eq!(updated.name, "Admin User");
    assert_eq!(updated.password_hash, "new");
    assert_eq!(updated.email, "admin@acme.test");

    store.users.assign_role(user.id, role.id).await.unwrap();
    store.users.assign_role(user.id, role.id).await.unwrap();
    assert_eq!(store.users.role_ids(user.id).await.unwrap(), vec![role.id]);

    assert_eq!(store.users.first().await.unwrap().unwrap().id, user.id);
    assert!(store
        .users
        .create(&NewUser {
            name: "Copy".to_string(),
            email: "admin@acme.test".to_string(),
            password_hash: "x".to_string(),
        })
        .await
        .is_err());
}

#[tokio::test]
async fn pipeline_names_are_unique_per_module() {
    let store = tenant_db().await;
    let deals = store
        .modules
        .create(&DEFAULT_MODULES[2].to_new_module())
        .await
        .unwrap();
    let pipeline = NewPipeline {
        module_id: deals.id,
        name: "Sales Pipeline".to_string(),
        stage_field_api_name: "stage".to_string(),
        settings: json!({ "show_totals": true }),
        created_by: None,
    };

    store.pipelines.create_pipeline(&pipeline).await.unwrap();
    assert!(store.pipelines.create_pipeline(&pipeline).await.is_err());
    assert_eq!(store.pipelines.list_for_module(deals.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn record_batches_return_ids_in_order() {
    let store = tenant_db().await;
    let module = store
        .modules
        .create(&DEFAULT_MODULES[0].to_new_module())
        .await
        .unwrap();
    let user = store
        .users
        .create(&NewUser {
            name: "Owner".to_string(),
            email: "owner@acme.test".to_string(),
            password_hash: "x".to_string(),
        })
        .await
        .unwrap();

    let batch: Vec<NewModuleRecord> = (0..5)
        .map(|n| NewModuleRecord {
            module_id: module.id,
            data: json!({ "name": format!("Row {}", n) }),
            created_by: user.id,
        })
        .collect();
    let ids = store.records.insert_batch(&batch).await.unwrap();

    assert_eq!(ids.len(), 5);
    assert!(ids.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(store.records.count_for_module(module.id).await.unwrap(), 5);
    assert!(store.records.insert_batch(&[]).await.unwrap().is_empty());
}

#[tokio::test]
async fn auxiliary_tables_enforce_their_keys() {
    let store = tenant_db().await;
    let contacts = store
        .modules
        .create(&DEFAULT_MODULES[0].to_new_module())
        .await
        .unwrap();
    let user = store
        .users
        .create(&NewUser {
            name: "Owner".to_string(),
            email: "owner@acme.test".to_string(),
            password_hash: "x".to_string(),
        })
        .await
        .unwrap();

    let workflow = store
        .automation
        .create_workflow(&NewWorkflow {
            module_id: contacts.id,
            name: "Welcome".to_string(),
            description: "Greets new contacts".to_string(),
            trigger_type: "record_created".to_string(),
            trigger_config: json!({}),
            is_active: true,
            created_by: user.id,
        })
        .await
        .unwrap();
    let step = NewWorkflowStep {
        workflow_id: workflow.id,
        step_order: 1,
        action_type: "send_email".to_string(),
        action_config: json!({ "template": "welcome" }),
    };
    store.automation.create_workflow_step(&step).await.unwrap();
    assert!(store.automation.create_workflow_step(&step).await.is_err());

    let account = store
        .email
        .create_account(&NewEmailAccount {
            user_id: user.id,
            name: "sales inbox".to_string(),
            email_address: "sales@mail.test".to_string(),
            provider: "imap".to_string(),
            is_default: true,
        })
        .await
        .unwrap();
    let messages: Vec<NewEmailMessage> = (0..3)
        .map(|n| NewEmailMessage {
            account_id: account.id,
            direction: "inbound".to_string(),
            from_email: format!("lead{}@example.com", n),
            to_email: account.email_address.clone(),
            subject: "Pricing".to_string(),
            body: "Hello".to_string(),
            sent_at: chrono::Utc::now(),
        })
        .collect();
    assert_eq!(store.email.insert_messages(&messages).await.unwrap(), 3);
    assert_eq!(store.email.insert_messages(&[]).await.unwrap(), 0);

    let key = NewApiKey {
        user_id: user.id,
        name: "Reporting key".to_string(),
        prefix: "crm_0123abcd".to_string(),
        key_hash: "0".repeat(64),
        scopes: json!(["read"]),
        expires_at: None,
    };
    store.integrations.create_api_key(&key).await.unwrap();
    assert!(store.integrations.create_api_key(&key).await.is_err());
}

#[tokio::test]
async fn first_ids_are_ascending_and_limited() {
    let store = tenant_db().await;
    let module = store
        .modules
        .create(&DEFAULT_MODULES[0].to_new_module())
        .await
        .unwrap();
    let user = store
        .users
        .create(&NewUser {
            name: "Owner".to_string(),
            email: "owner@acme.test".to_string(),
            password_hash: "x".to_string(),
        })
        .await
        .unwrap();
    assert!(store.records.first_ids(10).await.unwrap().is_empty());

    let batch: Vec<NewModuleRecord> = (0..8)
        .map(|n| NewModuleRecord {
            module_id: module.id,
            data: json!({ "name": format!("Row {}", n) }),
            created_by: user.id,
        })
        .collect();
    let ids = store.records.insert_batch(&batch).await.unwrap();

    assert_eq!(store.records.first_ids(5).await.unwrap(), ids[..5].to_vec());
}

#[tokio::test]
async fn defaults_flow_against_sqlite() {
    print_test_header(
        "defaults_flow_against_sqlite",
        "Full preset, access matrix and demo users persist through SeaORM",
    );
    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        central_database_url: format!("sqlite://{}/central.sqlite?mode=rwc", dir.path().display()),
        tenant_database_url: format!(
            "sqlite://{}/tenants/{{tenant}}.sqlite?mode=rwc",
            dir.path().display()
        ),
        ..test_config()
    };
    config.validate().unwrap();

    let central = storage::connect(&config.central_database_url).await.unwrap();
    storage::migrate_central(&central).await.unwrap();
    let tenants = Arc::new(SeaOrmTenantRepository::new(Arc::new(central)));
    let factory = Arc::new(SeaOrmTenantStoreFactory::new(
        config.tenant_database_url.clone(),
    ));
    let service = Service::new(tenants.clone(), factory, config);

    let report = service.bootstrap_tenants(true).await.unwrap();
    assert_eq!(report.created.len(), TENANT_DEFINITIONS.len());
    assert!(dir.path().join("tenants/techco.sqlite").exists());

    let ctx = service.resolve(Some("techco")).await.unwrap();
    assert_eq!(
        ctx.store.modules.list_all().await.unwrap().len(),
        DEFAULT_MODULES.len()
    );
    assert_eq!(ctx.store.roles.list_roles().await.unwrap().len(), 4);
    assert_eq!(ctx.store.subscriptions.count().await.unwrap(), 1);
    for demo in DEMO_USERS {
        let user = ctx
            .store
            .users
            .find_by_email(&demo.email_for("techco"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(ctx.store.users.role_ids(user.id).await.unwrap().len(), 1);
    }

    // every step is idempotent against real constraints
    let rerun = service
        .provision_defaults(Some("techco"), Some("full"), false)
        .await
        .unwrap();
    assert_eq!(rerun.total_created(), 0);
    let access = service.provision_access(Some("techco")).await.unwrap();
    assert_eq!(access.created, 0);

    let generated = service
        .generate_test_data(Some("smallbiz"), Some("small"), Some(1))
        .await
        .unwrap();
    let ctx = service.resolve(Some("smallbiz")).await.unwrap();
    let deals = ctx.store.modules.find_by_api_name("deals").await.unwrap().unwrap();
    assert_eq!(
        ctx.store.records.count_for_module(deals.id).await.unwrap(),
        generated.created_for(tenant_provisioning::domain::RecordKind::Deals) as u64
    );

    assert_eq!(tenants.list_all().await.unwrap().len(), TENANT_DEFINITIONS.len());
}
