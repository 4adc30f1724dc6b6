//! Auxiliary seeding groups
//!
//! Workflows with steps and executions, blueprints with their state machine,
//! email accounts with messages and templates, the audit trail, import and
//! export jobs, API keys and webhooks. A group whose target modules are all
//! missing is skipped with a warning, like a record kind without a module.

use super::{datetime_within, pick, short_id, words, BulkGenerator, GenerationReport};
use super::{Scale, FIRST_NAMES, SENTENCES};
use crate::contract::{
    NewApiKey, NewAuditLog, NewBlueprint, NewBlueprintState, NewBlueprintTransition,
    NewDataExport, NewDataImport, NewEmailAccount, NewEmailMessage, NewEmailTemplate, NewWebhook,
    NewWorkflow, NewWorkflowExecution, NewWorkflowStep, ProvisioningResult,
};
use chrono::{Duration, Utc};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::Rng;
use serde_json::{json, Value};
use sha2::{Digest, Sha256};
use tracing::{info, warn};

const WORKFLOW_MODULES: &[&str] = &["deals", "contacts"];
const BLUEPRINT_MODULES: &[&str] = &["deals", "cases"];
const TRANSFER_MODULES: &[&str] = &["contacts", "organizations", "deals"];
const WEBHOOK_MODULES: &[&str] = &["contacts", "deals"];

const MAX_EXECUTIONS_PER_WORKFLOW: usize = 10;
const MESSAGE_BATCH: usize = 100;
const AUDIT_BATCH: usize = 200;
/// Audit entries point at one of the first records of the tenant
const AUDITABLE_SAMPLE: u64 = 100;
const KEY_LABELS: &[&str] = &["Integration", "Reporting", "Mobile app", "Data sync"];
const KEY_SCOPES: &[&str] = &["read", "read,write", "read,write,delete"];
const AUDITED_STATUSES: &[&str] = &["new", "in_progress", "closed"];

/// Blueprint states: name, color, initial, final
const BLUEPRINT_STATES: [(&str, &str, bool, bool); 4] = [
    ("Draft", "#6B7280", true, false),
    ("Pending Review", "#F59E0B", false, false),
    ("Approved", "#10B981", false, true),
    ("Rejected", "#EF4444", false, true),
];
/// Transitions as (name, from, to) indexes into `BLUEPRINT_STATES`
const BLUEPRINT_TRANSITIONS: [(&str, usize, usize); 3] = [
    ("Submit for review", 0, 1),
    ("Approve", 1, 2),
    ("Reject", 1, 3),
];

/// Number of rows to generate per auxiliary group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AuxiliaryVolume {
    pub workflows: usize,
    pub workflow_executions: usize,
    pub blueprints: usize,
    pub email_accounts: usize,
    pub email_messages: usize,
    pub email_templates: usize,
    pub audit_logs: usize,
    pub imports: usize,
    pub exports: usize,
    pub api_keys: usize,
    pub webhooks: usize,
}

impl AuxiliaryVolume {
    pub fn for_scale(scale: Scale) -> Self {
        // workflows, workflow_executions, blueprints, email_accounts, email_messages,
        // email_templates, audit_logs, imports, exports, api_keys, webhooks
        let counts: [usize; 11] = match scale {
            Scale::Small => [3, 10, 2, 2, 30, 5, 100, 3, 3, 2, 3],
            Scale::Medium => [10, 50, 5, 5, 150, 15, 500, 10, 10, 5, 10],
            Scale::Large => [25, 200, 10, 10, 500, 30, 2000, 25, 25, 15, 25],
            Scale::Massive => [50, 1000, 20, 20, 2000, 50, 10000, 50, 50, 30, 50],
        };
        let [
            workflows,
            workflow_executions,
            blueprints,
            email_accounts,
            email_messages,
            email_templates,
            audit_logs,
            imports,
            exports,
            api_keys,
            webhooks,
        ] = counts;
        Self {
            workflows,
            workflow_executions,
            blueprints,
            email_accounts,
            email_messages,
            email_templates,
            audit_logs,
            imports,
            exports,
            api_keys,
            webhooks,
        }
    }

    /// Executions attached to each workflow, at most ten
    pub fn executions_per_workflow(&self) -> usize {
        if self.workflows == 0 {
            return 0;
        }
        self.workflow_executions
            .div_ceil(self.workflows)
            .min(MAX_EXECUTIONS_PER_WORKFLOW)
    }
}

/// Rows produced by the auxiliary groups, parents before children
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuxiliaryKind {
    Workflows,
    WorkflowSteps,
    WorkflowExecutions,
    Blueprints,
    BlueprintStates,
    BlueprintTransitions,
    EmailAccounts,
    EmailMessages,
    EmailTemplates,
    AuditLogs,
    Imports,
    Exports,
    ApiKeys,
    Webhooks,
}

impl AuxiliaryKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Workflows => "workflows",
            Self::WorkflowSteps => "workflow_steps",
            Self::WorkflowExecutions => "workflow_executions",
            Self::Blueprints => "blueprints",
            Self::BlueprintStates => "blueprint_states",
            Self::BlueprintTransitions => "blueprint_transitions",
            Self::EmailAccounts => "email_accounts",
            Self::EmailMessages => "email_messages",
            Self::EmailTemplates => "email_templates",
            Self::AuditLogs => "audit_logs",
            Self::Imports => "imports",
            Self::Exports => "exports",
            Self::ApiKeys => "api_keys",
            Self::Webhooks => "webhooks",
        }
    }
}

impl GenerationReport {
    fn note(&mut self, kind: AuxiliaryKind, count: usize) {
        info!(group = kind.as_str(), count, "Rows generated");
        self.auxiliary.push((kind, count));
    }

    fn skip_group(&mut self, kind: AuxiliaryKind) {
        warn!(group = kind.as_str(), "No target modules found, skipping");
        self.auxiliary_skipped.push(kind);
    }
}

impl BulkGenerator {
    /// Workflows on deals or contacts, each with 2 to 5 ordered steps
    pub async fn generate_workflows(
        &mut self,
        volume: &AuxiliaryVolume,
        report: &mut GenerationReport,
    ) -> ProvisioningResult<()> {
        if volume.workflows == 0 {
            return Ok(());
        }
        let modules = self.modules_named(WORKFLOW_MODULES);
        if modules.is_empty() {
            report.skip_group(AuxiliaryKind::Workflows);
            return Ok(());
        }

        let executions_each = volume.executions_per_workflow();
        let (mut steps, mut executions) = (0, 0);
        for _ in 0..volume.workflows {
            let Some(module) = modules.choose(&mut self.rng) else {
                break;
            };
            let trigger = pick(
                &mut self.rng,
                &["record_created", "record_updated", "field_changed", "scheduled"],
            );
            let workflow = self
                .store
                .automation
                .create_workflow(&NewWorkflow {
                    module_id: module.id,
                    name: format!("{} follow-up {}", module.singular_name, short_id()),
                    description: pick(&mut self.rng, SENTENCES).to_string(),
                    trigger_type: trigger.to_string(),
                    trigger_config: trigger_config(&mut self.rng, trigger),
                    is_active: self.rng.random_bool(0.8),
                    created_by: self.creator_id,
                })
                .await?;

            let step_count: i32 = self.rng.random_range(2..=5);
            for step_order in 1..=step_count {
                let action = pick(
                    &mut self.rng,
                    &["send_email", "create_task", "update_field", "notify_user", "webhook"],
                );
                self.store
                    .automation
                    .create_workflow_step(&NewWorkflowStep {
                        workflow_id: workflow.id,
                        step_order,
                        action_type: action.to_string(),
                        action_config: action_config(&mut self.rng, action),
                    })
                    .await?;
                steps += 1;
            }

            for _ in 0..executions_each {
                let started_at = datetime_within(&mut self.rng, -30, 0);
                let status = pick(&mut self.rng, &["completed", "completed", "failed", "running"]);
                let completed_at = (status != "running")
                    .then(|| started_at + Duration::seconds(self.rng.random_range(1..=300)));
                self.store
                    .automation
                    .create_workflow_execution(&NewWorkflowExecution {
                        workflow_id: workflow.id,
                        status: status.to_string(),
                        triggered_by: self.creator_id,
                        started_at,
                        completed_at,
                    })
                    .await?;
                executions += 1;
            }
        }

        report.note(AuxiliaryKind::Workflows, volume.workflows);
        report.note(AuxiliaryKind::WorkflowSteps, steps);
        report.note(AuxiliaryKind::WorkflowExecutions, executions);
        Ok(())
    }

    /// Approval blueprints on deals or cases
    ///
    /// Every blueprint gets the same four states: one initial, two final,
    /// and transitions from draft to review and from review to each outcome.
    pub async fn generate_blueprints(
        &mut self,
        volume: &AuxiliaryVolume,
        report: &mut GenerationReport,
    ) -> ProvisioningResult<()> {
        if volume.blueprints == 0 {
            return Ok(());
        }
        let modules = self.modules_named(BLUEPRINT_MODULES);
        if modules.is_empty() {
            report.skip_group(AuxiliaryKind::Blueprints);
            return Ok(());
        }

        let (mut states, mut transitions) = (0, 0);
        for _ in 0..volume.blueprints {
            let Some(module) = modules.choose(&mut self.rng) else {
                break;
            };
            let field_api_name = if module.api_name == "deals" { "stage" } else { "status" };
            let blueprint = self
                .store
                .automation
                .create_blueprint(&NewBlueprint {
                    module_id: module.id,
                    name: format!("{} Approval {}", module.singular_name, short_id()),
                    field_api_name: field_api_name.to_string(),
                    is_active: true,
                    created_by: self.creator_id,
                })
                .await?;

            let mut state_ids = Vec::with_capacity(BLUEPRINT_STATES.len());
            for (order, state) in BLUEPRINT_STATES.iter().enumerate() {
                let &(name, color, is_initial, is_final) = state;
                let state = self
                    .store
                    .automation
                    .create_blueprint_state(&NewBlueprintState {
                        blueprint_id: blueprint.id,
                        name: name.to_string(),
                        color: color.to_string(),
                        is_initial,
                        is_final,
                        display_order: order as i32,
                    })
                    .await?;
                state_ids.push(state.id);
            }
            states += state_ids.len();

            for (name, from, to) in BLUEPRINT_TRANSITIONS {
                self.store
                    .automation
                    .create_blueprint_transition(&NewBlueprintTransition {
                        blueprint_id: blueprint.id,
                        from_state_id: state_ids[from],
                        to_state_id: state_ids[to],
                        name: name.to_string(),
                    })
                    .await?;
                transitions += 1;
            }
        }

        report.note(AuxiliaryKind::Blueprints, volume.blueprints);
        report.note(AuxiliaryKind::BlueprintStates, states);
        report.note(AuxiliaryKind::BlueprintTransitions, transitions);
        Ok(())
    }

    /// Email accounts of the owner, messages spread over them, and templates
    ///
    /// Messages need at least one account; they are skipped otherwise.
    pub async fn generate_email(
        &mut self,
        volume: &AuxiliaryVolume,
        report: &mut GenerationReport,
    ) -> ProvisioningResult<()> {
        let mut accounts = Vec::with_capacity(volume.email_accounts);
        for n in 0..volume.email_accounts {
            let mailbox = pick(&mut self.rng, &["sales", "support", "info", "billing"]);
            let account = self
                .store
                .email
                .create_account(&NewEmailAccount {
                    user_id: self.creator_id,
                    name: format!("{} inbox", mailbox),
                    email_address: format!("{}-{}@mail.test", mailbox, short_id()),
                    provider: pick(&mut self.rng, &["imap", "gmail", "outlook"]).to_string(),
                    is_default: n == 0,
                })
                .await?;
            accounts.push(account);
        }
        if volume.email_accounts > 0 {
            report.note(AuxiliaryKind::EmailAccounts, accounts.len());
        }

        if volume.email_messages > 0 {
            if accounts.is_empty() {
                report.skip_group(AuxiliaryKind::EmailMessages);
            } else {
                let mut stored = 0;
                let mut remaining = volume.email_messages;
                while remaining > 0 {
                    let size = remaining.min(MESSAGE_BATCH);
                    let mut batch = Vec::with_capacity(size);
                    for _ in 0..size {
                        let Some(account) = accounts.choose(&mut self.rng) else {
                            break;
                        };
                        let mailbox = &account.email_address;
                        batch.push(email_message(&mut self.rng, account.id, mailbox));
                    }
                    stored += self.store.email.insert_messages(&batch).await?;
                    remaining -= size;
                }
                report.note(AuxiliaryKind::EmailMessages, stored);
            }
        }

        for _ in 0..volume.email_templates {
            let category = pick(&mut self.rng, &["sales", "support", "marketing", "follow_up"]);
            self.store
                .email
                .create_template(&NewEmailTemplate {
                    name: format!("{} template {}", category, short_id()),
                    category: category.to_string(),
                    subject: pick(&mut self.rng, SENTENCES).to_string(),
                    body: format!("Hi {{{{first_name}}}},\n\n{}", words(&mut self.rng, 25)),
                    created_by: self.creator_id,
                })
                .await?;
        }
        if volume.email_templates > 0 {
            report.note(AuxiliaryKind::EmailTemplates, volume.email_templates);
        }
        Ok(())
    }

    /// Audit entries on the tenant's first records, in batches of 200
    pub async fn generate_audit_logs(
        &mut self,
        volume: &AuxiliaryVolume,
        report: &mut GenerationReport,
    ) -> ProvisioningResult<()> {
        if volume.audit_logs == 0 {
            return Ok(());
        }
        let records = self.store.records.first_ids(AUDITABLE_SAMPLE).await?;

        let mut stored = 0;
        let mut remaining = volume.audit_logs;
        while remaining > 0 {
            let size = remaining.min(AUDIT_BATCH);
            let batch: Vec<NewAuditLog> = (0..size)
                .map(|_| audit_entry(&mut self.rng, self.creator_id, &records))
                .collect();
            stored += self.store.audit_logs.insert_batch(&batch).await?;
            remaining -= size;
        }

        report.note(AuxiliaryKind::AuditLogs, stored);
        Ok(())
    }

    /// Import and export jobs on contacts, organizations or deals
    pub async fn generate_transfers(
        &mut self,
        volume: &AuxiliaryVolume,
        report: &mut GenerationReport,
    ) -> ProvisioningResult<()> {
        if volume.imports == 0 && volume.exports == 0 {
            return Ok(());
        }
        let modules = self.modules_named(TRANSFER_MODULES);
        if modules.is_empty() {
            if volume.imports > 0 {
                report.skip_group(AuxiliaryKind::Imports);
            }
            if volume.exports > 0 {
                report.skip_group(AuxiliaryKind::Exports);
            }
            return Ok(());
        }

        for _ in 0..volume.imports {
            let Some(module) = modules.choose(&mut self.rng) else {
                break;
            };
            let total_rows = self.rng.random_range(10..=1000);
            let status = pick(&mut self.rng, &["completed", "completed", "failed", "processing"]);
            let (imported_rows, failed_rows) = match status {
                "completed" => {
                    let failed = self.rng.random_range(0..=total_rows / 10);
                    (total_rows - failed, failed)
                }
                "failed" => (0, total_rows),
                _ => (self.rng.random_range(0..total_rows), 0),
            };
            self.store
                .integrations
                .create_import(&NewDataImport {
                    user_id: self.creator_id,
                    module_id: module.id,
                    file_name: format!("{}_{}.csv", module.api_name, short_id()),
                    status: status.to_string(),
                    total_rows,
                    imported_rows,
                    failed_rows,
                })
                .await?;
        }
        if volume.imports > 0 {
            report.note(AuxiliaryKind::Imports, volume.imports);
        }

        for _ in 0..volume.exports {
            let Some(module) = modules.choose(&mut self.rng) else {
                break;
            };
            let format = pick(&mut self.rng, &["csv", "xlsx"]);
            self.store
                .integrations
                .create_export(&NewDataExport {
                    user_id: self.creator_id,
                    module_id: module.id,
                    file_name: format!("{}_export_{}.{}", module.api_name, short_id(), format),
                    format: format.to_string(),
                    status: pick(&mut self.rng, &["completed", "pending", "failed"]).to_string(),
                    record_count: self.rng.random_range(1..=5000),
                })
                .await?;
        }
        if volume.exports > 0 {
            report.note(AuxiliaryKind::Exports, volume.exports);
        }
        Ok(())
    }

    /// API keys of the owner, and webhooks on contacts or deals
    pub async fn generate_integrations(
        &mut self,
        volume: &AuxiliaryVolume,
        report: &mut GenerationReport,
    ) -> ProvisioningResult<()> {
        for _ in 0..volume.api_keys {
            let (key, prefix) = api_key();
            let label = pick(&mut self.rng, KEY_LABELS);
            let scopes: Vec<&str> = pick(&mut self.rng, KEY_SCOPES).split(',').collect();
            let expires_at = self
                .rng
                .random_bool(0.5)
                .then(|| Utc::now() + Duration::days(365));
            self.store
                .integrations
                .create_api_key(&NewApiKey {
                    user_id: self.creator_id,
                    name: format!("{} key", label),
                    prefix,
                    key_hash: hash_key(&key),
                    scopes: json!(scopes),
                    expires_at,
                })
                .await?;
        }
        if volume.api_keys > 0 {
            report.note(AuxiliaryKind::ApiKeys, volume.api_keys);
        }

        if volume.webhooks == 0 {
            return Ok(());
        }
        let modules = self.modules_named(WEBHOOK_MODULES);
        if modules.is_empty() {
            report.skip_group(AuxiliaryKind::Webhooks);
            return Ok(());
        }
        for _ in 0..volume.webhooks {
            let Some(module) = modules.choose(&mut self.rng) else {
                break;
            };
            let events: Vec<String> = ["created", "updated", "deleted"]
                .iter()
                .filter(|_| self.rng.random_bool(0.6))
                .map(|event| format!("{}.{}", module.api_name, event))
                .collect();
            let events = if events.is_empty() {
                vec![format!("{}.created", module.api_name)]
            } else {
                events
            };
            self.store
                .integrations
                .create_webhook(&NewWebhook {
                    user_id: self.creator_id,
                    module_id: module.id,
                    name: format!("{} sync {}", module.singular_name, short_id()),
                    url: format!("https://hooks.example.com/{}/{}", module.api_name, short_id()),
                    events: json!(events),
                    secret: uuid::Uuid::new_v4().simple().to_string(),
                    is_active: self.rng.random_bool(0.8),
                })
                .await?;
        }
        report.note(AuxiliaryKind::Webhooks, volume.webhooks);
        Ok(())
    }
}

fn trigger_config(rng: &mut StdRng, trigger: &str) -> Value {
    match trigger {
        "field_changed" => json!({ "field": pick(rng, &["status", "stage", "owner"]) }),
        "scheduled" => json!({ "cron": pick(rng, &["0 9 * * 1", "0 8 * * *", "0 0 1 * *"]) }),
        _ => json!({}),
    }
}

fn action_config(rng: &mut StdRng, action: &str) -> Value {
    match action {
        "send_email" => json!({ "template": "follow_up", "to": "record.owner" }),
        "create_task" => json!({
            "subject": pick(rng, SENTENCES),
            "due_in_days": rng.random_range(1..=14),
        }),
        "update_field" => json!({ "field": "status", "value": "in_progress" }),
        "notify_user" => json!({ "message": pick(rng, SENTENCES) }),
        _ => json!({ "url": "https://hooks.example.com/workflow" }),
    }
}

fn email_message(rng: &mut StdRng, account_id: i64, mailbox: &str) -> NewEmailMessage {
    let contact = format!(
        "{}{}@example.com",
        pick(rng, FIRST_NAMES).to_lowercase(),
        rng.random_range(1..1000)
    );
    let direction = pick(rng, &["inbound", "outbound"]);
    let (from_email, to_email) = if direction == "inbound" {
        (contact, mailbox.to_string())
    } else {
        (mailbox.to_string(), contact)
    };
    NewEmailMessage {
        account_id,
        direction: direction.to_string(),
        from_email,
        to_email,
        subject: pick(rng, SENTENCES).to_string(),
        body: words(rng, 40),
        sent_at: datetime_within(rng, -60, 0),
    }
}

fn audit_entry(rng: &mut StdRng, user_id: i64, records: &[i64]) -> NewAuditLog {
    let event = pick(rng, &["created", "updated", "updated", "deleted"]);
    let (old_values, new_values) = match event {
        "created" => (json!({}), json!({ "status": "new" })),
        "deleted" => (json!({ "status": "closed" }), json!({})),
        _ => {
            let from = pick(rng, AUDITED_STATUSES);
            let to = pick(rng, AUDITED_STATUSES);
            (json!({ "status": from }), json!({ "status": to }))
        }
    };
    NewAuditLog {
        user_id,
        event: event.to_string(),
        auditable_type: "module_record".to_string(),
        auditable_id: records.choose(rng).copied(),
        old_values,
        new_values,
    }
}

/// A fresh key and its public prefix
fn api_key() -> (String, String) {
    let key = format!("crm_{}", uuid::Uuid::new_v4().simple());
    let prefix = key[..12].to_string();
    (key, prefix)
}

/// Hex-encoded SHA-256 of a key; the key itself is never stored
fn hash_key(key: &str) -> String {
    format!("{:x}", Sha256::digest(key.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn scale_table_matches_the_auxiliary_counts() {
        let small = AuxiliaryVolume::for_scale(Scale::Small);
        assert_eq!((small.workflows, small.blueprints), (3, 2));
        assert_eq!((small.audit_logs, small.webhooks), (100, 3));

        let massive = AuxiliaryVolume::for_scale(Scale::Massive);
        assert_eq!(massive.email_messages, 2000);
        assert_eq!(massive.audit_logs, 10000);
    }

    #[test]
    fn executions_are_rounded_up_and_capped() {
        // 10 executions over 3 workflows
        assert_eq!(AuxiliaryVolume::for_scale(Scale::Small).executions_per_workflow(), 4);
        assert_eq!(AuxiliaryVolume::for_scale(Scale::Medium).executions_per_workflow(), 5);
        assert_eq!(AuxiliaryVolume::for_scale(Scale::Large).executions_per_workflow(), 8);
        assert_eq!(AuxiliaryVolume::for_scale(Scale::Massive).executions_per_workflow(), 10);
        assert_eq!(AuxiliaryVolume::default().executions_per_workflow(), 0);
    }

    #[test]
    fn blueprint_transitions_leave_only_non_final_states() {
        for (_, from, to) in BLUEPRINT_TRANSITIONS {
            assert!(!BLUEPRINT_STATES[from].3, "transition out of a final state");
            assert_ne!(from, to);
        }
        assert_eq!(BLUEPRINT_STATES.iter().filter(|s| s.2).count(), 1);
    }

    #[test]
    fn api_keys_are_stored_as_digests() {
        let (key, prefix) = api_key();
        assert!(key.starts_with(&prefix));
        assert_eq!(prefix.len(), 12);

        let digest = hash_key(&key);
        assert_eq!(digest.len(), 64);
        assert_ne!(digest, key);
        assert_eq!(digest, hash_key(&key));
    }

    #[test]
    fn audit_entries_reference_given_records() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..50 {
            let entry = audit_entry(&mut rng, 1, &[7, 8]);
            assert!(matches!(entry.auditable_id, Some(7) | Some(8)));
        }
        assert_eq!(audit_entry(&mut rng, 1, &[]).auditable_id, None);
    }
}
