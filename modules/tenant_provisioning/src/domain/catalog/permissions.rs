//! System permission names and the literal permission sets of canonical roles
//!
//! Role sets are enumerated, not computed: a new permission must be added to
//! every role that should hold it.

/// Guard every role and permission is registered under
pub const GUARD_NAME: &str = "web";

/// All system permissions.
///
/// Core features are always available, advanced features need higher plans,
/// enterprise features need a plugin license.
pub const PERMISSIONS: &[&str] = &[
    // Core CRM
    "modules.view",
    "modules.create",
    "modules.edit",
    "modules.delete",
    "pipelines.view",
    "pipelines.create",
    "pipelines.edit",
    "pipelines.delete",
    "dashboards.view",
    "dashboards.create",
    "dashboards.edit",
    "dashboards.delete",
    "reports.view",
    "reports.create",
    "reports.edit",
    "reports.delete",
    "users.view",
    "users.create",
    "users.edit",
    "users.delete",
    "roles.view",
    "roles.create",
    "roles.edit",
    "roles.delete",
    "settings.view",
    "settings.edit",
    "email_templates.view",
    "email_templates.create",
    "email_templates.edit",
    "email_templates.delete",
    "data.import",
    "data.export",
    "activity.view",
    "audit_logs.view",
    // Advanced
    "blueprints.view",
    "blueprints.create",
    "blueprints.edit",
    "blueprints.delete",
    "workflows.view",
    "workflows.create",
    "workflows.edit",
    "workflows.delete",
    "approvals.view",
    "approvals.create",
    "approvals.edit",
    "approvals.delete",
    "api_keys.view",
    "api_keys.create",
    "api_keys.edit",
    "api_keys.delete",
    "webhooks.view",
    "webhooks.create",
    "webhooks.edit",
    "webhooks.delete",
    "forecasts.view",
    "forecasts.create",
    "forecasts.edit",
    "forecasts.delete",
    "quotas.view",
    "quotas.create",
    "quotas.edit",
    "quotas.delete",
    "email.view",
    "email.send",
    "email.sync",
    "meetings.view",
    "meetings.create",
    "meetings.edit",
    "meetings.delete",
    "playbooks.view",
    "playbooks.create",
    "playbooks.edit",
    "playbooks.delete",
    "cadences.view",
    "cadences.create",
    "cadences.edit",
    "cadences.delete",
    "campaigns.view",
    "campaigns.create",
    "campaigns.edit",
    "campaigns.delete",
    // Enterprise / plugin
    "portal.view",
    "portal.manage",
    "documents.view",
    "documents.create",
    "documents.edit",
    "documents.delete",
    "signatures.view",
    "signatures.create",
    "signatures.manage",
    "proposals.view",
    "proposals.create",
    "proposals.edit",
    "proposals.delete",
    "deal_rooms.view",
    "deal_rooms.create",
    "deal_rooms.edit",
    "deal_rooms.delete",
    "ai.view",
    "ai.use",
    "ai.configure",
    "competitors.view",
    "competitors.create",
    "competitors.edit",
    "competitors.delete",
    "knowledge_base.view",
    "knowledge_base.create",
    "knowledge_base.edit",
    "knowledge_base.delete",
    "landing_pages.view",
    "landing_pages.create",
    "landing_pages.edit",
    "landing_pages.delete",
    "web_forms.view",
    "web_forms.create",
    "web_forms.edit",
    "web_forms.delete",
    "ab_tests.view",
    "ab_tests.create",
    "ab_tests.edit",
    "ab_tests.delete",
    "cms.view",
    "cms.create",
    "cms.edit",
    "cms.delete",
    "cms.publish",
    "billing.view",
    "billing.create",
    "billing.edit",
    "billing.delete",
    "support.view",
    "support.create",
    "support.edit",
    "support.delete",
    "live_chat.view",
    "live_chat.manage",
    "integrations.view",
    "integrations.manage",
    "recordings.view",
    "recordings.create",
    "recordings.delete",
];

/// Operational access without role and settings administration
pub const MANAGER_PERMISSIONS: &[&str] = &[
    "modules.view",
    "modules.create",
    "modules.edit",
    "pipelines.view",
    "pipelines.create",
    "pipelines.edit",
    "dashboards.view",
    "dashboards.create",
    "dashboards.edit",
    "dashboards.delete",
    "reports.view",
    "reports.create",
    "reports.edit",
    "reports.delete",
    "users.view",
    "email_templates.view",
    "email_templates.create",
    "email_templates.edit",
    "data.import",
    "data.export",
    "activity.view",
    "audit_logs.view",
    "blueprints.view",
    "blueprints.create",
    "blueprints.edit",
    "workflows.view",
    "workflows.create",
    "workflows.edit",
    "approvals.view",
    "approvals.create",
    "approvals.edit",
    "forecasts.view",
    "forecasts.create",
    "forecasts.edit",
    "quotas.view",
    "quotas.create",
    "quotas.edit",
    "email.view",
    "email.send",
    "meetings.view",
    "meetings.create",
    "meetings.edit",
    "playbooks.view",
    "playbooks.create",
    "playbooks.edit",
    "cadences.view",
    "cadences.create",
    "cadences.edit",
    "campaigns.view",
    "campaigns.create",
    "campaigns.edit",
    "portal.view",
    "documents.view",
    "documents.create",
    "proposals.view",
    "proposals.create",
    "deal_rooms.view",
    "deal_rooms.create",
    "ai.view",
    "ai.use",
    "competitors.view",
    "competitors.create",
    "billing.view",
    "billing.create",
    "recordings.view",
];

/// Standard day-to-day selling subset
pub const SALES_REP_PERMISSIONS: &[&str] = &[
    "modules.view",
    "pipelines.view",
    "dashboards.view",
    "dashboards.create",
    "dashboards.edit",
    "reports.view",
    "reports.create",
    "email_templates.view",
    "data.export",
    "activity.view",
    "forecasts.view",
    "quotas.view",
    "email.view",
    "email.send",
    "meetings.view",
    "meetings.create",
    "meetings.edit",
    "meetings.delete",
    "playbooks.view",
    "cadences.view",
    "cadences.create",
    "campaigns.view",
    "documents.view",
    "proposals.view",
    "proposals.create",
    "deal_rooms.view",
    "ai.view",
    "ai.use",
    "competitors.view",
    "billing.view",
    "recordings.view",
    "recordings.create",
];

/// View-only subset
pub const READ_ONLY_PERMISSIONS: &[&str] = &[
    "modules.view",
    "pipelines.view",
    "dashboards.view",
    "reports.view",
    "activity.view",
    "forecasts.view",
    "quotas.view",
    "email.view",
    "meetings.view",
    "documents.view",
    "proposals.view",
    "deal_rooms.view",
    "competitors.view",
    "billing.view",
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn permission_names_are_unique() {
        let unique: HashSet<_> = PERMISSIONS.iter().collect();
        assert_eq!(unique.len(), PERMISSIONS.len());
    }

    #[test]
    fn role_sets_only_reference_known_permissions() {
        let known: HashSet<_> = PERMISSIONS.iter().collect();
        for set in [MANAGER_PERMISSIONS, SALES_REP_PERMISSIONS, READ_ONLY_PERMISSIONS] {
            for name in set {
                assert!(known.contains(name), "unknown permission {name}");
            }
        }
    }

    #[test]
    fn manager_cannot_administer_roles_or_settings() {
        assert!(!MANAGER_PERMISSIONS
            .iter()
            .any(|p| p.starts_with("roles.") || p.starts_with("settings.")));
    }

    #[test]
    fn read_only_set_is_view_only() {
        assert!(READ_ONLY_PERMISSIONS.iter().all(|p| p.ends_with(".view")));
    }
}
