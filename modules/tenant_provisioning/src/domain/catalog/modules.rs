//! Core CRM module catalog provisioned into every tenant

use crate::contract::NewModule;
use serde_json::json;

/// Static definition of a default module
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModuleDefinition {
    pub api_name: &'static str,
    pub name: &'static str,
    pub singular_name: &'static str,
    pub icon: &'static str,
    pub description: &'static str,
    pub display_order: i32,
    /// Field whose value names a record in lists and lookups
    pub record_name_field: &'static str,
}

impl ModuleDefinition {
    pub fn to_new_module(&self) -> NewModule {
        NewModule {
            api_name: self.api_name.to_string(),
            name: self.name.to_string(),
            singular_name: self.singular_name.to_string(),
            icon: self.icon.to_string(),
            description: self.description.to_string(),
            display_order: self.display_order,
            settings: json!({
                "has_import": true,
                "has_export": true,
                "has_mass_actions": true,
                "has_comments": true,
                "has_attachments": true,
                "has_activity_log": true,
                "has_custom_views": true,
                "record_name_field": self.record_name_field,
            }),
        }
    }
}

const fn module(
    api_name: &'static str,
    name: &'static str,
    singular_name: &'static str,
    icon: &'static str,
    description: &'static str,
    display_order: i32,
    record_name_field: &'static str,
) -> ModuleDefinition {
    ModuleDefinition {
        api_name,
        name,
        singular_name,
        icon,
        description,
        display_order,
        record_name_field,
    }
}

#[rustfmt::skip]
pub const DEFAULT_MODULES: &[ModuleDefinition] = &[
    module("contacts", "Contacts", "Contact", "users", "People you interact with - leads, customers, partners", 1, "first_name"),
    module("organizations", "Organizations", "Organization", "building-2", "Companies, businesses, and entities", 2, "name"),
    module("deals", "Deals", "Deal", "handshake", "Sales opportunities and revenue tracking", 3, "name"),
    module("leads", "Leads", "Lead", "user-plus", "Potential customers and sales opportunities", 4, "first_name"),
    module("tasks", "Tasks", "Task", "check-square", "To-do items and action items", 5, "subject"),
    module("activities", "Activities", "Activity", "activity", "Calls, meetings, emails, and interactions", 6, "subject"),
    module("notes", "Notes", "Note", "file-text", "Internal notes and documentation", 7, "title"),
    module("cases", "Cases", "Case", "headset", "Customer support tickets and issues", 8, "case_number"),
    module("products", "Products", "Product", "package", "Products and services catalog", 9, "name"),
    module("invoices", "Invoices", "Invoice", "file-text", "Customer invoices and billing", 10, "invoice_number"),
    module("quotes", "Quotes", "Quote", "file-signature", "Sales quotes and proposals", 11, "quote_number"),
    module("events", "Events", "Event", "calendar", "Calendar events and scheduling", 12, "title"),
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn api_names_and_orders_are_unique() {
        let names: HashSet<_> = DEFAULT_MODULES.iter().map(|m| m.api_name).collect();
        let orders: HashSet<_> = DEFAULT_MODULES.iter().map(|m| m.display_order).collect();
        assert_eq!(names.len(), DEFAULT_MODULES.len());
        assert_eq!(orders.len(), DEFAULT_MODULES.len());
    }

    #[test]
    fn settings_carry_record_name_field() {
        let deals = DEFAULT_MODULES
            .iter()
            .find(|m| m.api_name == "deals")
            .map(ModuleDefinition::to_new_module);
        let settings = deals.map(|m| m.settings).unwrap_or_default();
        assert_eq!(settings["record_name_field"], "name");
        assert_eq!(settings["has_import"], true);
    }
}
