//! Kanban pipeline templates
//!
//! Reference data only. Stage order in each list becomes the display order of
//! newly created stages.

use serde_json::{json, Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageTemplate {
    pub name: &'static str,
    pub color: &'static str,
    pub probability: i32,
    pub is_won_stage: bool,
    pub is_lost_stage: bool,
}

/// Which record fields back the card display of a pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardFields {
    pub show_totals: bool,
    pub value_field: Option<&'static str>,
    pub title_field: &'static str,
    pub subtitle_field: &'static str,
    pub due_date_field: &'static str,
}

impl BoardFields {
    pub fn to_settings(&self) -> Value {
        let mut settings = Map::new();
        settings.insert("show_totals".into(), json!(self.show_totals));
        if let Some(value_field) = self.value_field {
            settings.insert("value_field".into(), json!(value_field));
        }
        settings.insert("title_field".into(), json!(self.title_field));
        settings.insert("subtitle_field".into(), json!(self.subtitle_field));
        settings.insert("due_date_field".into(), json!(self.due_date_field));
        Value::Object(settings)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineTemplate {
    pub module_api_name: &'static str,
    pub name: &'static str,
    pub stage_field_api_name: &'static str,
    pub board: BoardFields,
    pub stages: &'static [StageTemplate],
}

const fn open(name: &'static str, color: &'static str, probability: i32) -> StageTemplate {
    StageTemplate {
        name,
        color,
        probability,
        is_won_stage: false,
        is_lost_stage: false,
    }
}

const fn won(name: &'static str, color: &'static str, probability: i32) -> StageTemplate {
    StageTemplate {
        is_won_stage: true,
        ..open(name, color, probability)
    }
}

const fn lost(name: &'static str, color: &'static str, probability: i32) -> StageTemplate {
    StageTemplate {
        is_lost_stage: true,
        ..open(name, color, probability)
    }
}

pub const SALES_PIPELINE: PipelineTemplate = PipelineTemplate {
    module_api_name: "deals",
    name: "Sales Pipeline",
    stage_field_api_name: "stage",
    board: BoardFields {
        show_totals: true,
        value_field: Some("amount"),
        title_field: "name",
        subtitle_field: "organization_id",
        due_date_field: "close_date",
    },
    stages: &[
        open("Prospecting", "#6366f1", 10),
        open("Qualification", "#8b5cf6", 25),
        open("Proposal", "#a855f7", 50),
        open("Negotiation", "#d946ef", 75),
        won("Closed Won", "#22c55e", 100),
        lost("Closed Lost", "#ef4444", 0),
    ],
};

pub const SUPPORT_PIPELINE: PipelineTemplate = PipelineTemplate {
    module_api_name: "cases",
    name: "Support Pipeline",
    stage_field_api_name: "status",
    board: BoardFields {
        show_totals: false,
        value_field: None,
        title_field: "subject",
        subtitle_field: "contact_id",
        due_date_field: "sla_due_date",
    },
    stages: &[
        open("New", "#6366f1", 0),
        open("Open", "#3b82f6", 10),
        open("In Progress", "#f59e0b", 50),
        open("Waiting on Customer", "#8b5cf6", 60),
        won("Resolved", "#22c55e", 100),
        won("Closed", "#6b7280", 100),
    ],
};

pub const TASK_BOARD: PipelineTemplate = PipelineTemplate {
    module_api_name: "tasks",
    name: "Task Board",
    stage_field_api_name: "status",
    board: BoardFields {
        show_totals: false,
        value_field: None,
        title_field: "subject",
        subtitle_field: "assigned_to",
        due_date_field: "due_date",
    },
    stages: &[
        open("Not Started", "#6b7280", 0),
        open("In Progress", "#3b82f6", 50),
        open("Waiting", "#f59e0b", 50),
        won("Completed", "#22c55e", 100),
        open("Deferred", "#8b5cf6", 0),
    ],
};

pub const QUOTE_PIPELINE: PipelineTemplate = PipelineTemplate {
    module_api_name: "quotes",
    name: "Quote Pipeline",
    stage_field_api_name: "status",
    board: BoardFields {
        show_totals: true,
        value_field: Some("total"),
        title_field: "subject",
        subtitle_field: "organization_id",
        due_date_field: "valid_until",
    },
    stages: &[
        open("Draft", "#6b7280", 0),
        open("Sent", "#3b82f6", 50),
        won("Accepted", "#22c55e", 100),
        lost("Rejected", "#ef4444", 0),
        lost("Expired", "#f59e0b", 0),
    ],
};

pub const INVOICE_PIPELINE: PipelineTemplate = PipelineTemplate {
    module_api_name: "invoices",
    name: "Invoice Pipeline",
    stage_field_api_name: "status",
    board: BoardFields {
        show_totals: true,
        value_field: Some("total"),
        title_field: "invoice_number",
        subtitle_field: "organization_id",
        due_date_field: "due_date",
    },
    stages: &[
        open("Draft", "#6b7280", 0),
        open("Sent", "#3b82f6", 50),
        open("Overdue", "#ef4444", 30),
        won("Paid", "#22c55e", 100),
        lost("Cancelled", "#6b7280", 0),
        lost("Refunded", "#f59e0b", 0),
    ],
};

/// The five default boards, in provisioning order
pub const DEFAULT_PIPELINES: &[PipelineTemplate] = &[
    SALES_PIPELINE,
    SUPPORT_PIPELINE,
    TASK_BOARD,
    QUOTE_PIPELINE,
    INVOICE_PIPELINE,
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn stage_names_are_unique_within_each_pipeline() {
        for template in DEFAULT_PIPELINES {
            let names: HashSet<_> = template.stages.iter().map(|s| s.name).collect();
            assert_eq!(names.len(), template.stages.len(), "{}", template.name);
        }
    }

    #[test]
    fn probabilities_are_percentages() {
        for template in DEFAULT_PIPELINES {
            assert!(template
                .stages
                .iter()
                .all(|s| (0..=100).contains(&s.probability)));
        }
    }

    #[test]
    fn no_stage_is_both_won_and_lost() {
        for template in DEFAULT_PIPELINES {
            assert!(!template
                .stages
                .iter()
                .any(|s| s.is_won_stage && s.is_lost_stage));
        }
    }

    #[test]
    fn settings_omit_value_field_when_absent() {
        let settings = TASK_BOARD.board.to_settings();
        assert!(settings.get("value_field").is_none());
        assert_eq!(SALES_PIPELINE.board.to_settings()["value_field"], "amount");
    }
}
