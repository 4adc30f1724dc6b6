//! Default saved views, reports and dashboards
//!
//! Templates hold module API names, never ids; the provisioner resolves them
//! against the tenant's module table and skips groups whose module is absent.

use serde_json::{json, Value};

fn filter(field: &str, operator: &str, value: Value) -> Value {
    json!({ "field": field, "operator": operator, "value": value })
}

fn sort(field: &str, direction: &str) -> Value {
    json!({ "field": field, "direction": direction })
}

fn sum(field: &str, alias: &str) -> Value {
    json!({ "function": "sum", "field": field, "alias": alias })
}

fn count(alias: &str) -> Value {
    json!({ "function": "count", "field": "*", "alias": alias })
}

fn open_deals() -> Value {
    filter("stage", "not_in", json!(["closed_won", "closed_lost"]))
}

fn won_deals() -> Value {
    filter("stage", "equals", json!("closed_won"))
}

fn mine() -> Value {
    filter("assigned_to", "equals", json!("$current_user"))
}

// ===== Saved views =====

#[derive(Debug, Clone, PartialEq)]
pub struct ViewTemplate {
    pub module_api_name: &'static str,
    pub name: &'static str,
    pub is_default: bool,
    pub filters: Vec<Value>,
    pub columns: &'static [&'static str],
    pub sorting: Vec<Value>,
}

impl ViewTemplate {
    /// Stored definition: filters, sorting, column order and visibility
    pub fn definition(&self) -> Value {
        let visibility: serde_json::Map<String, Value> = self
            .columns
            .iter()
            .map(|column| (column.to_string(), Value::Bool(true)))
            .collect();
        json!({
            "filters": self.filters,
            "sorting": self.sorting,
            "column_order": self.columns,
            "column_visibility": visibility,
            "is_shared": true,
        })
    }
}

fn view(
    module_api_name: &'static str,
    name: &'static str,
    is_default: bool,
    filters: Vec<Value>,
    columns: &'static [&'static str],
    sorting: Vec<Value>,
) -> ViewTemplate {
    ViewTemplate {
        module_api_name,
        name,
        is_default,
        filters,
        columns,
        sorting,
    }
}

#[rustfmt::skip]
pub fn default_views() -> Vec<ViewTemplate> {
    vec![
        view("contacts", "All Contacts", true, vec![],
            &["first_name", "last_name", "email", "phone", "organization_id", "status"],
            vec![sort("last_name", "asc")]),
        view("contacts", "My Contacts", false, vec![mine()],
            &["first_name", "last_name", "email", "phone", "status"],
            vec![sort("created_at", "desc")]),
        view("contacts", "Customers", false, vec![filter("status", "equals", json!("customer"))],
            &["first_name", "last_name", "email", "organization_id", "phone"],
            vec![sort("last_name", "asc")]),
        view("contacts", "Recently Added", false,
            vec![filter("created_at", "within", json!("last_7_days"))],
            &["first_name", "last_name", "email", "status", "created_at"],
            vec![sort("created_at", "desc")]),
        view("organizations", "All Organizations", true, vec![],
            &["name", "industry", "type", "phone", "website"],
            vec![sort("name", "asc")]),
        view("organizations", "My Accounts", false, vec![mine()],
            &["name", "type", "industry", "phone"],
            vec![sort("name", "asc")]),
        view("organizations", "Prospects", false, vec![filter("type", "equals", json!("prospect"))],
            &["name", "industry", "assigned_to"],
            vec![sort("created_at", "desc")]),
        view("deals", "All Deals", true, vec![],
            &["name", "organization_id", "amount", "stage", "close_date"],
            vec![sort("close_date", "asc")]),
        view("deals", "My Open Deals", false, vec![mine(), open_deals()],
            &["name", "amount", "stage", "close_date"],
            vec![sort("close_date", "asc")]),
        view("deals", "Closing This Month", false,
            vec![filter("close_date", "within", json!("this_month")), open_deals()],
            &["name", "organization_id", "amount", "stage", "probability"],
            vec![sort("amount", "desc")]),
        view("deals", "Won Deals", false, vec![won_deals()],
            &["name", "organization_id", "amount", "close_date"],
            vec![sort("close_date", "desc")]),
        view("deals", "High Value", false,
            vec![filter("amount", "greater_than", json!(10000)), open_deals()],
            &["name", "organization_id", "amount", "stage", "assigned_to"],
            vec![sort("amount", "desc")]),
        view("tasks", "All Tasks", true, vec![],
            &["subject", "status", "priority", "due_date", "assigned_to"],
            vec![sort("due_date", "asc")]),
        view("tasks", "My Tasks", false, vec![mine()],
            &["subject", "status", "priority", "due_date"],
            vec![sort("due_date", "asc")]),
        view("tasks", "Overdue", false,
            vec![
                filter("due_date", "less_than", json!("today")),
                filter("status", "not_equals", json!("completed")),
            ],
            &["subject", "priority", "due_date", "assigned_to"],
            vec![sort("due_date", "asc")]),
        view("activities", "All Activities", true, vec![],
            &["subject", "type", "start_datetime", "contact_id", "assigned_to"],
            vec![sort("start_datetime", "desc")]),
        view("activities", "Recent Meetings", false, vec![filter("type", "equals", json!("meeting"))],
            &["subject", "start_datetime", "contact_id", "organization_id"],
            vec![sort("start_datetime", "desc")]),
        view("cases", "All Cases", true, vec![],
            &["case_number", "subject", "status", "priority", "contact_id"],
            vec![sort("created_at", "desc")]),
        view("cases", "Open Cases", false,
            vec![filter("status", "not_in", json!(["resolved", "closed"]))],
            &["case_number", "subject", "priority", "contact_id", "assigned_to"],
            vec![sort("created_at", "desc")]),
        view("cases", "Escalated", false, vec![filter("escalated", "equals", json!(true))],
            &["case_number", "subject", "priority", "escalation_date"],
            vec![sort("escalation_date", "desc")]),
        view("invoices", "All Invoices", true, vec![],
            &["invoice_number", "organization_id", "total", "status", "due_date"],
            vec![sort("invoice_date", "desc")]),
        view("invoices", "Unpaid", false, vec![filter("status", "in", json!(["sent", "overdue"]))],
            &["invoice_number", "organization_id", "total", "balance_due", "due_date"],
            vec![sort("due_date", "asc")]),
        view("invoices", "Paid", false, vec![filter("status", "equals", json!("paid"))],
            &["invoice_number", "organization_id", "total", "payment_date"],
            vec![sort("payment_date", "desc")]),
        view("quotes", "All Quotes", true, vec![],
            &["quote_number", "subject", "organization_id", "total", "status"],
            vec![sort("quote_date", "desc")]),
        view("quotes", "Pending", false, vec![filter("status", "equals", json!("sent"))],
            &["quote_number", "subject", "organization_id", "total", "valid_until"],
            vec![sort("valid_until", "asc")]),
        view("products", "All Products", true, vec![],
            &["name", "sku", "category", "unit_price", "quantity_in_stock"],
            vec![sort("name", "asc")]),
        view("products", "Active Products", false, vec![filter("is_active", "equals", json!(true))],
            &["name", "category", "unit_price", "quantity_in_stock"],
            vec![sort("name", "asc")]),
        view("events", "All Events", true, vec![],
            &["title", "event_type", "start_datetime", "end_datetime", "location"],
            vec![sort("start_datetime", "asc")]),
        view("events", "Upcoming", false,
            vec![filter("start_datetime", "greater_than_or_equal", json!("today"))],
            &["title", "event_type", "start_datetime", "location", "contact_id"],
            vec![sort("start_datetime", "asc")]),
    ]
}

// ===== Reports =====

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    Table,
    Chart,
    Summary,
}

impl ReportKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Table => "table",
            Self::Chart => "chart",
            Self::Summary => "summary",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportTemplate {
    pub module_api_name: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub kind: ReportKind,
    pub chart_type: Option<&'static str>,
    /// filters, grouping, aggregations, sorting, date range and config
    pub definition: Value,
}

fn chart(
    module_api_name: &'static str,
    name: &'static str,
    description: &'static str,
    chart_type: &'static str,
    definition: Value,
) -> ReportTemplate {
    ReportTemplate {
        module_api_name,
        name,
        description,
        kind: ReportKind::Chart,
        chart_type: Some(chart_type),
        definition,
    }
}

fn tabular(
    module_api_name: &'static str,
    name: &'static str,
    description: &'static str,
    kind: ReportKind,
    definition: Value,
) -> ReportTemplate {
    ReportTemplate {
        module_api_name,
        name,
        description,
        kind,
        chart_type: None,
        definition,
    }
}

#[rustfmt::skip]
pub fn default_reports() -> Vec<ReportTemplate> {
    vec![
        chart("deals", "Sales Pipeline", "Visual funnel of deal values by stage", "funnel", json!({
            "filters": [open_deals()],
            "grouping": [{ "field": "stage", "order": "display_order" }],
            "aggregations": [sum("amount", "total_value"), count("deal_count")],
            "config": { "folder": "Sales" },
        })),
        chart("deals", "Monthly Revenue", "Monthly closed revenue for current year", "bar", json!({
            "filters": [won_deals()],
            "grouping": [{ "field": "close_date", "interval": "month" }],
            "aggregations": [sum("amount", "revenue")],
            "date_range": { "field": "close_date", "range": "this_year" },
            "config": { "folder": "Sales" },
        })),
        tabular("deals", "Top Deals", "Top 10 open deals by value", ReportKind::Table, json!({
            "filters": [open_deals()],
            "sorting": [sort("amount", "desc")],
            "config": {
                "folder": "Sales",
                "columns": ["name", "organization_id", "amount", "stage", "close_date", "assigned_to"],
                "limit": 10,
            },
        })),
        chart("deals", "Sales by Rep", "Closed revenue by sales rep this quarter", "bar", json!({
            "filters": [won_deals()],
            "grouping": [{ "field": "assigned_to" }],
            "aggregations": [sum("amount", "revenue"), count("deals_won")],
            "date_range": { "field": "close_date", "range": "this_quarter" },
            "config": { "folder": "Sales" },
        })),
        tabular("deals", "Win/Loss Analysis", "Win rate analysis for closed deals", ReportKind::Summary, json!({
            "filters": [filter("stage", "in", json!(["closed_won", "closed_lost"]))],
            "grouping": [{ "field": "stage" }],
            "aggregations": [count("deal_count"), sum("amount", "total_value")],
            "date_range": { "field": "close_date", "range": "this_quarter" },
            "config": { "folder": "Sales" },
        })),
        chart("deals", "Deal Source Analysis", "Revenue by lead source", "pie", json!({
            "filters": [won_deals()],
            "grouping": [{ "field": "source" }],
            "aggregations": [sum("amount", "revenue")],
            "date_range": { "field": "close_date", "range": "this_year" },
            "config": { "folder": "Sales" },
        })),
        chart("contacts", "Contacts by Status", "Distribution of contacts by status", "pie", json!({
            "grouping": [{ "field": "status" }],
            "aggregations": [count("count")],
            "config": { "folder": "Customers" },
        })),
        chart("contacts", "New Contacts Trend", "New contacts created per month", "line", json!({
            "grouping": [{ "field": "created_at", "interval": "month" }],
            "aggregations": [count("new_contacts")],
            "date_range": { "field": "created_at", "range": "last_12_months" },
            "config": { "folder": "Customers" },
        })),
        chart("organizations", "Organizations by Industry", "Organization count per industry", "bar", json!({
            "grouping": [{ "field": "industry" }],
            "aggregations": [count("count")],
            "config": { "folder": "Customers" },
        })),
        chart("cases", "Open Cases by Priority", "Open cases grouped by priority", "bar", json!({
            "filters": [filter("status", "not_in", json!(["resolved", "closed"]))],
            "grouping": [{ "field": "priority" }],
            "aggregations": [count("case_count")],
            "config": { "folder": "Support" },
        })),
        chart("cases", "Cases by Status", "Distribution of cases by status", "pie", json!({
            "grouping": [{ "field": "status" }],
            "aggregations": [count("case_count")],
            "config": { "folder": "Support" },
        })),
        chart("cases", "Case Volume Trend", "New cases per week", "line", json!({
            "grouping": [{ "field": "created_at", "interval": "week" }],
            "aggregations": [count("new_cases")],
            "date_range": { "field": "created_at", "range": "last_90_days" },
            "config": { "folder": "Support" },
        })),
        tabular("cases", "Overdue Cases", "Open cases past their SLA due date", ReportKind::Table, json!({
            "filters": [
                filter("sla_due_date", "less_than", json!("now")),
                filter("status", "not_in", json!(["resolved", "closed"])),
            ],
            "sorting": [sort("sla_due_date", "asc")],
            "config": {
                "folder": "Support",
                "columns": ["case_number", "subject", "priority", "sla_due_date", "assigned_to"],
            },
        })),
        tabular("activities", "Activity Summary", "Activities by type this week", ReportKind::Summary, json!({
            "grouping": [{ "field": "type" }],
            "aggregations": [count("activity_count")],
            "date_range": { "field": "start_datetime", "range": "this_week" },
            "config": { "folder": "Activities" },
        })),
        chart("activities", "Call Outcomes", "Distribution of call outcomes", "doughnut", json!({
            "filters": [filter("type", "equals", json!("call"))],
            "grouping": [{ "field": "outcome" }],
            "aggregations": [count("call_count")],
            "config": { "folder": "Activities" },
        })),
        chart("invoices", "Invoice Aging", "Outstanding balance by days overdue", "bar", json!({
            "filters": [filter("status", "in", json!(["sent", "overdue"]))],
            "grouping": [{ "field": "due_date", "buckets": [0, 30, 60, 90] }],
            "aggregations": [sum("balance_due", "outstanding"), count("invoice_count")],
            "config": { "folder": "Finance" },
        })),
        chart("invoices", "Collected Revenue", "Payments collected per month", "line", json!({
            "filters": [filter("status", "equals", json!("paid"))],
            "grouping": [{ "field": "payment_date", "interval": "month" }],
            "aggregations": [sum("amount_paid", "collected")],
            "date_range": { "field": "payment_date", "range": "this_year" },
            "config": { "folder": "Finance" },
        })),
        tabular("invoices", "Unpaid Invoices", "Invoices awaiting payment", ReportKind::Table, json!({
            "filters": [filter("status", "in", json!(["sent", "overdue"]))],
            "sorting": [sort("due_date", "asc")],
            "config": {
                "folder": "Finance",
                "columns": ["invoice_number", "organization_id", "total", "balance_due", "due_date"],
            },
        })),
        chart("invoices", "Invoices by Status", "Invoice value by status", "pie", json!({
            "grouping": [{ "field": "status" }],
            "aggregations": [sum("total", "total_value"), count("invoice_count")],
            "config": { "folder": "Finance" },
        })),
        tabular("quotes", "Quote Conversion", "Quote outcomes this quarter", ReportKind::Summary, json!({
            "grouping": [{ "field": "status" }],
            "aggregations": [count("quote_count"), sum("total", "total_value")],
            "date_range": { "field": "quote_date", "range": "this_quarter" },
            "config": { "folder": "Finance" },
        })),
        tabular("tasks", "Overdue Tasks", "Open tasks past their due date", ReportKind::Table, json!({
            "filters": [
                filter("due_date", "less_than", json!("today")),
                filter("status", "not_equals", json!("completed")),
            ],
            "sorting": [sort("due_date", "asc")],
            "config": {
                "folder": "Productivity",
                "columns": ["subject", "priority", "due_date", "assigned_to"],
            },
        })),
    ]
}

// ===== Dashboards =====

/// What a widget reads from; unresolvable sources skip the widget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetSource {
    /// Aggregates over a module; `module_id` is injected into the config
    Module(&'static str),
    /// Renders a saved report; `report_id` is injected into the config
    Report {
        module_api_name: &'static str,
        name: &'static str,
    },
    /// Needs nothing from the tenant
    Standalone,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WidgetTemplate {
    pub title: &'static str,
    pub widget_type: &'static str,
    pub source: WidgetSource,
    pub w: u32,
    pub h: u32,
    pub config: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardTemplate {
    pub name: &'static str,
    pub description: &'static str,
    pub is_default: bool,
    pub widgets: Vec<WidgetTemplate>,
}

fn kpi(title: &'static str, module: &'static str, w: u32, h: u32, config: Value) -> WidgetTemplate {
    WidgetTemplate {
        title,
        widget_type: "kpi",
        source: WidgetSource::Module(module),
        w,
        h,
        config,
    }
}

fn report(
    title: &'static str,
    module_api_name: &'static str,
    name: &'static str,
    w: u32,
    h: u32,
) -> WidgetTemplate {
    WidgetTemplate {
        title,
        widget_type: "report",
        source: WidgetSource::Report {
            module_api_name,
            name,
        },
        w,
        h,
        config: json!({}),
    }
}

fn sales_dashboard() -> DashboardTemplate {
    DashboardTemplate {
        name: "Sales Dashboard",
        description: "Sales pipeline, revenue metrics, and deal tracking",
        is_default: true,
        widgets: vec![
            kpi("Total Pipeline Value", "deals", 3, 2, json!({
                "aggregation": "sum", "field": "amount", "filters": [open_deals()],
                "format": "currency", "icon": "trending-up",
            })),
            kpi("Deals to Close This Month", "deals", 3, 2, json!({
                "aggregation": "count", "filters": [open_deals()],
                "date_range": { "field": "close_date", "range": "this_month" }, "icon": "calendar",
            })),
            kpi("Won This Month", "deals", 3, 2, json!({
                "aggregation": "sum", "field": "amount", "filters": [won_deals()],
                "date_range": { "field": "close_date", "range": "this_month" },
                "compare_range": "last_month", "format": "currency", "icon": "dollar-sign",
            })),
            kpi("Deals Won", "deals", 3, 2, json!({
                "aggregation": "count", "filters": [won_deals()],
                "date_range": { "field": "close_date", "range": "this_month" },
                "compare_range": "last_month", "icon": "check-circle",
            })),
            report("Sales Pipeline", "deals", "Sales Pipeline", 6, 4),
            report("Monthly Revenue", "deals", "Monthly Revenue", 6, 4),
            report("Top Deals", "deals", "Top Deals", 6, 3),
            WidgetTemplate {
                title: "My Tasks",
                widget_type: "tasks",
                source: WidgetSource::Module("tasks"),
                w: 6,
                h: 3,
                config: json!({ "filter": "assigned_to_me", "limit": 5 }),
            },
            WidgetTemplate {
                title: "Recent Activity",
                widget_type: "activity",
                source: WidgetSource::Standalone,
                w: 12,
                h: 3,
                config: json!({ "date_range": "last_7_days", "limit": 10 }),
            },
        ],
    }
}

fn support_dashboard() -> DashboardTemplate {
    let open_cases = filter("status", "not_in", json!(["resolved", "closed"]));
    DashboardTemplate {
        name: "Support Dashboard",
        description: "Case tracking, SLA monitoring, and support metrics",
        is_default: false,
        widgets: vec![
            kpi("Open Cases", "cases", 3, 2, json!({
                "aggregation": "count", "filters": [open_cases.clone()], "icon": "inbox",
            })),
            kpi("Critical Cases", "cases", 3, 2, json!({
                "aggregation": "count",
                "filters": [filter("priority", "equals", json!("critical")), open_cases],
                "icon": "alert-triangle", "color": "red",
            })),
            kpi("Resolved Today", "cases", 3, 2, json!({
                "aggregation": "count", "filters": [filter("status", "equals", json!("resolved"))],
                "date_range": { "field": "resolution_date", "range": "today" }, "icon": "check",
            })),
            kpi("Escalated", "cases", 3, 2, json!({
                "aggregation": "count", "filters": [filter("escalated", "equals", json!(true))],
                "icon": "arrow-up-circle",
            })),
            report("Cases by Priority", "cases", "Open Cases by Priority", 6, 4),
            report("Cases by Status", "cases", "Cases by Status", 6, 4),
            report("Overdue Cases", "cases", "Overdue Cases", 6, 3),
            WidgetTemplate {
                title: "My Cases",
                widget_type: "table",
                source: WidgetSource::Module("cases"),
                w: 6,
                h: 3,
                config: json!({
                    "filters": [mine()],
                    "columns": ["case_number", "subject", "priority", "sla_due_date"],
                    "limit": 10,
                }),
            },
            report("Case Trend", "cases", "Case Volume Trend", 12, 3),
        ],
    }
}

fn executive_dashboard() -> DashboardTemplate {
    DashboardTemplate {
        name: "Executive Dashboard",
        description: "High-level business metrics and trends",
        is_default: false,
        widgets: vec![
            kpi("Revenue YTD", "deals", 3, 2, json!({
                "aggregation": "sum", "field": "amount", "filters": [won_deals()],
                "date_range": { "field": "close_date", "range": "this_year" },
                "format": "currency", "icon": "dollar-sign",
            })),
            kpi("Active Deals", "deals", 3, 2, json!({
                "aggregation": "count", "filters": [open_deals()], "icon": "briefcase",
            })),
            kpi("Pipeline Value", "deals", 3, 2, json!({
                "aggregation": "sum", "field": "amount", "filters": [open_deals()],
                "format": "currency", "icon": "trending-up",
            })),
            kpi("New Customers", "organizations", 3, 2, json!({
                "aggregation": "count",
                "filters": [filter("type", "equals", json!("customer"))],
                "date_range": { "field": "created_at", "range": "this_quarter" }, "icon": "users",
            })),
            report("Revenue Trend", "deals", "Monthly Revenue", 6, 4),
            report("Sales by Rep", "deals", "Sales by Rep", 6, 4),
            report("Revenue by Source", "deals", "Deal Source Analysis", 6, 4),
            report("Win/Loss Analysis", "deals", "Win/Loss Analysis", 6, 4),
        ],
    }
}

fn activity_dashboard() -> DashboardTemplate {
    DashboardTemplate {
        name: "Activity Dashboard",
        description: "Team activity, calls, meetings and task completion",
        is_default: false,
        widgets: vec![
            kpi("Calls Today", "activities", 3, 2, json!({
                "aggregation": "count", "filters": [filter("type", "equals", json!("call"))],
                "date_range": { "field": "start_datetime", "range": "today" }, "icon": "phone",
            })),
            kpi("Meetings Today", "activities", 3, 2, json!({
                "aggregation": "count", "filters": [filter("type", "equals", json!("meeting"))],
                "date_range": { "field": "start_datetime", "range": "today" }, "icon": "users",
            })),
            kpi("Tasks Completed", "tasks", 3, 2, json!({
                "aggregation": "count", "filters": [filter("status", "equals", json!("completed"))],
                "date_range": { "field": "updated_at", "range": "today" }, "icon": "check-square",
            })),
            kpi("Pending Tasks", "tasks", 3, 2, json!({
                "aggregation": "count",
                "filters": [filter("status", "not_equals", json!("completed"))],
                "icon": "clock",
            })),
            report("Activity by Type", "activities", "Activity Summary", 6, 4),
            report("Call Outcomes", "activities", "Call Outcomes", 6, 4),
            WidgetTemplate {
                title: "My Calendar",
                widget_type: "calendar",
                source: WidgetSource::Module("events"),
                w: 6,
                h: 4,
                config: json!({ "view": "week" }),
            },
            WidgetTemplate {
                title: "My Tasks",
                widget_type: "tasks",
                source: WidgetSource::Module("tasks"),
                w: 6,
                h: 4,
                config: json!({ "filter": "assigned_to_me", "limit": 10 }),
            },
        ],
    }
}

fn financial_dashboard() -> DashboardTemplate {
    let unpaid = filter("status", "in", json!(["sent", "overdue"]));
    DashboardTemplate {
        name: "Financial Dashboard",
        description: "Accounts receivable, collections, and invoice tracking",
        is_default: false,
        widgets: vec![
            kpi("Outstanding AR", "invoices", 3, 2, json!({
                "aggregation": "sum", "field": "balance_due", "filters": [unpaid],
                "format": "currency", "icon": "credit-card",
            })),
            kpi("Collected This Month", "invoices", 3, 2, json!({
                "aggregation": "sum", "field": "amount_paid",
                "date_range": { "field": "payment_date", "range": "this_month" },
                "compare_range": "last_month", "format": "currency", "icon": "dollar-sign",
                "color": "green",
            })),
            kpi("Overdue Amount", "invoices", 3, 2, json!({
                "aggregation": "sum", "field": "balance_due",
                "filters": [filter("status", "equals", json!("overdue"))],
                "format": "currency", "icon": "alert-circle", "color": "red",
            })),
            kpi("Invoices Sent", "invoices", 3, 2, json!({
                "aggregation": "count",
                "date_range": { "field": "invoice_date", "range": "this_month" },
                "icon": "file-text",
            })),
            report("Invoice Aging", "invoices", "Invoice Aging", 6, 4),
            report("Monthly Collections", "invoices", "Collected Revenue", 6, 4),
            report("Unpaid Invoices", "invoices", "Unpaid Invoices", 6, 3),
            WidgetTemplate {
                title: "Recent Payments",
                widget_type: "table",
                source: WidgetSource::Module("invoices"),
                w: 6,
                h: 3,
                config: json!({
                    "filters": [filter("status", "equals", json!("paid"))],
                    "sorting": [sort("payment_date", "desc")],
                    "columns": ["invoice_number", "organization_id", "amount_paid", "payment_date"],
                    "limit": 10,
                }),
            },
            report("Invoices by Status", "invoices", "Invoices by Status", 12, 3),
        ],
    }
}

pub fn default_dashboards() -> Vec<DashboardTemplate> {
    vec![
        sales_dashboard(),
        support_dashboard(),
        executive_dashboard(),
        activity_dashboard(),
        financial_dashboard(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn view_keys_are_unique() {
        let views = default_views();
        let keys: HashSet<_> = views.iter().map(|v| (v.module_api_name, v.name)).collect();
        assert_eq!(keys.len(), views.len());
    }

    #[test]
    fn each_module_has_at_most_one_default_view() {
        let views = default_views();
        let defaults: Vec<_> = views
            .iter()
            .filter(|v| v.is_default)
            .map(|v| v.module_api_name)
            .collect();
        let unique: HashSet<_> = defaults.iter().collect();
        assert_eq!(unique.len(), defaults.len());
    }

    #[test]
    fn view_definition_marks_columns_visible() {
        let views = default_views();
        let definition = views[0].definition();
        assert_eq!(definition["column_visibility"]["email"], true);
        assert_eq!(definition["column_order"][0], "first_name");
    }

    #[test]
    fn report_widgets_point_at_known_reports() {
        let reports: HashSet<_> = default_reports()
            .iter()
            .map(|r| (r.module_api_name, r.name))
            .collect();
        for dashboard in default_dashboards() {
            for widget in &dashboard.widgets {
                if let WidgetSource::Report { module_api_name, name } = widget.source {
                    assert!(reports.contains(&(module_api_name, name)), "{name}");
                }
            }
        }
    }

    #[test]
    fn widget_titles_are_unique_per_dashboard() {
        for dashboard in default_dashboards() {
            let titles: HashSet<_> = dashboard.widgets.iter().map(|w| w.title).collect();
            assert_eq!(titles.len(), dashboard.widgets.len(), "{}", dashboard.name);
        }
    }

    #[test]
    fn only_charts_carry_a_chart_type() {
        for report in default_reports() {
            assert_eq!(report.kind == ReportKind::Chart, report.chart_type.is_some());
        }
    }
}
