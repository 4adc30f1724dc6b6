//! Bulk synthetic record generation
//!
//! Records are schema-less JSON rows on `module_records`. Kinds are generated
//! in dependency order so later kinds can reference ids produced earlier.
//! The auxiliary groups (automation, email, audit trail, transfers and
//! integrations) live in [`auxiliary`].

mod auxiliary;

pub use auxiliary::{AuxiliaryKind, AuxiliaryVolume};

use super::layouts::GridLayout;
use super::repository::TenantStore;
use crate::contract::{
    Module, NewDashboard, NewDashboardWidget, NewModuleRecord, NewReport, ProvisioningError,
    ProvisioningResult,
};
use chrono::{Duration, Utc};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use serde_json::{json, Value};
use std::collections::HashMap;
use tracing::{debug, info, warn};

// ===== Volumes =====

/// Preset size of a test-data run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scale {
    Small,
    #[default]
    Medium,
    Large,
    Massive,
}

impl Scale {
    pub fn parse(value: &str) -> ProvisioningResult<Self> {
        match value {
            "small" => Ok(Self::Small),
            "medium" => Ok(Self::Medium),
            "large" => Ok(Self::Large),
            "massive" => Ok(Self::Massive),
            other => Err(ProvisioningError::InvalidScale {
                value: other.to_string(),
            }),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
            Self::Massive => "massive",
        }
    }

    pub fn volume(self) -> Volume {
        // organizations, contacts, deals, activities, tasks, cases,
        // invoices, quotes, products, reports, dashboards
        let counts: [usize; 11] = match self {
            Self::Small => [25, 50, 20, 50, 30, 15, 20, 10, 15, 5, 2],
            Self::Medium => [100, 300, 75, 200, 100, 50, 75, 40, 50, 15, 5],
            Self::Large => [500, 1500, 400, 1000, 500, 250, 400, 200, 150, 40, 15],
            Self::Massive => [2000, 10000, 2000, 5000, 2500, 1000, 2000, 1000, 500, 100, 30],
        };
        let [
            organizations,
            contacts,
            deals,
            activities,
            tasks,
            cases,
            invoices,
            quotes,
            products,
            reports,
            dashboards,
        ] = counts;
        Volume {
            organizations,
            contacts,
            products,
            deals,
            tasks,
            activities,
            cases,
            invoices,
            quotes,
            events: 0,
            notes: 0,
            reports,
            dashboards,
            auxiliary: AuxiliaryVolume::for_scale(self),
        }
    }
}

/// Number of rows to generate per kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Volume {
    pub organizations: usize,
    pub contacts: usize,
    pub products: usize,
    pub deals: usize,
    pub tasks: usize,
    pub activities: usize,
    pub cases: usize,
    pub invoices: usize,
    pub quotes: usize,
    pub events: usize,
    pub notes: usize,
    pub reports: usize,
    pub dashboards: usize,
    pub auxiliary: AuxiliaryVolume,
}

impl Volume {
    /// Volume of the default-data sample step
    pub fn sample() -> Self {
        Self {
            organizations: 50,
            contacts: 100,
            products: 40,
            deals: 30,
            tasks: 60,
            activities: 80,
            cases: 35,
            invoices: 40,
            quotes: 20,
            events: 30,
            notes: 25,
            reports: 0,
            dashboards: 0,
            auxiliary: AuxiliaryVolume::default(),
        }
    }

    pub fn count(&self, kind: RecordKind) -> usize {
        match kind {
            RecordKind::Organizations => self.organizations,
            RecordKind::Contacts => self.contacts,
            RecordKind::Products => self.products,
            RecordKind::Deals => self.deals,
            RecordKind::Tasks => self.tasks,
            RecordKind::Activities => self.activities,
            RecordKind::Cases => self.cases,
            RecordKind::Invoices => self.invoices,
            RecordKind::Quotes => self.quotes,
            RecordKind::Events => self.events,
            RecordKind::Notes => self.notes,
        }
    }
}

/// Module record kinds, declared in generation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Organizations,
    Contacts,
    Products,
    Deals,
    Tasks,
    Activities,
    Cases,
    Invoices,
    Quotes,
    Events,
    Notes,
}

impl RecordKind {
    /// Every kind after its dependencies
    pub const ORDER: [RecordKind; 11] = [
        Self::Organizations,
        Self::Contacts,
        Self::Products,
        Self::Deals,
        Self::Tasks,
        Self::Activities,
        Self::Cases,
        Self::Invoices,
        Self::Quotes,
        Self::Events,
        Self::Notes,
    ];

    pub fn api_name(self) -> &'static str {
        match self {
            Self::Organizations => "organizations",
            Self::Contacts => "contacts",
            Self::Products => "products",
            Self::Deals => "deals",
            Self::Tasks => "tasks",
            Self::Activities => "activities",
            Self::Cases => "cases",
            Self::Invoices => "invoices",
            Self::Quotes => "quotes",
            Self::Events => "events",
            Self::Notes => "notes",
        }
    }
}

// ===== Module catalog =====

/// Read-only snapshot of a tenant's modules keyed by API name
#[derive(Debug, Clone, Default)]
pub struct ModuleCatalog {
    modules: HashMap<String, Module>,
}

impl ModuleCatalog {
    pub async fn load(store: &TenantStore) -> ProvisioningResult<Self> {
        let modules = store
            .modules
            .list_all()
            .await?
            .into_iter()
            .map(|m| (m.api_name.clone(), m))
            .collect();
        Ok(Self { modules })
    }

    pub fn get(&self, api_name: &str) -> Option<&Module> {
        self.modules.get(api_name)
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

// ===== Generator =====

/// Rows created per kind plus the kinds skipped for a missing module
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationReport {
    pub created: Vec<(RecordKind, usize)>,
    pub skipped: Vec<RecordKind>,
    pub reports: usize,
    pub dashboards: usize,
    pub auxiliary: Vec<(AuxiliaryKind, usize)>,
    pub auxiliary_skipped: Vec<AuxiliaryKind>,
}

impl GenerationReport {
    pub fn created_for(&self, kind: RecordKind) -> usize {
        self.created
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, n)| *n)
            .unwrap_or(0)
    }

    pub fn total_records(&self) -> usize {
        self.created.iter().map(|(_, n)| n).sum()
    }

    pub fn auxiliary_for(&self, kind: AuxiliaryKind) -> usize {
        self.auxiliary
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, n)| *n)
            .unwrap_or(0)
    }
}

/// Modules a generated report or dashboard widget may target
const ANALYTICS_MODULES: &[&str] = &["deals", "contacts", "organizations", "cases"];

pub struct BulkGenerator {
    store: TenantStore,
    catalog: ModuleCatalog,
    creator_id: i64,
    batch_size: usize,
    rng: StdRng,
}

impl BulkGenerator {
    /// Prepare a generator for one tenant.
    ///
    /// Fails with `NoBaseUser` when the tenant has no user to own the rows.
    pub async fn new(
        store: TenantStore,
        batch_size: usize,
        seed: Option<u64>,
    ) -> ProvisioningResult<Self> {
        let creator = store
            .users
            .first()
            .await?
            .ok_or(ProvisioningError::NoBaseUser)?;
        let catalog = ModuleCatalog::load(&store).await?;
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Ok(Self {
            store,
            catalog,
            creator_id: creator.id,
            batch_size: batch_size.max(1),
            rng,
        })
    }

    pub fn catalog(&self) -> &ModuleCatalog {
        &self.catalog
    }

    /// Insert `count` rows of `kind` in transactional batches.
    ///
    /// Returns `None` when the kind's module does not exist.
    pub async fn generate<F>(
        &mut self,
        kind: RecordKind,
        count: usize,
        mut field_generator: F,
    ) -> ProvisioningResult<Option<Vec<i64>>>
    where
        F: FnMut(&mut StdRng) -> Value,
    {
        let Some(module_id) = self.catalog.get(kind.api_name()).map(|m| m.id) else {
            warn!(module = kind.api_name(), "Module not found, skipping");
            return Ok(None);
        };

        let mut ids = Vec::with_capacity(count);
        let mut remaining = count;
        while remaining > 0 {
            let size = remaining.min(self.batch_size);
            let batch: Vec<NewModuleRecord> = (0..size)
                .map(|_| NewModuleRecord {
                    module_id,
                    data: field_generator(&mut self.rng),
                    created_by: self.creator_id,
                })
                .collect();
            ids.extend(self.store.records.insert_batch(&batch).await?);
            remaining -= size;
            debug!(module = kind.api_name(), batch = size, remaining, "Batch inserted");
        }

        info!(module = kind.api_name(), count = ids.len(), "Records generated");
        Ok(Some(ids))
    }

    /// Generate every record kind of `volume` in dependency order
    pub async fn generate_records(
        &mut self,
        volume: &Volume,
    ) -> ProvisioningResult<GenerationReport> {
        let mut report = GenerationReport::default();
        let deal_stages = self.deal_stage_ids().await?;

        let mut orgs = Vec::new();
        let mut contacts = Vec::new();
        let mut deals = Vec::new();

        for kind in RecordKind::ORDER {
            let count = volume.count(kind);
            if count == 0 {
                continue;
            }
            let ids = match kind {
                RecordKind::Organizations => self.generate(kind, count, organization).await?,
                RecordKind::Contacts => {
                    self.generate(kind, count, |rng| contact(rng, &orgs)).await?
                }
                RecordKind::Products => self.generate(kind, count, product).await?,
                RecordKind::Deals => {
                    self.generate(kind, count, |rng| deal(rng, &orgs, &contacts, &deal_stages))
                        .await?
                }
                RecordKind::Tasks => self.generate(kind, count, |rng| task(rng, &contacts)).await?,
                RecordKind::Activities => {
                    self.generate(kind, count, |rng| activity(rng, &contacts, &deals))
                        .await?
                }
                RecordKind::Cases => {
                    self.generate(kind, count, |rng| case(rng, &orgs, &contacts))
                        .await?
                }
                RecordKind::Invoices => {
                    self.generate(kind, count, |rng| invoice(rng, &orgs)).await?
                }
                RecordKind::Quotes => {
                    self.generate(kind, count, |rng| quote(rng, &orgs, &deals))
                        .await?
                }
                RecordKind::Events => self.generate(kind, count, event).await?,
                RecordKind::Notes => {
                    self.generate(kind, count, |rng| note(rng, &contacts, &deals))
                        .await?
                }
            };

            let Some(ids) = ids else {
                report.skipped.push(kind);
                continue;
            };
            report.created.push((kind, ids.len()));
            match kind {
                RecordKind::Organizations => orgs = ids,
                RecordKind::Contacts => contacts = ids,
                RecordKind::Deals => deals = ids,
                _ => {}
            }
        }

        Ok(report)
    }

    /// Stage ids of the first pipeline of the deals module
    async fn deal_stage_ids(&self) -> ProvisioningResult<Vec<i64>> {
        let Some(deals) = self.catalog.get(RecordKind::Deals.api_name()) else {
            return Ok(Vec::new());
        };
        let pipelines = self.store.pipelines.list_for_module(deals.id).await?;
        let Some(pipeline) = pipelines.first() else {
            return Ok(Vec::new());
        };
        Ok(self
            .store
            .pipelines
            .list_stages(pipeline.id)
            .await?
            .into_iter()
            .map(|s| s.id)
            .collect())
    }

    /// The modules of `names` that exist, in the order given
    fn modules_named(&self, names: &[&str]) -> Vec<Module> {
        names
            .iter()
            .filter_map(|name| self.catalog.get(name).cloned())
            .collect()
    }

    /// Reports on a random analytics module each
    pub async fn generate_reports(&mut self, count: usize) -> ProvisioningResult<usize> {
        let modules = self.modules_named(ANALYTICS_MODULES);
        if modules.is_empty() {
            warn!("No modules found for reports, skipping");
            return Ok(0);
        }

        for _ in 0..count {
            let Some(module) = modules.choose(&mut self.rng) else {
                break;
            };
            let report_type = pick(&mut self.rng, &["table", "chart", "summary"]);
            let chart_type = (report_type == "chart").then(|| {
                pick(&mut self.rng, &["bar", "line", "pie", "funnel", "doughnut"]).to_string()
            });
            let suffix = short_id();
            self.store
                .reports
                .create(&NewReport {
                    module_id: module.id,
                    name: format!("{} Report {}", module.singular_name, suffix),
                    description: format!("Generated {} report", module.api_name),
                    report_type: report_type.to_string(),
                    chart_type,
                    is_public: self.rng.random_bool(0.5),
                    definition: json!({
                        "grouping": [{ "field": "created_at", "interval": "month" }],
                        "aggregations": [{ "function": "count", "field": "*", "alias": "count" }],
                    }),
                })
                .await?;
        }

        info!(count, "Reports generated");
        Ok(count)
    }

    /// Dashboards with 4 to 8 widgets laid out on the grid
    pub async fn generate_dashboards(&mut self, count: usize) -> ProvisioningResult<usize> {
        let modules = self.modules_named(ANALYTICS_MODULES);
        if modules.is_empty() {
            warn!("No modules found for dashboards, skipping");
            return Ok(0);
        }

        for _ in 0..count {
            let dashboard = self
                .store
                .dashboards
                .create_dashboard(&NewDashboard {
                    name: format!("Dashboard {}", short_id()),
                    description: "Generated dashboard".to_string(),
                    is_default: false,
                })
                .await?;

            let widget_count = self.rng.random_range(4..=8);
            let mut grid = GridLayout::new();
            for n in 1..=widget_count {
                let Some(module) = modules.choose(&mut self.rng) else {
                    break;
                };
                let title = format!("Widget {}", n);
                let w = *[3, 4, 6].choose(&mut self.rng).unwrap_or(&3);
                let h = self.rng.random_range(2..=3);
                self.store
                    .dashboards
                    .create_widget(&NewDashboardWidget {
                        dashboard_id: dashboard.id,
                        title: title.clone(),
                        widget_type: pick(&mut self.rng, &["kpi", "chart", "table"]).to_string(),
                        config: json!({ "module_id": module.id, "title": title }),
                        grid_position: grid.place(w, h),
                    })
                    .await?;
            }
        }

        info!(count, "Dashboards generated");
        Ok(count)
    }

    /// Every group sized by `volume`, records first
    ///
    /// Workflows and blueprints follow the records, then reports and
    /// dashboards, then email, the audit trail, transfers and integrations.
    pub async fn run(&mut self, volume: &Volume) -> ProvisioningResult<GenerationReport> {
        let mut report = self.generate_records(volume).await?;
        let extra = &volume.auxiliary;
        self.generate_workflows(extra, &mut report).await?;
        self.generate_blueprints(extra, &mut report).await?;
        if volume.reports > 0 {
            report.reports = self.generate_reports(volume.reports).await?;
        }
        if volume.dashboards > 0 {
            report.dashboards = self.generate_dashboards(volume.dashboards).await?;
        }
        self.generate_email(extra, &mut report).await?;
        self.generate_audit_logs(extra, &mut report).await?;
        self.generate_transfers(extra, &mut report).await?;
        self.generate_integrations(extra, &mut report).await?;
        Ok(report)
    }
}

fn short_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()[..8].to_string()
}

// ===== Field generators =====

const COMPANY_PREFIXES: &[&str] = &[
    "Acme", "Globex", "Initech", "Umbrella", "Stark", "Wayne", "Hooli", "Vandelay", "Cyberdyne",
    "Soylent", "Tyrell", "Wonka", "Aperture", "Massive", "Blue Sun", "Oscorp",
];
const COMPANY_SUFFIXES: &[&str] = &["Inc", "LLC", "Group", "Labs", "Systems", "Partners", "Co"];
const FIRST_NAMES: &[&str] = &[
    "James", "Mary", "Robert", "Patricia", "John", "Jennifer", "Michael", "Linda", "David",
    "Elizabeth", "Priya", "Wei", "Carlos", "Fatima", "Olga", "Kenji",
];
const LAST_NAMES: &[&str] = &[
    "Smith", "Johnson", "Williams", "Brown", "Jones", "Garcia", "Miller", "Davis", "Martinez",
    "Lopez", "Nguyen", "Patel", "Kim", "Novak", "Okafor", "Tanaka",
];
const JOB_TITLES: &[&str] = &[
    "CEO", "CTO", "VP of Sales", "Account Manager", "Engineer", "Product Manager",
    "Procurement Lead", "Operations Director",
];
const CITIES: &[&str] = &[
    "New York", "San Francisco", "Chicago", "Austin", "Seattle", "Boston", "Denver", "Atlanta",
];
const WORDS: &[&str] = &[
    "cloud", "platform", "renewal", "expansion", "license", "support", "migration", "analytics",
    "security", "integration", "upgrade", "rollout", "pilot", "enterprise", "suite", "bundle",
];
const SENTENCES: &[&str] = &[
    "Follow up on the latest proposal",
    "Prepare onboarding materials",
    "Review contract terms with legal",
    "Schedule a technical deep dive",
    "Confirm budget with the finance team",
    "Send updated pricing sheet",
    "Collect feedback from the pilot",
    "Escalate integration issue to engineering",
];

const ACTIVITY_SUBJECTS: &[&str] = &[
    "Discovery call",
    "Product demo",
    "Quarterly review",
    "Contract negotiation",
    "Initial outreach",
    "Technical discussion",
    "Pricing discussion",
    "Requirements gathering",
];
const EVENT_LOCATIONS: &[&str] = &[
    "Conference Room A",
    "Conference Room B",
    "Zoom",
    "Google Meet",
    "Teams",
    "On-site",
];

fn pick<'a>(rng: &mut StdRng, values: &[&'a str]) -> &'a str {
    values.choose(rng).copied().unwrap_or_default()
}

/// A random id from `ids`, or null when nothing was generated
fn reference(rng: &mut StdRng, ids: &[i64]) -> Value {
    ids.choose(rng).map_or(Value::Null, |id| json!(id))
}

fn date_within(rng: &mut StdRng, from_days: i64, to_days: i64) -> String {
    let offset = rng.random_range(from_days..=to_days);
    (Utc::now() + Duration::days(offset)).format("%Y-%m-%d").to_string()
}

fn datetime_within(rng: &mut StdRng, from_days: i64, to_days: i64) -> chrono::DateTime<Utc> {
    let minutes = rng.random_range(from_days * 24 * 60..=to_days * 24 * 60);
    Utc::now() + Duration::minutes(minutes)
}

fn company(rng: &mut StdRng) -> String {
    format!("{} {}", pick(rng, COMPANY_PREFIXES), pick(rng, COMPANY_SUFFIXES))
}

fn words(rng: &mut StdRng, n: usize) -> String {
    (0..n).map(|_| pick(rng, WORDS)).collect::<Vec<_>>().join(" ")
}

fn phone(rng: &mut StdRng) -> String {
    format!(
        "+1-{}-{}-{:04}",
        rng.random_range(200..1000),
        rng.random_range(200..1000),
        rng.random_range(0..10000)
    )
}

fn organization(rng: &mut StdRng) -> Value {
    let name = company(rng);
    let slug = name.to_lowercase().replace(' ', "");
    json!({
        "name": name,
        "website": format!("https://www.{}.com", slug),
        "industry": pick(rng, &["technology", "healthcare", "finance", "retail", "manufacturing"]),
        "type": pick(rng, &["prospect", "customer", "partner", "vendor"]),
        "phone": phone(rng),
        "email": format!("info@{}.com", slug),
        "city": pick(rng, CITIES),
        "country": "united_states",
        "annual_revenue": rng.random_range(100_000..=50_000_000),
    })
}

fn contact(rng: &mut StdRng, orgs: &[i64]) -> Value {
    let first = pick(rng, FIRST_NAMES);
    let last = pick(rng, LAST_NAMES);
    json!({
        "first_name": first,
        "last_name": last,
        "email": format!(
            "{}.{}{}@example.com",
            first.to_lowercase(),
            last.to_lowercase(),
            rng.random_range(1..10000)
        ),
        "phone": phone(rng),
        "organization_id": reference(rng, orgs),
        "job_title": pick(rng, JOB_TITLES),
        "status": pick(rng, &["lead", "prospect", "customer", "inactive"]),
    })
}

fn product(rng: &mut StdRng) -> Value {
    let price: i64 = rng.random_range(100..=10_000);
    let sku = format!(
        "{}{}{}-{:04}",
        rng.random_range(b'A'..=b'Z') as char,
        rng.random_range(b'A'..=b'Z') as char,
        rng.random_range(b'A'..=b'Z') as char,
        rng.random_range(0..10000)
    );
    json!({
        "name": words(rng, 3),
        "sku": sku,
        "unit_price": price,
        "cost": (price as f64 * 0.6 * 100.0).round() / 100.0,
        "category": pick(rng, &["software", "hardware", "services", "consulting"]),
        "is_active": rng.random_bool(0.9),
    })
}

fn deal(rng: &mut StdRng, orgs: &[i64], contacts: &[i64], stages: &[i64]) -> Value {
    json!({
        "name": format!("{} - {}", company(rng), words(rng, 2)),
        "amount": rng.random_range(5_000..=500_000),
        "organization_id": reference(rng, orgs),
        "contact_id": reference(rng, contacts),
        "stage": stages.choose(rng).map_or(Value::Null, |id| json!(id.to_string())),
        "close_date": date_within(rng, -30, 90),
        "source": pick(rng, &["website", "referral", "partner", "outbound"]),
    })
}

fn task(rng: &mut StdRng, contacts: &[i64]) -> Value {
    json!({
        "subject": pick(rng, SENTENCES),
        "priority": pick(rng, &["low", "normal", "high", "urgent"]),
        "status": pick(rng, &["not_started", "in_progress", "completed", "deferred"]),
        "due_date": date_within(rng, -7, 14),
        "related_to_id": reference(rng, contacts),
    })
}

fn activity(rng: &mut StdRng, contacts: &[i64], deals: &[i64]) -> Value {
    let start = datetime_within(rng, -30, 7);
    let duration = *[15, 30, 45, 60, 90, 120].choose(rng).unwrap_or(&30);
    let end = start + Duration::minutes(duration);
    let outcome = if start < Utc::now() {
        json!(pick(rng, &["completed", "no_answer", "left_message", "rescheduled", "cancelled"]))
    } else {
        Value::Null
    };
    json!({
        "subject": pick(rng, ACTIVITY_SUBJECTS),
        "type": pick(rng, &["call", "meeting", "email", "note", "demo", "lunch", "other"]),
        "start_datetime": start.format("%Y-%m-%d %H:%M:%S").to_string(),
        "end_datetime": end.format("%Y-%m-%d %H:%M:%S").to_string(),
        "duration_minutes": duration,
        "contact_id": reference(rng, contacts),
        "deal_id": reference(rng, deals),
        "outcome": outcome,
    })
}

fn case(rng: &mut StdRng, orgs: &[i64], contacts: &[i64]) -> Value {
    json!({
        "case_number": format!("CS-{}", rng.random_range(10_000..100_000)),
        "subject": pick(rng, SENTENCES),
        "description": words(rng, 12),
        "priority": pick(rng, &["low", "medium", "high", "critical"]),
        "status": pick(rng, &["new", "in_progress", "resolved", "closed"]),
        "contact_id": reference(rng, contacts),
        "organization_id": reference(rng, orgs),
    })
}

fn invoice(rng: &mut StdRng, orgs: &[i64]) -> Value {
    let subtotal: i64 = rng.random_range(1_000..=50_000);
    let tax = (subtotal as f64 * 0.1 * 100.0).round() / 100.0;
    json!({
        "invoice_number": format!("INV-{}", rng.random_range(10_000..100_000)),
        "status": pick(rng, &["draft", "sent", "paid", "overdue"]),
        "subtotal": subtotal,
        "tax_amount": tax,
        "total": subtotal as f64 + tax,
        "organization_id": reference(rng, orgs),
        "invoice_date": date_within(rng, -90, 0),
    })
}

fn quote(rng: &mut StdRng, orgs: &[i64], deals: &[i64]) -> Value {
    let subtotal: i64 = rng.random_range(5_000..=100_000);
    json!({
        "quote_number": format!("QT-{}", rng.random_range(10_000..100_000)),
        "subject": format!("Proposal for {}", words(rng, 2)),
        "status": pick(rng, &["draft", "sent", "accepted", "rejected"]),
        "subtotal": subtotal,
        "total": subtotal,
        "organization_id": reference(rng, orgs),
        "deal_id": reference(rng, deals),
        "quote_date": date_within(rng, -60, 0),
    })
}

fn event(rng: &mut StdRng) -> Value {
    let start = datetime_within(rng, -7, 14);
    let duration = *[30, 60, 90, 120].choose(rng).unwrap_or(&60);
    let all_day = rng.random_bool(0.1);
    let (start_at, end_at) = if all_day {
        let day = start.format("%Y-%m-%d");
        (format!("{} 00:00:00", day), format!("{} 23:59:59", day))
    } else {
        (
            start.format("%Y-%m-%d %H:%M:%S").to_string(),
            (start + Duration::minutes(duration)).format("%Y-%m-%d %H:%M:%S").to_string(),
        )
    };
    json!({
        "title": pick(rng, &[
            "Team Standup", "Client Meeting", "Product Demo", "Sales Call",
            "Training Session", "Strategy Review", "Quarterly Planning", "One-on-One",
        ]),
        "location": pick(rng, EVENT_LOCATIONS),
        "event_type": pick(rng, &["meeting", "call", "webinar", "conference", "personal", "other"]),
        "start_datetime": start_at,
        "end_datetime": end_at,
        "all_day": all_day,
        "is_recurring": rng.random_bool(0.2),
        "reminder_minutes": pick(rng, &["none", "5_minutes", "15_minutes", "30_minutes", "1_hour"]),
    })
}

fn note(rng: &mut StdRng, contacts: &[i64], deals: &[i64]) -> Value {
    let related_type = pick(rng, &["contact", "organization", "deal"]);
    let related_to_id = match related_type {
        "contact" => reference(rng, contacts),
        "deal" => reference(rng, deals),
        _ => Value::Null,
    };
    json!({
        "title": format!(
            "{} - {}",
            pick(rng, &[
                "Meeting Notes", "Call Summary", "Important Update", "Requirements",
                "Technical Details", "Follow-up Action", "Customer Feedback", "Strategy Notes",
            ]),
            date_within(rng, -90, 0)
        ),
        "content": words(rng, 30),
        "related_to_type": related_type,
        "related_to_id": related_to_id,
        "is_pinned": rng.random_bool(0.15),
        "visibility": pick(rng, &["everyone", "team_only", "private"]),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_parses_known_names_only() {
        assert_eq!(Scale::parse("large").unwrap(), Scale::Large);
        assert!(matches!(
            Scale::parse("huge"),
            Err(ProvisioningError::InvalidScale { .. })
        ));
        assert_eq!(Scale::default(), Scale::Medium);
    }

    #[test]
    fn scale_volumes_match_table() {
        let small = Scale::Small.volume();
        assert_eq!((small.organizations, small.contacts, small.deals), (25, 50, 20));
        assert_eq!((small.reports, small.dashboards), (5, 2));
        assert_eq!(small.auxiliary, AuxiliaryVolume::for_scale(Scale::Small));
        assert_eq!(small.auxiliary.email_messages, 30);

        let massive = Scale::Massive.volume();
        assert_eq!(massive.contacts, 10000);
        assert_eq!(massive.products, 500);
        assert_eq!(massive.activities, 5000);
    }

    #[test]
    fn sample_volume_covers_every_kind() {
        let sample = Volume::sample();
        assert!(RecordKind::ORDER.iter().all(|k| sample.count(*k) > 0));
        assert_eq!(sample.count(RecordKind::Notes), 25);
        assert_eq!(sample.auxiliary, AuxiliaryVolume::default());
    }

    #[test]
    fn amounts_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let amount = deal(&mut rng, &[], &[], &[])["amount"].as_i64().unwrap();
            assert!((5_000..=500_000).contains(&amount));

            let p = product(&mut rng);
            let price = p["unit_price"].as_f64().unwrap();
            assert!((100.0..=10_000.0).contains(&price));
            assert!((p["cost"].as_f64().unwrap() - price * 0.6).abs() < 0.01);

            let inv = invoice(&mut rng, &[]);
            let subtotal = inv["subtotal"].as_f64().unwrap();
            assert!((inv["total"].as_f64().unwrap() - subtotal * 1.1).abs() < 0.01);
        }
    }

    #[test]
    fn references_sample_from_given_ids() {
        let mut rng = StdRng::seed_from_u64(1);
        let orgs = [10, 11, 12];
        for _ in 0..50 {
            let id = contact(&mut rng, &orgs)["organization_id"].as_i64().unwrap();
            assert!(orgs.contains(&id));
        }
        assert!(contact(&mut rng, &[])["organization_id"].is_null());
    }

    #[test]
    fn same_seed_same_records() {
        let mut a = StdRng::seed_from_u64(42);
        let mut b = StdRng::seed_from_u64(42);
        assert_eq!(organization(&mut a)["name"], organization(&mut b)["name"]);
    }
}
