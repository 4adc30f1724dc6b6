//! Tenant default-data orchestrator
//!
//! A preset selects which steps run; the steps themselves declare what they
//! depend on and the plan orders them with a stable topological sort.

use super::catalog::layouts::{default_dashboards, default_reports, default_views};
use super::catalog::{DEFAULT_MODULES, DEFAULT_PIPELINES};
use super::generator::{BulkGenerator, GenerationReport, Volume};
use super::layouts::LayoutProvisioner;
use super::pipelines::PipelineProvisioner;
use super::repository::TenantStore;
use crate::contract::{
    BillingCycle, Ensured, NewSubscription, ProvisioningError, ProvisioningResult, SkipReason,
    SubscriptionStatus, Tally, Tenant,
};
use chrono::{Months, Utc};
use tracing::{info, warn};

/// Which optional data groups a tenant receives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Preset {
    /// Modules and views only
    Starter,
    Sales,
    Support,
    #[default]
    Full,
}

impl Preset {
    pub fn parse(value: &str) -> ProvisioningResult<Self> {
        match value {
            "starter" => Ok(Self::Starter),
            "sales" => Ok(Self::Sales),
            "support" => Ok(Self::Support),
            "full" => Ok(Self::Full),
            other => Err(ProvisioningError::InvalidPreset {
                value: other.to_string(),
            }),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Starter => "starter",
            Self::Sales => "sales",
            Self::Support => "support",
            Self::Full => "full",
        }
    }

    fn includes(self, step: Step) -> bool {
        match step {
            Step::Pipelines | Step::Reports | Step::Dashboards => self != Self::Starter,
            Step::Subscription | Step::Modules | Step::Views | Step::SampleData => true,
        }
    }
}

/// Orchestrator steps, declared in tie-break order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    Subscription,
    Modules,
    Pipelines,
    Views,
    Reports,
    Dashboards,
    SampleData,
}

impl Step {
    pub const ALL: [Step; 7] = [
        Self::Subscription,
        Self::Modules,
        Self::Pipelines,
        Self::Views,
        Self::Reports,
        Self::Dashboards,
        Self::SampleData,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Subscription => "subscription",
            Self::Modules => "modules",
            Self::Pipelines => "pipelines",
            Self::Views => "views",
            Self::Reports => "reports",
            Self::Dashboards => "dashboards",
            Self::SampleData => "sample_data",
        }
    }

    /// Steps that must be part of the plan and run before this one
    pub fn requires(self) -> &'static [Step] {
        match self {
            Self::Subscription | Self::Modules => &[],
            Self::Pipelines | Self::Views | Self::Reports | Self::Dashboards => &[Self::Modules],
            Self::SampleData => &[Self::Modules],
        }
    }

    /// Steps that run before this one when they are part of the plan
    pub fn after(self) -> &'static [Step] {
        match self {
            Self::Dashboards => &[Self::Reports],
            Self::SampleData => &[Self::Pipelines],
            _ => &[],
        }
    }
}

/// Ordered list of steps to run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisioningPlan {
    steps: Vec<Step>,
}

impl ProvisioningPlan {
    pub fn for_preset(preset: Preset, with_sample_data: bool) -> ProvisioningResult<Self> {
        let steps: Vec<Step> = Step::ALL
            .into_iter()
            .filter(|step| preset.includes(*step))
            .filter(|step| *step != Step::SampleData || with_sample_data)
            .collect();
        Self::from_steps(&steps)
    }

    /// Order `steps` so that every step follows its dependencies.
    ///
    /// Among ready steps the one declared first in [`Step::ALL`] wins.
    pub fn from_steps(steps: &[Step]) -> ProvisioningResult<Self> {
        for step in steps {
            if let Some(missing) = step.requires().iter().find(|dep| !steps.contains(dep)) {
                return Err(ProvisioningError::UnsatisfiedDependency {
                    step: step.name(),
                    requires: missing.name(),
                });
            }
        }

        let mut pending: Vec<Step> = Step::ALL
            .into_iter()
            .filter(|step| steps.contains(step))
            .collect();
        let mut ordered = Vec::with_capacity(pending.len());

        while !pending.is_empty() {
            let ready = pending.iter().position(|step| {
                step.requires()
                    .iter()
                    .chain(step.after())
                    .all(|dep| !pending.contains(dep))
            });
            // Step dependencies form a DAG, so some pending step is always ready.
            let Some(index) = ready else { break };
            ordered.push(pending.remove(index));
        }

        Ok(Self { steps: ordered })
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn contains(&self, step: Step) -> bool {
        self.steps.contains(&step)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepReport {
    pub step: Step,
    pub tally: Tally,
}

/// Outcome of one orchestrator run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProvisioningReport {
    pub steps: Vec<StepReport>,
    pub sample_data: Option<GenerationReport>,
}

impl ProvisioningReport {
    pub fn step(&self, step: Step) -> Option<&Tally> {
        self.steps.iter().find(|r| r.step == step).map(|r| &r.tally)
    }

    pub fn total_created(&self) -> usize {
        self.steps.iter().map(|r| r.tally.created).sum()
    }
}

/// Runs a [`ProvisioningPlan`] against one tenant
pub struct DefaultDataOrchestrator {
    store: TenantStore,
    tenant: Tenant,
    batch_size: usize,
    rng_seed: Option<u64>,
}

impl DefaultDataOrchestrator {
    pub fn new(
        store: TenantStore,
        tenant: Tenant,
        batch_size: usize,
        rng_seed: Option<u64>,
    ) -> Self {
        Self {
            store,
            tenant,
            batch_size,
            rng_seed,
        }
    }

    /// Run every step in order. Each step commits on its own; a failing step
    /// aborts the run and leaves earlier steps in place.
    pub async fn run(&self, plan: &ProvisioningPlan) -> ProvisioningResult<ProvisioningReport> {
        info!(
            tenant = %self.tenant.id,
            steps = ?plan.steps().iter().map(|s| s.name()).collect::<Vec<_>>(),
            "Provisioning tenant defaults"
        );

        let mut report = ProvisioningReport::default();
        for step in plan.steps() {
            let tally = match step {
                Step::Subscription => self.ensure_subscription().await?,
                Step::Modules => self.ensure_modules().await?,
                Step::Pipelines => {
                    PipelineProvisioner::new(self.store.clone())
                        .provision(DEFAULT_PIPELINES)
                        .await?
                }
                Step::Views => {
                    LayoutProvisioner::new(self.store.clone())
                        .provision_views(&default_views())
                        .await?
                }
                Step::Reports => {
                    LayoutProvisioner::new(self.store.clone())
                        .provision_reports(&default_reports())
                        .await?
                }
                Step::Dashboards => {
                    LayoutProvisioner::new(self.store.clone())
                        .provision_dashboards(&default_dashboards())
                        .await?
                }
                Step::SampleData => {
                    let mut generator =
                        BulkGenerator::new(self.store.clone(), self.batch_size, self.rng_seed)
                            .await?;
                    let generated = generator.run(&Volume::sample()).await?;
                    let tally = Tally {
                        created: generated.total_records(),
                        ..Tally::default()
                    };
                    report.sample_data = Some(generated);
                    tally
                }
            };
            info!(
                step = step.name(),
                created = tally.created,
                existing = tally.existing,
                skipped = tally.skipped.len(),
                "Step finished"
            );
            report.steps.push(StepReport { step: *step, tally });
        }

        Ok(report)
    }

    /// Create the subscription singleton unless any subscription exists
    pub async fn ensure_subscription(&self) -> ProvisioningResult<Tally> {
        let mut tally = Tally::default();
        if self.store.subscriptions.count().await? > 0 {
            warn!(tenant = %self.tenant.id, "Subscription already exists, skipping");
            tally.skip("subscription", SkipReason::SubscriptionExists);
            return Ok(tally);
        }

        let now = Utc::now();
        let period_end = now.checked_add_months(Months::new(1)).unwrap_or(now);
        let subscription = self
            .store
            .subscriptions
            .create(&NewSubscription {
                plan: self.tenant.plan,
                status: SubscriptionStatus::Active,
                billing_cycle: BillingCycle::Monthly,
                seats: self.tenant.limits.max_users,
                price_per_seat_cents: self.tenant.plan.seat_price_cents(),
                current_period_start: now,
                current_period_end: period_end,
            })
            .await?;
        tally.record(&Ensured::Created(subscription));
        Ok(tally)
    }

    /// Create every missing default module; existing modules are untouched
    pub async fn ensure_modules(&self) -> ProvisioningResult<Tally> {
        let mut tally = Tally::default();
        for definition in DEFAULT_MODULES {
            let outcome = match self.store.modules.find_by_api_name(definition.api_name).await? {
                Some(existing) => Ensured::Existing(existing),
                None => Ensured::Created(
                    self.store.modules.create(&definition.to_new_module()).await?,
                ),
            };
            tally.record(&outcome);
        }
        Ok(tally)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_plan_runs_in_declared_order() {
        let plan = ProvisioningPlan::for_preset(Preset::Full, true).unwrap();
        assert_eq!(plan.steps(), &Step::ALL);
    }

    #[test]
    fn starter_plan_skips_optional_groups() {
        let plan = ProvisioningPlan::for_preset(Preset::Starter, false).unwrap();
        assert_eq!(plan.steps(), &[Step::Subscription, Step::Modules, Step::Views]);
    }

    #[test]
    fn sample_data_needs_the_switch() {
        for preset in [Preset::Starter, Preset::Sales, Preset::Support, Preset::Full] {
            let plan = ProvisioningPlan::for_preset(preset, false).unwrap();
            assert!(!plan.contains(Step::SampleData));
            let plan = ProvisioningPlan::for_preset(preset, true).unwrap();
            assert_eq!(plan.steps().last(), Some(&Step::SampleData));
        }
    }

    #[test]
    fn input_order_does_not_matter() {
        let plan = ProvisioningPlan::from_steps(&[
            Step::SampleData,
            Step::Dashboards,
            Step::Modules,
            Step::Reports,
        ])
        .unwrap();
        assert_eq!(
            plan.steps(),
            &[Step::Modules, Step::Reports, Step::Dashboards, Step::SampleData]
        );
    }

    #[test]
    fn missing_hard_dependency_is_rejected() {
        let err = ProvisioningPlan::from_steps(&[Step::Subscription, Step::Pipelines]).unwrap_err();
        assert!(matches!(
            err,
            ProvisioningError::UnsatisfiedDependency {
                step: "pipelines",
                requires: "modules"
            }
        ));
    }

    #[test]
    fn preset_parse() {
        assert_eq!(Preset::parse("support").unwrap(), Preset::Support);
        assert_eq!(Preset::default(), Preset::Full);
        assert!(matches!(
            Preset::parse("premium"),
            Err(ProvisioningError::InvalidPreset { .. })
        ));
    }
}
