//! Saved views, reports and dashboards

use super::catalog::layouts::{DashboardTemplate, ReportTemplate, ViewTemplate, WidgetSource};
use super::repository::TenantStore;
use crate::contract::{
    Dashboard, DashboardWidget, Ensured, GridPosition, Module, NewDashboard, NewDashboardWidget,
    NewReport, NewSavedView, ProvisioningResult, SkipReason, Tally,
};
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use tracing::{info, warn};

/// Columns of the dashboard grid
pub const GRID_COLUMNS: u32 = 12;

/// Left-to-right, top-to-bottom placement on a fixed-width grid.
///
/// A widget that would overflow the current row starts a new one; the new
/// row begins below the tallest widget of the previous row.
#[derive(Debug, Clone, Default)]
pub struct GridLayout {
    x: u32,
    y: u32,
    row_height: u32,
}

impl GridLayout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn place(&mut self, w: u32, h: u32) -> GridPosition {
        let w = w.clamp(1, GRID_COLUMNS);
        if self.x + w > GRID_COLUMNS {
            self.x = 0;
            self.y += self.row_height;
            self.row_height = 0;
        }
        let position = GridPosition {
            x: self.x,
            y: self.y,
            w,
            h,
        };
        self.x += w;
        self.row_height = self.row_height.max(h);
        position
    }
}

pub struct LayoutProvisioner {
    store: TenantStore,
}

impl LayoutProvisioner {
    pub fn new(store: TenantStore) -> Self {
        Self { store }
    }

    async fn modules_by_api_name(&self) -> ProvisioningResult<HashMap<String, Module>> {
        Ok(self
            .store
            .modules
            .list_all()
            .await?
            .into_iter()
            .map(|m| (m.api_name.clone(), m))
            .collect())
    }

    // ===== Views =====

    pub async fn provision_views(&self, templates: &[ViewTemplate]) -> ProvisioningResult<Tally> {
        let modules = self.modules_by_api_name().await?;
        let mut missing = HashSet::new();
        let mut tally = Tally::default();

        for template in templates {
            let Some(module) = modules.get(template.module_api_name) else {
                if missing.insert(template.module_api_name) {
                    warn!(module = template.module_api_name, "Module not found, skipping views");
                    tally.skip(
                        format!("{} views", template.module_api_name),
                        module_missing(template.module_api_name),
                    );
                }
                continue;
            };

            let outcome = match self.store.views.find(module.id, template.name).await? {
                Some(existing) => Ensured::Existing(existing),
                None => Ensured::Created(
                    self.store
                        .views
                        .create(&NewSavedView {
                            module_id: module.id,
                            name: template.name.to_string(),
                            is_default: template.is_default,
                            definition: template.definition(),
                        })
                        .await?,
                ),
            };
            tally.record(&outcome);
        }

        info!(created = tally.created, existing = tally.existing, "Saved views provisioned");
        Ok(tally)
    }

    // ===== Reports =====

    pub async fn provision_reports(
        &self,
        templates: &[ReportTemplate],
    ) -> ProvisioningResult<Tally> {
        let modules = self.modules_by_api_name().await?;
        let mut missing = HashSet::new();
        let mut tally = Tally::default();

        for template in templates {
            let Some(module) = modules.get(template.module_api_name) else {
                if missing.insert(template.module_api_name) {
                    warn!(module = template.module_api_name, "Module not found, skipping reports");
                    tally.skip(
                        format!("{} reports", template.module_api_name),
                        module_missing(template.module_api_name),
                    );
                }
                continue;
            };

            let outcome = match self.store.reports.find(module.id, template.name).await? {
                Some(existing) => Ensured::Existing(existing),
                None => Ensured::Created(
                    self.store
                        .reports
                        .create(&NewReport {
                            module_id: module.id,
                            name: template.name.to_string(),
                            description: template.description.to_string(),
                            report_type: template.kind.as_str().to_string(),
                            chart_type: template.chart_type.map(str::to_string),
                            is_public: true,
                            definition: template.definition.clone(),
                        })
                        .await?,
                ),
            };
            tally.record(&outcome);
        }

        info!(created = tally.created, existing = tally.existing, "Reports provisioned");
        Ok(tally)
    }

    // ===== Dashboards =====

    /// Find or create a dashboard by name
    pub async fn ensure_dashboard(
        &self,
        name: &str,
        description: &str,
        is_default: bool,
    ) -> ProvisioningResult<Ensured<Dashboard>> {
        if let Some(existing) = self.store.dashboards.find_dashboard(name).await? {
            return Ok(Ensured::Existing(existing));
        }
        let created = self
            .store
            .dashboards
            .create_dashboard(&NewDashboard {
                name: name.to_string(),
                description: description.to_string(),
                is_default,
            })
            .await?;
        Ok(Ensured::Created(created))
    }

    /// Find or create a widget by (dashboard, title); an existing widget keeps its position
    pub async fn ensure_widget(
        &self,
        dashboard: &Dashboard,
        title: &str,
        widget_type: &str,
        config: Value,
        grid_position: GridPosition,
    ) -> ProvisioningResult<Ensured<DashboardWidget>> {
        if let Some(existing) = self.store.dashboards.find_widget(dashboard.id, title).await? {
            return Ok(Ensured::Existing(existing));
        }
        let created = self
            .store
            .dashboards
            .create_widget(&NewDashboardWidget {
                dashboard_id: dashboard.id,
                title: title.to_string(),
                widget_type: widget_type.to_string(),
                config,
                grid_position,
            })
            .await?;
        Ok(Ensured::Created(created))
    }

    pub async fn provision_dashboards(
        &self,
        templates: &[DashboardTemplate],
    ) -> ProvisioningResult<Tally> {
        let modules = self.modules_by_api_name().await?;
        let mut tally = Tally::default();

        for template in templates {
            let dashboard = self
                .ensure_dashboard(template.name, template.description, template.is_default)
                .await?;
            tally.record(&dashboard);
            let dashboard = dashboard.into_inner();

            let mut grid = GridLayout::new();
            for widget in &template.widgets {
                let resolved = self
                    .resolve_source(&modules, widget.source, &widget.config)
                    .await?;
                let config = match resolved {
                    Ok(config) => config,
                    Err(reason) => {
                        warn!(
                            dashboard = template.name,
                            widget = widget.title,
                            %reason,
                            "Skipping widget"
                        );
                        tally.skip(format!("{} / {}", template.name, widget.title), reason);
                        continue;
                    }
                };
                let position = grid.place(widget.w, widget.h);
                let outcome = self
                    .ensure_widget(&dashboard, widget.title, widget.widget_type, config, position)
                    .await?;
                tally.record(&outcome);
            }
        }

        info!(created = tally.created, existing = tally.existing, "Dashboards provisioned");
        Ok(tally)
    }

    /// Widget config with the source id injected, or why the source is unavailable
    async fn resolve_source(
        &self,
        modules: &HashMap<String, Module>,
        source: WidgetSource,
        config: &Value,
    ) -> ProvisioningResult<Result<Value, SkipReason>> {
        let mut config = config.clone();
        match source {
            WidgetSource::Standalone => {}
            WidgetSource::Module(api_name) => {
                let Some(module) = modules.get(api_name) else {
                    return Ok(Err(module_missing(api_name)));
                };
                inject(&mut config, "module_id", module.id);
            }
            WidgetSource::Report {
                module_api_name,
                name,
            } => {
                let Some(module) = modules.get(module_api_name) else {
                    return Ok(Err(module_missing(module_api_name)));
                };
                let Some(report) = self.store.reports.find(module.id, name).await? else {
                    return Ok(Err(SkipReason::ReportMissing {
                        name: name.to_string(),
                    }));
                };
                inject(&mut config, "report_id", report.id);
            }
        }
        Ok(Ok(config))
    }
}

fn inject(config: &mut Value, key: &str, id: i64) {
    if let Some(object) = config.as_object_mut() {
        object.insert(key.to_string(), json!(id));
    } else {
        *config = json!({ key: id });
    }
}

fn module_missing(api_name: &str) -> SkipReason {
    SkipReason::ModuleMissing {
        api_name: api_name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widgets_fill_a_row_left_to_right() {
        let mut grid = GridLayout::new();
        let positions: Vec<_> = (0..4).map(|_| grid.place(3, 2)).collect();
        assert_eq!(positions.iter().map(|p| p.x).collect::<Vec<_>>(), vec![0, 3, 6, 9]);
        assert!(positions.iter().all(|p| p.y == 0));
    }

    #[test]
    fn overflow_wraps_below_tallest_widget() {
        let mut grid = GridLayout::new();
        grid.place(6, 4);
        grid.place(4, 2);
        let wrapped = grid.place(6, 3);
        assert_eq!(wrapped, GridPosition { x: 0, y: 4, w: 6, h: 3 });

        let next = grid.place(12, 1);
        assert_eq!((next.x, next.y), (0, 7));
    }

    #[test]
    fn oversize_width_is_clamped_to_grid() {
        let mut grid = GridLayout::new();
        let position = grid.place(20, 2);
        assert_eq!(position.w, GRID_COLUMNS);
        assert_eq!(position.x, 0);
    }
}
