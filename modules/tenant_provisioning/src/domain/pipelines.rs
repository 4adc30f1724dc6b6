//! Pipeline and stage provisioning

use super::catalog::pipelines::{PipelineTemplate, StageTemplate};
use super::repository::TenantStore;
use crate::contract::{
    Ensured, NewPipeline, NewStage, Pipeline, ProvisioningResult, SkipReason, Tally,
};
use serde_json::Value;
use tracing::{debug, info, warn};

pub struct PipelineProvisioner {
    store: TenantStore,
}

impl PipelineProvisioner {
    pub fn new(store: TenantStore) -> Self {
        Self { store }
    }

    /// Find or create the pipeline named `name` on the module.
    ///
    /// Returns `None` when the module does not exist. An existing pipeline is
    /// returned as is: its settings are not updated.
    pub async fn ensure_pipeline(
        &self,
        module_api_name: &str,
        name: &str,
        stage_field_api_name: &str,
        settings: Value,
        created_by: Option<i64>,
    ) -> ProvisioningResult<Option<Ensured<Pipeline>>> {
        let Some(module) = self.store.modules.find_by_api_name(module_api_name).await? else {
            warn!(module = module_api_name, pipeline = name, "Module not found, skipping pipeline");
            return Ok(None);
        };

        if let Some(existing) = self.store.pipelines.find_pipeline(module.id, name).await? {
            debug!(pipeline = name, "Pipeline exists");
            return Ok(Some(Ensured::Existing(existing)));
        }

        let created = self
            .store
            .pipelines
            .create_pipeline(&NewPipeline {
                module_id: module.id,
                name: name.to_string(),
                stage_field_api_name: stage_field_api_name.to_string(),
                settings,
                created_by,
            })
            .await?;
        Ok(Some(Ensured::Created(created)))
    }

    /// Create missing stages; new stages take their index as display order
    pub async fn ensure_stages(
        &self,
        pipeline: &Pipeline,
        stages: &[StageTemplate],
    ) -> ProvisioningResult<Tally> {
        let mut tally = Tally::default();
        for (index, stage) in stages.iter().enumerate() {
            let outcome = match self.store.pipelines.find_stage(pipeline.id, stage.name).await? {
                Some(existing) => Ensured::Existing(existing),
                None => Ensured::Created(
                    self.store
                        .pipelines
                        .create_stage(&NewStage {
                            pipeline_id: pipeline.id,
                            name: stage.name.to_string(),
                            color: stage.color.to_string(),
                            probability: stage.probability,
                            display_order: index as i32,
                            is_won_stage: stage.is_won_stage,
                            is_lost_stage: stage.is_lost_stage,
                        })
                        .await?,
                ),
            };
            tally.record(&outcome);
        }
        Ok(tally)
    }

    /// Provision each template; templates whose module is missing are skipped
    pub async fn provision(&self, templates: &[PipelineTemplate]) -> ProvisioningResult<Tally> {
        let created_by = self.store.users.first().await?.map(|u| u.id);
        let mut tally = Tally::default();

        for template in templates {
            let ensured = self
                .ensure_pipeline(
                    template.module_api_name,
                    template.name,
                    template.stage_field_api_name,
                    template.board.to_settings(),
                    created_by,
                )
                .await?;

            let Some(pipeline) = ensured else {
                tally.skip(
                    template.name,
                    SkipReason::ModuleMissing {
                        api_name: template.module_api_name.to_string(),
                    },
                );
                continue;
            };
            tally.record(&pipeline);

            let stages = self.ensure_stages(pipeline.get(), template.stages).await?;
            info!(
                pipeline = template.name,
                new_stages = stages.created,
                "Pipeline provisioned"
            );
            tally.merge(stages);
        }

        Ok(tally)
    }
}
