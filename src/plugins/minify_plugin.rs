// Asset minify plugin: runs the manifest updater when the host build ends

use crate::core::manifest::ManifestUpdater;
use crate::core::models::RunReport;
use crate::core::plugin::{Plugin, PluginContext};
use crate::infrastructure::{LightningCssProcessor, MinificationService, TokioFileSystemService};
use crate::utils::{Logger, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// Plugin that minifies the configured inputs and updates the manifest
///
/// # Example
/// ```no_run
/// use ezmin::core::models::{InputEntry, MinifyConfig};
/// use ezmin::core::plugin::{PluginContext, PluginManager};
/// use ezmin::plugins::AssetMinifyPlugin;
/// use std::path::PathBuf;
/// use std::sync::Arc;
///
/// # async fn run() -> ezmin::utils::Result<()> {
/// let config = MinifyConfig::new(PathBuf::from("/srv/app"))
///     .with_input(InputEntry::new("resources/js/vendor"));
///
/// let mut manager = PluginManager::new();
/// manager.register(Arc::new(AssetMinifyPlugin::new()));
/// manager.on_build_end(&PluginContext::new(config)).await?;
/// # Ok(())
/// # }
/// ```
pub struct AssetMinifyPlugin {
    last_report: Mutex<Option<RunReport>>,
}

impl AssetMinifyPlugin {
    pub fn new() -> Self {
        Self {
            last_report: Mutex::new(None),
        }
    }

    /// Totals from the most recent `on_build_end`
    pub fn last_report(&self) -> Option<RunReport> {
        self.last_report
            .lock()
            .ok()
            .and_then(|report| report.clone())
    }
}

impl Default for AssetMinifyPlugin {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Plugin for AssetMinifyPlugin {
    fn name(&self) -> &str {
        "ez-vanilla-minify"
    }

    async fn on_build_start(&self, context: &PluginContext) -> Result<()> {
        if context.config.inputs.is_empty() {
            Logger::no_inputs();
        }
        Ok(())
    }

    async fn on_build_end(&self, context: &PluginContext) -> Result<()> {
        let updater = ManifestUpdater::new(
            Arc::new(TokioFileSystemService),
            Arc::new(MinificationService::new()),
            Arc::new(LightningCssProcessor::new()),
            context.config.paths(),
        );

        let report = updater.update(&context.config).await?;
        if let Ok(mut last) = self.last_report.lock() {
            *last = Some(report);
        }
        Ok(())
    }
}
