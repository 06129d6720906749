// Plugin system for ezmin
// Build-lifecycle hooks the host build tool drives

use crate::core::models::MinifyConfig;
use crate::utils::{Result, Timer};
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;

/// Context provided to plugins during execution
#[derive(Debug, Clone)]
pub struct PluginContext {
    /// Project root directory
    pub root: PathBuf,
    /// Resolved configuration for this run
    pub config: MinifyConfig,
}

impl PluginContext {
    pub fn new(config: MinifyConfig) -> Self {
        Self {
            root: config.root.clone(),
            config,
        }
    }
}

/// Main plugin trait that all plugins must implement
///
/// Plugins hook into the host build lifecycle:
/// - `on_build_start` before the host emits anything
/// - `on_build_end` once the host bundle is fully written
#[async_trait]
pub trait Plugin: Send + Sync {
    /// Unique name for this plugin
    fn name(&self) -> &str;

    /// Called at the start of a build
    ///
    /// Use this to validate configuration.
    async fn on_build_start(&self, _context: &PluginContext) -> Result<()> {
        Ok(())
    }

    /// Called after the host build has written its bundle
    async fn on_build_end(&self, _context: &PluginContext) -> Result<()> {
        Ok(())
    }
}

/// Manages plugin registration and execution
pub struct PluginManager {
    plugins: Vec<Arc<dyn Plugin>>,
}

impl PluginManager {
    /// Create a new empty plugin manager
    pub fn new() -> Self {
        Self {
            plugins: Vec::new(),
        }
    }

    /// Register a plugin
    pub fn register(&mut self, plugin: Arc<dyn Plugin>) {
        self.plugins.push(plugin);
    }

    /// Execute on_build_start hook for all plugins, in registration order
    pub async fn on_build_start(&self, context: &PluginContext) -> Result<()> {
        for plugin in &self.plugins {
            let _timer = Timer::start(&format!("{} on_build_start", plugin.name()));
            plugin.on_build_start(context).await?;
        }
        Ok(())
    }

    /// Execute on_build_end hook for all plugins, in registration order
    pub async fn on_build_end(&self, context: &PluginContext) -> Result<()> {
        for plugin in &self.plugins {
            let _timer = Timer::start(&format!("{} on_build_end", plugin.name()));
            plugin.on_build_end(context).await?;
        }
        Ok(())
    }
}

impl Default for PluginManager {
    fn default() -> Self {
        Self::new()
    }
}
