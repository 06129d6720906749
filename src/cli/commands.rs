use crate::core::models::{InputEntry, MergeMode};
use crate::core::plugin::{PluginContext, PluginManager};
use crate::plugins::AssetMinifyPlugin;
use crate::utils::{ConfigLoader, Logger, Result, CONFIG_FILE_NAME};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "ezmin")]
#[command(about = "Minify, merge and register built JS/CSS assets in the build manifest")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Minify the configured inputs and update the manifest
    Run {
        /// Project root directory
        #[arg(short, long, default_value = ".")]
        root: String,
        /// Manifest path, relative to the root
        #[arg(short, long)]
        manifest: Option<String>,
        /// Directory manifest file paths are relative to
        #[arg(long)]
        build_dir: Option<String>,
        /// Source directory or file; replaces the configured inputs when given
        #[arg(short, long = "input")]
        inputs: Vec<String>,
        /// Output directory for the --input sources
        #[arg(short, long)]
        output: Option<String>,
        /// Merge JS and CSS of each --input into bundles with this base name
        #[arg(long, conflicts_with = "merge_by_dir")]
        merge: Option<String>,
        /// Merge JS and CSS into bundles named after each merged directory
        #[arg(long)]
        merge_by_dir: bool,
        /// Only produce merged bundles at the top level of each --input
        #[arg(long)]
        flatten: bool,
    },
    /// Write an example ezmin.config.json
    Init {
        /// Project root directory
        #[arg(short, long, default_value = ".")]
        root: String,
    },
}

pub struct CliHandler;

impl CliHandler {
    pub fn new() -> Self {
        Self
    }

    pub async fn run(&self) -> Result<()> {
        Logger::init();

        let cli = Cli::parse();

        match cli.command {
            Commands::Run {
                root,
                manifest,
                build_dir,
                inputs,
                output,
                merge,
                merge_by_dir,
                flatten,
            } => {
                let merge = Self::merge_mode(merge, merge_by_dir);
                let cli_inputs = Self::inputs_from_args(inputs, output, merge, flatten);
                self.handle_run_command(&root, manifest.as_deref(), build_dir.as_deref(), cli_inputs)
                    .await
            }
            Commands::Init { root } => self.handle_init_command(&root).await,
        }
    }

    fn merge_mode(name: Option<String>, by_directory: bool) -> MergeMode {
        match name {
            Some(name) => MergeMode::Named(name),
            None if by_directory => MergeMode::DirectoryName,
            None => MergeMode::Off,
        }
    }

    fn inputs_from_args(
        inputs: Vec<String>,
        output: Option<String>,
        merge: MergeMode,
        flatten: bool,
    ) -> Vec<InputEntry> {
        inputs
            .into_iter()
            .map(|src| {
                let entry = InputEntry::new(src)
                    .with_merge(merge.clone())
                    .with_keep_structure(!flatten);
                match &output {
                    Some(output) => entry.with_output(output.clone()),
                    None => entry,
                }
            })
            .collect()
    }

    async fn handle_run_command(
        &self,
        root: &str,
        manifest: Option<&str>,
        build_dir: Option<&str>,
        cli_inputs: Vec<InputEntry>,
    ) -> Result<()> {
        let root = std::fs::canonicalize(root)?;
        let file_config = ConfigLoader::load_from_file(&root)?;
        let config =
            ConfigLoader::merge_with_cli(file_config, root, manifest, build_dir, cli_inputs);

        let mut plugins = PluginManager::new();
        plugins.register(Arc::new(AssetMinifyPlugin::new()));

        let context = PluginContext::new(config);
        plugins.on_build_start(&context).await?;
        plugins.on_build_end(&context).await
    }

    async fn handle_init_command(&self, root: &str) -> Result<()> {
        let path = PathBuf::from(root).join(CONFIG_FILE_NAME);
        if path.exists() {
            Logger::warn(&format!("{} already exists, leaving it untouched", path.display()));
            return Ok(());
        }

        tokio::fs::write(&path, ConfigLoader::generate_example()).await?;
        tracing::info!("✅ Wrote {}", path.display());
        Ok(())
    }
}

impl Default for CliHandler {
    fn default() -> Self {
        Self::new()
    }
}
