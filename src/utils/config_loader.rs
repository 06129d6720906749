use crate::core::models::{
    default_build_dir, default_manifest_path, InputEntry, MinifyConfig,
};
use crate::utils::{EzminError, Logger, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "ezmin.config.json";

/// Configuration file format (ezmin.config.json)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EzminConfig {
    /// Manifest written by the upstream build (default: "public/build/manifest.json")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manifest_path: Option<String>,

    /// Directory manifest `file` values are relative to (default: "public/build")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_dir: Option<String>,

    /// Directories or files to minify
    #[serde(default)]
    pub input: Vec<InputEntry>,
}

impl Default for EzminConfig {
    fn default() -> Self {
        Self {
            manifest_path: Some(default_manifest_path()),
            build_dir: Some(default_build_dir()),
            input: Vec::new(),
        }
    }
}

/// Config loader that supports config files with CLI override
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load `ezmin.config.json` from the project root, if present
    pub fn load_from_file(root: &Path) -> Result<Option<EzminConfig>> {
        let config_path = root.join(CONFIG_FILE_NAME);

        if !config_path.exists() {
            Logger::debug("No ezmin.config.json found, using defaults");
            return Ok(None);
        }

        Logger::debug(&format!("Loading config from {}", config_path.display()));

        let content = std::fs::read_to_string(&config_path)?;

        let config: EzminConfig = serde_json::from_str(&content).map_err(|e| {
            EzminError::config(format!("Failed to parse {}: {}", CONFIG_FILE_NAME, e))
        })?;

        Logger::debug("✅ Config file loaded successfully");
        Ok(Some(config))
    }

    /// Merge file config with CLI arguments (CLI takes precedence)
    ///
    /// CLI inputs replace the file's inputs entirely when any are given.
    pub fn merge_with_cli(
        file_config: Option<EzminConfig>,
        root: PathBuf,
        manifest_path: Option<&str>,
        build_dir: Option<&str>,
        cli_inputs: Vec<InputEntry>,
    ) -> MinifyConfig {
        let base = file_config.unwrap_or_default();

        let manifest_path = manifest_path
            .map(str::to_string)
            .or(base.manifest_path)
            .unwrap_or_else(default_manifest_path);

        let build_dir = build_dir
            .map(str::to_string)
            .or(base.build_dir)
            .unwrap_or_else(default_build_dir);

        let inputs = if cli_inputs.is_empty() {
            base.input
        } else {
            cli_inputs
        };

        MinifyConfig {
            root,
            manifest_path: PathBuf::from(manifest_path),
            build_dir: PathBuf::from(build_dir),
            inputs,
        }
    }

    /// Generate example config file
    pub fn generate_example() -> String {
        let example = EzminConfig {
            input: vec![
                InputEntry::new("resources/js/vendor"),
                InputEntry::new("resources/css")
                    .with_merge(crate::core::models::MergeMode::Named("app".to_string())),
            ],
            ..Default::default()
        };
        serde_json::to_string_pretty(&example).unwrap_or_else(|_| {
            r#"{
  "manifestPath": "public/build/manifest.json",
  "buildDir": "public/build",
  "input": [
    { "src": "resources/js/vendor", "output": "public/build/assets", "keep_structure": true, "merge_result": false }
  ]
}"#
            .to_string()
        })
    }
}
