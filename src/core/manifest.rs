//! Asset manifest upkeep.
//!
//! The manifest is produced by the upstream build and read by the template
//! layer. This module only ever upserts the keys for files it produced and
//! leaves every other key, and the key order, as it found them.

use crate::core::{interfaces::*, models::*, services::TreeWalker};
use crate::utils::{EzminError, Logger, Result};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// In-memory copy of the manifest file.
#[derive(Debug, Clone)]
pub struct Manifest {
    path: PathBuf,
    entries: Map<String, Value>,
}

impl Manifest {
    /// Read the manifest at `path`. A missing file is `ManifestNotFound`.
    pub async fn load(fs_service: &dyn FileSystemService, path: &Path) -> Result<Self> {
        if !fs_service.exists(path).await {
            return Err(EzminError::ManifestNotFound(path.to_path_buf()));
        }

        let content = fs_service.read_file(path).await?;
        let entries = match serde_json::from_str::<Value>(&content)? {
            Value::Object(map) => map,
            other => {
                return Err(EzminError::Manifest(format!(
                    "{} must hold a JSON object, found {}",
                    path.display(),
                    json_type(&other)
                )))
            }
        };

        Ok(Self {
            path: path.to_path_buf(),
            entries,
        })
    }

    /// Insert or overwrite the entry for `entry.src`.
    pub fn upsert(&mut self, entry: ManifestEntry) -> Result<()> {
        let key = entry.src.clone();
        let value = serde_json::to_value(entry)?;
        self.entries.insert(key, value);
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<ManifestEntry> {
        self.entries
            .get(key)
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Write the manifest back, pretty-printed with two-space indentation.
    pub async fn save(&self, fs_service: &dyn FileSystemService) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.entries)?;
        fs_service.write_file(&self.path, &json).await
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Runs the walker for every configured input and records the results.
pub struct ManifestUpdater {
    fs_service: Arc<dyn FileSystemService>,
    walker: TreeWalker,
    paths: ProjectPaths,
}

impl ManifestUpdater {
    pub fn new(
        fs_service: Arc<dyn FileSystemService>,
        js_processor: Arc<dyn JsProcessor>,
        css_processor: Arc<dyn CssProcessor>,
        paths: ProjectPaths,
    ) -> Self {
        let walker = TreeWalker::new(
            fs_service.clone(),
            js_processor,
            css_processor,
            paths.clone(),
        );
        Self {
            fs_service,
            walker,
            paths,
        }
    }

    /// Process every input in order, persisting the manifest after each one.
    ///
    /// Fails up front, touching nothing, when the manifest does not exist.
    /// A missing or failing input is logged and skipped.
    pub async fn update(&self, config: &MinifyConfig) -> Result<RunReport> {
        let manifest_path = self.paths.resolve(&config.manifest_path);
        Logger::run_start(self.paths.root(), &manifest_path);

        let mut manifest = Manifest::load(self.fs_service.as_ref(), &manifest_path).await?;
        Logger::manifest_found();

        let mut report = RunReport::default();

        for input in &config.inputs {
            let source = self.paths.resolve(&input.src);
            let output = self.paths.resolve(&input.output);

            if !self.fs_service.exists(&source).await {
                Logger::source_missing(&EzminError::SourceNotFound(source));
                report.inputs_skipped += 1;
                continue;
            }

            let outcome = match self
                .walker
                .walk(&source, &output, &input.merge_result, input.keep_structure, 0)
                .await
            {
                Ok(outcome) => outcome,
                Err(err) => {
                    Logger::input_failed(&source, &err);
                    report.failures += 1;
                    continue;
                }
            };

            for file in &outcome.written {
                manifest.upsert(self.entry_for(file))?;
            }

            manifest.save(self.fs_service.as_ref()).await?;
            Logger::manifest_updated(manifest.len());

            report.inputs_processed += 1;
            report.files_written += outcome.written.len();
            report.failures += outcome.failed;
        }

        Logger::run_complete(
            report.inputs_processed,
            report.inputs_skipped,
            report.files_written,
            report.failures,
        );
        Ok(report)
    }

    fn entry_for(&self, file: &ProcessedFile) -> ManifestEntry {
        ManifestEntry::entry(
            self.paths.relative_to_build(&file.output),
            self.paths.relative_to_root(&file.src),
        )
    }
}
