use colored::*;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "ezmin=info";

pub struct Logger;

impl Logger {
    /// Install the global subscriber. `EZMIN_LOG` wins over `RUST_LOG`.
    pub fn init() {
        let filter = EnvFilter::try_from_env("EZMIN_LOG")
            .or_else(|_| EnvFilter::try_from_default_env())
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .try_init();
    }

    pub fn run_start(root: &Path, manifest: &Path) {
        info!("📁 Project root: {}", root.display());
        info!(
            "{} {}",
            "Looking for manifest.json at:".yellow(),
            manifest.display().to_string().green()
        );
    }

    pub fn manifest_found() {
        info!("{}", "Manifest found, updating with new entries...".green());
    }

    pub fn manifest_updated(entries: usize) {
        info!(
            "{} ({} entries)",
            "Manifest updated successfully with new entries.".green(),
            entries
        );
    }

    pub fn no_inputs() {
        warn!(
            "{}",
            "No input directories specified. Please provide input paths in the configuration."
                .yellow()
        );
    }

    pub fn source_missing(err: &dyn std::fmt::Display) {
        error!("{}", err.to_string().red());
    }

    pub fn minified(label: &str, source: &Path, dest: &str) {
        info!(
            "{} {} {} {}",
            format!("Minified {}:", label).green(),
            file_label(source).bold(),
            "->".yellow(),
            dest.cyan()
        );
    }

    pub fn queued_for_merge(label: &str, source: &Path) {
        debug!("🧩 Queued {} for merge: {}", label, source.display());
    }

    pub fn merged(label: &str, file_name: &str, dest: &str, fragments: usize) {
        info!(
            "{} {} {} {} ({} files)",
            format!("Merged {}:", label).green(),
            file_name.bold(),
            "->".yellow(),
            dest.cyan(),
            fragments
        );
    }

    pub fn copied(source: &Path, dest: &str) {
        info!(
            "{} {} {} {}",
            "Copied file:".bright_black(),
            file_label(source).bold(),
            "->".yellow(),
            dest.cyan()
        );
    }

    pub fn file_failed(path: &Path, err: &dyn std::fmt::Display) {
        error!(
            "{} {}",
            format!("Error processing file {}:", file_label(path).bold()).red(),
            err
        );
    }

    pub fn input_failed(path: &Path, err: &dyn std::fmt::Display) {
        error!(
            "{} {}",
            format!("Error processing input {}:", path.display()).red(),
            err
        );
    }

    pub fn run_complete(inputs: usize, skipped: usize, written: usize, failed: usize) {
        info!("");
        info!("📊 Minify summary:");
        info!("  • Inputs processed: {}", inputs);
        info!("  • Inputs skipped: {}", skipped);
        info!("  • Files written: {}", written);
        if failed > 0 {
            warn!("  • Failures: {}", failed);
        }
    }

    pub fn debug(msg: &str) {
        debug!("{}", msg);
    }

    pub fn warn(msg: &str) {
        warn!("⚠️  {}", msg);
    }
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

pub struct Timer {
    start: Instant,
    name: String,
}

impl Timer {
    pub fn start(name: &str) -> Self {
        debug!("⏱️  Starting: {}", name);
        Self {
            start: Instant::now(),
            name: name.to_string(),
        }
    }

    pub fn elapsed(&self) -> std::time::Duration {
        self.start.elapsed()
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        debug!("⏱️  Completed: {} in {:.2?}", self.name, self.elapsed());
    }
}
