use crate::utils::paths::{normalize, relative_path, to_slash};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const SCRIPT_EXTENSION: &str = ".js";
pub const MINIFIED_SCRIPT_EXTENSION: &str = ".min.js";
pub const STYLE_EXTENSION: &str = ".css";
pub const MINIFIED_STYLE_EXTENSION: &str = ".min.css";

/// What the transformer does with a file, decided from its name alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    Script,
    Stylesheet,
    /// Copied verbatim. Includes already-minified scripts and stylesheets.
    Other,
}

impl AssetKind {
    pub fn from_path(path: &Path) -> Self {
        let name = match path.file_name() {
            Some(name) => name.to_string_lossy(),
            None => return AssetKind::Other,
        };

        if name.ends_with(SCRIPT_EXTENSION) && !name.ends_with(MINIFIED_SCRIPT_EXTENSION) {
            AssetKind::Script
        } else if name.ends_with(STYLE_EXTENSION) && !name.ends_with(MINIFIED_STYLE_EXTENSION) {
            AssetKind::Stylesheet
        } else {
            AssetKind::Other
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AssetKind::Script => "JS",
            AssetKind::Stylesheet => "CSS",
            AssetKind::Other => "file",
        }
    }
}

/// Name a transformed file is written under.
///
/// `app.js` becomes `app.min.js`, `site.css` becomes `site.min.css`; anything
/// else, including names already in minified form, is returned unchanged.
pub fn output_filename(name: &str) -> String {
    if name.ends_with(SCRIPT_EXTENSION) && !name.ends_with(MINIFIED_SCRIPT_EXTENSION) {
        let stem = &name[..name.len() - SCRIPT_EXTENSION.len()];
        format!("{}{}", stem, MINIFIED_SCRIPT_EXTENSION)
    } else if name.ends_with(STYLE_EXTENSION) && !name.ends_with(MINIFIED_STYLE_EXTENSION) {
        let stem = &name[..name.len() - STYLE_EXTENSION.len()];
        format!("{}{}", stem, MINIFIED_STYLE_EXTENSION)
    } else {
        name.to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
}

/// A node found while listing an input directory.
///
/// Its `EntryKind` is resolved when the walker visits it, so a child that
/// cannot be stat'ed fails on its own instead of failing the listing.
#[derive(Debug, Clone)]
pub struct SourceEntry {
    pub path: PathBuf,
    pub name: String,
}

/// Result of transforming one file.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedFile {
    pub src: PathBuf,
    pub output: PathBuf,
    /// Minified code; `None` when the file was copied verbatim.
    pub code: Option<String>,
}

impl ProcessedFile {
    pub fn copied(src: PathBuf, output: PathBuf) -> Self {
        Self {
            src,
            output,
            code: None,
        }
    }

    /// A merged bundle; `src` is the directory whose fragments it holds.
    pub fn bundle(src_dir: PathBuf, output: PathBuf) -> Self {
        Self {
            src: src_dir,
            output,
            code: None,
        }
    }

    /// Kind of code this file emitted, judged by the output name.
    pub fn emitted_kind(&self) -> Option<AssetKind> {
        self.code.as_ref()?;
        let name = self.output.file_name()?.to_string_lossy();
        if name.ends_with(SCRIPT_EXTENSION) {
            Some(AssetKind::Script)
        } else if name.ends_with(STYLE_EXTENSION) {
            Some(AssetKind::Stylesheet)
        } else {
            None
        }
    }
}

/// What a directory walk hands back to its caller.
///
/// `written` holds files already on disk; `scripts` and `styles` hold tagged
/// fragments that have not reached an aggregation boundary yet. Outside merge
/// mode the fragment lists stay empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WalkOutcome {
    pub written: Vec<ProcessedFile>,
    pub scripts: Vec<String>,
    pub styles: Vec<String>,
    pub failed: usize,
}

impl WalkOutcome {
    pub fn single(file: ProcessedFile) -> Self {
        Self {
            written: vec![file],
            ..Self::default()
        }
    }

    /// Fold a child directory's outcome into this one.
    ///
    /// When merging, only the child's fragments travel up; bundles it
    /// flushed stay on disk but are not reported to the caller.
    pub fn absorb(&mut self, child: WalkOutcome, merging: bool) {
        if !merging {
            self.written.extend(child.written);
        }
        self.scripts.extend(child.scripts);
        self.styles.extend(child.styles);
        self.failed += child.failed;
    }

    pub fn has_pending(&self) -> bool {
        !self.scripts.is_empty() || !self.styles.is_empty()
    }
}

/// How the `merge_result` option was configured.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "MergeSetting", into = "MergeSetting")]
pub enum MergeMode {
    #[default]
    Off,
    /// Merge, naming bundles after the directory that produced them.
    DirectoryName,
    Named(String),
}

impl MergeMode {
    pub fn is_enabled(&self) -> bool {
        !matches!(self, MergeMode::Off)
    }

    /// Base name of a merged bundle flushed for `source_dir`.
    pub fn bundle_name(&self, source_dir: &Path) -> Option<String> {
        match self {
            MergeMode::Off => None,
            MergeMode::Named(name) => Some(name.clone()),
            MergeMode::DirectoryName => Some(
                source_dir
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "bundle".to_string()),
            ),
        }
    }
}

/// Wire shape of `merge_result`: `false`, `true`, or a bundle name.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum MergeSetting {
    Flag(bool),
    Name(String),
}

impl From<MergeSetting> for MergeMode {
    fn from(setting: MergeSetting) -> Self {
        match setting {
            MergeSetting::Flag(false) => MergeMode::Off,
            MergeSetting::Flag(true) => MergeMode::DirectoryName,
            MergeSetting::Name(name) if name.is_empty() => MergeMode::Off,
            MergeSetting::Name(name) => MergeMode::Named(name),
        }
    }
}

impl From<MergeMode> for MergeSetting {
    fn from(mode: MergeMode) -> Self {
        match mode {
            MergeMode::Off => MergeSetting::Flag(false),
            MergeMode::DirectoryName => MergeSetting::Flag(true),
            MergeMode::Named(name) => MergeSetting::Name(name),
        }
    }
}

/// One configured input directory or file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputEntry {
    pub src: String,
    #[serde(default = "default_output")]
    pub output: String,
    #[serde(default = "default_true", alias = "keepStructure")]
    pub keep_structure: bool,
    #[serde(default, alias = "mergeResult")]
    pub merge_result: MergeMode,
}

impl InputEntry {
    pub fn new(src: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            output: default_output(),
            keep_structure: true,
            merge_result: MergeMode::Off,
        }
    }

    pub fn with_output(mut self, output: impl Into<String>) -> Self {
        self.output = output.into();
        self
    }

    pub fn with_merge(mut self, merge: MergeMode) -> Self {
        self.merge_result = merge;
        self
    }

    pub fn with_keep_structure(mut self, keep_structure: bool) -> Self {
        self.keep_structure = keep_structure;
        self
    }
}

pub fn default_output() -> String {
    "public/build/assets".to_string()
}

pub fn default_manifest_path() -> String {
    "public/build/manifest.json".to_string()
}

pub fn default_build_dir() -> String {
    "public/build".to_string()
}

fn default_true() -> bool {
    true
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct MinifyConfig {
    pub root: PathBuf,
    pub manifest_path: PathBuf,
    pub build_dir: PathBuf,
    pub inputs: Vec<InputEntry>,
}

impl MinifyConfig {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            manifest_path: PathBuf::from(default_manifest_path()),
            build_dir: PathBuf::from(default_build_dir()),
            inputs: Vec::new(),
        }
    }

    pub fn with_input(mut self, input: InputEntry) -> Self {
        self.inputs.push(input);
        self
    }

    pub fn paths(&self) -> ProjectPaths {
        ProjectPaths::new(self.root.clone(), &self.build_dir)
    }
}

/// Project root and build root, threaded explicitly through every call.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectPaths {
    root: PathBuf,
    build_dir: PathBuf,
}

impl ProjectPaths {
    pub fn new(root: PathBuf, build_dir: &Path) -> Self {
        let root = normalize(&root);
        let build_dir = normalize(&root.join(build_dir));
        Self { root, build_dir }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn build_dir(&self) -> &Path {
        &self.build_dir
    }

    /// Resolve a configured path against the project root.
    pub fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        normalize(&self.root.join(path))
    }

    /// Manifest key form: project-root-relative, `/` separators.
    pub fn relative_to_root(&self, path: &Path) -> String {
        to_slash(&relative_path(&self.root, path))
    }

    /// Manifest value form: build-root-relative, `/` separators.
    pub fn relative_to_build(&self, path: &Path) -> String {
        to_slash(&relative_path(&self.build_dir, path))
    }
}

/// One manifest record, as the template layer reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub file: String,
    pub src: String,
    #[serde(rename = "isEntry")]
    pub is_entry: bool,
}

impl ManifestEntry {
    pub fn entry(file: String, src: String) -> Self {
        Self {
            file,
            src,
            is_entry: true,
        }
    }
}

/// Totals for one run of the manifest updater.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub inputs_processed: usize,
    pub inputs_skipped: usize,
    pub files_written: usize,
    pub failures: usize,
}
