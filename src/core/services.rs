use crate::core::{interfaces::*, models::*};
use crate::utils::{EzminError, Logger, Result, Timer};
use futures::future::{BoxFuture, FutureExt};
use std::path::Path;
use std::sync::Arc;

/// Minifies, defers or copies a single file.
pub struct Transformer {
    fs_service: Arc<dyn FileSystemService>,
    js_processor: Arc<dyn JsProcessor>,
    css_processor: Arc<dyn CssProcessor>,
    paths: ProjectPaths,
}

impl Transformer {
    pub fn new(
        fs_service: Arc<dyn FileSystemService>,
        js_processor: Arc<dyn JsProcessor>,
        css_processor: Arc<dyn CssProcessor>,
        paths: ProjectPaths,
    ) -> Self {
        Self {
            fs_service,
            js_processor,
            css_processor,
            paths,
        }
    }

    /// Transform `source` into `dest`.
    ///
    /// Scripts and stylesheets are minified; with `merge` set the code is
    /// only returned and nothing is written. Every other file, including
    /// already-minified ones, is copied as-is even in merge mode.
    pub async fn process(&self, source: &Path, dest: &Path, merge: bool) -> Result<ProcessedFile> {
        let kind = AssetKind::from_path(source);

        let code = match kind {
            AssetKind::Script => {
                let content = self.fs_service.read_file(source).await?;
                self.js_processor.minify_script(&content, source).await?
            }
            AssetKind::Stylesheet => {
                let content = self.fs_service.read_file(source).await?;
                self.css_processor.process_css(&content, source).await?
            }
            AssetKind::Other => {
                self.fs_service.copy_file(source, dest).await?;
                Logger::copied(source, &self.paths.relative_to_build(dest));
                return Ok(ProcessedFile::copied(source.to_path_buf(), dest.to_path_buf()));
            }
        };

        if merge {
            Logger::queued_for_merge(kind.label(), source);
        } else {
            self.fs_service.write_file(dest, &code).await?;
            Logger::minified(kind.label(), source, &self.paths.relative_to_build(dest));
        }

        Ok(ProcessedFile {
            src: source.to_path_buf(),
            output: dest.to_path_buf(),
            code: Some(code),
        })
    }
}

/// Recursive directory walker that folds merge fragments up the tree.
pub struct TreeWalker {
    fs_service: Arc<dyn FileSystemService>,
    transformer: Transformer,
    paths: ProjectPaths,
}

impl TreeWalker {
    pub fn new(
        fs_service: Arc<dyn FileSystemService>,
        js_processor: Arc<dyn JsProcessor>,
        css_processor: Arc<dyn CssProcessor>,
        paths: ProjectPaths,
    ) -> Self {
        let transformer = Transformer::new(
            fs_service.clone(),
            js_processor,
            css_processor,
            paths.clone(),
        );
        Self {
            fs_service,
            transformer,
            paths,
        }
    }

    /// Walk `source` into `output`.
    ///
    /// Pending fragments are flushed into merged bundles at every directory
    /// when `keep_structure` is set, otherwise only at `depth == 0`. The
    /// returned outcome never carries pending fragments at depth 0.
    pub fn walk<'a>(
        &'a self,
        source: &'a Path,
        output: &'a Path,
        merge: &'a MergeMode,
        keep_structure: bool,
        depth: usize,
    ) -> BoxFuture<'a, Result<WalkOutcome>> {
        async move {
            if self.fs_service.entry_kind(source).await? != EntryKind::Directory {
                return self.walk_single_file(source, output).await;
            }

            let _timer = Timer::start(&format!("Walking {}", source.display()));
            let mut outcome = WalkOutcome::default();

            for entry in self.fs_service.list_directory(source).await? {
                if let Err(err) = self
                    .visit(&entry, output, merge, keep_structure, depth, &mut outcome)
                    .await
                {
                    Logger::file_failed(&entry.path, &err);
                    outcome.failed += 1;
                }
            }

            if keep_structure || depth == 0 {
                self.flush(source, output, merge, &mut outcome).await;
            }

            Ok(outcome)
        }
        .boxed()
    }

    /// A single-file input is always written directly under `output`.
    async fn walk_single_file(&self, source: &Path, output: &Path) -> Result<WalkOutcome> {
        let name = source
            .file_name()
            .ok_or_else(|| EzminError::InvalidPath(source.display().to_string()))?
            .to_string_lossy();
        let dest = output.join(output_filename(&name));

        let processed = self.transformer.process(source, &dest, false).await?;
        Ok(WalkOutcome::single(processed))
    }

    async fn visit(
        &self,
        entry: &SourceEntry,
        output: &Path,
        merge: &MergeMode,
        keep_structure: bool,
        depth: usize,
        outcome: &mut WalkOutcome,
    ) -> Result<()> {
        match self.fs_service.entry_kind(&entry.path).await? {
            EntryKind::Directory => {
                let sub_output = output.join(&entry.name);
                self.fs_service.create_directory(&sub_output).await?;

                let child = self
                    .walk(&entry.path, &sub_output, merge, keep_structure, depth + 1)
                    .await?;
                outcome.absorb(child, merge.is_enabled());
            }
            EntryKind::File => {
                let dest = output.join(output_filename(&entry.name));
                let processed = self
                    .transformer
                    .process(&entry.path, &dest, merge.is_enabled())
                    .await?;

                if !merge.is_enabled() {
                    outcome.written.push(processed);
                    return Ok(());
                }

                let kind = processed.emitted_kind();
                if let Some(code) = processed.code {
                    let fragment = format!(
                        "/** {} **/\n{}",
                        self.paths.relative_to_root(&entry.path),
                        code
                    );
                    match kind {
                        Some(AssetKind::Script) => outcome.scripts.push(fragment),
                        Some(AssetKind::Stylesheet) => outcome.styles.push(fragment),
                        _ => {}
                    }
                }
            }
        }
        Ok(())
    }

    /// Materialize pending fragments as merged bundles in `output`.
    async fn flush(
        &self,
        source: &Path,
        output: &Path,
        merge: &MergeMode,
        outcome: &mut WalkOutcome,
    ) {
        let Some(base_name) = merge.bundle_name(source) else {
            return;
        };

        let scripts = std::mem::take(&mut outcome.scripts);
        let styles = std::mem::take(&mut outcome.styles);

        for (fragments, kind, extension) in [
            (scripts, AssetKind::Script, MINIFIED_SCRIPT_EXTENSION),
            (styles, AssetKind::Stylesheet, MINIFIED_STYLE_EXTENSION),
        ] {
            if fragments.is_empty() {
                continue;
            }

            let file_name = format!("{}{}", base_name, extension);
            let merged_path = output.join(&file_name);

            match self
                .fs_service
                .write_file(&merged_path, &fragments.join("\n"))
                .await
            {
                Ok(()) => {
                    Logger::merged(
                        kind.label(),
                        &file_name,
                        &self.paths.relative_to_build(&merged_path),
                        fragments.len(),
                    );
                    outcome
                        .written
                        .push(ProcessedFile::bundle(source.to_path_buf(), merged_path));
                }
                Err(err) => {
                    Logger::file_failed(&merged_path, &err);
                    outcome.failed += 1;
                }
            }
        }
    }
}
