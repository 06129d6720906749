use crate::core::interfaces::JsProcessor;
use crate::utils::{ErrorContext, EzminError, Logger, Result};
use oxc_allocator::Allocator;
use oxc_codegen::{Codegen, CodegenOptions};
use oxc_minifier::{CompressOptions, MangleOptions, Minifier, MinifierOptions};
use oxc_parser::Parser;
use oxc_span::SourceType;
use oxc_syntax::es_target::ESTarget;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Emitted code must parse in ES2020 engines. oxc 0.90 already rewrites to
/// `||=`, `&&=` and `??=` (ES2021) at its ES2020 target, so compression is
/// held one edition lower. Syntax present in the source is kept as written.
const COMPRESS_TARGET: ESTarget = ESTarget::ES2019;

/// JavaScript minification using oxc
pub struct OxcMinifier {
    options: MinifierOptions,
}

impl OxcMinifier {
    pub fn new() -> Self {
        Self {
            options: MinifierOptions {
                mangle: Some(MangleOptions::default()),
                compress: Some(CompressOptions {
                    target: COMPRESS_TARGET,
                    ..CompressOptions::smallest()
                }),
            },
        }
    }

    /// Minify JavaScript code
    ///
    /// Input is parsed as a classic script first so top-level names stay
    /// global and are not mangled; sources using `import`/`export` fall back
    /// to module parsing.
    pub fn minify(&self, source_code: &str, path: &Path) -> Result<String> {
        let allocator = Allocator::default();

        let script = SourceType::default().with_module(false);
        let parsed = Parser::new(&allocator, source_code, script).parse();
        let parsed = if parsed.errors.is_empty() {
            parsed
        } else {
            let module = SourceType::default().with_module(true);
            Parser::new(&allocator, source_code, module).parse()
        };

        if !parsed.errors.is_empty() {
            let errors: Vec<String> = parsed
                .errors
                .iter()
                .map(|e| e.to_string())
                .collect();
            return Err(EzminError::parse_with_context(
                errors.join("\n"),
                ErrorContext::new()
                    .with_file(path.to_path_buf())
                    .with_snippet(snippet(source_code)),
            ));
        }

        let mut program = parsed.program;
        let ret = Minifier::new(self.options.clone()).minify(&allocator, &mut program);

        let code = Codegen::new()
            .with_options(CodegenOptions::minify())
            .with_scoping(ret.scoping)
            .build(&program)
            .code;

        Ok(code)
    }

    /// Estimate size reduction percentage
    pub fn calculate_reduction(&self, original: &str, minified: &str) -> f64 {
        let original_size = original.len() as f64;
        let minified_size = minified.len() as f64;

        if original_size == 0.0 {
            return 0.0;
        }

        ((original_size - minified_size) / original_size) * 100.0
    }
}

impl Default for OxcMinifier {
    fn default() -> Self {
        Self::new()
    }
}

fn snippet(source: &str) -> String {
    source.lines().take(5).collect::<Vec<_>>().join("\n")
}

/// Async wrapper that runs minification off the async workers
pub struct MinificationService {
    minifier: Arc<OxcMinifier>,
}

impl MinificationService {
    pub fn new() -> Self {
        Self {
            minifier: Arc::new(OxcMinifier::new()),
        }
    }

    /// Get minification statistics
    pub fn get_stats(&self, original: &str, minified: &str) -> MinificationStats {
        MinificationStats {
            original_size: original.len(),
            minified_size: minified.len(),
            reduction_percentage: self.minifier.calculate_reduction(original, minified),
            saved_bytes: original.len().saturating_sub(minified.len()),
        }
    }
}

impl Default for MinificationService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl JsProcessor for MinificationService {
    async fn minify_script(&self, content: &str, path: &Path) -> Result<String> {
        let minifier = self.minifier.clone();
        let source = content.to_string();
        let file: PathBuf = path.to_path_buf();

        // oxc is CPU-bound
        let minified = tokio::task::spawn_blocking(move || minifier.minify(&source, &file))
            .await
            .map_err(|e| EzminError::Minify(format!("Minification task failed: {}", e)))??;

        Logger::debug(&format!(
            "{}: {}",
            path.display(),
            self.get_stats(content, &minified)
        ));
        Ok(minified)
    }
}

#[derive(Debug, Clone)]
pub struct MinificationStats {
    pub original_size: usize,
    pub minified_size: usize,
    pub reduction_percentage: f64,
    pub saved_bytes: usize,
}

impl std::fmt::Display for MinificationStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Minification: {:.1}% reduction ({} → {} bytes, saved {})",
            self.reduction_percentage, self.original_size, self.minified_size, self.saved_bytes
        )
    }
}
