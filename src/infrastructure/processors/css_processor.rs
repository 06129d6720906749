use crate::core::interfaces::CssProcessor;
use crate::utils::{ErrorContext, EzminError, Logger, Result, Timer};
use lightningcss::{
    printer::PrinterOptions,
    stylesheet::{MinifyOptions, ParserOptions as CssParserOptions, StyleSheet},
};
use std::path::{Path, PathBuf};

/// Stylesheet minification using lightningcss
#[derive(Debug, Clone, Copy, Default)]
pub struct LightningCssProcessor;

impl LightningCssProcessor {
    pub fn new() -> Self {
        Self
    }

    /// Parse, minify and print one stylesheet
    pub fn process_sync(&self, content: &str, path: &Path) -> Result<String> {
        let options = CssParserOptions {
            filename: path.display().to_string(),
            ..CssParserOptions::default()
        };

        let mut stylesheet = StyleSheet::parse(content, options).map_err(|e| {
            EzminError::parse_with_context(
                format!("CSS parse error: {}", e),
                ErrorContext::new().with_file(path.to_path_buf()),
            )
        })?;

        stylesheet
            .minify(MinifyOptions::default())
            .map_err(|e| EzminError::Minify(format!("{}: {}", path.display(), e)))?;

        let result = stylesheet
            .to_css(PrinterOptions {
                minify: true,
                ..Default::default()
            })
            .map_err(|e| EzminError::Minify(format!("{}: {}", path.display(), e)))?;

        Ok(result.code)
    }
}

#[async_trait::async_trait]
impl CssProcessor for LightningCssProcessor {
    async fn process_css(&self, content: &str, path: &Path) -> Result<String> {
        let _timer = Timer::start(&format!("Processing CSS {}", path.display()));

        let processor = *self;
        let source = content.to_string();
        let file: PathBuf = path.to_path_buf();

        let code = tokio::task::spawn_blocking(move || processor.process_sync(&source, &file))
        .await
        .map_err(|e| EzminError::Minify(format!("CSS task failed: {}", e)))??;

        Logger::debug(&format!(
            "🎨 {}: {} → {} bytes",
            path.display(),
            content.len(),
            code.len()
        ));
        Ok(code)
    }
}
