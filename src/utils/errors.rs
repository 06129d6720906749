use std::path::PathBuf;
use thiserror::Error;

/// Error with file location context
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    pub file_path: Option<PathBuf>,
    pub code_snippet: Option<String>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: PathBuf) -> Self {
        self.file_path = Some(path);
        self
    }

    pub fn with_snippet(mut self, snippet: String) -> Self {
        self.code_snippet = Some(snippet);
        self
    }
}

#[derive(Error, Debug)]
pub enum EzminError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {message}")]
    Parse {
        message: String,
        context: Option<ErrorContext>,
    },

    #[error("Minification error: {0}")]
    Minify(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Manifest not found at {}. Ensure the build process is complete.", .0.display())]
    ManifestNotFound(PathBuf),

    #[error("Invalid manifest: {0}")]
    Manifest(String),

    #[error("Source path does not exist or is inaccessible: {}", .0.display())]
    SourceNotFound(PathBuf),

    #[error("Invalid path: {0}")]
    InvalidPath(String),
}

impl EzminError {
    /// Create a simple parse error without context
    pub fn parse(message: String) -> Self {
        Self::Parse {
            message,
            context: None,
        }
    }

    /// Create a parse error with context
    pub fn parse_with_context(message: String, context: ErrorContext) -> Self {
        Self::Parse {
            message,
            context: Some(context),
        }
    }

    pub fn config(message: String) -> Self {
        Self::Config(message)
    }

    /// Format error with its file context, if any
    pub fn format_detailed(&self) -> String {
        match self {
            EzminError::Parse { message, context } => {
                let mut output = format!("❌ Parse Error: {}", message);
                if let Some(ctx) = context {
                    if let Some(ref file_path) = ctx.file_path {
                        output.push_str(&format!("\n📁 File: {}", file_path.display()));
                    }
                    if let Some(ref snippet) = ctx.code_snippet {
                        output.push_str(&format!("\n📝 Code:\n{}", format_snippet(snippet)));
                    }
                }
                output
            }
            _ => format!("❌ {}", self),
        }
    }
}

fn format_snippet(snippet: &str) -> String {
    snippet
        .lines()
        .enumerate()
        .map(|(i, line)| format!("  {:3} │ {}", i + 1, line))
        .collect::<Vec<_>>()
        .join("\n")
}

pub type Result<T> = std::result::Result<T, EzminError>;

impl From<serde_json::Error> for EzminError {
    fn from(err: serde_json::Error) -> Self {
        EzminError::Manifest(err.to_string())
    }
}
