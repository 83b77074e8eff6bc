//! Collaborator configuration.
//!
//! Where cleaned files go and which uploads are accepted. The normalizer
//! itself only ever sees explicit paths; this is for callers (the CLI, an
//! upload service) that derive those paths.
//!
//! Values come from the environment, with `.env` loaded if present:
//!
//! | Variable | Default |
//! |----------|---------|
//! | `NORMALIZER_OUTPUT_DIR` | `uploads` |
//! | `NORMALIZER_OUTPUT_PREFIX` | `cleaned_` |
//! | `NORMALIZER_ALLOWED_EXTENSIONS` | `csv` (comma separated) |

use std::env;
use std::path::{Path, PathBuf};

pub const DEFAULT_OUTPUT_DIR: &str = "uploads";
pub const DEFAULT_OUTPUT_PREFIX: &str = "cleaned_";
pub const DEFAULT_ALLOWED_EXTENSIONS: &[&str] = &["csv"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizerConfig {
    pub output_dir: PathBuf,
    pub output_prefix: String,
    /// Lowercase, without the leading dot.
    pub allowed_extensions: Vec<String>,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            output_prefix: DEFAULT_OUTPUT_PREFIX.to_string(),
            allowed_extensions: DEFAULT_ALLOWED_EXTENSIONS
                .iter()
                .map(|e| e.to_string())
                .collect(),
        }
    }
}

impl NormalizerConfig {
    /// Build from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        // Try loading .env file
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(dir) = lookup("NORMALIZER_OUTPUT_DIR").filter(|v| !v.trim().is_empty()) {
            config.output_dir = PathBuf::from(dir.trim());
        }
        if let Some(prefix) = lookup("NORMALIZER_OUTPUT_PREFIX") {
            config.output_prefix = prefix;
        }
        if let Some(exts) = lookup("NORMALIZER_ALLOWED_EXTENSIONS") {
            let parsed: Vec<String> = exts
                .split(',')
                .map(|e| e.trim().trim_start_matches('.').to_lowercase())
                .filter(|e| !e.is_empty())
                .collect();
            if !parsed.is_empty() {
                config.allowed_extensions = parsed;
            }
        }

        config
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Whether `filename` has an allowed extension (text after the last dot,
    /// case-insensitive).
    pub fn is_allowed_file(&self, filename: &str) -> bool {
        match filename.rsplit_once('.') {
            Some((_, ext)) => self
                .allowed_extensions
                .iter()
                .any(|allowed| allowed.eq_ignore_ascii_case(ext)),
            None => false,
        }
    }

    /// `<output_dir>/<prefix><input file name>`
    pub fn output_path_for(&self, input: &Path) -> PathBuf {
        let name = input
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "output.csv".to_string());
        self.output_dir.join(format!("{}{}", self.output_prefix, name))
    }

    /// Create the output directory if it does not exist yet.
    pub fn ensure_output_dir(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.output_dir)
    }
}
