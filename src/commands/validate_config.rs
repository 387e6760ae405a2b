// Validate-config command implementation
// Parses each config file and runs a composition pass without writing anything

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::commands::load_and_compose;
use crate::config::Config;
use crate::error::ComposeError;

/// Placeholder directory used for composing during validation
const VALIDATION_NVIM_DIR: &str = "/nvim-compose/validate";

#[derive(Debug)]
pub struct FileValidation {
    pub path: PathBuf,
    pub error: Option<ComposeError>,
    pub warnings: Vec<String>,
}

impl FileValidation {
    pub fn is_valid(&self) -> bool {
        self.error.is_none()
    }
}

#[derive(Debug, Default)]
pub struct ValidateConfigResult {
    pub files: Vec<FileValidation>,
}

impl ValidateConfigResult {
    pub fn is_valid(&self) -> bool {
        self.files.iter().all(FileValidation::is_valid)
    }

    pub fn error_count(&self) -> usize {
        self.files.iter().filter(|file| !file.is_valid()).count()
    }

    /// First error, used for the process exit code
    pub fn first_error(&self) -> Option<&ComposeError> {
        self.files.iter().find_map(|file| file.error.as_ref())
    }
}

pub fn execute_validate_config_command(filenames: &[PathBuf]) -> ValidateConfigResult {
    let files = filenames.iter().map(|path| validate_file(path)).collect();
    ValidateConfigResult { files }
}

fn validate_file(path: &Path) -> FileValidation {
    debug!(path = %path.display(), "Validating configuration");

    match load_and_compose(path, Path::new(VALIDATION_NVIM_DIR)) {
        Ok((config, _)) => {
            let warnings = collect_warnings(&config);
            for message in &warnings {
                warn!(path = %path.display(), "{message}");
            }
            FileValidation {
                path: path.to_path_buf(),
                error: None,
                warnings,
            }
        }
        Err(error) => FileValidation {
            path: path.to_path_buf(),
            error: Some(error),
            warnings: Vec::new(),
        },
    }
}

fn collect_warnings(config: &Config) -> Vec<String> {
    let mut warnings = Vec::new();

    if config.plugins.is_empty() && !config.coc_enabled() {
        warnings.push("configuration declares no plugins".to_string());
    }

    let mut seen: BTreeMap<&str, usize> = BTreeMap::new();
    for artifact in config.plugins.iter().filter_map(|spec| spec.artifact()) {
        *seen.entry(artifact.as_str()).or_default() += 1;
    }
    for (artifact, count) in seen.into_iter().filter(|(_, count)| *count > 1) {
        warnings.push(format!("plugin '{artifact}' is declared {count} times"));
    }

    if config.default_editor && config.extra_config.trim().is_empty() && config.plugins.is_empty()
    {
        warnings.push("default_editor is set but nothing is configured".to_string());
    }

    warnings
}
