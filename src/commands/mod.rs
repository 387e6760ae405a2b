// Command implementations for the nvim-compose CLI

pub mod generate;
pub mod sample_config;
pub mod show;
pub mod validate_config;

use std::path::{Path, PathBuf};

use crate::compose::{compose, Composition};
use crate::config::Config;
use crate::error::{CliError, Result};

/// Target directory: explicit override, else `$XDG_CONFIG_HOME/nvim`
pub fn resolve_nvim_dir(output_dir: Option<&Path>) -> Result<PathBuf> {
    if let Some(dir) = output_dir {
        return Ok(dir.to_path_buf());
    }

    dirs::config_dir().map(|dir| dir.join("nvim")).ok_or_else(|| {
        CliError::NoOutputDirectory {
            suggestion: "Pass --output-dir or set XDG_CONFIG_HOME".to_string(),
        }
        .into()
    })
}

/// Load the config file and run a full composition pass
pub fn load_and_compose(config_path: &Path, nvim_dir: &Path) -> Result<(Config, Composition)> {
    let span = crate::logging::utils::config_loading_span(config_path);
    let config = span.in_scope(|| Config::from_file(config_path))?;

    let input = config.to_compose_input(nvim_dir);
    let composition = compose(&input, &config.renderer())?;
    Ok((config, composition))
}
