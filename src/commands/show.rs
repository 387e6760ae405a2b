// Show command implementation
// Prints generated configs or the wrapper argument string without writing files

use serde::Serialize;
use std::path::PathBuf;

use crate::aggregate::GeneratedConfigs;
use crate::commands::{load_and_compose, resolve_nvim_dir};
use crate::error::{CliError, Result};
use crate::plugin::ConfigLanguage;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShowTarget {
    /// Per-language generated configs
    Configs,
    /// The legacy vimscript document
    Viml,
    /// Wrapper argument string
    WrapperArgs,
    /// Runtime file paths with their owners
    Files,
}

#[derive(Debug, Clone)]
pub struct ShowConfig {
    pub config_path: PathBuf,
    pub output_dir: Option<PathBuf>,
    pub target: ShowTarget,
    pub language: Option<String>,
    pub json: bool,
}

#[derive(Serialize)]
struct ConfigsReport<'a> {
    generated_config_viml: &'a str,
    generated_configs: &'a GeneratedConfigs,
}

pub fn execute_show_command(config: &ShowConfig) -> Result<String> {
    let nvim_dir = resolve_nvim_dir(config.output_dir.as_deref())?;
    let (_, composition) = load_and_compose(&config.config_path, &nvim_dir)?;

    let output = match config.target {
        ShowTarget::WrapperArgs => composition.wrapper_args.to_string(),
        ShowTarget::Viml => composition.generated_config_viml.clone(),
        ShowTarget::Configs => {
            if let Some(name) = &config.language {
                let language = ConfigLanguage::from_str(name);
                composition
                    .generated_configs
                    .get(&language)
                    .map(str::to_string)
                    .ok_or_else(|| CliError::InvalidArgument {
                        argument: "--language".to_string(),
                        message: format!("no plugin declares config language '{name}'"),
                        suggestion: Some(format!(
                            "Known languages: {}",
                            composition
                                .generated_configs
                                .languages()
                                .map(ConfigLanguage::as_str)
                                .collect::<Vec<_>>()
                                .join(", ")
                        )),
                    })?
            } else if config.json {
                serde_json::to_string_pretty(&ConfigsReport {
                    generated_config_viml: &composition.generated_config_viml,
                    generated_configs: &composition.generated_configs,
                })?
            } else {
                composition
                    .generated_configs
                    .iter()
                    .map(|(language, text)| format!("-- {language} --\n{text}"))
                    .collect::<Vec<_>>()
                    .join("\n")
            }
        }
        ShowTarget::Files => {
            if config.json {
                serde_json::to_string_pretty(&composition.files)?
            } else {
                composition
                    .files
                    .iter()
                    .map(|(path, entry)| format!("{path}  ({})", entry.owner))
                    .collect::<Vec<_>>()
                    .join("\n")
            }
        }
    };

    Ok(output)
}
