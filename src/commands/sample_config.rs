// Sample configuration command implementation
// Generates a starter nvim-compose.yaml

use crate::error::{CliError, Result};
use std::fs;
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Clone)]
pub struct SampleConfigConfig {
    /// Config language used by the sample plugins (vimscript or lua)
    pub flavor: Option<String>,
    pub with_coc: bool,
    pub output_file: Option<PathBuf>,
}

#[derive(Debug)]
pub struct SampleConfigResult {
    pub config_generated: String,
    pub output_location: String,
}

pub fn execute_sample_config_command(config: &SampleConfigConfig) -> Result<SampleConfigResult> {
    info!("Generating sample configuration");

    let mut builder = SampleBuilder::new();
    match config.flavor.as_deref() {
        None | Some("vimscript") | Some("viml") => builder.add_vimscript_plugins(),
        Some("lua") => builder.add_lua_plugins(),
        Some(other) => {
            return Err(CliError::InvalidArgument {
                argument: "--flavor".to_string(),
                message: format!("unknown flavor '{other}'"),
                suggestion: Some("Use 'vimscript' or 'lua'".to_string()),
            }
            .into())
        }
    }
    if config.with_coc {
        builder.enable_coc();
    }
    let config_content = builder.build();

    let output_location = if let Some(ref output_file) = config.output_file {
        if let Some(parent) = output_file.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(output_file, &config_content)?;
        output_file.to_string_lossy().to_string()
    } else {
        println!("{config_content}");
        "stdout".to_string()
    };

    Ok(SampleConfigResult {
        config_generated: config_content,
        output_location,
    })
}

#[derive(Clone)]
struct SamplePlugin {
    artifact: String,
    language: Option<String>,
    config: Option<String>,
    optional: bool,
}

impl SamplePlugin {
    fn bare(artifact: &str) -> Self {
        Self {
            artifact: artifact.to_string(),
            language: None,
            config: None,
            optional: false,
        }
    }

    fn configured(artifact: &str, language: &str, config: &str) -> Self {
        Self {
            artifact: artifact.to_string(),
            language: Some(language.to_string()),
            config: Some(config.to_string()),
            optional: false,
        }
    }
}

struct SampleBuilder {
    plugins: Vec<SamplePlugin>,
    extra_config: Vec<String>,
    extra_lua_config: Vec<String>,
    coc: bool,
}

impl SampleBuilder {
    fn new() -> Self {
        Self {
            plugins: Vec::new(),
            extra_config: vec!["set number".to_string()],
            extra_lua_config: Vec::new(),
            coc: false,
        }
    }

    fn add_vimscript_plugins(&mut self) {
        self.plugins.push(SamplePlugin::bare("vim-sensible"));
        self.plugins.push(SamplePlugin::configured(
            "gruvbox",
            "viml",
            "colorscheme gruvbox",
        ));
        self.plugins.push(SamplePlugin {
            optional: true,
            ..SamplePlugin::bare("vim-fugitive")
        });
    }

    fn add_lua_plugins(&mut self) {
        self.plugins.push(SamplePlugin::bare("plenary-nvim"));
        self.plugins.push(SamplePlugin::configured(
            "nvim-treesitter",
            "lua",
            "require('nvim-treesitter.configs').setup({ highlight = { enable = true } })",
        ));
        self.plugins.push(SamplePlugin::configured(
            "telescope-nvim",
            "lua",
            "require('telescope').setup({})",
        ));
        self.extra_lua_config
            .push("vim.opt.termguicolors = true".to_string());
    }

    fn enable_coc(&mut self) {
        self.coc = true;
    }

    fn build(&self) -> String {
        let mut yaml_content = String::new();

        yaml_content.push_str("# nvim-compose configuration\n");
        yaml_content.push_str("# Run `nvim-compose generate --dry-run` to preview the result\n");

        yaml_content.push_str("plugins:\n");
        for plugin in &self.plugins {
            if plugin.language.is_none() && plugin.config.is_none() && !plugin.optional {
                yaml_content.push_str(&format!("  - {}\n", plugin.artifact));
                continue;
            }

            yaml_content.push_str(&format!("  - plugin: {}\n", plugin.artifact));
            if let Some(ref language) = plugin.language {
                yaml_content.push_str(&format!("    type: {language}\n"));
            }
            if let Some(ref config) = plugin.config {
                yaml_content.push_str(&format!("    config: \"{}\"\n", config.replace('"', "\\\"")));
            }
            if plugin.optional {
                yaml_content.push_str("    optional: true\n");
            }
        }

        push_block(&mut yaml_content, "extra_config", &self.extra_config);
        push_block(&mut yaml_content, "extra_lua_config", &self.extra_lua_config);

        yaml_content.push_str("with_python3: true\n");
        yaml_content.push_str("with_ruby: true\n");
        yaml_content.push_str("vim_alias: true\n");
        yaml_content.push_str("default_editor: false\n");

        if self.coc {
            yaml_content.push_str("coc:\n");
            yaml_content.push_str("  enable: true\n");
            yaml_content.push_str("  settings:\n");
            yaml_content.push_str("    suggest.noselect: true\n");
        }

        yaml_content
    }
}

fn push_block(yaml_content: &mut String, key: &str, lines: &[String]) {
    if lines.is_empty() {
        return;
    }
    yaml_content.push_str(&format!("{key}: |\n"));
    for line in lines {
        yaml_content.push_str(&format!("  {line}\n"));
    }
}
