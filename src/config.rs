// Configuration handling for nvim-compose
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::compose::{AliasFlags, Companion, ComposeInput};
use crate::error::{ConfigError, ComposeError, Result};
use crate::file_tree::normalize_runtime_path;
use crate::plugin::{Artifact, PluginSpec};
use crate::renderer::{HostPrograms, NeovimRenderer, Providers};

static LUA_VERSION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+\.\d+$").expect("static regex"));

/// Options that used to exist and now fail loudly, with a migration hint
const REMOVED_OPTIONS: &[(&str, &str)] = &[
    (
        "configure",
        "declare plugins under 'plugins' and vimscript under 'extra_config'",
    ),
    (
        "extra_python_packages",
        "python2 support was dropped, use a python3 host instead",
    ),
    (
        "with_python",
        "python2 support was dropped, use 'with_python3'",
    ),
    (
        "extra_python3_packages",
        "build a python3 environment and point 'host_programs.python3' at it",
    ),
];

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub plugins: Vec<PluginSpec>,
    #[serde(default)]
    pub extra_config: String,
    #[serde(default)]
    pub extra_lua_config: String,
    #[serde(default)]
    pub extra_packages: Vec<String>,
    #[serde(default)]
    pub extra_lua_packages: Vec<String>,
    pub lua_version: Option<String>,
    pub with_node_js: Option<bool>,
    pub with_python3: Option<bool>,
    pub with_ruby: Option<bool>,
    #[serde(default)]
    pub vi_alias: bool,
    #[serde(default)]
    pub vim_alias: bool,
    #[serde(default)]
    pub vimdiff_alias: bool,
    #[serde(default)]
    pub default_editor: bool,
    pub host_programs: Option<HostPrograms>,
    pub pack_dir: Option<String>,
    pub coc: Option<CocConfig>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CocConfig {
    #[serde(default)]
    pub enable: bool,
    pub package: Option<String>,
    pub plugin_config: Option<String>,
    pub settings: Option<serde_json::Value>,
}

impl Config {
    pub const DEFAULT_LUA_VERSION: &'static str = "5.1";
    pub const DEFAULT_COC_PACKAGE: &'static str = "coc-nvim";

    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ComposeError::Config(Box::new(ConfigError::NotFound {
                path: path.to_path_buf(),
                suggestion: Some(
                    "Create an nvim-compose.yaml file or run 'nvim-compose sample-config'"
                        .to_string(),
                ),
            })));
        }

        if !path.is_file() {
            return Err(ComposeError::Config(Box::new(ConfigError::InvalidValue {
                message: "Configuration path is not a file".to_string(),
                field: "config_path".to_string(),
                value: path.display().to_string(),
                expected: "file path".to_string(),
                file_path: Some(path.to_path_buf()),
            })));
        }

        let content = std::fs::read_to_string(path)?;
        let is_toml = path.extension().and_then(|ext| ext.to_str()) == Some("toml");

        let result = if is_toml {
            Self::from_toml(&content)
        } else {
            Self::from_yaml(&content)
        };

        result.map_err(|err| attach_file_path(err, path))
    }

    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let raw: serde_yaml::Value =
            serde_yaml::from_str(yaml).map_err(|e| ComposeError::Config(e.into()))?;

        if let Some(mapping) = raw.as_mapping() {
            check_removed_options(mapping.keys().filter_map(|key| key.as_str()))?;
        }

        // An empty document means an empty config
        let config: Config = if raw.is_null() {
            Config::default()
        } else {
            serde_yaml::from_value(raw).map_err(|e| ComposeError::Config(e.into()))?
        };

        config.validate()?;
        Ok(config)
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        let raw: toml::Table = toml::from_str(text).map_err(|e| ComposeError::Config(e.into()))?;
        check_removed_options(raw.keys().map(String::as_str))?;

        let config: Config = toml::Value::Table(raw)
            .try_into()
            .map_err(|e: toml::de::Error| ComposeError::Config(e.into()))?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.plugins.is_empty() {
            tracing::warn!("Configuration contains no plugins");
        }

        for (idx, spec) in self.plugins.iter().enumerate() {
            validate_plugin(idx, spec)?;
        }

        if let Some(version) = &self.lua_version {
            if !LUA_VERSION.is_match(version) {
                return Err(ComposeError::Config(Box::new(ConfigError::InvalidValue {
                    message: format!("Invalid lua version '{version}'"),
                    field: "lua_version".to_string(),
                    value: version.clone(),
                    expected: "major.minor (e.g., 5.1)".to_string(),
                    file_path: None,
                })));
            }
        }

        for (field, packages) in [
            ("extra_packages", &self.extra_packages),
            ("extra_lua_packages", &self.extra_lua_packages),
        ] {
            if let Some(idx) = packages.iter().position(|pkg| pkg.trim().is_empty()) {
                return Err(ComposeError::Config(Box::new(ConfigError::InvalidValue {
                    message: "Package path cannot be empty".to_string(),
                    field: format!("{field}[{idx}]"),
                    value: String::new(),
                    expected: "package prefix path".to_string(),
                    file_path: None,
                })));
            }
        }

        Ok(())
    }

    pub fn coc_enabled(&self) -> bool {
        self.coc.as_ref().is_some_and(|coc| coc.enable)
    }

    pub fn providers(&self) -> Providers {
        let defaults = Providers::default();
        Providers {
            python3: self.with_python3.unwrap_or(defaults.python3),
            ruby: self.with_ruby.unwrap_or(defaults.ruby),
            node_js: self.with_node_js.unwrap_or(defaults.node_js),
        }
    }

    pub fn renderer(&self) -> NeovimRenderer {
        let renderer =
            NeovimRenderer::new().with_host_programs(self.host_programs.clone().unwrap_or_default());
        match &self.pack_dir {
            Some(pack_dir) => renderer.with_pack_dir(pack_dir.clone()),
            None => renderer,
        }
    }

    /// Build the composer input; `nvim_dir` is where the files will land
    pub fn to_compose_input(&self, nvim_dir: &Path) -> ComposeInput {
        let companion = self.coc.as_ref().filter(|coc| coc.enable).map(|coc| Companion {
            package: Artifact::new(
                coc.package
                    .clone()
                    .unwrap_or_else(|| Self::DEFAULT_COC_PACKAGE.to_string()),
            ),
            plugin_config: coc.plugin_config.clone(),
            settings: coc
                .settings
                .clone()
                .unwrap_or_else(|| serde_json::Value::Object(Default::default())),
        });

        ComposeInput {
            plugins: self.plugins.clone(),
            extra_config: self.extra_config.clone(),
            extra_lua_config: self.extra_lua_config.clone(),
            extra_packages: self.extra_packages.clone(),
            extra_lua_packages: self.extra_lua_packages.clone(),
            lua_version: self
                .lua_version
                .clone()
                .unwrap_or_else(|| Self::DEFAULT_LUA_VERSION.to_string()),
            providers: self.providers(),
            aliases: AliasFlags {
                vi: self.vi_alias,
                vim: self.vim_alias,
                vimdiff: self.vimdiff_alias,
            },
            default_editor: self.default_editor,
            companion,
            nvim_dir: nvim_dir.to_path_buf(),
        }
    }
}

fn check_removed_options<'a>(keys: impl Iterator<Item = &'a str>) -> Result<()> {
    for key in keys {
        if let Some((option, migration)) = REMOVED_OPTIONS.iter().find(|(name, _)| *name == key) {
            return Err(ComposeError::Config(Box::new(ConfigError::RemovedOption {
                option: option.to_string(),
                migration: migration.to_string(),
                file_path: None,
            })));
        }
    }
    Ok(())
}

fn validate_plugin(idx: usize, spec: &PluginSpec) -> Result<()> {
    let artifact = spec.artifact().filter(|artifact| !artifact.as_str().trim().is_empty());
    if artifact.is_none() {
        return Err(ComposeError::Config(Box::new(ConfigError::MissingField {
            field: format!("plugins[{idx}].plugin"),
            file_path: None,
        })));
    }

    if let PluginSpec::Declared(decl) = spec {
        for path in decl.runtime.iter().flat_map(|runtime| runtime.keys()) {
            if let Err(reason) = normalize_runtime_path(path) {
                return Err(ComposeError::Config(Box::new(ConfigError::InvalidValue {
                    message: format!("Runtime path '{path}' is invalid: {reason}"),
                    field: format!("plugins[{idx}].runtime"),
                    value: path.clone(),
                    expected: "relative file path below the config directory".to_string(),
                    file_path: None,
                })));
            }
        }
    }

    Ok(())
}

fn attach_file_path(error: ComposeError, path: &Path) -> ComposeError {
    let mut config_error = match error {
        ComposeError::Config(config_error) => config_error,
        other => return other,
    };

    match config_error.as_mut() {
        ConfigError::InvalidYaml { file_path, .. }
        | ConfigError::InvalidToml { file_path, .. }
        | ConfigError::MissingField { file_path, .. }
        | ConfigError::InvalidValue { file_path, .. }
        | ConfigError::RemovedOption { file_path, .. } => {
            file_path.get_or_insert_with(|| PathBuf::from(path));
        }
        ConfigError::NotFound { .. } => {}
    }

    ComposeError::Config(config_error)
}
