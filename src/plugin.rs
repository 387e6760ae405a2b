// Plugin declarations and their normalized form
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::PathBuf;

use crate::error::{ComposeError, ConfigError, Result};

/// Opaque handle to an installable plugin (package name or store path)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Artifact(pub String);

impl Artifact {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Language a plugin's config snippet is written in
///
/// The tag is only used for grouping; snippets are never interpreted.
/// Equality and order go by the tag's name, so `Other("lua")` is `Lua`.
#[derive(Debug, Clone, Default)]
pub enum ConfigLanguage {
    Lua,
    #[default]
    Vimscript,
    Teal,
    Fennel,
    Other(String),
}

impl ConfigLanguage {
    /// Convert from string representation
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Self {
        match s {
            "lua" => ConfigLanguage::Lua,
            "vimscript" | "viml" | "vim" => ConfigLanguage::Vimscript,
            "teal" => ConfigLanguage::Teal,
            "fennel" => ConfigLanguage::Fennel,
            other => ConfigLanguage::Other(other.to_string()),
        }
    }

    /// Convert to string representation
    pub fn as_str(&self) -> &str {
        match self {
            ConfigLanguage::Lua => "lua",
            ConfigLanguage::Vimscript => "vimscript",
            ConfigLanguage::Teal => "teal",
            ConfigLanguage::Fennel => "fennel",
            ConfigLanguage::Other(ext) => ext,
        }
    }

    pub fn is_vimscript(&self) -> bool {
        self.as_str() == "vimscript"
    }
}

impl PartialEq for ConfigLanguage {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for ConfigLanguage {}

impl Hash for ConfigLanguage {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_str().hash(state);
    }
}

impl PartialOrd for ConfigLanguage {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ConfigLanguage {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_str().cmp(other.as_str())
    }
}

impl fmt::Display for ConfigLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ConfigLanguage {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ConfigLanguage {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(ConfigLanguage::from_str(&raw))
    }
}

/// Where the content of a runtime file comes from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileSource {
    /// Inline file content
    Text(String),
    /// Copy from an existing file or directory
    Source(PathBuf),
}

impl FileSource {
    pub fn text(content: impl Into<String>) -> Self {
        FileSource::Text(content.into())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FileSource::Text(text) => Some(text),
            FileSource::Source(_) => None,
        }
    }
}

/// Fully specified plugin declaration; every field except `plugin` is optional
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PluginDecl {
    #[serde(default)]
    pub plugin: Option<Artifact>,
    #[serde(default)]
    pub config: Option<String>,
    #[serde(default, rename = "type")]
    pub language: Option<ConfigLanguage>,
    #[serde(default)]
    pub optional: Option<bool>,
    #[serde(default)]
    pub runtime: Option<BTreeMap<String, FileSource>>,
}

/// A plugin list entry, either a bare artifact or a full declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PluginSpec {
    Bare(Artifact),
    Declared(PluginDecl),
}

impl PluginSpec {
    pub fn bare(artifact: impl Into<String>) -> Self {
        PluginSpec::Bare(Artifact::new(artifact))
    }

    /// Artifact handle, if one was supplied
    pub fn artifact(&self) -> Option<&Artifact> {
        match self {
            PluginSpec::Bare(artifact) => Some(artifact),
            PluginSpec::Declared(decl) => decl.plugin.as_ref(),
        }
    }

    /// Apply defaults field by field; declared values always win.
    ///
    /// Returns `None` when no artifact is present. The config layer rejects
    /// such entries before they get here.
    pub fn normalize(&self) -> Option<NormalizedPlugin> {
        match self {
            PluginSpec::Bare(artifact) => Some(NormalizedPlugin::with_defaults(artifact.clone())),
            PluginSpec::Declared(decl) => {
                let defaults = NormalizedPlugin::with_defaults(decl.plugin.clone()?);
                Some(NormalizedPlugin {
                    config: decl.config.clone().or(defaults.config),
                    language: decl.language.clone().unwrap_or(defaults.language),
                    optional: decl.optional.unwrap_or(defaults.optional),
                    runtime: decl.runtime.clone().unwrap_or(defaults.runtime),
                    artifact: defaults.artifact,
                })
            }
        }
    }
}

impl From<PluginDecl> for PluginSpec {
    fn from(decl: PluginDecl) -> Self {
        PluginSpec::Declared(decl)
    }
}

/// Plugin record with every field populated
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedPlugin {
    pub artifact: Artifact,
    pub config: Option<String>,
    #[serde(rename = "type")]
    pub language: ConfigLanguage,
    pub optional: bool,
    pub runtime: BTreeMap<String, FileSource>,
}

impl NormalizedPlugin {
    pub fn with_defaults(artifact: Artifact) -> Self {
        Self {
            artifact,
            config: None,
            language: ConfigLanguage::Vimscript,
            optional: false,
            runtime: BTreeMap::new(),
        }
    }

    /// Copy of this plugin with config dropped unless it is vimscript
    pub fn without_foreign_config(&self) -> Self {
        if self.language.is_vimscript() {
            return self.clone();
        }
        Self {
            config: None,
            ..self.clone()
        }
    }
}

/// Normalize the declared plugins, appending the companion entry if given.
///
/// Order is preserved and nothing is dropped: an entry without an artifact
/// fails the whole list.
pub fn normalize_plugins(
    specs: &[PluginSpec],
    companion: Option<PluginSpec>,
) -> Result<Vec<NormalizedPlugin>> {
    specs
        .iter()
        .chain(companion.as_ref())
        .enumerate()
        .map(|(idx, spec)| {
            spec.normalize().ok_or_else(|| {
                ComposeError::from(ConfigError::MissingField {
                    field: format!("plugins[{idx}].plugin"),
                    file_path: None,
                })
            })
        })
        .collect()
}

/// Plugin list as seen by the legacy renderer: only vimscript keeps config
pub fn suppress_non_vimscript_config(plugins: &[NormalizedPlugin]) -> Vec<NormalizedPlugin> {
    plugins
        .iter()
        .map(NormalizedPlugin::without_foreign_config)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_artifact_gets_defaults() {
        let plugin = PluginSpec::bare("vim-nix").normalize().unwrap();
        assert_eq!(plugin.artifact.as_str(), "vim-nix");
        assert_eq!(plugin.config, None);
        assert_eq!(plugin.language, ConfigLanguage::Vimscript);
        assert!(!plugin.optional);
        assert!(plugin.runtime.is_empty());
    }

    #[test]
    fn test_declared_values_override_defaults() {
        let spec = PluginSpec::from(PluginDecl {
            plugin: Some(Artifact::new("nvim-cmp")),
            config: Some("require('cmp').setup{}".to_string()),
            language: Some(ConfigLanguage::Lua),
            optional: Some(true),
            runtime: None,
        });
        let plugin = spec.normalize().unwrap();
        assert_eq!(plugin.language, ConfigLanguage::Lua);
        assert!(plugin.optional);
        assert_eq!(plugin.config.as_deref(), Some("require('cmp').setup{}"));
        assert!(plugin.runtime.is_empty());
    }

    #[test]
    fn test_declared_without_artifact_is_none() {
        let spec = PluginSpec::from(PluginDecl {
            config: Some("set nu".to_string()),
            ..PluginDecl::default()
        });
        assert!(spec.normalize().is_none());
    }

    #[test]
    fn test_language_aliases() {
        assert_eq!(ConfigLanguage::from_str("viml"), ConfigLanguage::Vimscript);
        assert_eq!(ConfigLanguage::from_str("vim"), ConfigLanguage::Vimscript);
        assert_eq!(
            ConfigLanguage::from_str("moon"),
            ConfigLanguage::Other("moon".to_string())
        );
        assert_eq!(ConfigLanguage::Other("moon".to_string()).as_str(), "moon");
    }

    #[test]
    fn test_companion_is_appended_last() {
        let specs = vec![PluginSpec::bare("a"), PluginSpec::bare("b")];
        let plugins = normalize_plugins(&specs, Some(PluginSpec::bare("coc-nvim"))).unwrap();
        let names: Vec<&str> = plugins.iter().map(|p| p.artifact.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "coc-nvim"]);
    }

    #[test]
    fn test_entry_without_artifact_fails_the_list() {
        let specs = vec![
            PluginSpec::bare("a"),
            PluginSpec::from(PluginDecl {
                config: Some("set nu".to_string()),
                ..PluginDecl::default()
            }),
        ];
        let err = normalize_plugins(&specs, None).unwrap_err();
        assert!(err.to_string().contains("plugins[1].plugin"));
    }

    #[test]
    fn test_languages_order_by_name() {
        let mut languages = vec![
            ConfigLanguage::Vimscript,
            ConfigLanguage::Other("moon".to_string()),
            ConfigLanguage::Lua,
            ConfigLanguage::Fennel,
            ConfigLanguage::Teal,
        ];
        languages.sort();
        let names: Vec<&str> = languages.iter().map(ConfigLanguage::as_str).collect();
        assert_eq!(names, vec!["fennel", "lua", "moon", "teal", "vimscript"]);

        assert_eq!(ConfigLanguage::Other("lua".to_string()), ConfigLanguage::Lua);
    }

    #[test]
    fn test_without_foreign_config() {
        let mut lua = NormalizedPlugin::with_defaults(Artifact::new("x"));
        lua.language = ConfigLanguage::Lua;
        lua.config = Some("vim.g.x = 1".to_string());
        assert_eq!(lua.without_foreign_config().config, None);

        let mut viml = NormalizedPlugin::with_defaults(Artifact::new("y"));
        viml.config = Some("let g:y = 1".to_string());
        assert_eq!(
            viml.without_foreign_config().config.as_deref(),
            Some("let g:y = 1")
        );
    }
}
