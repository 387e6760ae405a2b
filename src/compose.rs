// Top-level composition: plugin list in, generated documents + file tree +
// wrapper arguments out.
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::aggregate::{group_configs, legacy_document, GeneratedConfigs};
use crate::error::Result;
use crate::file_tree::GlobalFileTree;
use crate::plugin::{
    normalize_plugins, Artifact, ConfigLanguage, FileSource, NormalizedPlugin, PluginDecl,
    PluginSpec,
};
use crate::renderer::{ConfigRenderer, PackLayout, Providers};
use crate::wrapper::{build_wrapper_args, WrapperArgs, WrapperInputs};

/// Generated vimscript entry point
pub const LEGACY_ENTRY_POINT: &str = "init.vim";
/// Generated lua entry point
pub const MODERN_ENTRY_POINT: &str = "init.lua";
/// Companion plugin settings file
pub const COMPANION_SETTINGS: &str = "coc-settings.json";

/// Completion companion plugin, synthesized as a regular plugin when enabled
#[derive(Debug, Clone, PartialEq)]
pub struct Companion {
    pub package: Artifact,
    /// Vimscript config for the companion plugin
    pub plugin_config: Option<String>,
    /// Serialized verbatim into the settings file
    pub settings: serde_json::Value,
}

impl Companion {
    fn as_plugin(&self) -> PluginSpec {
        PluginSpec::Declared(PluginDecl {
            plugin: Some(self.package.clone()),
            config: self.plugin_config.clone().filter(|c| !c.is_empty()),
            language: Some(ConfigLanguage::Vimscript),
            optional: Some(false),
            runtime: None,
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AliasFlags {
    pub vi: bool,
    pub vim: bool,
    pub vimdiff: bool,
}

impl AliasFlags {
    pub fn any(&self) -> bool {
        self.vi || self.vim || self.vimdiff
    }

    fn bindings(&self) -> BTreeMap<String, String> {
        [
            (self.vi, "vi", "nvim"),
            (self.vim, "vim", "nvim"),
            (self.vimdiff, "vimdiff", "nvim -d"),
        ]
        .into_iter()
        .filter(|(enabled, _, _)| *enabled)
        .map(|(_, alias, command)| (alias.to_string(), command.to_string()))
        .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AliasShell {
    Bash,
    Zsh,
    Fish,
}

impl AliasShell {
    pub fn all() -> [AliasShell; 3] {
        [AliasShell::Bash, AliasShell::Zsh, AliasShell::Fish]
    }
}

/// Everything the composer reads; built by the config layer
#[derive(Debug, Clone, Default)]
pub struct ComposeInput {
    pub plugins: Vec<PluginSpec>,
    pub extra_config: String,
    pub extra_lua_config: String,
    pub extra_packages: Vec<String>,
    pub extra_lua_packages: Vec<String>,
    pub lua_version: String,
    pub providers: Providers,
    pub aliases: AliasFlags,
    pub default_editor: bool,
    pub companion: Option<Companion>,
    /// Absolute nvim config directory, used by the init.lua loader line
    pub nvim_dir: PathBuf,
}

/// Result of one composition pass
#[derive(Debug, Clone, PartialEq)]
pub struct Composition {
    pub plugins: Vec<NormalizedPlugin>,
    pub generated_config_viml: String,
    pub generated_configs: GeneratedConfigs,
    pub files: GlobalFileTree,
    pub wrapper_args: WrapperArgs,
    pub pack: PackLayout,
    pub shell_aliases: BTreeMap<AliasShell, BTreeMap<String, String>>,
    pub session_variables: BTreeMap<String, String>,
}

impl Composition {
    /// Text of a generated entry point, if it was emitted
    pub fn entry_point(&self, path: &str) -> Option<&str> {
        self.files.get(path).and_then(|entry| entry.source.as_text())
    }
}

/// Line at the head of init.lua that pulls in the vimscript document
pub fn loader_line(input: &ComposeInput) -> String {
    format!(
        "vim.cmd [[source {}]]",
        input.nvim_dir.join(LEGACY_ENTRY_POINT).display()
    )
}

/// Run the full pipeline. Any failure aborts with no partial result.
pub fn compose(input: &ComposeInput, renderer: &dyn ConfigRenderer) -> Result<Composition> {
    let span = crate::logging::utils::compose_span(input.plugins.len());
    let _enter = span.enter();

    let plugins = normalize_plugins(
        &input.plugins,
        input.companion.as_ref().map(Companion::as_plugin),
    )?;
    let generated_configs = group_configs(&plugins);

    let providers = Providers {
        node_js: input.providers.node_js || input.companion.is_some(),
        ..input.providers.clone()
    };
    let rendered = legacy_document(&plugins, &input.extra_config, &providers, renderer)?;

    let mut files = GlobalFileTree::merge_plugins(&plugins)?;

    let legacy = rendered.rc_content;
    if !legacy.is_empty() {
        files.layer_generated(LEGACY_ENTRY_POINT, FileSource::text(legacy.clone()))?;
    }

    let modern = [
        Some(loader_line(input)).filter(|_| !legacy.is_empty()),
        Some(input.extra_lua_config.clone()).filter(|text| !text.is_empty()),
        generated_configs
            .get(&ConfigLanguage::Lua)
            .filter(|text| !text.is_empty())
            .map(str::to_string),
    ]
    .into_iter()
    .flatten()
    .collect::<Vec<_>>()
    .join("\n");

    if modern.is_empty() {
        tracing::debug!("No lua content, omitting {MODERN_ENTRY_POINT}");
    } else {
        files.layer_generated(MODERN_ENTRY_POINT, FileSource::Text(modern))?;
    }

    if let Some(companion) = &input.companion {
        let settings = serde_json::to_string_pretty(&companion.settings)?;
        files.layer_generated(COMPANION_SETTINGS, FileSource::Text(settings))?;
    }

    let wrapper_args = build_wrapper_args(
        &rendered.wrapper_args,
        &WrapperInputs {
            extra_packages: &input.extra_packages,
            lua_packages: &input.extra_lua_packages,
            lua_version: &input.lua_version,
        },
    );

    let shell_aliases = if input.aliases.any() {
        let bindings = input.aliases.bindings();
        AliasShell::all()
            .into_iter()
            .map(|shell| (shell, bindings.clone()))
            .collect()
    } else {
        BTreeMap::new()
    };

    let mut session_variables = BTreeMap::new();
    if input.default_editor {
        session_variables.insert("EDITOR".to_string(), "nvim".to_string());
    }

    tracing::info!(
        plugins = plugins.len(),
        languages = generated_configs.len(),
        files = files.len(),
        "Composition finished"
    );

    Ok(Composition {
        plugins,
        generated_config_viml: legacy,
        generated_configs,
        files,
        wrapper_args,
        pack: rendered.pack,
        shell_aliases,
        session_variables,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::NeovimRenderer;

    fn input_with(plugins: Vec<PluginSpec>) -> ComposeInput {
        ComposeInput {
            plugins,
            lua_version: "5.1".to_string(),
            nvim_dir: PathBuf::from("/home/u/.config/nvim"),
            ..ComposeInput::default()
        }
    }

    #[test]
    fn test_empty_input_emits_no_entry_points() {
        let composition = compose(&input_with(vec![]), &NeovimRenderer::new()).unwrap();
        assert!(composition.generated_config_viml.is_empty());
        assert!(composition.files.is_empty());
        assert!(composition.shell_aliases.is_empty());
    }

    #[test]
    fn test_legacy_only_emits_loader() {
        let mut input = input_with(vec![]);
        input.extra_config = "set nu".to_string();
        let composition = compose(&input, &NeovimRenderer::new()).unwrap();
        assert_eq!(composition.entry_point(LEGACY_ENTRY_POINT), Some("set nu"));
        assert_eq!(
            composition.entry_point(MODERN_ENTRY_POINT),
            Some("vim.cmd [[source /home/u/.config/nvim/init.vim]]")
        );
    }

    #[test]
    fn test_extra_lua_config_precedes_plugin_lua() {
        let mut input = input_with(vec![PluginSpec::Declared(PluginDecl {
            plugin: Some(Artifact::new("p")),
            config: Some("b()".to_string()),
            language: Some(ConfigLanguage::Lua),
            ..PluginDecl::default()
        })]);
        input.extra_lua_config = "a()".to_string();
        let composition = compose(&input, &NeovimRenderer::new()).unwrap();
        assert_eq!(composition.entry_point(MODERN_ENTRY_POINT), Some("a()\nb()"));
        assert!(!composition.files.contains(LEGACY_ENTRY_POINT));
    }

    #[test]
    fn test_aliases_for_every_shell() {
        let mut input = input_with(vec![]);
        input.aliases.vimdiff = true;
        let composition = compose(&input, &NeovimRenderer::new()).unwrap();
        assert_eq!(composition.shell_aliases.len(), 3);
        for bindings in composition.shell_aliases.values() {
            assert_eq!(bindings.get("vimdiff").map(String::as_str), Some("nvim -d"));
            assert!(!bindings.contains_key("vim"));
        }
    }

    #[test]
    fn test_default_editor_variable() {
        let mut input = input_with(vec![]);
        input.default_editor = true;
        let composition = compose(&input, &NeovimRenderer::new()).unwrap();
        assert_eq!(
            composition.session_variables.get("EDITOR").map(String::as_str),
            Some("nvim")
        );
    }
}
