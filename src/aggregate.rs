// Per-language config aggregation and legacy document rendering
use serde::Serialize;
use std::collections::BTreeMap;

use crate::error::Result;
use crate::plugin::{suppress_non_vimscript_config, ConfigLanguage, NormalizedPlugin};
use crate::renderer::{ConfigRenderer, Providers, RenderRequest, RenderedConfig};

/// Concatenated config text per language, keyed in a stable order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct GeneratedConfigs(BTreeMap<ConfigLanguage, String>);

impl GeneratedConfigs {
    pub fn get(&self, language: &ConfigLanguage) -> Option<&str> {
        self.0.get(language).map(String::as_str)
    }

    /// Lookup by tag name, accepting the same aliases as the config file
    pub fn get_by_name(&self, language: &str) -> Option<&str> {
        self.get(&ConfigLanguage::from_str(language))
    }

    pub fn contains(&self, language: &ConfigLanguage) -> bool {
        self.0.contains_key(language)
    }

    pub fn languages(&self) -> impl Iterator<Item = &ConfigLanguage> {
        self.0.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ConfigLanguage, &str)> {
        self.0.iter().map(|(lang, text)| (lang, text.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Group plugin configs by language.
///
/// Within a language, non-null configs keep input order and are joined with a
/// single newline. A language whose plugins all lack config still gets a key
/// with an empty string.
pub fn group_configs(plugins: &[NormalizedPlugin]) -> GeneratedConfigs {
    let grouped = plugins.iter().fold(
        BTreeMap::<ConfigLanguage, Vec<&str>>::new(),
        |mut acc, plugin| {
            let texts = acc.entry(plugin.language.clone()).or_default();
            if let Some(config) = plugin.config.as_deref() {
                texts.push(config);
            }
            acc
        },
    );

    GeneratedConfigs(
        grouped
            .into_iter()
            .map(|(language, texts)| (language, texts.join("\n")))
            .collect(),
    )
}

/// Render the legacy vimscript document through the build tool's renderer.
///
/// Non-vimscript config is suppressed first, so lua/teal/fennel snippets never
/// leak into the vimscript document even though their plugins are still
/// passed along for packaging.
pub fn legacy_document(
    plugins: &[NormalizedPlugin],
    custom_rc: &str,
    providers: &Providers,
    renderer: &dyn ConfigRenderer,
) -> Result<RenderedConfig> {
    let suppressed = suppress_non_vimscript_config(plugins);
    renderer.render(&RenderRequest {
        plugins: &suppressed,
        custom_rc,
        providers,
    })
}
