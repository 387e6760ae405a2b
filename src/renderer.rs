// Build-tool configuration step: renders the vimscript init document,
// base wrapper arguments and the pack layout from a normalized plugin list.
use serde::{Deserialize, Serialize};

use crate::error::{RenderError, Result};
use crate::plugin::{Artifact, NormalizedPlugin};

/// Remote plugin host providers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Providers {
    pub python3: bool,
    pub ruby: bool,
    pub node_js: bool,
}

impl Default for Providers {
    fn default() -> Self {
        Self {
            python3: true,
            ruby: true,
            node_js: false,
        }
    }
}

/// Host program for each provider, used when the provider is enabled
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostPrograms {
    pub python3: String,
    pub ruby: String,
    pub node: String,
}

impl Default for HostPrograms {
    fn default() -> Self {
        Self {
            python3: "python3".to_string(),
            ruby: "neovim-ruby-host".to_string(),
            node: "neovim-node-host".to_string(),
        }
    }
}

/// Everything a renderer gets to see
#[derive(Debug, Clone, Copy)]
pub struct RenderRequest<'a> {
    /// Plugins with non-vimscript config already suppressed
    pub plugins: &'a [NormalizedPlugin],
    /// Free-form vimscript appended after plugin configs
    pub custom_rc: &'a str,
    pub providers: &'a Providers,
}

/// Start/opt split of the plugin artifacts
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PackLayout {
    pub start: Vec<Artifact>,
    pub opt: Vec<Artifact>,
}

impl PackLayout {
    pub fn len(&self) -> usize {
        self.start.len() + self.opt.len()
    }

    pub fn is_empty(&self) -> bool {
        self.start.is_empty() && self.opt.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedConfig {
    /// The legacy (vimscript) init document, possibly empty
    pub rc_content: String,
    /// Unescaped base arguments for the wrapper tool
    pub wrapper_args: Vec<String>,
    pub pack: PackLayout,
}

/// Seam for the external build tool's configuration step
pub trait ConfigRenderer {
    fn name(&self) -> &str;

    fn render(&self, request: &RenderRequest<'_>) -> Result<RenderedConfig>;
}

/// Default renderer producing a Neovim wrapper configuration
#[derive(Debug, Clone, Default)]
pub struct NeovimRenderer {
    pub host_programs: HostPrograms,
    /// Directory prepended to packpath and runtimepath, if any
    pub pack_dir: Option<String>,
}

impl NeovimRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_host_programs(mut self, host_programs: HostPrograms) -> Self {
        self.host_programs = host_programs;
        self
    }

    pub fn with_pack_dir(mut self, pack_dir: impl Into<String>) -> Self {
        self.pack_dir = Some(pack_dir.into());
        self
    }

    fn rc_content(request: &RenderRequest<'_>) -> String {
        request
            .plugins
            .iter()
            .filter_map(|plugin| plugin.config.as_deref())
            .chain(Some(request.custom_rc).filter(|rc| !rc.is_empty()))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn provider_args(&self, providers: &Providers) -> Vec<String> {
        let table = [
            ("python3", providers.python3, &self.host_programs.python3),
            ("ruby", providers.ruby, &self.host_programs.ruby),
            ("node", providers.node_js, &self.host_programs.node),
        ];

        table
            .into_iter()
            .flat_map(|(name, enabled, program)| {
                let command = if enabled {
                    format!("let g:{name}_host_prog='{program}'")
                } else {
                    format!("let g:loaded_{name}_provider=0")
                };
                ["--add-flags".to_string(), format!("--cmd \"{command}\"")]
            })
            .collect()
    }

    fn pack_layout(&self, plugins: &[NormalizedPlugin]) -> Result<PackLayout> {
        let mut layout = PackLayout::default();

        for plugin in plugins {
            let (this, other) = if plugin.optional {
                (&mut layout.opt, &layout.start)
            } else {
                (&mut layout.start, &layout.opt)
            };

            if other.contains(&plugin.artifact) {
                return Err(Box::new(RenderError::PluginRejected {
                    renderer: self.name().to_string(),
                    artifact: plugin.artifact.to_string(),
                    message: "declared both as optional and as auto-loaded".to_string(),
                })
                .into());
            }

            if !this.contains(&plugin.artifact) {
                this.push(plugin.artifact.clone());
            }
        }

        Ok(layout)
    }
}

impl ConfigRenderer for NeovimRenderer {
    fn name(&self) -> &str {
        "neovim"
    }

    fn render(&self, request: &RenderRequest<'_>) -> Result<RenderedConfig> {
        let pack = self.pack_layout(request.plugins)?;

        let mut wrapper_args = vec!["--inherit-argv0".to_string()];
        wrapper_args.extend(self.provider_args(request.providers));
        if let Some(pack_dir) = &self.pack_dir {
            wrapper_args.push("--add-flags".to_string());
            wrapper_args.push(format!(
                "--cmd \"set packpath^={pack_dir} | set rtp^={pack_dir}\""
            ));
        }

        let rc_content = Self::rc_content(request);
        tracing::debug!(
            renderer = self.name(),
            plugins = request.plugins.len(),
            rc_bytes = rc_content.len(),
            "Rendered legacy init document"
        );

        Ok(RenderedConfig {
            rc_content,
            wrapper_args,
            pack,
        })
    }
}
