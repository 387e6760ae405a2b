// nvim-compose - Library module
// Turns Neovim plugin declarations into config files and wrapper arguments

pub mod aggregate;
pub mod cli;
pub mod commands;
pub mod compose;
pub mod config;
pub mod error;
pub mod file_tree;
pub mod logging;
pub mod plugin;
pub mod renderer;
pub mod wrapper;
pub mod writer;

// Re-export main types for easier access
pub use aggregate::{group_configs, legacy_document, GeneratedConfigs};
pub use compose::{
    compose, AliasFlags, AliasShell, Companion, ComposeInput, Composition, COMPANION_SETTINGS,
    LEGACY_ENTRY_POINT, MODERN_ENTRY_POINT,
};
pub use config::{CocConfig, Config};
pub use error::{
    exit_codes, CliError, ComposeError, ConfigError, FileTreeError, RenderError, Result,
};
pub use file_tree::{FileEntry, GlobalFileTree, Owner};
pub use logging::{ColorConfig, LogConfig, LogFormat};
pub use plugin::{
    normalize_plugins, suppress_non_vimscript_config, Artifact, ConfigLanguage, FileSource,
    NormalizedPlugin, PluginDecl, PluginSpec,
};
pub use renderer::{
    ConfigRenderer, HostPrograms, NeovimRenderer, PackLayout, Providers, RenderRequest,
    RenderedConfig,
};
pub use wrapper::{build_wrapper_args, WrapperArgs, WrapperInputs};
pub use writer::{FileWriter, PlannedWrite, WriteAction, WriteSummary};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

// Build information (set by build script)
pub const BUILD_DATE: &str = env!("BUILD_DATE");
pub const GIT_COMMIT: &str = env!("GIT_COMMIT");
pub const GIT_BRANCH: &str = env!("GIT_BRANCH");
pub const RUST_VERSION: &str = env!("RUST_VERSION");

/// Get formatted version string with build information
pub fn version_info() -> String {
    format!(
        "{NAME} {VERSION} (commit: {GIT_COMMIT}, branch: {GIT_BRANCH}, built: {BUILD_DATE}, rustc: {RUST_VERSION})"
    )
}
