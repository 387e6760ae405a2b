// Logging setup for nvim-compose
use std::io::{self, IsTerminal};
use tracing::Level;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::{fmt, EnvFilter};

use crate::error::Result;

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: Level,
    /// Output format (pretty for terminals, json for programmatic use)
    pub format: LogFormat,
    /// Color output configuration
    pub color: ColorConfig,
    /// Whether to show targets (module names)
    pub show_targets: bool,
}

/// Log output format options
#[derive(Debug, Clone, PartialEq)]
pub enum LogFormat {
    Pretty,
    Json,
    Compact,
}

/// Color output configuration
#[derive(Debug, Clone, PartialEq)]
pub enum ColorConfig {
    /// Automatically detect if colors should be used
    Auto,
    Always,
    Never,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::WARN,
            format: LogFormat::Pretty,
            color: ColorConfig::Auto,
            show_targets: false,
        }
    }
}

impl LogConfig {
    /// Create logging configuration from CLI arguments
    pub fn from_cli(verbose: bool, quiet: bool, color: Option<String>) -> Self {
        let level = if quiet {
            Level::ERROR
        } else if verbose {
            Level::DEBUG
        } else {
            Level::WARN
        };

        let color_config = match color.as_deref() {
            Some("always") => ColorConfig::Always,
            Some("never") => ColorConfig::Never,
            _ => ColorConfig::Auto,
        };

        let format = match std::env::var("NVIM_COMPOSE_LOG_FORMAT").as_deref() {
            Ok("json") => LogFormat::Json,
            Ok("compact") => LogFormat::Compact,
            _ => LogFormat::Pretty,
        };

        Self {
            level,
            format,
            color: color_config,
            show_targets: verbose,
        }
    }

    /// Check if colors should be used based on configuration and terminal
    pub fn should_use_colors(&self) -> bool {
        match self.color {
            ColorConfig::Always => true,
            ColorConfig::Never => false,
            ColorConfig::Auto => {
                io::stderr().is_terminal()
                    && std::env::var("TERM").map_or(true, |term| term != "dumb")
                    && std::env::var("NO_COLOR").is_err()
            }
        }
    }
}

/// Initialize the logging system with the given configuration.
///
/// `RUST_LOG` directives, when set, are layered on top of the level.
pub fn init_logging(config: LogConfig) -> Result<()> {
    let mut env_filter = EnvFilter::new(format!("nvim_compose={}", config.level));
    if let Ok(directives) = std::env::var("RUST_LOG") {
        for directive in directives.split(',').filter_map(|d| d.parse::<Directive>().ok()) {
            env_filter = env_filter.add_directive(directive);
        }
    }

    let ansi = config.should_use_colors();

    // try_init: a second initialization (e.g. in tests) is not an error
    let _ = match config.format {
        LogFormat::Pretty => fmt()
            .with_env_filter(env_filter)
            .with_writer(io::stderr)
            .with_ansi(ansi)
            .with_target(config.show_targets)
            .try_init(),
        LogFormat::Json => fmt()
            .with_env_filter(env_filter)
            .with_writer(io::stderr)
            .json()
            .try_init(),
        LogFormat::Compact => fmt()
            .with_env_filter(env_filter)
            .with_writer(io::stderr)
            .with_ansi(ansi)
            .compact()
            .with_target(config.show_targets)
            .try_init(),
    };

    Ok(())
}

/// Logging utilities for common operations
pub mod utils {
    use std::path::Path;
    use tracing::{span, Level, Span};

    /// Span covering one composition pass
    pub fn compose_span(plugin_count: usize) -> Span {
        span!(Level::DEBUG, "compose", plugin_count = plugin_count)
    }

    /// Span for configuration loading
    pub fn config_loading_span(config_path: &Path) -> Span {
        span!(Level::DEBUG, "config_loading", path = %config_path.display())
    }

    /// Span for writing the file tree
    pub fn write_span(root: &Path, file_count: usize) -> Span {
        span!(Level::INFO, "write_files", root = %root.display(), file_count = file_count)
    }
}
