// Error handling framework for nvim-compose
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ComposeError>;

/// Main error type for nvim-compose
///
/// Any variant aborts the whole generation pass; no partial file tree or
/// wrapper string is ever handed to the writer.
#[derive(Debug, Error)]
pub enum ComposeError {
    #[error("Configuration error: {0}")]
    Config(#[from] Box<ConfigError>),

    #[error("Runtime file conflict: {0}")]
    FileTree(#[from] Box<FileTreeError>),

    #[error("Rendering failed: {0}")]
    Render(#[from] Box<RenderError>),

    #[error("CLI argument error: {0}")]
    Cli(#[from] Box<CliError>),

    #[error("IO operation failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Settings serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-related errors with detailed context
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid YAML syntax: {message}")]
    InvalidYaml {
        message: String,
        line: Option<u32>,
        column: Option<u32>,
        file_path: Option<PathBuf>,
    },

    #[error("Invalid TOML syntax: {message}")]
    InvalidToml {
        message: String,
        file_path: Option<PathBuf>,
    },

    #[error("Missing required field: {field}")]
    MissingField {
        field: String,
        file_path: Option<PathBuf>,
    },

    #[error("Configuration file not found: {path}")]
    NotFound {
        path: PathBuf,
        suggestion: Option<String>,
    },

    #[error("Invalid configuration value: {message}")]
    InvalidValue {
        message: String,
        field: String,
        value: String,
        expected: String,
        file_path: Option<PathBuf>,
    },

    #[error("Option '{option}' has been removed")]
    RemovedOption {
        option: String,
        migration: String,
        file_path: Option<PathBuf>,
    },
}

/// Runtime file tree merge errors
#[derive(Debug, Error)]
pub enum FileTreeError {
    #[error("'{path}' is declared by both {first} and {second} with different contents")]
    PathCollision {
        path: String,
        first: String,
        second: String,
    },

    #[error("Runtime path '{path}' from {owner} is invalid: {reason}")]
    InvalidPath {
        path: String,
        owner: String,
        reason: String,
    },
}

/// Errors raised by a config renderer implementation
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Renderer '{renderer}' rejected plugin {artifact}: {message}")]
    PluginRejected {
        renderer: String,
        artifact: String,
        message: String,
    },
}

/// CLI argument and command-line interface errors
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Invalid argument: {argument}")]
    InvalidArgument {
        argument: String,
        message: String,
        suggestion: Option<String>,
    },

    #[error("Conflicting arguments: {first} and {second}")]
    ConflictingArguments {
        first: String,
        second: String,
        suggestion: String,
    },

    #[error("Cannot determine output directory")]
    NoOutputDirectory { suggestion: String },
}

/// Format errors with colors and context
pub struct ErrorFormatter {
    use_colors: bool,
}

impl ErrorFormatter {
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    /// Format an error with context and colors
    pub fn format_error(&self, error: &ComposeError) -> String {
        use tracing::error;

        match error {
            ComposeError::Config(_) => {
                error!(error_type = "config", error = %error, "Configuration error occurred");
            }
            ComposeError::FileTree(_) => {
                error!(error_type = "file_tree", error = %error, "Runtime file merge failed");
            }
            ComposeError::Render(_) => {
                error!(error_type = "render", error = %error, "Config rendering failed");
            }
            ComposeError::Cli(_) => {
                error!(error_type = "cli", error = %error, "CLI error occurred");
            }
            ComposeError::Io(_) => {
                error!(error_type = "io", error = %error, "IO operation failed");
            }
            ComposeError::Json(_) => {
                error!(error_type = "json", error = %error, "Settings serialization failed");
            }
        }

        let mut output = String::new();

        if self.use_colors {
            output.push_str("\x1b[31m"); // Red color
        }
        output.push_str("Error: ");

        if self.use_colors {
            output.push_str("\x1b[0m"); // Reset color
        }

        output.push_str(&error.to_string());

        match error {
            ComposeError::Config(config_err) => {
                self.add_config_context(&mut output, config_err.as_ref());
            }
            ComposeError::FileTree(tree_err) => {
                self.add_file_tree_context(&mut output, tree_err.as_ref());
            }
            ComposeError::Cli(cli_err) => {
                self.add_cli_context(&mut output, cli_err.as_ref());
            }
            _ => {}
        }

        output
    }

    fn add_config_context(&self, output: &mut String, error: &ConfigError) {
        match error {
            ConfigError::InvalidYaml {
                file_path: Some(path),
                line: Some(line),
                ..
            } => {
                output.push_str(&format!("\n  --> {}:{}", path.display(), line));
            }
            ConfigError::NotFound {
                suggestion: Some(suggestion),
                ..
            } => {
                output.push_str(&format!("\n  Help: {suggestion}"));
            }
            ConfigError::InvalidValue {
                field, expected, ..
            } => {
                output.push_str(&format!("\n  Field: {field}"));
                output.push_str(&format!("\n  Expected: {expected}"));
            }
            ConfigError::RemovedOption { migration, .. } => {
                output.push_str(&format!("\n  Help: {migration}"));
            }
            _ => {}
        }
    }

    fn add_file_tree_context(&self, output: &mut String, error: &FileTreeError) {
        match error {
            FileTreeError::PathCollision { path, second, .. } => {
                output.push_str(&format!(
                    "\n  Help: rename '{path}' in one plugin's runtime files or drop it from {second}"
                ));
            }
            FileTreeError::InvalidPath { .. } => {
                output.push_str("\n  Help: use a relative path below the nvim config directory");
            }
        }
    }

    fn add_cli_context(&self, output: &mut String, error: &CliError) {
        match error {
            CliError::InvalidArgument {
                suggestion: Some(suggestion),
                ..
            } => {
                output.push_str(&format!("\n  Help: {suggestion}"));
            }
            CliError::ConflictingArguments { suggestion, .. } => {
                output.push_str(&format!("\n  Help: {suggestion}"));
            }
            CliError::NoOutputDirectory { suggestion } => {
                output.push_str(&format!("\n  Help: {suggestion}"));
            }
            _ => {}
        }
    }
}

/// Process exit codes
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL_ERROR: i32 = 1;
    pub const CONFIG_ERROR: i32 = 2;
    pub const COLLISION_ERROR: i32 = 3;
    pub const RENDER_ERROR: i32 = 4;
    pub const CLI_ERROR: i32 = 7;
}

impl ComposeError {
    /// Get the appropriate exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            ComposeError::Config(_) => exit_codes::CONFIG_ERROR,
            ComposeError::FileTree(_) => exit_codes::COLLISION_ERROR,
            ComposeError::Render(_) => exit_codes::RENDER_ERROR,
            ComposeError::Cli(_) => exit_codes::CLI_ERROR,
            ComposeError::Io(_) | ComposeError::Json(_) => exit_codes::GENERAL_ERROR,
        }
    }

    /// Create a user-friendly error message with context
    pub fn user_message(&self, use_colors: bool) -> String {
        let formatter = ErrorFormatter::new(use_colors);
        formatter.format_error(self)
    }
}

impl From<ConfigError> for ComposeError {
    fn from(error: ConfigError) -> Self {
        ComposeError::Config(Box::new(error))
    }
}

impl From<FileTreeError> for ComposeError {
    fn from(error: FileTreeError) -> Self {
        ComposeError::FileTree(Box::new(error))
    }
}

impl From<CliError> for ComposeError {
    fn from(error: CliError) -> Self {
        ComposeError::Cli(Box::new(error))
    }
}

// Conversion from serde_yaml::Error to ConfigError
impl From<serde_yaml::Error> for Box<ConfigError> {
    fn from(error: serde_yaml::Error) -> Self {
        let location = error.location();
        Box::new(ConfigError::InvalidYaml {
            message: error.to_string(),
            line: location.as_ref().map(|l| l.line() as u32),
            column: location.as_ref().map(|l| l.column() as u32),
            file_path: None,
        })
    }
}

impl From<toml::de::Error> for Box<ConfigError> {
    fn from(error: toml::de::Error) -> Self {
        Box::new(ConfigError::InvalidToml {
            message: error.message().to_string(),
            file_path: None,
        })
    }
}
