// CLI interface for nvim-compose using clap
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::path::PathBuf;

use crate::commands::generate::{execute_generate_command, render_report, GenerateConfig};
use crate::commands::sample_config::{execute_sample_config_command, SampleConfigConfig};
use crate::commands::show::{execute_show_command, ShowConfig, ShowTarget};
use crate::commands::validate_config::execute_validate_config_command;
use crate::error::{exit_codes, CliError, ComposeError, ErrorFormatter, Result};

#[derive(Parser)]
#[command(
    name = "nvim-compose",
    about = "Compose Neovim plugin declarations into config files and wrapper arguments",
    version = crate::VERSION,
    long_about = "nvim-compose turns a list of plugin declarations into init.vim, init.lua, runtime files and the argument string for an nvim wrapper script."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = "nvim-compose.yaml")]
    pub config: String,

    /// Control color output (auto, always, never)
    #[arg(long, global = true, value_name = "WHEN")]
    pub color: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compose the configuration and write it to the nvim config directory (default command)
    Generate {
        /// Directory to write into (defaults to $XDG_CONFIG_HOME/nvim)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Print what would be written without touching disk
        #[arg(long)]
        dry_run: bool,

        /// Show a unified diff against the files on disk
        #[arg(long)]
        diff: bool,
    },

    /// Print generated configs without writing anything
    Show {
        /// Only print the config for this language
        #[arg(short, long)]
        language: Option<String>,

        /// Print the legacy vimscript document instead
        #[arg(long, conflicts_with_all = ["language", "files"])]
        viml: bool,

        /// List runtime files and their owners
        #[arg(long)]
        files: bool,

        /// Emit JSON
        #[arg(long)]
        json: bool,

        /// Directory the generated loader line points at
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },

    /// Print the nvim wrapper argument string
    WrapperArgs,

    /// Validate nvim-compose configuration files
    ValidateConfig {
        /// Config files to validate (defaults to --config)
        filenames: Vec<PathBuf>,
    },

    /// Produce a sample nvim-compose.yaml file
    SampleConfig {
        /// Plugin config language for the sample (vimscript, lua)
        #[arg(long)]
        flavor: Option<String>,

        /// Enable the coc completion companion
        #[arg(long)]
        coc: bool,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        output_file: Option<PathBuf>,
    },

    /// Generate shell completion scripts
    GenerateCompletion {
        /// Shell to generate completion for
        shell: Shell,
    },
}

impl Cli {
    pub fn run(&self) -> Result<i32> {
        // Initialize logging based on verbosity
        self.init_logging();

        // Validate conflicting flags
        if self.verbose && self.quiet {
            return Err(ComposeError::Cli(Box::new(CliError::ConflictingArguments {
                first: "--verbose".to_string(),
                second: "--quiet".to_string(),
                suggestion: "Use either --verbose for more output or --quiet for less output, but not both".to_string(),
            })));
        }

        let config_path = PathBuf::from(&self.config);

        match &self.command {
            Some(Commands::Generate {
                output_dir,
                dry_run,
                diff,
            }) => self.run_generate(config_path, output_dir.clone(), *dry_run, *diff),
            None => self.run_generate(config_path, None, false, false),
            Some(Commands::Show {
                language,
                viml,
                files,
                json,
                output_dir,
            }) => {
                let target = if *viml {
                    ShowTarget::Viml
                } else if *files {
                    ShowTarget::Files
                } else {
                    ShowTarget::Configs
                };
                let output = execute_show_command(&ShowConfig {
                    config_path,
                    output_dir: output_dir.clone(),
                    target,
                    language: language.clone(),
                    json: *json,
                })?;
                println!("{output}");
                Ok(exit_codes::SUCCESS)
            }
            Some(Commands::WrapperArgs) => {
                let output = execute_show_command(&ShowConfig {
                    config_path,
                    output_dir: None,
                    target: ShowTarget::WrapperArgs,
                    language: None,
                    json: false,
                })?;
                println!("{output}");
                Ok(exit_codes::SUCCESS)
            }
            Some(Commands::ValidateConfig { filenames }) => {
                let filenames = if filenames.is_empty() {
                    vec![config_path]
                } else {
                    filenames.clone()
                };
                let result = execute_validate_config_command(&filenames);
                let formatter = ErrorFormatter::new(false);

                for file in &result.files {
                    match &file.error {
                        None => {
                            if !self.quiet {
                                println!("{}: OK", file.path.display());
                            }
                        }
                        Some(error) => {
                            eprintln!("{}: {}", file.path.display(), formatter.format_error(error));
                        }
                    }
                }

                Ok(result
                    .first_error()
                    .map_or(exit_codes::SUCCESS, ComposeError::exit_code))
            }
            Some(Commands::SampleConfig {
                flavor,
                coc,
                output_file,
            }) => {
                let result = execute_sample_config_command(&SampleConfigConfig {
                    flavor: flavor.clone(),
                    with_coc: *coc,
                    output_file: output_file.clone(),
                })?;
                if output_file.is_some() && !self.quiet {
                    println!("Sample configuration written to {}", result.output_location);
                }
                Ok(exit_codes::SUCCESS)
            }
            Some(Commands::GenerateCompletion { shell }) => {
                let mut cmd = Self::command();
                let name = cmd.get_name().to_string();
                generate(*shell, &mut cmd, name, &mut std::io::stdout());
                Ok(exit_codes::SUCCESS)
            }
        }
    }

    fn run_generate(
        &self,
        config_path: PathBuf,
        output_dir: Option<PathBuf>,
        dry_run: bool,
        show_diff: bool,
    ) -> Result<i32> {
        let result = execute_generate_command(&GenerateConfig {
            config_path,
            output_dir,
            dry_run,
            show_diff,
        })?;

        if !self.quiet {
            println!("{}", render_report(&result, dry_run));
        }
        Ok(exit_codes::SUCCESS)
    }

    fn init_logging(&self) {
        use crate::logging::{init_logging, LogConfig};

        let log_config = LogConfig::from_cli(self.verbose, self.quiet, self.color.clone());

        if let Err(e) = init_logging(log_config) {
            eprintln!("Failed to initialize logging: {e}");
        }
    }
}
