// nvim-compose - Main entry point
use clap::Parser;
use nvim_compose::cli::Cli;
use nvim_compose::logging::LogConfig;
use std::process;

fn main() {
    let cli = Cli::parse();

    let exit_code = match cli.run() {
        Ok(code) => code,
        Err(e) => {
            let use_colors = LogConfig::from_cli(cli.verbose, cli.quiet, cli.color.clone())
                .should_use_colors();
            eprintln!("{}", e.user_message(use_colors));
            e.exit_code()
        }
    };

    process::exit(exit_code);
}
