// Generate command implementation
// Composes the plugin configuration and writes the resulting files

use std::path::PathBuf;
use tracing::info;

use crate::commands::{load_and_compose, resolve_nvim_dir};
use crate::compose::Composition;
use crate::error::Result;
use crate::writer::{FileWriter, PlannedWrite, WriteSummary};

#[derive(Debug, Clone)]
pub struct GenerateConfig {
    pub config_path: PathBuf,
    pub output_dir: Option<PathBuf>,
    pub dry_run: bool,
    pub show_diff: bool,
}

#[derive(Debug)]
pub struct GenerateResult {
    pub composition: Composition,
    pub output_dir: PathBuf,
    pub plan: Vec<PlannedWrite>,
    pub diff: Option<String>,
    pub summary: Option<WriteSummary>,
}

pub fn execute_generate_command(config: &GenerateConfig) -> Result<GenerateResult> {
    let output_dir = resolve_nvim_dir(config.output_dir.as_deref())?;
    info!(output_dir = %output_dir.display(), "Generating configuration");

    // Compose fully before touching disk
    let (_, composition) = load_and_compose(&config.config_path, &output_dir)?;

    let writer = FileWriter::new(&output_dir);
    let plan = writer.plan(&composition.files);
    let diff = config.show_diff.then(|| writer.diff(&composition.files));

    let summary = if config.dry_run {
        None
    } else {
        Some(writer.write(&composition.files)?)
    };

    Ok(GenerateResult {
        composition,
        output_dir,
        plan,
        diff,
        summary,
    })
}

/// Human-readable report printed by the CLI
pub fn render_report(result: &GenerateResult, dry_run: bool) -> String {
    let mut lines = Vec::new();

    for planned in &result.plan {
        let verb = if dry_run {
            format!("would {}", planned.action.as_str())
        } else {
            planned.action.as_str().to_string()
        };
        lines.push(format!("{verb:>16}  {}", planned.target.display()));
    }

    if let Some(diff) = result.diff.as_deref().filter(|diff| !diff.is_empty()) {
        lines.push(diff.trim_end().to_string());
    }

    for (shell, bindings) in &result.composition.shell_aliases {
        let rendered: Vec<String> = bindings
            .iter()
            .map(|(alias, command)| format!("{alias}='{command}'"))
            .collect();
        lines.push(format!("alias ({shell:?}): {}", rendered.join(" ")));
    }

    for (name, value) in &result.composition.session_variables {
        lines.push(format!("export {name}={value}"));
    }

    lines.push(format!("wrapper args: {}", result.composition.wrapper_args));
    lines.join("\n")
}
