// Generate command: composing from a config file and writing the tree
use nvim_compose::commands::generate::{execute_generate_command, render_report, GenerateConfig};
use nvim_compose::writer::WriteAction;
use serial_test::serial;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const CONFIG: &str = r#"
plugins:
  - plugin: gruvbox
    config: "colorscheme gruvbox"
  - plugin: nvim-treesitter
    type: lua
    config: "require('nvim-treesitter.configs').setup{}"
    runtime:
      queries/nix/injections.scm:
        text: "(comment) @comment"
extra_config: "set number"
default_editor: true
coc:
  enable: true
  settings:
    languageserver: {}
"#;

fn setup() -> (TempDir, PathBuf, PathBuf) {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("nvim-compose.yaml");
    fs::write(&config, CONFIG).unwrap();
    let out = dir.path().join("nvim");
    (dir, config, out)
}

fn generate(config: &Path, out: &Path, dry_run: bool) -> nvim_compose::commands::generate::GenerateResult {
    execute_generate_command(&GenerateConfig {
        config_path: config.to_path_buf(),
        output_dir: Some(out.to_path_buf()),
        dry_run,
        show_diff: false,
    })
    .unwrap()
}

#[test]
fn test_generate_writes_every_tree_entry() {
    let (_dir, config, out) = setup();
    let result = generate(&config, &out, false);

    let summary = result.summary.unwrap();
    assert_eq!(summary.written.len(), result.composition.files.len());
    assert_eq!(summary.written.len(), 4);

    let legacy = fs::read_to_string(out.join("init.vim")).unwrap();
    assert_eq!(legacy, "colorscheme gruvbox\nset number");
    assert!(fs::read_to_string(out.join("init.lua"))
        .unwrap()
        .ends_with("require('nvim-treesitter.configs').setup{}"));

    let settings: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(out.join("coc-settings.json")).unwrap())
            .unwrap();
    assert_eq!(settings, serde_json::json!({ "languageserver": {} }));
    assert!(out.join("queries/nix/injections.scm").is_file());
}

#[test]
fn test_second_run_is_unchanged() {
    let (_dir, config, out) = setup();
    generate(&config, &out, false);

    let second = generate(&config, &out, false);
    let summary = second.summary.unwrap();
    assert!(summary.written.is_empty());
    assert_eq!(summary.unchanged.len(), 4);
    assert!(second
        .plan
        .iter()
        .all(|planned| planned.action == WriteAction::Unchanged));
}

#[test]
fn test_dry_run_plans_without_writing() {
    let (_dir, config, out) = setup();
    let result = generate(&config, &out, true);

    assert!(result.summary.is_none());
    assert!(result
        .plan
        .iter()
        .all(|planned| planned.action == WriteAction::Create));
    assert!(!out.exists());

    let report = render_report(&result, true);
    assert!(report.contains("would create"));
    assert!(report.contains("export EDITOR=nvim"));
}

#[test]
#[serial]
fn test_default_output_dir_follows_xdg_config_home() {
    let (dir, config, _) = setup();
    let xdg = dir.path().join("xdg");
    let previous = std::env::var_os("XDG_CONFIG_HOME");
    std::env::set_var("XDG_CONFIG_HOME", &xdg);

    let result = execute_generate_command(&GenerateConfig {
        config_path: config,
        output_dir: None,
        dry_run: true,
        show_diff: false,
    });

    match previous {
        Some(value) => std::env::set_var("XDG_CONFIG_HOME", value),
        None => std::env::remove_var("XDG_CONFIG_HOME"),
    }

    let result = result.unwrap();
    assert_eq!(result.output_dir, xdg.join("nvim"));
    let loader = format!("vim.cmd [[source {}]]", xdg.join("nvim/init.vim").display());
    assert!(result
        .composition
        .entry_point("init.lua")
        .unwrap()
        .starts_with(&loader));
}
