// End-to-end tests driving the nvim-compose binary
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const SAMPLE: &str = r#"
plugins:
  - vim-sensible
  - plugin: gruvbox
    type: viml
    config: "colorscheme gruvbox"
  - plugin: nvim-cmp
    type: lua
    config: "require('cmp').setup{}"
    runtime:
      after/ftplugin/lua.vim:
        text: "setlocal sw=2"
extra_lua_packages: [/nix/store/bbb-luv]
vim_alias: true
"#;

fn nvim_compose() -> Command {
    let mut cmd = Command::cargo_bin("nvim-compose").unwrap();
    cmd.env_remove("RUST_LOG")
        .env("NO_COLOR", "1")
        .env("XDG_CONFIG_HOME", std::env::temp_dir().join("nvim-compose-cli-tests"));
    cmd
}

fn workspace() -> (TempDir, std::path::PathBuf) {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("nvim-compose.yaml");
    fs::write(&config, SAMPLE).unwrap();
    (dir, config)
}

#[test]
fn test_version_flag_works() {
    nvim_compose()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("nvim-compose"));
}

#[test]
fn test_help_lists_subcommands() {
    nvim_compose()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("generate"))
        .stdout(predicate::str::contains("wrapper-args"));
}

#[test]
fn test_generate_writes_files() {
    let (dir, config) = workspace();
    let out = dir.path().join("nvim");

    nvim_compose()
        .arg("--config")
        .arg(&config)
        .arg("generate")
        .arg("--output-dir")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("init.lua"));

    let legacy = fs::read_to_string(out.join("init.vim")).unwrap();
    assert_eq!(legacy, "colorscheme gruvbox");

    let modern = fs::read_to_string(out.join("init.lua")).unwrap();
    let expected_loader = format!("vim.cmd [[source {}]]", out.join("init.vim").display());
    assert_eq!(modern, format!("{expected_loader}\nrequire('cmp').setup{{}}"));

    assert_eq!(
        fs::read_to_string(out.join("after/ftplugin/lua.vim")).unwrap(),
        "setlocal sw=2"
    );
}

#[test]
fn test_generate_dry_run_writes_nothing() {
    let (dir, config) = workspace();
    let out = dir.path().join("nvim");

    nvim_compose()
        .arg("-c")
        .arg(&config)
        .args(["generate", "--dry-run", "-o"])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("would create"));

    assert!(!out.exists());
}

#[test]
fn test_generate_diff_against_existing() {
    let (dir, config) = workspace();
    let out = dir.path().join("nvim");
    fs::create_dir_all(&out).unwrap();
    fs::write(out.join("init.vim"), "colorscheme default").unwrap();

    nvim_compose()
        .arg("-c")
        .arg(&config)
        .args(["generate", "--dry-run", "--diff", "-o"])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("-colorscheme default"))
        .stdout(predicate::str::contains("+colorscheme gruvbox"));

    assert_eq!(
        fs::read_to_string(out.join("init.vim")).unwrap(),
        "colorscheme default"
    );
}

#[test]
fn test_show_single_language() {
    let (_dir, config) = workspace();

    nvim_compose()
        .arg("-c")
        .arg(&config)
        .args(["show", "--language", "lua", "-o", "/cfg/nvim"])
        .assert()
        .success()
        .stdout("require('cmp').setup{}\n");
}

#[test]
fn test_show_json_contains_groups() {
    let (_dir, config) = workspace();

    let output = nvim_compose()
        .arg("-c")
        .arg(&config)
        .args(["show", "--json", "-o", "/cfg/nvim"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let parsed: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(parsed["generated_configs"]["vimscript"], "colorscheme gruvbox");
    assert_eq!(parsed["generated_configs"]["lua"], "require('cmp').setup{}");
    assert_eq!(parsed["generated_config_viml"], "colorscheme gruvbox");
}

#[test]
fn test_show_unknown_language_fails() {
    let (_dir, config) = workspace();

    nvim_compose()
        .arg("-c")
        .arg(&config)
        .args(["show", "--language", "teal", "-o", "/cfg/nvim"])
        .assert()
        .code(7)
        .stderr(predicate::str::contains("Known languages"));
}

#[test]
fn test_wrapper_args_output() {
    let (_dir, config) = workspace();

    nvim_compose()
        .arg("-c")
        .arg(&config)
        .arg("wrapper-args")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("--inherit-argv0"))
        .stdout(predicate::str::contains(
            "--suffix LUA_PATH \";\" \"/nix/store/bbb-luv/share/lua/5.1/?.lua",
        ));
}

#[test]
fn test_validate_config_reports_each_file() {
    let (dir, good) = workspace();
    let bad = dir.path().join("bad.yaml");
    fs::write(&bad, "with_python: true\n").unwrap();

    nvim_compose()
        .arg("validate-config")
        .arg(&good)
        .arg(&bad)
        .assert()
        .code(2)
        .stdout(predicate::str::contains("OK"))
        .stderr(predicate::str::contains("with_python"));
}

#[test]
fn test_missing_config_exit_code() {
    let dir = TempDir::new().unwrap();

    nvim_compose()
        .current_dir(dir.path())
        .args(["generate", "--dry-run", "-o"])
        .arg(dir.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("sample-config"));
}

#[test]
fn test_collision_exit_code() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("nvim-compose.yaml");
    fs::write(
        &config,
        r#"
plugins:
  - plugin: a
    runtime:
      ftplugin/c.vim: { text: "setl sw=2" }
  - plugin: b
    runtime:
      ftplugin/c.vim: { text: "setl sw=8" }
"#,
    )
    .unwrap();
    let out = dir.path().join("nvim");

    nvim_compose()
        .arg("-c")
        .arg(&config)
        .args(["generate", "-o"])
        .arg(&out)
        .assert()
        .code(3)
        .stderr(predicate::str::contains("ftplugin/c.vim"));

    assert!(!out.exists());
}

#[test]
fn test_verbose_and_quiet_conflict() {
    nvim_compose()
        .args(["--verbose", "--quiet", "wrapper-args"])
        .assert()
        .code(7)
        .stderr(predicate::str::contains("--verbose"));
}

#[test]
fn test_sample_config_is_valid() {
    let dir = TempDir::new().unwrap();
    let sample = dir.path().join("sample.yaml");

    nvim_compose()
        .args(["sample-config", "--flavor", "lua", "-o"])
        .arg(&sample)
        .assert()
        .success();

    nvim_compose()
        .arg("validate-config")
        .arg(&sample)
        .assert()
        .success();
}

#[test]
fn test_generate_completion() {
    nvim_compose()
        .args(["generate-completion", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("nvim-compose"));
}
