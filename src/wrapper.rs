// Wrapper argument assembly for the executable wrapper tool
use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;
use std::fmt;

/// Characters that never need quoting in a POSIX shell word
static SAFE_SHELL_WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[[:alnum:],._+:@%/=-]+$").expect("static regex"));

/// Supplementary package lists feeding the search-path flags
#[derive(Debug, Clone, Copy)]
pub struct WrapperInputs<'a> {
    /// Package prefixes whose `bin` directories go on PATH
    pub extra_packages: &'a [String],
    /// Lua package prefixes, contributing to both LUA_CPATH and LUA_PATH
    pub lua_packages: &'a [String],
    pub lua_version: &'a str,
}

/// Ordered wrapper argument fragments
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WrapperArgs {
    fragments: Vec<String>,
}

impl WrapperArgs {
    pub fn fragments(&self) -> &[String] {
        &self.fragments
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }
}

impl fmt::Display for WrapperArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.fragments.join(" "))
    }
}

/// Quote a single argument for a POSIX shell
pub fn escape_shell_arg(arg: &str) -> Cow<'_, str> {
    if SAFE_SHELL_WORD.is_match(arg) {
        Cow::Borrowed(arg)
    } else {
        Cow::Owned(format!("'{}'", arg.replace('\'', r"'\''")))
    }
}

pub fn escape_shell_args(args: &[String]) -> String {
    args.iter()
        .map(|arg| escape_shell_arg(arg))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Wrap a value in double quotes, escaping what the shell still expands there
fn double_quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for ch in value.chars() {
        if matches!(ch, '\\' | '"' | '$' | '`') {
            quoted.push('\\');
        }
        quoted.push(ch);
    }
    quoted.push('"');
    quoted
}

fn prefix(package: &str) -> &str {
    package.trim_end_matches('/')
}

/// `--suffix PATH` flag listing every package's `bin` directory
pub fn bin_path_arg(packages: &[String]) -> Option<String> {
    if packages.is_empty() {
        return None;
    }
    let bin_path = packages
        .iter()
        .map(|pkg| format!("{}/bin", prefix(pkg)))
        .collect::<Vec<_>>()
        .join(":");
    Some(format!("--suffix PATH : {}", double_quote(&bin_path)))
}

/// `--suffix LUA_CPATH` flag for native Lua modules
pub fn lua_cpath_arg(packages: &[String], lua_version: &str) -> Option<String> {
    if packages.is_empty() {
        return None;
    }
    let cpath = packages
        .iter()
        .map(|pkg| format!("{}/lib/lua/{lua_version}/?.so", prefix(pkg)))
        .collect::<Vec<_>>()
        .join(";");
    Some(format!("--suffix LUA_CPATH \";\" {}", double_quote(&cpath)))
}

/// `--suffix LUA_PATH` flag for pure Lua modules
pub fn lua_path_arg(packages: &[String], lua_version: &str) -> Option<String> {
    if packages.is_empty() {
        return None;
    }
    let path = packages
        .iter()
        .map(|pkg| {
            let share = format!("{}/share/lua/{lua_version}", prefix(pkg));
            format!("{share}/?.lua;{share}/?/init.lua")
        })
        .collect::<Vec<_>>()
        .join(";");
    Some(format!("--suffix LUA_PATH \";\" {}", double_quote(&path)))
}

/// Base arguments followed by the search-path flags.
///
/// Order is fixed: base, PATH, LUA_CPATH, LUA_PATH. A flag is present only if
/// its package list is non-empty.
pub fn build_wrapper_args(base: &[String], inputs: &WrapperInputs<'_>) -> WrapperArgs {
    let fragments = [
        Some(escape_shell_args(base)).filter(|args| !args.is_empty()),
        bin_path_arg(inputs.extra_packages),
        lua_cpath_arg(inputs.lua_packages, inputs.lua_version),
        lua_path_arg(inputs.lua_packages, inputs.lua_version),
    ]
    .into_iter()
    .flatten()
    .collect();

    WrapperArgs { fragments }
}
