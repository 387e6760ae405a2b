// Writes a composed file tree below the nvim config directory
use similar::TextDiff;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::error::Result;
use crate::file_tree::GlobalFileTree;
use crate::plugin::FileSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteAction {
    Create,
    Update,
    Unchanged,
    Copy,
}

impl WriteAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            WriteAction::Create => "create",
            WriteAction::Update => "update",
            WriteAction::Unchanged => "unchanged",
            WriteAction::Copy => "copy",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedWrite {
    pub target: PathBuf,
    pub action: WriteAction,
}

#[derive(Debug, Default)]
pub struct WriteSummary {
    pub written: Vec<PathBuf>,
    pub unchanged: Vec<PathBuf>,
}

pub struct FileWriter {
    root: PathBuf,
}

impl FileWriter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// What `write` would do, without touching disk
    pub fn plan(&self, tree: &GlobalFileTree) -> Vec<PlannedWrite> {
        tree.iter()
            .map(|(path, entry)| {
                let target = self.root.join(path);
                let action = match &entry.source {
                    FileSource::Source(_) => WriteAction::Copy,
                    FileSource::Text(text) => match fs::read_to_string(&target) {
                        Ok(current) if current == *text => WriteAction::Unchanged,
                        Ok(_) => WriteAction::Update,
                        Err(_) => WriteAction::Create,
                    },
                };
                PlannedWrite { target, action }
            })
            .collect()
    }

    pub fn write(&self, tree: &GlobalFileTree) -> Result<WriteSummary> {
        let span = crate::logging::utils::write_span(&self.root, tree.len());
        let _enter = span.enter();

        let mut summary = WriteSummary::default();

        for (path, entry) in tree.iter() {
            let target = self.root.join(path);
            match &entry.source {
                FileSource::Text(text) => {
                    if fs::read_to_string(&target).is_ok_and(|current| current == *text) {
                        debug!(path = %target.display(), "Unchanged, skipping");
                        summary.unchanged.push(target);
                        continue;
                    }
                    write_atomic(&target, text)?;
                }
                FileSource::Source(source) => copy_source(source, &target)?,
            }
            debug!(path = %target.display(), owner = %entry.owner, "Wrote file");
            summary.written.push(target);
        }

        info!(
            written = summary.written.len(),
            unchanged = summary.unchanged.len(),
            root = %self.root.display(),
            "Files written"
        );
        Ok(summary)
    }

    /// Unified diff of every inline text entry against what is on disk
    pub fn diff(&self, tree: &GlobalFileTree) -> String {
        let mut output = String::new();

        for (path, entry) in tree.iter() {
            let Some(text) = entry.source.as_text() else {
                continue;
            };
            let target = self.root.join(path);
            let current = fs::read_to_string(&target).unwrap_or_default();
            if current == text {
                continue;
            }

            let diff = TextDiff::from_lines(current.as_str(), text);
            output.push_str(
                &diff
                    .unified_diff()
                    .header(&format!("a/{path}"), &format!("b/{path}"))
                    .to_string(),
            );
        }

        output
    }
}

fn write_atomic(target: &Path, text: &str) -> Result<()> {
    let parent = target.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent)?;

    let mut file = tempfile::NamedTempFile::new_in(parent)?;
    file.write_all(text.as_bytes())?;
    file.persist(target).map_err(|err| err.error)?;
    Ok(())
}

fn copy_source(source: &Path, target: &Path) -> Result<()> {
    if source.is_file() {
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(source, target)?;
        return Ok(());
    }

    for entry in WalkDir::new(source).follow_links(true) {
        let entry = entry.map_err(std::io::Error::from)?;
        let relative = entry
            .path()
            .strip_prefix(source)
            .unwrap_or_else(|_| entry.path());
        let destination = target.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&destination)?;
        } else {
            if let Some(parent) = destination.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &destination)?;
        }
    }
    Ok(())
}
