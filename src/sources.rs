use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use log::info;

/// Known media sources, one `Label (Code)` entry per line in a flat UTF-8
/// text file. The list is ordered and flushed on every mutation.
#[derive(Debug)]
pub struct SourceRegistry {
    path: PathBuf,
    entries: Vec<String>,
}

impl SourceRegistry {
    /// Load the registry; a missing file is an empty registry.
    pub fn load(path: &Path) -> Result<Self> {
        let entries = match fs::read_to_string(path) {
            Ok(text) => text
                .lines()
                .map(|line| line.trim().to_string())
                .filter(|line| !line.is_empty())
                .collect(),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(err) => {
                return Err(err).with_context(|| format!("reading {}", path.display()));
            }
        };

        Ok(Self {
            path: path.to_path_buf(),
            entries,
        })
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Append a `Label (Code)` entry and persist. The line format has no
    /// escaping, so labels and codes with parentheses or line breaks are
    /// rejected rather than written.
    pub fn add(&mut self, label: &str, code: &str) -> Result<()> {
        let label = label.trim();
        let code = code.trim();

        if label.is_empty() {
            bail!("source label must not be empty");
        }
        for part in [label, code] {
            if part.contains(['(', ')', '\n', '\r']) {
                bail!("label and short code must not contain parentheses or line breaks: {part:?}");
            }
        }

        self.entries.push(format!("{label} ({code})"));
        self.save()?;
        info!("registered source: {label} ({code})");
        Ok(())
    }

    /// Remove an entry by exact match and persist. Returns false when the
    /// entry is not present.
    pub fn remove(&mut self, entry: &str) -> Result<bool> {
        let Some(pos) = self.entries.iter().position(|e| e == entry) else {
            return Ok(false);
        };
        self.entries.remove(pos);
        self.save()?;
        info!("removed source: {entry}");
        Ok(true)
    }

    fn save(&self) -> Result<()> {
        let mut text = self.entries.join("\n");
        if !text.is_empty() {
            text.push('\n');
        }
        fs::write(&self.path, text).with_context(|| format!("writing {}", self.path.display()))
    }
}
