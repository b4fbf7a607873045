//! Two-level text catalog of variant files.
//!
//! The catalog lists groups, one `path<TAB>description` per line. Each group
//! file lists variant files, one `path[<TAB>description]` per line. Lines
//! starting with `#` and blank lines are ignored at both levels.

use crate::formats::TabixVariantStore;
use crate::types::SourceFile;
use crate::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};

pub struct Registry {
    catalog_path: PathBuf,
}

impl Registry {
    pub fn new(catalog_path: impl Into<PathBuf>) -> Self {
        Self {
            catalog_path: catalog_path.into(),
        }
    }

    pub fn catalog_path(&self) -> &Path {
        &self.catalog_path
    }

    /// All groups in catalog order. Any listed group file that is not a
    /// readable file invalidates the whole catalog.
    pub fn groups(&self) -> Result<Vec<Group>> {
        let text = fs::read_to_string(&self.catalog_path).map_err(|e| {
            Error::Registry(format!(
                "cannot read catalog {}: {}",
                self.catalog_path.display(),
                e
            ))
        })?;

        let mut groups = Vec::new();
        for line in text.lines() {
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some(tab) = line.find('\t').filter(|&tab| tab >= 1) else {
                continue;
            };

            let path = PathBuf::from(line[..tab].trim());
            if !path.is_file() {
                return Err(Error::Registry(format!(
                    "bad file in {:?} / {}",
                    line,
                    self.catalog_path.display()
                )));
            }

            groups.push(Group {
                index: groups.len(),
                path,
                description: line[tab + 1..].trim().to_string(),
            });
        }

        tracing::debug!("Catalog {:?}: {} groups", self.catalog_path, groups.len());
        Ok(groups)
    }

    /// Group at `index`, numbered from 0 in catalog order.
    pub fn group(&self, index: usize) -> Result<Group> {
        self.groups()?
            .into_iter()
            .nth(index)
            .ok_or_else(|| Error::NotFound(format!("group {}", index)))
    }
}

/// One group of variant files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub index: usize,
    pub path: PathBuf,
    description: String,
}

impl Group {
    /// Description, falling back to the group file's name.
    pub fn description(&self) -> String {
        if self.description.is_empty() {
            self.path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| self.path.display().to_string())
        } else {
            self.description.clone()
        }
    }

    /// Variant files in listing order. Files whose tabix companion is
    /// missing are left out; a listed file that does not exist is an error.
    pub fn files(&self) -> Result<Vec<SourceFile>> {
        let text = fs::read_to_string(&self.path).map_err(|e| {
            Error::Registry(format!("cannot read group {}: {}", self.path.display(), e))
        })?;

        let mut files = Vec::new();
        for line in text.lines() {
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (path, description) = match line.find('\t') {
                Some(0) => continue,
                Some(tab) => (&line[..tab], Some(line[tab + 1..].trim())),
                None => (line, None),
            };
            let path = PathBuf::from(path);

            if !path.is_file() {
                return Err(Error::NotFound(format!("VCF file {}", path.display())));
            }
            if !TabixVariantStore::index_path(&path).is_file() {
                tracing::debug!("Skipping {:?}: no tabix index", path);
                continue;
            }

            files.push(match description {
                Some(desc) if !desc.is_empty() => SourceFile::with_description(path, desc),
                _ => SourceFile::new(path),
            });
        }

        Ok(files)
    }
}
