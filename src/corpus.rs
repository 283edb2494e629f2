use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use regex::Regex;
use walkdir::WalkDir;


pub fn absolute(path: &Path) -> Result<PathBuf> {
    std::path::absolute(path)
        .with_context(|| format!("cannot resolve {}", path.display()))
}

/// Explicit files first, in argument order, then each folder's matching
/// files. The filter applies to file names only and, like a `^`-less
/// `re.match`, must match from the start of the name. Entries are not
/// deduplicated.
pub fn collect(
    files: &[PathBuf],
    folders: &[PathBuf],
    filter: &Regex,
) -> Result<Vec<PathBuf>> {
    let mut sources = Vec::new();
    for file in files {
        sources.push(absolute(file)?);
    }
    for folder in folders {
        for entry in WalkDir::new(folder).sort_by_file_name() {
            let entry = entry
                .with_context(|| format!("cannot walk {}", folder.display()))?;
            if !entry.file_type().is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy();
            if matches_name(filter, &name) {
                sources.push(absolute(entry.path())?);
            }
        }
    }
    Ok(sources)
}

fn matches_name(filter: &Regex, name: &str) -> bool {
    filter.find(name).is_some_and(|m| m.start() == 0)
}
