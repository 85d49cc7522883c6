use anyhow::{Context, Result};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// How input directories are expanded into files
#[derive(Debug, Clone, Default)]
pub struct EnumerateOptions {
    /// Descend into subdirectories
    pub recursive: bool,
    /// Keep only files whose name contains this text (case-insensitive)
    pub name_filter: Option<String>,
}

impl EnumerateOptions {
    fn matches(&self, file_name: &str) -> bool {
        match self.name_filter.as_deref() {
            None | Some("") => true,
            Some(filter) => file_name
                .to_lowercase()
                .contains(&filter.to_lowercase()),
        }
    }
}

/// Expand files and directories into the ordered list of files to rename.
///
/// Files given directly are always kept; the name filter only applies to
/// files found inside directories. Inputs that do not exist are skipped.
/// The result is absolute, free of duplicates and sorted.
pub fn collect_files(inputs: &[PathBuf], options: &EnumerateOptions) -> Result<Vec<PathBuf>> {
    let cwd = std::env::current_dir().context("Failed to read current directory")?;
    let mut found = BTreeSet::new();

    for input in inputs {
        let input = absolutize(&cwd, input);

        if input.is_file() {
            found.insert(input);
        } else if input.is_dir() {
            collect_dir(&input, options, &mut found);
        } else {
            warn!(path = %input.display(), "skipping input that is neither a file nor a directory");
        }
    }

    debug!(files = found.len(), "enumerated input files");
    Ok(found.into_iter().collect())
}

fn collect_dir(dir: &Path, options: &EnumerateOptions, found: &mut BTreeSet<PathBuf>) {
    let max_depth = if options.recursive { usize::MAX } else { 1 };

    for entry in WalkDir::new(dir).min_depth(1).max_depth(max_depth) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(dir = %dir.display(), error = %e, "error reading directory, some files may be missing");
                continue;
            },
        };

        if !entry.file_type().is_file() {
            continue;
        }

        if options.matches(&entry.file_name().to_string_lossy()) {
            found.insert(entry.into_path());
        }
    }
}

fn absolutize(cwd: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}
