use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tempfile::TempDir;

/// Characters Windows refuses in a file name component
const WINDOWS_RESERVED_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Characters POSIX refuses in a file name component
const POSIX_RESERVED_CHARS: &[char] = &['/'];

/// Device names Windows reserves, with or without an extension
const WINDOWS_RESERVED_NAMES: &[&str] = &[
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

/// Path separators are never allowed in a proposed name, whatever the platform.
const SEPARATORS: &[char] = &['/', '\\'];

/// How the filesystem compares file names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FilesystemConvention {
    CaseSensitive,
    CaseInsensitive,
}

impl FilesystemConvention {
    /// Convention most filesystems on the build target use out of the box
    pub fn platform_default() -> Self {
        if cfg!(any(windows, target_os = "macos")) {
            Self::CaseInsensitive
        } else {
            Self::CaseSensitive
        }
    }

    /// Probe the filesystem that holds `dir`.
    ///
    /// Creates a throwaway directory, writes a lowercase file into it and checks
    /// whether the uppercase spelling resolves to it. The probe runs in the system
    /// temp directory when that lives on the same device as `dir`, so `dir`
    /// itself is left alone. Returns `None` when the probe cannot be run
    /// (read-only media, missing directory).
    pub fn detect(dir: &Path) -> Option<Self> {
        let location = probe_location(dir);
        let temp_dir = TempDir::new_in(&location).ok()?;

        let lower = temp_dir.path().join("case_probe_a");
        let upper = temp_dir.path().join("case_probe_A");

        fs::write(&lower, b"probe").ok()?;

        if fs::metadata(&upper).is_ok() {
            Some(Self::CaseInsensitive)
        } else {
            Some(Self::CaseSensitive)
        }
    }

    /// `detect`, falling back to the platform default when the probe fails
    pub fn detect_or_default(dir: &Path) -> Self {
        Self::detect(dir).unwrap_or_else(Self::platform_default)
    }

    pub fn is_case_insensitive(self) -> bool {
        matches!(self, Self::CaseInsensitive)
    }

    /// Key under which two paths compare equal on this filesystem
    pub fn path_key(self, path: &Path) -> PathBuf {
        match self {
            Self::CaseSensitive => path.to_path_buf(),
            Self::CaseInsensitive => PathBuf::from(path.to_string_lossy().to_lowercase()),
        }
    }

    /// Whether the two paths name the same directory entry on this filesystem
    pub fn same_name(self, a: &Path, b: &Path) -> bool {
        self.path_key(a) == self.path_key(b)
    }
}

impl FromStr for FilesystemConvention {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sensitive" | "case-sensitive" => Ok(Self::CaseSensitive),
            "insensitive" | "case-insensitive" => Ok(Self::CaseInsensitive),
            _ => Err(format!("Invalid case sensitivity: {}", s)),
        }
    }
}

/// Which characters a proposed file name may not contain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReservedCharset {
    Windows,
    Posix,
}

impl ReservedCharset {
    pub fn platform_default() -> Self {
        if cfg!(windows) {
            Self::Windows
        } else {
            Self::Posix
        }
    }

    pub fn chars(self) -> &'static [char] {
        match self {
            Self::Windows => WINDOWS_RESERVED_CHARS,
            Self::Posix => POSIX_RESERVED_CHARS,
        }
    }

    pub fn is_reserved(self, c: char) -> bool {
        c == '\0' || SEPARATORS.contains(&c) || self.chars().contains(&c)
    }

    /// First reserved character in `name`, if any
    pub fn find_reserved(self, name: &str) -> Option<char> {
        name.chars().find(|&c| self.is_reserved(c))
    }

    /// Whether `name` is a device name this charset's platform refuses as a file
    /// name (`CON`, `nul.txt`, `LPT1.log`)
    pub fn is_reserved_name(self, name: &str) -> bool {
        match self {
            Self::Windows => {
                let base = name.split('.').next().unwrap_or(name).trim_end();
                WINDOWS_RESERVED_NAMES
                    .iter()
                    .any(|reserved| reserved.eq_ignore_ascii_case(base))
            },
            Self::Posix => false,
        }
    }
}

impl FromStr for ReservedCharset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "windows" => Ok(Self::Windows),
            "posix" => Ok(Self::Posix),
            _ => Err(format!("Invalid reserved charset: {}", s)),
        }
    }
}

/// Naming rules of the filesystem a batch is planned against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameRules {
    pub convention: FilesystemConvention,
    pub charset: ReservedCharset,
}

impl NameRules {
    pub fn new(convention: FilesystemConvention, charset: ReservedCharset) -> Self {
        Self {
            convention,
            charset,
        }
    }

    pub fn platform_default() -> Self {
        Self::new(
            FilesystemConvention::platform_default(),
            ReservedCharset::platform_default(),
        )
    }

    /// Whether `name` can stand as a single file name component
    pub fn is_valid_component(&self, name: &str) -> bool {
        name != "."
            && name != ".."
            && self.charset.find_reserved(name).is_none()
            && !self.charset.is_reserved_name(name)
    }
}

impl Default for NameRules {
    fn default() -> Self {
        Self::platform_default()
    }
}

/// Path a proposed name resolves to: the original's directory plus the new name
pub fn candidate_path(original: &Path, name: &str) -> PathBuf {
    match original.parent() {
        Some(parent) => parent.join(name),
        None => PathBuf::from(name),
    }
}

/// Whether `a` and `b` denote the same underlying file.
///
/// When both paths can be resolved the file identity decides, whatever the
/// convention says. Only when one of them cannot be read does the convention's
/// name comparison stand in, so a case-only rename to a name that does not
/// exist yet is still one file on a case-insensitive filesystem.
pub fn is_same_file(a: &Path, b: &Path, convention: FilesystemConvention) -> bool {
    if a == b {
        return true;
    }
    match (file_identity(a), file_identity(b)) {
        (Some(left), Some(right)) => left == right,
        _ => convention.is_case_insensitive() && convention.same_name(a, b),
    }
}

#[cfg(unix)]
fn file_identity(path: &Path) -> Option<(u64, u64)> {
    use std::os::unix::fs::MetadataExt;
    fs::metadata(path).ok().map(|m| (m.dev(), m.ino()))
}

#[cfg(not(unix))]
fn file_identity(path: &Path) -> Option<PathBuf> {
    fs::canonicalize(path).ok()
}

/// Directory to run the case probe in: the system temp dir when it shares a
/// device with `dir`, otherwise `dir` itself
#[cfg(unix)]
fn probe_location(dir: &Path) -> PathBuf {
    use std::os::unix::fs::MetadataExt;
    let temp = std::env::temp_dir();
    match (fs::metadata(dir), fs::metadata(&temp)) {
        (Ok(target), Ok(scratch)) if target.dev() == scratch.dev() => temp,
        _ => dir.to_path_buf(),
    }
}

#[cfg(not(unix))]
fn probe_location(dir: &Path) -> PathBuf {
    dir.to_path_buf()
}
