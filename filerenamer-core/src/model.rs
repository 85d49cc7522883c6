use crate::convention::NameRules;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Why a name-generation step could not produce a name for an entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum UpstreamError {
    /// The original file was gone when the name was generated
    SourceMissing,
    /// The original file could not be read
    AccessDenied(String),
    /// The generated name contains characters the filesystem rejects
    InvalidGeneratedName(String),
    Other(String),
}

impl fmt::Display for UpstreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SourceMissing => write!(f, "original file not found"),
            Self::AccessDenied(detail) => write!(f, "cannot access original file ({})", detail),
            Self::InvalidGeneratedName(name) => {
                write!(f, "generated name '{}' contains invalid characters", name)
            },
            Self::Other(detail) => write!(f, "{}", detail),
        }
    }
}

/// A proposed new name, or the reason none could be generated
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Proposal {
    Name(String),
    Failed(UpstreamError),
}

impl Proposal {
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Name(name) => Some(name),
            Self::Failed(_) => None,
        }
    }
}

impl From<String> for Proposal {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl From<&str> for Proposal {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl fmt::Display for Proposal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => write!(f, "{}", name),
            Self::Failed(reason) => write!(f, "<{}>", reason),
        }
    }
}

/// One file of a batch and the name it should get
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenameEntry {
    /// Current location of the file, updated after a successful rename
    pub original_path: PathBuf,
    /// File name shown to the user
    pub original_display_name: String,
    pub proposed: Proposal,
}

impl RenameEntry {
    pub fn new(original_path: impl Into<PathBuf>, proposed: impl Into<Proposal>) -> Self {
        let original_path = original_path.into();
        let original_display_name = display_name(&original_path);
        Self {
            original_path,
            original_display_name,
            proposed: proposed.into(),
        }
    }
}

/// Final path component as text, or the whole path when it has none
pub fn display_name(path: &Path) -> String {
    path.file_name().map_or_else(
        || path.display().to_string(),
        |name| name.to_string_lossy().into_owned(),
    )
}

/// Planner result for a single entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum ValidationVerdict {
    Ok,
    EmptyName,
    InvalidCharacters,
    TargetExists,
    BatchCollision,
    UpstreamError(UpstreamError),
}

impl ValidationVerdict {
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok)
    }
}

impl fmt::Display for ValidationVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ok => write!(f, "ok"),
            Self::EmptyName => write!(f, "empty name"),
            Self::InvalidCharacters => write!(f, "not a valid file name on this filesystem"),
            Self::TargetExists => write!(f, "target already exists"),
            Self::BatchCollision => write!(f, "collides with an earlier name in this batch"),
            Self::UpstreamError(reason) => write!(f, "name generation failed: {}", reason),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedEntry {
    pub entry: RenameEntry,
    /// Where the file would end up; absent when the name never got that far
    pub candidate_path: Option<PathBuf>,
    pub verdict: ValidationVerdict,
}

impl PlannedEntry {
    /// Proposed name with surrounding whitespace removed
    pub fn proposed_name(&self) -> Option<&str> {
        self.entry.proposed.name().map(str::trim)
    }
}

/// Validated batch, in input order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenamePlan {
    pub entries: Vec<PlannedEntry>,
    pub rules: NameRules,
}

impl RenamePlan {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// A plan can be committed only when every entry validated
    pub fn all_ok(&self) -> bool {
        self.entries.iter().all(|e| e.verdict.is_ok())
    }

    pub fn blocked_count(&self) -> usize {
        self.entries.iter().filter(|e| !e.verdict.is_ok()).count()
    }

    pub fn verdicts(&self) -> Vec<ValidationVerdict> {
        self.entries.iter().map(|e| e.verdict.clone()).collect()
    }
}

/// Classified cause of a failed rename
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum FailureReason {
    SourceMissing,
    TargetAlreadyExists,
    PermissionDenied,
    InvalidName,
    Other(String),
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SourceMissing => write!(f, "original file not found"),
            Self::TargetAlreadyExists => write!(f, "target already exists"),
            Self::PermissionDenied => write!(f, "permission denied"),
            Self::InvalidName => write!(f, "name rejected by the filesystem"),
            Self::Other(detail) => write!(f, "{}", detail),
        }
    }
}

/// Committer result for a single entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "reason", rename_all = "snake_case")]
pub enum RenameOutcome {
    Renamed,
    SkippedNoOp,
    SkippedInvalid,
    Failed(FailureReason),
}

impl fmt::Display for RenameOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Renamed => write!(f, "renamed"),
            Self::SkippedNoOp => write!(f, "skipped (unchanged)"),
            Self::SkippedInvalid => write!(f, "skipped (invalid name)"),
            Self::Failed(reason) => write!(f, "failed: {}", reason),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitCounts {
    pub renamed: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl CommitCounts {
    pub fn record(&mut self, outcome: &RenameOutcome) {
        match outcome {
            RenameOutcome::Renamed => self.renamed += 1,
            RenameOutcome::SkippedNoOp | RenameOutcome::SkippedInvalid => self.skipped += 1,
            RenameOutcome::Failed(_) => self.failed += 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitReport {
    /// One outcome per plan entry, in plan order
    pub outcomes: Vec<RenameOutcome>,
    pub counts: CommitCounts,
}

impl CommitReport {
    pub fn from_outcomes(outcomes: Vec<RenameOutcome>) -> Self {
        let mut counts = CommitCounts::default();
        for outcome in &outcomes {
            counts.record(outcome);
        }
        Self { outcomes, counts }
    }

    pub fn has_failures(&self) -> bool {
        self.counts.failed > 0
    }
}
