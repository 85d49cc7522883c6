use thiserror::Error;

/// Failure that prevents a plan from being built at all
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlanError {
    #[error("count mismatch: {originals} original files but {proposed} proposed names")]
    CountMismatch { originals: usize, proposed: usize },
    #[error("no files found to rename")]
    NoFiles,
}

/// Failure that prevents a commit from starting
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommitError {
    #[error("plan is not executable: {blocked} of {total} entries failed validation")]
    PlanNotExecutable { blocked: usize, total: usize },
}

/// Failure of a name-generation step as a whole
#[derive(Debug, Error)]
pub enum RuleError {
    #[error("invalid date format '{format}'")]
    InvalidDateFormat { format: String },

    #[error("invalid find pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("invalid insert position '{0}': expected start, end or a character index")]
    InvalidPosition(String),
}
