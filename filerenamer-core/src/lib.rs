#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::option_if_let_else)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod committer;
pub mod config;
pub mod convention;
pub mod enumerate;
pub mod error;
pub mod model;
pub mod operations;
pub mod output;
pub mod planner;
pub mod preview;
pub mod rules;

pub use committer::{classify_io_error, commit_plan, CommitOptions};
pub use config::{CaseSetting, Config};
pub use convention::{
    candidate_path, is_same_file, FilesystemConvention, NameRules, ReservedCharset,
};
pub use enumerate::{collect_files, EnumerateOptions};
pub use error::{CommitError, PlanError, RuleError};
pub use model::{
    CommitCounts, CommitReport, FailureReason, PlannedEntry, Proposal, RenameEntry, RenameOutcome,
    RenamePlan, UpstreamError, ValidationVerdict,
};
pub use operations::{
    build_plan, plan_operation, rename_operation, BatchRequest, NameSource, RenameOperationResult,
    RenameOptions,
};
pub use output::{CommitResult, OutputFormat, OutputFormatter, PlanResult, VersionResult};
pub use planner::{plan_batch, Planner};
pub use preview::{render_plan, write_preview, write_report, Preview};
pub use rules::{
    apply_rules, creation_date_names, names_from_text, seed_from_originals, DateRule,
    InsertPosition, Rule, DEFAULT_DATE_FORMAT,
};
