use super::plan::{build_plan, BatchRequest};
use crate::committer::{commit_plan, CommitOptions};
use crate::model::{CommitReport, RenamePlan};
use crate::output::CommitResult;
use crate::preview::{write_preview, Preview};
use anyhow::{Context, Result};
use std::io::{self, Write as IoWrite};
use std::path::PathBuf;
use tracing::info;

/// Options controlling how a rename batch is presented and committed
#[derive(Debug, Clone)]
pub struct RenameOptions {
    /// Preview shown before asking for confirmation
    pub preview: Preview,
    pub use_color: Option<bool>,
    /// Skip the confirmation prompt
    pub auto_approve: bool,
    /// Append a line per rename to this file
    pub log_file: Option<PathBuf>,
}

impl Default for RenameOptions {
    fn default() -> Self {
        Self {
            preview: Preview::Table,
            use_color: None,
            auto_approve: false,
            log_file: None,
        }
    }
}

#[derive(Debug)]
pub struct RenameOperationResult {
    /// The plan; entry paths reflect the renames when it was committed
    pub plan: RenamePlan,
    /// Present only when the plan was committed
    pub report: Option<CommitReport>,
    /// The user declined the confirmation prompt
    pub cancelled: bool,
}

impl RenameOperationResult {
    pub fn to_commit_result(&self) -> CommitResult {
        match &self.report {
            Some(report) => CommitResult::committed(&self.plan, report),
            None => CommitResult::not_committed(&self.plan),
        }
    }

    /// True when the whole batch went through without a failed entry
    pub fn succeeded(&self) -> bool {
        self.report
            .as_ref()
            .is_some_and(|report| !report.has_failures())
    }
}

/// Rename operation - equivalent to `filerenamer rename` command
///
/// Builds and previews the plan, stops if any entry is blocked, then asks for
/// confirmation unless `auto_approve` is set. The optional message is meant
/// for the user ("Aborted." on decline).
pub fn rename_operation(
    request: &BatchRequest,
    options: &RenameOptions,
) -> Result<(RenameOperationResult, Option<String>)> {
    let mut plan = build_plan(request)?;

    if options.preview != Preview::None {
        write_preview(&plan, options.preview, options.use_color)?;
    }

    if !plan.all_ok() {
        info!(
            blocked = plan.blocked_count(),
            total = plan.len(),
            "plan has blocked entries, nothing renamed"
        );
        return Ok((
            RenameOperationResult {
                plan,
                report: None,
                cancelled: false,
            },
            None,
        ));
    }

    if !options.auto_approve && !get_user_confirmation(plan.len())? {
        return Ok((
            RenameOperationResult {
                plan,
                report: None,
                cancelled: true,
            },
            Some("Aborted.".to_string()),
        ));
    }

    let commit_options = CommitOptions {
        log_file: options.log_file.clone(),
    };
    let report = commit_plan(&mut plan, &commit_options)?;

    Ok((
        RenameOperationResult {
            plan,
            report: Some(report),
            cancelled: false,
        },
        None,
    ))
}

fn get_user_confirmation(count: usize) -> Result<bool> {
    print!("Apply {} renames? [y/N]: ", count);
    IoWrite::flush(&mut io::stdout()).context("Failed to flush stdout")?;

    let mut input = String::new();
    io::stdin()
        .read_line(&mut input)
        .context("Failed to read user input")?;
    let input = input.trim().to_lowercase();

    Ok(input == "y" || input == "yes")
}
