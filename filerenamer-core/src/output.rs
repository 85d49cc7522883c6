use crate::model::{CommitCounts, CommitReport, RenameOutcome, RenamePlan, ValidationVerdict};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt::Write;
use std::path::PathBuf;

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Summary,
    Json,
}

/// Result of a plan operation
#[derive(Debug, Serialize, Deserialize)]
pub struct PlanResult {
    pub total: usize,
    pub ok: usize,
    pub blocked: usize,
    pub executable: bool,
    pub plan: RenamePlan,
}

impl From<&RenamePlan> for PlanResult {
    fn from(plan: &RenamePlan) -> Self {
        let blocked = plan.blocked_count();
        Self {
            total: plan.len(),
            ok: plan.len() - blocked,
            blocked,
            executable: blocked == 0,
            plan: plan.clone(),
        }
    }
}

/// One row of a commit result
#[derive(Debug, Serialize, Deserialize)]
pub struct CommitItem {
    pub original_name: String,
    pub proposed_name: String,
    /// Where the file is now (the new path when renamed)
    pub path: PathBuf,
    pub outcome: RenameOutcome,
}

/// Result of a rename operation
#[derive(Debug, Serialize, Deserialize)]
pub struct CommitResult {
    pub committed: bool,
    pub counts: CommitCounts,
    pub items: Vec<CommitItem>,
    /// Validation problems when the plan was not executable
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub blocked: Vec<BlockedItem>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BlockedItem {
    pub original_name: String,
    pub proposed_name: String,
    pub verdict: ValidationVerdict,
}

impl CommitResult {
    /// Result for a committed plan; `plan` must be the plan after commit
    pub fn committed(plan: &RenamePlan, report: &CommitReport) -> Self {
        let items = plan
            .entries
            .iter()
            .zip(&report.outcomes)
            .map(|(planned, outcome)| CommitItem {
                original_name: planned.entry.original_display_name.clone(),
                proposed_name: planned.entry.proposed.to_string(),
                path: planned.entry.original_path.clone(),
                outcome: outcome.clone(),
            })
            .collect();

        Self {
            committed: true,
            counts: report.counts,
            items,
            blocked: Vec::new(),
        }
    }

    /// Result for a plan that was never committed
    pub fn not_committed(plan: &RenamePlan) -> Self {
        let blocked = plan
            .entries
            .iter()
            .filter(|planned| !planned.verdict.is_ok())
            .map(|planned| BlockedItem {
                original_name: planned.entry.original_display_name.clone(),
                proposed_name: planned.entry.proposed.to_string(),
                verdict: planned.verdict.clone(),
            })
            .collect();

        Self {
            committed: false,
            counts: CommitCounts::default(),
            items: Vec::new(),
            blocked,
        }
    }
}

/// Result of a version command
#[derive(Debug, Serialize, Deserialize)]
pub struct VersionResult {
    pub name: String,
    pub version: String,
}

/// Trait for formatting output in different formats
pub trait OutputFormatter {
    fn format(&self, format: OutputFormat) -> String {
        match format {
            OutputFormat::Json => self.format_json(),
            OutputFormat::Summary => self.format_summary(),
        }
    }
    fn format_json(&self) -> String;
    fn format_summary(&self) -> String;
}

impl OutputFormatter for PlanResult {
    fn format_json(&self) -> String {
        serde_json::to_string(&json!({
            "success": self.executable,
            "operation": "plan",
            "summary": {
                "total": self.total,
                "ok": self.ok,
                "blocked": self.blocked,
            },
            "plan": self.plan,
        }))
        .unwrap_or_default()
    }

    fn format_summary(&self) -> String {
        let mut output = String::new();
        if self.executable {
            writeln!(
                output,
                "✓ {} renames ready. Run `filerenamer rename` with the same arguments to apply.",
                self.total
            )
            .unwrap();
        } else {
            writeln!(
                output,
                "✗ {} of {} entries have problems; nothing will be renamed until they are fixed.",
                self.blocked, self.total
            )
            .unwrap();
        }
        output
    }
}

impl OutputFormatter for CommitResult {
    fn format_json(&self) -> String {
        serde_json::to_string(&json!({
            "success": self.committed && self.counts.failed == 0,
            "operation": "rename",
            "committed": self.committed,
            "summary": {
                "renamed": self.counts.renamed,
                "skipped": self.counts.skipped,
                "failed": self.counts.failed,
            },
            "items": self.items,
            "blocked": self.blocked,
        }))
        .unwrap_or_default()
    }

    fn format_summary(&self) -> String {
        let mut output = String::new();

        if !self.committed {
            writeln!(
                output,
                "✗ Nothing renamed: {} entries failed validation",
                self.blocked.len()
            )
            .unwrap();
            for item in &self.blocked {
                writeln!(
                    output,
                    "  {} -> {}: {}",
                    item.original_name, item.proposed_name, item.verdict
                )
                .unwrap();
            }
            return output;
        }

        writeln!(
            output,
            "Done: {} renamed, {} skipped, {} failed",
            self.counts.renamed, self.counts.skipped, self.counts.failed
        )
        .unwrap();

        for item in &self.items {
            if let RenameOutcome::Failed(reason) = &item.outcome {
                writeln!(
                    output,
                    "  {} -> {}: {}",
                    item.original_name, item.proposed_name, reason
                )
                .unwrap();
            }
        }

        output
    }
}

impl OutputFormatter for VersionResult {
    fn format_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    fn format_summary(&self) -> String {
        format!("{} {}\n", self.name, self.version)
    }
}
