use crate::convention::{candidate_path, NameRules};
use crate::error::CommitError;
use crate::model::{CommitReport, FailureReason, PlannedEntry, RenameOutcome, RenamePlan};
use crate::planner::target_occupied;
use anyhow::Result;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Options for committing a rename plan
#[derive(Debug, Clone, Default)]
pub struct CommitOptions {
    /// Append one line per attempted entry to this file
    pub log_file: Option<PathBuf>,
}

/// Append-only record of what a commit did
struct CommitJournal {
    file: Option<File>,
}

impl CommitJournal {
    fn open(log_file: Option<&Path>) -> Self {
        let file = log_file.and_then(|path| match open_log(path) {
            Ok(file) => Some(file),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "cannot open commit log");
                None
            },
        });
        Self { file }
    }

    fn log(&mut self, message: &str) {
        if let Some(ref mut file) = self.file {
            let written = writeln!(
                file,
                "[{}] {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                message
            )
            .and_then(|()| file.flush());
            if let Err(e) = written {
                warn!(error = %e, "cannot write commit log");
            }
        }
    }
}

fn open_log(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    Ok(OpenOptions::new().create(true).append(true).open(path)?)
}

/// Apply an executable plan to the filesystem.
///
/// Every entry is attempted exactly once, in plan order, whatever happened to
/// the entries before it. Completed renames are not rolled back. Successful
/// entries have their `original_path` moved to the new location.
pub fn commit_plan(
    plan: &mut RenamePlan,
    options: &CommitOptions,
) -> Result<CommitReport, CommitError> {
    if !plan.all_ok() {
        return Err(CommitError::PlanNotExecutable {
            blocked: plan.blocked_count(),
            total: plan.len(),
        });
    }

    let mut journal = CommitJournal::open(options.log_file.as_deref());
    journal.log(&format!("Starting commit of {} entries", plan.len()));

    let rules = plan.rules;
    let mut outcomes = Vec::with_capacity(plan.len());

    for (index, planned) in plan.entries.iter_mut().enumerate() {
        let from = planned.entry.original_path.clone();
        let outcome = commit_entry(planned, rules);

        debug!(index, from = %from.display(), outcome = %outcome, "committed entry");
        match &outcome {
            RenameOutcome::Renamed => journal.log(&format!(
                "Renamed: {} -> {}",
                from.display(),
                planned.entry.original_path.display()
            )),
            RenameOutcome::Failed(reason) => {
                journal.log(&format!("Failed: {} ({})", from.display(), reason));
            },
            skipped => journal.log(&format!("Skipped: {} ({})", from.display(), skipped)),
        }

        outcomes.push(outcome);
    }

    let report = CommitReport::from_outcomes(outcomes);
    journal.log(&format!(
        "Finished: {} renamed, {} skipped, {} failed",
        report.counts.renamed, report.counts.skipped, report.counts.failed
    ));
    info!(
        renamed = report.counts.renamed,
        skipped = report.counts.skipped,
        failed = report.counts.failed,
        "committed rename batch"
    );

    Ok(report)
}

fn commit_entry(planned: &mut PlannedEntry, rules: NameRules) -> RenameOutcome {
    if !planned.verdict.is_ok() {
        return RenameOutcome::SkippedInvalid;
    }

    let name = match planned.proposed_name() {
        Some(name) if !name.is_empty() && rules.is_valid_component(name) => name.to_string(),
        _ => return RenameOutcome::SkippedInvalid,
    };

    let original = planned.entry.original_path.clone();
    let candidate = candidate_path(&original, &name);

    // Full path equality only: a case-only change is a real rename.
    if original == candidate {
        return RenameOutcome::SkippedNoOp;
    }

    // rename(2) replaces an existing target silently, so look first.
    if let Err(e) = fs::symlink_metadata(&original) {
        return RenameOutcome::Failed(classify_io_error(&e));
    }
    match target_occupied(&original, &candidate, rules) {
        Ok(true) => return RenameOutcome::Failed(FailureReason::TargetAlreadyExists),
        Ok(false) => {},
        Err(e) => return RenameOutcome::Failed(classify_io_error(&e)),
    }

    match fs::rename(&original, &candidate) {
        Ok(()) => {
            planned.entry.original_path = candidate.clone();
            planned.candidate_path = Some(candidate);
            RenameOutcome::Renamed
        },
        Err(e) => RenameOutcome::Failed(classify_io_error(&e)),
    }
}

/// Map an I/O error from a rename onto a failure reason
pub fn classify_io_error(err: &io::Error) -> FailureReason {
    match err.kind() {
        io::ErrorKind::NotFound => FailureReason::SourceMissing,
        io::ErrorKind::AlreadyExists => FailureReason::TargetAlreadyExists,
        io::ErrorKind::PermissionDenied => FailureReason::PermissionDenied,
        io::ErrorKind::InvalidInput | io::ErrorKind::InvalidFilename => FailureReason::InvalidName,
        _ if is_invalid_name_os_error(err) => FailureReason::InvalidName,
        _ => FailureReason::Other(err.to_string()),
    }
}

#[cfg(windows)]
fn is_invalid_name_os_error(err: &io::Error) -> bool {
    // ERROR_INVALID_NAME
    err.raw_os_error() == Some(123)
}

#[cfg(not(windows))]
fn is_invalid_name_os_error(_err: &io::Error) -> bool {
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convention::{FilesystemConvention, ReservedCharset};
    use crate::model::{Proposal, ValidationVerdict};
    use crate::planner::plan_batch;
    use tempfile::TempDir;

    fn rules() -> NameRules {
        NameRules::new(FilesystemConvention::CaseSensitive, ReservedCharset::Posix)
    }

    fn touch(dir: &TempDir, name: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, name).unwrap();
        path
    }

    #[test]
    fn test_classify_io_errors() {
        let cases = [
            (io::ErrorKind::NotFound, FailureReason::SourceMissing),
            (
                io::ErrorKind::AlreadyExists,
                FailureReason::TargetAlreadyExists,
            ),
            (
                io::ErrorKind::PermissionDenied,
                FailureReason::PermissionDenied,
            ),
            (io::ErrorKind::InvalidInput, FailureReason::InvalidName),
            (io::ErrorKind::InvalidFilename, FailureReason::InvalidName),
        ];
        for (kind, expected) in cases {
            assert_eq!(classify_io_error(&io::Error::new(kind, "x")), expected);
        }
        assert!(matches!(
            classify_io_error(&io::Error::new(io::ErrorKind::Other, "disk on fire")),
            FailureReason::Other(ref msg) if msg.contains("disk on fire")
        ));
    }

    #[test]
    fn test_rejects_non_executable_plan() {
        let temp_dir = TempDir::new().unwrap();
        let a = touch(&temp_dir, "a.txt");

        let mut plan = plan_batch(&[a.clone()], vec![Proposal::from("")], rules()).unwrap();
        let err = commit_plan(&mut plan, &CommitOptions::default()).unwrap_err();

        assert_eq!(
            err,
            CommitError::PlanNotExecutable {
                blocked: 1,
                total: 1
            }
        );
        assert!(a.exists());
    }

    #[test]
    fn test_no_op_makes_no_filesystem_call() {
        let temp_dir = TempDir::new().unwrap();
        // Never created: any rename attempt would report SourceMissing
        let ghost = temp_dir.path().join("ghost.txt");

        let mut plan = plan_batch(&[ghost], vec![Proposal::from("ghost.txt")], rules()).unwrap();
        let report = commit_plan(&mut plan, &CommitOptions::default()).unwrap();

        assert_eq!(report.outcomes, vec![RenameOutcome::SkippedNoOp]);
        assert_eq!(report.counts.skipped, 1);
    }

    #[test]
    fn test_renamed_entry_tracks_new_path() {
        let temp_dir = TempDir::new().unwrap();
        let a = touch(&temp_dir, "a.txt");

        let mut plan = plan_batch(&[a.clone()], vec![Proposal::from("b.txt")], rules()).unwrap();
        let report = commit_plan(&mut plan, &CommitOptions::default()).unwrap();

        let b = temp_dir.path().join("b.txt");
        assert_eq!(report.outcomes, vec![RenameOutcome::Renamed]);
        assert_eq!(plan.entries[0].entry.original_path, b);
        assert_eq!(plan.entries[0].entry.original_display_name, "a.txt");
        assert!(!a.exists());
        assert_eq!(fs::read_to_string(&b).unwrap(), "a.txt");
    }

    #[test]
    fn test_case_only_rename_is_attempted() {
        let temp_dir = TempDir::new().unwrap();
        let original = touch(&temp_dir, "Report.TXT");

        let mut plan =
            plan_batch(&[original], vec![Proposal::from("report.txt")], rules()).unwrap();
        let report = commit_plan(&mut plan, &CommitOptions::default()).unwrap();

        assert_eq!(report.outcomes, vec![RenameOutcome::Renamed]);
        let names: Vec<String> = fs::read_dir(temp_dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["report.txt".to_string()]);
    }

    #[test]
    fn test_source_removed_after_planning() {
        let temp_dir = TempDir::new().unwrap();
        let a = touch(&temp_dir, "a.txt");

        let mut plan = plan_batch(&[a.clone()], vec![Proposal::from("b.txt")], rules()).unwrap();
        fs::remove_file(&a).unwrap();
        let report = commit_plan(&mut plan, &CommitOptions::default()).unwrap();

        assert_eq!(
            report.outcomes,
            vec![RenameOutcome::Failed(FailureReason::SourceMissing)]
        );
    }

    #[test]
    fn test_partial_failure_does_not_stop_batch() {
        let temp_dir = TempDir::new().unwrap();
        let one = touch(&temp_dir, "one.txt");
        let two = touch(&temp_dir, "two.txt");
        let three = touch(&temp_dir, "three.txt");

        let mut plan = plan_batch(
            &[one, two.clone(), three],
            vec!["1.txt".into(), "2.txt".into(), "3.txt".into()],
            rules(),
        )
        .unwrap();
        assert!(plan.all_ok());

        // Someone else claims the second target between preview and commit
        fs::write(temp_dir.path().join("2.txt"), "intruder").unwrap();

        let report = commit_plan(&mut plan, &CommitOptions::default()).unwrap();

        assert_eq!(
            report.outcomes,
            vec![
                RenameOutcome::Renamed,
                RenameOutcome::Failed(FailureReason::TargetAlreadyExists),
                RenameOutcome::Renamed,
            ]
        );
        assert_eq!(report.counts.renamed, 2);
        assert_eq!(report.counts.failed, 1);
        assert!(two.exists());
        assert_eq!(
            fs::read_to_string(temp_dir.path().join("2.txt")).unwrap(),
            "intruder"
        );
        assert!(temp_dir.path().join("3.txt").exists());
    }

    #[test]
    fn test_case_variant_created_after_planning_is_not_overwritten() {
        let temp_dir = TempDir::new().unwrap();
        let original = temp_dir.path().join("Report.TXT");
        fs::write(&original, "ORIGINAL").unwrap();
        let insensitive =
            NameRules::new(FilesystemConvention::CaseInsensitive, ReservedCharset::Posix);

        let mut plan =
            plan_batch(&[original.clone()], vec![Proposal::from("report.txt")], insensitive)
                .unwrap();
        assert!(plan.all_ok());

        let other = temp_dir.path().join("report.txt");
        fs::write(&other, "PRECIOUS").unwrap();
        // Only meaningful where the two spellings are really different files
        if fs::read_to_string(&original).unwrap() != "ORIGINAL" {
            return;
        }

        let report = commit_plan(&mut plan, &CommitOptions::default()).unwrap();

        assert_eq!(
            report.outcomes,
            vec![RenameOutcome::Failed(FailureReason::TargetAlreadyExists)]
        );
        assert_eq!(fs::read_to_string(&other).unwrap(), "PRECIOUS");
        assert_eq!(fs::read_to_string(&original).unwrap(), "ORIGINAL");
    }

    #[cfg(unix)]
    #[test]
    fn test_overlong_target_fails_as_invalid_name() {
        let temp_dir = TempDir::new().unwrap();
        let a = touch(&temp_dir, "a.txt");

        let mut plan = plan_batch(&[a.clone()], vec![Proposal::from("b.txt")], rules()).unwrap();
        // Swap in a name the OS rejects after validation
        plan.entries[0].entry.proposed = Proposal::from(format!("{}.txt", "x".repeat(300)));

        let report = commit_plan(&mut plan, &CommitOptions::default()).unwrap();

        assert_eq!(
            report.outcomes,
            vec![RenameOutcome::Failed(FailureReason::InvalidName)]
        );
        assert!(a.exists());
    }

    #[test]
    fn test_invalid_entry_is_skipped_defensively() {
        let temp_dir = TempDir::new().unwrap();
        let a = touch(&temp_dir, "a.txt");

        let mut plan = plan_batch(&[a.clone()], vec![Proposal::from("b.txt")], rules()).unwrap();
        // Tamper with the plan after validation
        plan.entries[0].entry.proposed = Proposal::from("bad/name.txt");
        assert_eq!(plan.entries[0].verdict, ValidationVerdict::Ok);

        let report = commit_plan(&mut plan, &CommitOptions::default()).unwrap();

        assert_eq!(report.outcomes, vec![RenameOutcome::SkippedInvalid]);
        assert!(a.exists());
    }

    #[test]
    fn test_commit_log_records_entries() {
        let temp_dir = TempDir::new().unwrap();
        let a = touch(&temp_dir, "a.txt");
        let b = touch(&temp_dir, "b.txt");
        let log_file = temp_dir.path().join("logs").join("commit.log");

        let mut plan = plan_batch(
            &[a, b],
            vec!["renamed.txt".into(), "b.txt".into()],
            rules(),
        )
        .unwrap();
        let options = CommitOptions {
            log_file: Some(log_file.clone()),
        };
        commit_plan(&mut plan, &options).unwrap();

        let log = fs::read_to_string(&log_file).unwrap();
        assert!(log.contains("Starting commit of 2 entries"));
        assert!(log.contains("Renamed:"));
        assert!(log.contains("renamed.txt"));
        assert!(log.contains("Skipped:"));
        assert!(log.contains("Finished: 1 renamed, 1 skipped, 0 failed"));
    }

    #[test]
    fn test_end_to_end_scenario() {
        let temp_dir = TempDir::new().unwrap();
        let img1 = touch(&temp_dir, "img1.png");
        let img2 = touch(&temp_dir, "img2.png");

        let mut plan = plan_batch(
            &[img1, img2],
            vec!["photo_01.png".into(), "photo_02.png".into()],
            rules(),
        )
        .unwrap();
        assert_eq!(
            plan.verdicts(),
            vec![ValidationVerdict::Ok, ValidationVerdict::Ok]
        );

        let report = commit_plan(&mut plan, &CommitOptions::default()).unwrap();
        assert_eq!(
            report.outcomes,
            vec![RenameOutcome::Renamed, RenameOutcome::Renamed]
        );
        assert_eq!(report.counts.renamed, 2);
        assert_eq!(report.counts.skipped, 0);
        assert_eq!(report.counts.failed, 0);
        assert!(temp_dir.path().join("photo_01.png").exists());
        assert!(temp_dir.path().join("photo_02.png").exists());
    }
}
