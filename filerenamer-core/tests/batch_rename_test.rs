use filerenamer_core::{
    commit_plan, plan_batch, plan_operation, rename_operation, BatchRequest, CaseSetting,
    CommitError, CommitOptions, EnumerateOptions, FailureReason, FilesystemConvention, NameRules,
    NameSource, Preview, Proposal, RenameOptions, RenameOutcome, ReservedCharset, Rule,
    ValidationVerdict,
};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn posix() -> NameRules {
    NameRules::new(FilesystemConvention::CaseSensitive, ReservedCharset::Posix)
}

fn touch(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_swap_is_blocked_before_any_rename() {
    let temp_dir = TempDir::new().unwrap();
    let a = touch(&temp_dir, "a.txt", "A");
    let b = touch(&temp_dir, "b.txt", "B");

    let mut plan = plan_batch(
        &[a.clone(), b.clone()],
        vec![Proposal::from("b.txt"), Proposal::from("a.txt")],
        posix(),
    )
    .unwrap();

    assert_eq!(
        plan.verdicts(),
        vec![ValidationVerdict::TargetExists, ValidationVerdict::TargetExists]
    );

    let err = commit_plan(&mut plan, &CommitOptions::default()).unwrap_err();
    assert_eq!(err, CommitError::PlanNotExecutable { blocked: 2, total: 2 });
    assert_eq!(fs::read_to_string(&a).unwrap(), "A");
    assert_eq!(fs::read_to_string(&b).unwrap(), "B");
}

#[test]
fn test_chain_rename_through_fresh_names() {
    let temp_dir = TempDir::new().unwrap();
    let a = touch(&temp_dir, "a.txt", "A");
    let b = touch(&temp_dir, "b.txt", "B");

    let mut plan = plan_batch(
        &[a, b],
        vec![Proposal::from("c.txt"), Proposal::from("d.txt")],
        posix(),
    )
    .unwrap();
    assert!(plan.all_ok());

    let report = commit_plan(&mut plan, &CommitOptions::default()).unwrap();
    assert_eq!(report.counts.renamed, 2);
    assert_eq!(
        fs::read_to_string(temp_dir.path().join("c.txt")).unwrap(),
        "A"
    );
    assert_eq!(
        fs::read_to_string(temp_dir.path().join("d.txt")).unwrap(),
        "B"
    );
}

#[test]
fn test_source_removed_between_plan_and_commit() {
    let temp_dir = TempDir::new().unwrap();
    let a = touch(&temp_dir, "a.txt", "A");
    let b = touch(&temp_dir, "b.txt", "B");

    let mut plan = plan_batch(
        &[a.clone(), b],
        vec![Proposal::from("x.txt"), Proposal::from("y.txt")],
        posix(),
    )
    .unwrap();
    fs::remove_file(&a).unwrap();

    let report = commit_plan(&mut plan, &CommitOptions::default()).unwrap();
    assert_eq!(
        report.outcomes,
        vec![
            RenameOutcome::Failed(FailureReason::SourceMissing),
            RenameOutcome::Renamed
        ]
    );
    assert!(report.has_failures());
    assert!(temp_dir.path().join("y.txt").exists());
}

#[test]
fn test_unchanged_names_are_skipped() {
    let temp_dir = TempDir::new().unwrap();
    let a = touch(&temp_dir, "keep.txt", "K");

    let mut plan = plan_batch(&[a], vec![Proposal::from(" keep.txt ")], posix()).unwrap();
    assert!(plan.all_ok());

    let report = commit_plan(&mut plan, &CommitOptions::default()).unwrap();
    assert_eq!(report.outcomes, vec![RenameOutcome::SkippedNoOp]);
    assert_eq!(report.counts.skipped, 1);
}

#[test]
fn test_operations_plan_then_rename_recursive_with_filter() {
    let temp_dir = TempDir::new().unwrap();
    fs::create_dir(temp_dir.path().join("nested")).unwrap();
    touch(&temp_dir, "IMG_1.jpg", "1");
    touch(&temp_dir, "notes.txt", "n");
    fs::write(temp_dir.path().join("nested").join("IMG_2.jpg"), "2").unwrap();

    let request = BatchRequest {
        inputs: vec![temp_dir.path().to_path_buf()],
        enumerate: EnumerateOptions {
            recursive: true,
            name_filter: Some("img".to_string()),
        },
        names: NameSource::Originals,
        rules: vec![Rule::Replace {
            find: "img_".to_string(),
            replace: "holiday-".to_string(),
            case_sensitive: false,
        }],
        case: CaseSetting::Sensitive,
        charset: Some(ReservedCharset::Posix),
    };

    let (result, _) = plan_operation(&request).unwrap();
    assert_eq!(result.total, 2);
    assert!(result.executable);
    assert!(temp_dir.path().join("IMG_1.jpg").exists());

    let options = RenameOptions {
        preview: Preview::None,
        use_color: Some(false),
        auto_approve: true,
        log_file: None,
    };
    let (renamed, message) = rename_operation(&request, &options).unwrap();

    assert!(message.is_none());
    assert!(renamed.succeeded());
    assert!(temp_dir.path().join("holiday-1.jpg").exists());
    assert!(temp_dir.path().join("nested").join("holiday-2.jpg").exists());
    assert!(temp_dir.path().join("notes.txt").exists());
}

#[test]
fn test_creation_date_names_collide_within_same_second() {
    let temp_dir = TempDir::new().unwrap();
    touch(&temp_dir, "a.jpg", "");
    touch(&temp_dir, "b.jpg", "");

    let request = BatchRequest {
        inputs: vec![temp_dir.path().to_path_buf()],
        names: NameSource::CreationDate(filerenamer_core::DateRule {
            format: "fixed".to_string(),
            prefix: "shot_".to_string(),
            suffix: String::new(),
        }),
        case: CaseSetting::Sensitive,
        charset: Some(ReservedCharset::Posix),
        ..BatchRequest::default()
    };

    let (result, plan) = plan_operation(&request).unwrap();
    assert!(!result.executable);
    assert_eq!(plan.entries[0].entry.proposed, Proposal::from("shot_fixed.jpg"));
    assert_eq!(
        plan.verdicts(),
        vec![ValidationVerdict::Ok, ValidationVerdict::BatchCollision]
    );
}
