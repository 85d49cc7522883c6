use crate::config::CaseSetting;
use crate::convention::{FilesystemConvention, NameRules, ReservedCharset};
use crate::enumerate::{collect_files, EnumerateOptions};
use crate::error::PlanError;
use crate::model::RenamePlan;
use crate::output::PlanResult;
use crate::planner::Planner;
use crate::rules::{
    apply_rules, creation_date_names, names_from_text, seed_from_originals, DateRule, Rule,
};
use anyhow::Result;
use std::path::PathBuf;
use tracing::debug;

/// Where the initial list of proposed names comes from
#[derive(Debug, Clone, Default)]
pub enum NameSource {
    /// Start from the current file names
    #[default]
    Originals,
    /// One name per non-empty line
    Text(String),
    /// Names derived from each file's creation time
    CreationDate(DateRule),
}

/// Everything needed to build a rename batch
#[derive(Debug, Clone, Default)]
pub struct BatchRequest {
    /// Files and directories to rename
    pub inputs: Vec<PathBuf>,
    pub enumerate: EnumerateOptions,
    pub names: NameSource,
    /// Applied in order after the names are loaded
    pub rules: Vec<Rule>,
    pub case: CaseSetting,
    /// Reserved character set; the platform default when unset
    pub charset: Option<ReservedCharset>,
}

/// Pick the naming rules for a batch, probing the first file's directory when
/// case sensitivity is left to auto-detection.
pub fn resolve_name_rules(
    case: CaseSetting,
    charset: Option<ReservedCharset>,
    files: &[PathBuf],
) -> NameRules {
    let convention = case.convention().unwrap_or_else(|| {
        files
            .first()
            .and_then(|file| file.parent())
            .and_then(FilesystemConvention::detect)
            .unwrap_or_else(FilesystemConvention::platform_default)
    });

    NameRules::new(
        convention,
        charset.unwrap_or_else(ReservedCharset::platform_default),
    )
}

/// Enumerate the files, generate their proposed names and validate the batch
pub fn build_plan(request: &BatchRequest) -> Result<RenamePlan> {
    let files = collect_files(&request.inputs, &request.enumerate)?;
    if files.is_empty() {
        return Err(PlanError::NoFiles.into());
    }

    let name_rules = resolve_name_rules(request.case, request.charset, &files);

    let mut proposals = match &request.names {
        NameSource::Originals => seed_from_originals(&files),
        NameSource::Text(text) => names_from_text(text),
        NameSource::CreationDate(rule) => creation_date_names(&files, rule, name_rules)?,
    };

    let changed = apply_rules(&mut proposals, &request.rules)?;
    debug!(?changed, "applied naming rules");

    Ok(Planner::new(name_rules).plan(&files, proposals)?)
}

/// High-level plan operation - equivalent to `filerenamer plan` command
pub fn plan_operation(request: &BatchRequest) -> Result<(PlanResult, RenamePlan)> {
    let plan = build_plan(request)?;
    Ok((PlanResult::from(&plan), plan))
}
