use crate::convention::{candidate_path, is_same_file, NameRules};
use crate::error::PlanError;
use crate::model::{PlannedEntry, Proposal, RenameEntry, RenamePlan, ValidationVerdict};
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Validates rename batches against one filesystem's naming rules.
///
/// Planning only reads the filesystem (existence and identity checks), so the
/// same batch planned twice without outside changes yields the same verdicts.
#[derive(Debug, Clone, Copy)]
pub struct Planner {
    rules: NameRules,
}

impl Planner {
    pub fn new(rules: NameRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> NameRules {
        self.rules
    }

    /// Pair original paths with proposals by position and validate the batch.
    pub fn plan(
        &self,
        original_paths: &[PathBuf],
        proposals: Vec<Proposal>,
    ) -> Result<RenamePlan, PlanError> {
        if original_paths.len() != proposals.len() {
            return Err(PlanError::CountMismatch {
                originals: original_paths.len(),
                proposed: proposals.len(),
            });
        }

        let entries = original_paths
            .iter()
            .zip(proposals)
            .map(|(path, proposal)| RenameEntry::new(path.clone(), proposal))
            .collect();

        Ok(self.plan_entries(entries))
    }

    /// Validate already-paired entries. Always returns a full-length plan.
    pub fn plan_entries(&self, entries: Vec<RenameEntry>) -> RenamePlan {
        let mut assigned: HashSet<PathBuf> = HashSet::with_capacity(entries.len());

        let planned: Vec<PlannedEntry> = entries
            .into_iter()
            .enumerate()
            .map(|(index, entry)| {
                let (candidate_path, verdict) = self.validate(&entry, &mut assigned);
                debug!(
                    index,
                    original = %entry.original_path.display(),
                    proposed = %entry.proposed,
                    verdict = %verdict,
                    "validated entry"
                );
                PlannedEntry {
                    entry,
                    candidate_path,
                    verdict,
                }
            })
            .collect();

        let plan = RenamePlan {
            entries: planned,
            rules: self.rules,
        };

        info!(
            entries = plan.len(),
            blocked = plan.blocked_count(),
            convention = ?self.rules.convention,
            "planned rename batch"
        );

        plan
    }

    fn validate(
        &self,
        entry: &RenameEntry,
        assigned: &mut HashSet<PathBuf>,
    ) -> (Option<PathBuf>, ValidationVerdict) {
        let name = match &entry.proposed {
            Proposal::Failed(reason) => {
                return (None, ValidationVerdict::UpstreamError(reason.clone()))
            },
            Proposal::Name(name) => name.trim(),
        };

        if name.is_empty() {
            return (None, ValidationVerdict::EmptyName);
        }

        if !self.rules.is_valid_component(name) {
            return (None, ValidationVerdict::InvalidCharacters);
        }

        let candidate = candidate_path(&entry.original_path, name);

        match target_occupied(&entry.original_path, &candidate, self.rules) {
            Ok(true) => return (Some(candidate), ValidationVerdict::TargetExists),
            Ok(false) => {},
            // Too long or otherwise rejected by the OS
            Err(e) if e.kind() == io::ErrorKind::InvalidFilename => {
                return (Some(candidate), ValidationVerdict::InvalidCharacters)
            },
            // Unreadable parent and the like: the commit reports the real error
            Err(e) => {
                debug!(
                    candidate = %candidate.display(),
                    error = %e,
                    "cannot check target, leaving it to commit"
                );
            },
        }

        if !assigned.insert(self.rules.convention.path_key(&candidate)) {
            return (Some(candidate), ValidationVerdict::BatchCollision);
        }

        (Some(candidate), ValidationVerdict::Ok)
    }
}

/// Whether renaming `original` to `candidate` would land on a different file.
///
/// Uses `symlink_metadata` so a dangling symlink still counts as occupied.
/// Errors other than `NotFound` are returned so callers can report them.
pub(crate) fn target_occupied(
    original: &Path,
    candidate: &Path,
    rules: NameRules,
) -> io::Result<bool> {
    match fs::symlink_metadata(candidate) {
        Ok(_) => Ok(!is_same_file(original, candidate, rules.convention)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}

/// Plan a batch given as two position-correlated lists.
pub fn plan_batch(
    original_paths: &[PathBuf],
    proposals: Vec<Proposal>,
    rules: NameRules,
) -> Result<RenamePlan, PlanError> {
    Planner::new(rules).plan(original_paths, proposals)
}
