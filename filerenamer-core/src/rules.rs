//! Name generation: turn the original file list into proposed names.
//!
//! Rules operate on a list of [`Proposal`]s correlated by position with the
//! original files. Entries that already failed upstream pass through untouched.

use crate::convention::NameRules;
use crate::error::RuleError;
use crate::model::{display_name, Proposal, UpstreamError};
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Local};
use regex::{NoExpand, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const DEFAULT_DATE_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Where inserted text goes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsertPosition {
    Start,
    End,
    /// Character index, clamped to the name length
    Index(usize),
}

impl FromStr for InsertPosition {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "start" | "begin" => Ok(Self::Start),
            "end" => Ok(Self::End),
            other => other
                .parse::<i64>()
                .map(|index| Self::Index(usize::try_from(index).unwrap_or(0)))
                .map_err(|_| RuleError::InvalidPosition(s.to_string())),
        }
    }
}

/// A transformation applied to every proposed name in order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum Rule {
    Replace {
        find: String,
        replace: String,
        case_sensitive: bool,
    },
    Insert {
        text: String,
        position: InsertPosition,
    },
    Sequence {
        start: i64,
        pad: usize,
        prefix: String,
        suffix: String,
        position: InsertPosition,
    },
}

impl Rule {
    /// Apply the rule in place, returning how many names changed
    pub fn apply(&self, proposals: &mut [Proposal]) -> Result<usize, RuleError> {
        match self {
            Self::Replace {
                find,
                replace,
                case_sensitive,
            } => apply_replace(proposals, find, replace, *case_sensitive),
            Self::Insert { text, position } => {
                Ok(map_names(proposals, |_, name| insert_at(name, text, *position)))
            },
            Self::Sequence {
                start,
                pad,
                prefix,
                suffix,
                position,
            } => Ok(map_names(proposals, |index, name| {
                let counter = start.saturating_add(i64::try_from(index).unwrap_or(i64::MAX));
                let text = format!("{}{:0width$}{}", prefix, counter, suffix, width = *pad);
                insert_at(name, &text, *position)
            })),
        }
    }
}

/// Apply rules in order; returns the change count of each rule
pub fn apply_rules(proposals: &mut [Proposal], rules: &[Rule]) -> Result<Vec<usize>, RuleError> {
    rules.iter().map(|rule| rule.apply(proposals)).collect()
}

/// Rewrite each usable name; the closure receives the entry position
fn map_names<F>(proposals: &mut [Proposal], mut f: F) -> usize
where
    F: FnMut(usize, &str) -> String,
{
    let mut changed = 0;
    for (index, proposal) in proposals.iter_mut().enumerate() {
        if let Proposal::Name(name) = proposal {
            let updated = f(index, name);
            if updated != *name {
                changed += 1;
                *name = updated;
            }
        }
    }
    changed
}

fn apply_replace(
    proposals: &mut [Proposal],
    find: &str,
    replace: &str,
    case_sensitive: bool,
) -> Result<usize, RuleError> {
    if find.is_empty() {
        return Ok(0);
    }

    if case_sensitive {
        return Ok(map_names(proposals, |_, name| name.replace(find, replace)));
    }

    let pattern = RegexBuilder::new(&regex::escape(find))
        .case_insensitive(true)
        .build()?;
    Ok(map_names(proposals, |_, name| {
        pattern.replace_all(name, NoExpand(replace)).into_owned()
    }))
}

fn insert_at(name: &str, text: &str, position: InsertPosition) -> String {
    match position {
        InsertPosition::Start => format!("{}{}", text, name),
        InsertPosition::End => format!("{}{}", name, text),
        InsertPosition::Index(index) => {
            let split = name
                .char_indices()
                .nth(index)
                .map_or(name.len(), |(byte, _)| byte);
            let mut result = String::with_capacity(name.len() + text.len());
            result.push_str(&name[..split]);
            result.push_str(text);
            result.push_str(&name[split..]);
            result
        },
    }
}

/// One name per non-empty line, as typed or pasted by the user
pub fn names_from_text(text: &str) -> Vec<Proposal> {
    text.lines()
        .filter(|line| !line.is_empty())
        .map(Proposal::from)
        .collect()
}

/// The original file names, used when the user supplies no names list
pub fn seed_from_originals(paths: &[PathBuf]) -> Vec<Proposal> {
    paths
        .iter()
        .map(|path| Proposal::Name(display_name(path)))
        .collect()
}

/// Settings for names derived from each file's creation time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRule {
    /// strftime format string
    pub format: String,
    pub prefix: String,
    pub suffix: String,
}

impl Default for DateRule {
    fn default() -> Self {
        Self {
            format: DEFAULT_DATE_FORMAT.to_string(),
            prefix: String::new(),
            suffix: String::new(),
        }
    }
}

/// Reject empty formats and unknown strftime specifiers up front
pub fn validate_date_format(format: &str) -> Result<(), RuleError> {
    if format.is_empty() || StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return Err(RuleError::InvalidDateFormat {
            format: format.to_string(),
        });
    }
    Ok(())
}

/// `prefix + formatted creation time + suffix + original extension` per file.
///
/// A bad format fails the whole step. Per-file problems become
/// [`Proposal::Failed`] so the planner reports them against that entry.
pub fn creation_date_names(
    paths: &[PathBuf],
    rule: &DateRule,
    name_rules: NameRules,
) -> Result<Vec<Proposal>, RuleError> {
    validate_date_format(&rule.format)?;

    Ok(paths
        .iter()
        .map(|path| match creation_time(path) {
            Ok(created) => {
                let name = format!(
                    "{}{}{}{}",
                    rule.prefix,
                    created.format(&rule.format),
                    rule.suffix,
                    extension_suffix(path)
                );
                if name_rules.charset.find_reserved(&name).is_some() {
                    Proposal::Failed(UpstreamError::InvalidGeneratedName(name))
                } else {
                    Proposal::Name(name)
                }
            },
            Err(reason) => Proposal::Failed(reason),
        })
        .collect())
}

/// Creation time, or modification time where the platform records no birth time
fn creation_time(path: &Path) -> Result<DateTime<Local>, UpstreamError> {
    let metadata = fs::metadata(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => UpstreamError::SourceMissing,
        io::ErrorKind::PermissionDenied => UpstreamError::AccessDenied(e.to_string()),
        _ => UpstreamError::Other(e.to_string()),
    })?;

    metadata
        .created()
        .or_else(|_| metadata.modified())
        .map(DateTime::<Local>::from)
        .map_err(|e| UpstreamError::Other(e.to_string()))
}

fn extension_suffix(path: &Path) -> String {
    path.extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default()
}
