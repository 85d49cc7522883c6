use clap::{Args, Parser, Subcommand};
use filerenamer_core::InsertPosition;
use std::path::PathBuf;

use super::types::{CharsetArg, OutputFormat, PreviewArg};

/// Preview-then-commit batch file renamer
#[derive(Parser, Debug)]
#[command(name = "filerenamer")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Disable colored output
    #[arg(
        long,
        global = true,
        env = "NO_COLOR",
        value_parser = clap::builder::BoolishValueParser::new()
    )]
    pub no_color: bool,

    /// Run as if started in <path> instead of the current working directory
    #[arg(short = 'C', global = true, value_name = "PATH")]
    pub directory: Option<PathBuf>,

    /// Assume yes for all prompts
    #[arg(
        short = 'y',
        long = "yes",
        global = true,
        env = "FILERENAMER_YES",
        value_parser = clap::builder::BoolishValueParser::new()
    )]
    pub yes: bool,

    /// Treat names that differ only in case as different files (skips the
    /// case probe, which otherwise writes a throwaway file near the inputs
    /// when the system temp directory is on another device)
    #[arg(long, global = true, conflicts_with = "case_insensitive")]
    pub case_sensitive: bool,

    /// Treat names that differ only in case as the same file
    #[arg(long, global = true)]
    pub case_insensitive: bool,

    /// Reserved character set for new names (defaults to the platform's)
    #[arg(long, global = true, value_enum)]
    pub charset: Option<CharsetArg>,
}

/// Which files to rename and how to name them
#[derive(Args, Debug, Clone)]
pub struct BatchArgs {
    /// Files and directories to rename
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Include files in subdirectories
    #[arg(short = 'r', long)]
    pub recursive: bool,

    /// Only rename files whose name contains this text (case-insensitive)
    #[arg(long, value_name = "TEXT")]
    pub filter: Option<String>,

    #[command(flatten)]
    pub names: NameArgs,

    #[command(flatten)]
    pub rules: RuleArgs,
}

/// Where the proposed names come from
#[derive(Args, Debug, Clone)]
pub struct NameArgs {
    /// Read proposed names from a file, one per line (`-` for stdin)
    #[arg(long, value_name = "FILE", conflicts_with = "date_format")]
    pub names: Option<String>,

    /// Name files after their creation date (strftime format, e.g. "%Y%m%d_%H%M%S")
    #[arg(long, value_name = "FORMAT", num_args = 0..=1, default_missing_value = "")]
    pub date_format: Option<String>,

    /// Text placed before the date
    #[arg(long, default_value = "", requires = "date_format")]
    pub date_prefix: String,

    /// Text placed after the date, before the extension
    #[arg(long, default_value = "", requires = "date_format")]
    pub date_suffix: String,
}

/// Rules applied to the proposed names, in the order listed here
#[derive(Args, Debug, Clone)]
pub struct RuleArgs {
    /// Replace every occurrence of this text
    #[arg(long, value_name = "TEXT")]
    pub find: Option<String>,

    /// Replacement for --find
    #[arg(long, value_name = "TEXT", default_value = "", requires = "find")]
    pub replace_with: String,

    /// Match --find regardless of case
    #[arg(long, requires = "find")]
    pub ignore_case: bool,

    /// Insert this text into every name
    #[arg(long, value_name = "TEXT")]
    pub insert: Option<String>,

    /// Where --insert goes: start, end or a character index
    #[arg(long, value_name = "POSITION", default_value = "end", requires = "insert")]
    pub at: InsertPosition,

    /// Add a running counter to every name
    #[arg(long)]
    pub sequence: bool,

    /// First counter value
    #[arg(long, default_value_t = 1, requires = "sequence", allow_negative_numbers = true)]
    pub seq_start: i64,

    /// Zero-pad the counter to this many digits
    #[arg(long, default_value_t = 0, requires = "sequence")]
    pub seq_pad: usize,

    /// Text before the counter
    #[arg(long, default_value = "", requires = "sequence")]
    pub seq_prefix: String,

    /// Text after the counter
    #[arg(long, default_value = "", requires = "sequence")]
    pub seq_suffix: String,

    /// Where the counter goes: start, end or a character index
    #[arg(long, value_name = "POSITION", default_value = "start", requires = "sequence")]
    pub seq_at: InsertPosition,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show what a batch rename would do without touching any file
    Plan {
        #[command(flatten)]
        batch: BatchArgs,

        /// Preview format (defaults to the configured one)
        #[arg(long, value_enum)]
        preview: Option<PreviewArg>,

        /// Output format for machine consumption
        #[arg(long, value_enum, default_value = "summary")]
        output: OutputFormat,
    },

    /// Rename files after previewing and confirming the plan
    Rename {
        #[command(flatten)]
        batch: BatchArgs,

        /// Preview format (defaults to the configured one)
        #[arg(long, value_enum)]
        preview: Option<PreviewArg>,

        /// Output format for machine consumption
        #[arg(long, value_enum, default_value = "summary")]
        output: OutputFormat,

        /// Append a line per rename to this file
        #[arg(long, value_name = "FILE")]
        log: Option<PathBuf>,
    },

    /// Show version information
    Version {
        /// Output format for machine consumption
        #[arg(long, value_enum, default_value = "summary")]
        output: OutputFormat,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_rule_arguments() {
        let cli = Cli::try_parse_from([
            "filerenamer",
            "plan",
            "photos",
            "--find",
            "IMG",
            "--replace-with",
            "photo",
            "--sequence",
            "--seq-pad",
            "3",
            "--insert",
            "_x",
            "--at",
            "2",
        ])
        .unwrap();

        let Commands::Plan { batch, .. } = cli.command else {
            panic!("expected plan command");
        };
        assert_eq!(batch.rules.find.as_deref(), Some("IMG"));
        assert_eq!(batch.rules.replace_with, "photo");
        assert!(batch.rules.sequence);
        assert_eq!(batch.rules.seq_pad, 3);
        assert_eq!(batch.rules.at, InsertPosition::Index(2));
        assert_eq!(batch.rules.seq_at, InsertPosition::Start);
    }

    #[test]
    fn test_names_conflicts_with_date_format() {
        let result = Cli::try_parse_from([
            "filerenamer",
            "plan",
            "photos",
            "--names",
            "list.txt",
            "--date-format",
            "%Y",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_case_flags_conflict() {
        let result = Cli::try_parse_from([
            "filerenamer",
            "--case-sensitive",
            "--case-insensitive",
            "version",
        ]);
        assert!(result.is_err());
    }
}
