use clap::ValueEnum;
use filerenamer_core::{Preview, ReservedCharset};

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum PreviewArg {
    Table,
    Summary,
    None,
}

impl From<PreviewArg> for Preview {
    fn from(arg: PreviewArg) -> Self {
        match arg {
            PreviewArg::Table => Self::Table,
            PreviewArg::Summary => Self::Summary,
            PreviewArg::None => Self::None,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Summary,
    /// Machine-readable JSON
    Json,
}

impl From<OutputFormat> for filerenamer_core::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Summary => Self::Summary,
            OutputFormat::Json => Self::Json,
        }
    }
}

/// Reserved character set used to validate new names
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum CharsetArg {
    /// Also forbid the characters Windows reserves in file names
    Windows,
    /// Forbid only path separators and NUL
    Posix,
}

impl From<CharsetArg> for ReservedCharset {
    fn from(arg: CharsetArg) -> Self {
        match arg {
            CharsetArg::Windows => Self::Windows,
            CharsetArg::Posix => Self::Posix,
        }
    }
}
