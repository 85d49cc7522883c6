use anyhow::Result;
use filerenamer_core::{
    rename_operation, write_report, BatchRequest, OutputFormatter, Preview, RenameOptions,
};
use std::path::PathBuf;

use crate::OutputFormat;

/// Preview, confirm and commit; returns whether every entry went through
pub fn handle_rename(
    request: &BatchRequest,
    preview: Preview,
    output: OutputFormat,
    log_file: Option<PathBuf>,
    auto_approve: bool,
    use_color: Option<bool>,
) -> Result<bool> {
    let options = RenameOptions {
        preview: if output == OutputFormat::Json {
            Preview::None
        } else {
            preview
        },
        use_color,
        auto_approve,
        log_file,
    };

    let (result, message) = rename_operation(request, &options)?;

    if let Some(message) = message {
        println!("{}", message);
        return Ok(true);
    }

    match (output, &result.report) {
        (OutputFormat::Json, _) => println!("{}", result.to_commit_result().format_json()),
        (OutputFormat::Summary, Some(report)) => write_report(&result.plan, report, use_color)?,
        (OutputFormat::Summary, None) => print!("{}", result.to_commit_result().format_summary()),
    }

    Ok(result.succeeded())
}
