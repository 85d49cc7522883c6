use anyhow::Result;
use filerenamer_core::{plan_operation, write_preview, BatchRequest, OutputFormatter, Preview};

use crate::OutputFormat;

/// Print the plan; returns whether it could be committed as-is
pub fn handle_plan(
    request: &BatchRequest,
    preview: Preview,
    output: OutputFormat,
    use_color: Option<bool>,
) -> Result<bool> {
    let (result, plan) = plan_operation(request)?;

    match output {
        OutputFormat::Json => println!("{}", result.format_json()),
        OutputFormat::Summary => {
            if preview != Preview::None {
                write_preview(&plan, preview, use_color)?;
            }
            print!("{}", result.format_summary());
        },
    }

    Ok(result.executable)
}
