use crate::model::{CommitReport, RenameOutcome, RenamePlan};
use nu_ansi_term::Color as AnsiColor;
use std::fmt::Write;

fn paint(text: &str, color: AnsiColor, use_color: bool) -> String {
    if use_color {
        color.paint(text).to_string()
    } else {
        text.to_string()
    }
}

/// Render plan as a plain line-per-entry summary
pub fn render_summary(plan: &RenamePlan, use_color: bool) -> String {
    let mut output = String::new();
    let blocked = plan.blocked_count();

    writeln!(output, "[PLAN SUMMARY]").unwrap();
    writeln!(output, "Entries: {}", plan.len()).unwrap();
    writeln!(output, "Blocked: {}", blocked).unwrap();
    writeln!(output).unwrap();

    for planned in &plan.entries {
        let line = format!(
            "{} -> {}",
            planned.entry.original_display_name, planned.entry.proposed
        );
        if planned.verdict.is_ok() {
            writeln!(output, "   {}", line).unwrap();
        } else {
            let marked = format!("!! {}  [{}]", line, planned.verdict);
            writeln!(output, "{}", paint(&marked, AnsiColor::Red, use_color)).unwrap();
        }
    }

    if blocked > 0 {
        writeln!(output).unwrap();
        let warning = format!(
            "Plan cannot be applied: {} of {} entries have problems",
            blocked,
            plan.len()
        );
        writeln!(output, "{}", paint(&warning, AnsiColor::Yellow, use_color)).unwrap();
    }

    output
}

/// Render the outcome of a commit: counts, then one line per failure
pub fn render_report(plan: &RenamePlan, report: &CommitReport, use_color: bool) -> String {
    let mut output = String::new();
    let counts = report.counts;

    let headline = format!(
        "Done: {} renamed, {} skipped, {} failed",
        counts.renamed, counts.skipped, counts.failed
    );
    let color = if counts.failed == 0 {
        AnsiColor::Green
    } else {
        AnsiColor::Red
    };
    writeln!(output, "{}", paint(&headline, color, use_color)).unwrap();

    for (planned, outcome) in plan.entries.iter().zip(&report.outcomes) {
        if let RenameOutcome::Failed(reason) = outcome {
            let line = format!(
                "  {} -> {}: {}",
                planned.entry.original_display_name, planned.entry.proposed, reason
            );
            writeln!(output, "{}", paint(&line, AnsiColor::Red, use_color)).unwrap();
        }
    }

    output
}
