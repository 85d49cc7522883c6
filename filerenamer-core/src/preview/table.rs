use crate::model::{RenamePlan, ValidationVerdict};
use comfy_table::{Cell, Color, ContentArrangement, Table};

/// Render plan as a table of original name, proposed name and verdict.
///
/// `fit_terminal` wraps columns to the terminal width; otherwise rows are never wrapped.
pub fn render_table(plan: &RenamePlan, use_color: bool, fit_terminal: bool) -> String {
    let mut table = Table::new();

    if fit_terminal {
        table.set_content_arrangement(ContentArrangement::Dynamic);
    } else {
        table.set_content_arrangement(ContentArrangement::Disabled);
    }

    // Force styling even in non-TTY environments when colors are explicitly requested
    if use_color {
        table.enforce_styling();
        table.set_header(vec![
            Cell::new("#").fg(Color::Cyan),
            Cell::new("Original").fg(Color::Cyan),
            Cell::new("Proposed").fg(Color::Cyan),
            Cell::new("Status").fg(Color::Cyan),
        ]);
    } else {
        table.set_header(vec!["#", "Original", "Proposed", "Status"]);
    }

    for (index, planned) in plan.entries.iter().enumerate() {
        let number = (index + 1).to_string();
        let proposed = planned.entry.proposed.to_string();
        let status = planned.verdict.to_string();

        if use_color {
            let status_color = match planned.verdict {
                ValidationVerdict::Ok => Color::Green,
                _ => Color::Red,
            };
            table.add_row(vec![
                Cell::new(number).fg(Color::DarkGrey),
                Cell::new(&planned.entry.original_display_name),
                Cell::new(proposed).fg(Color::Magenta),
                Cell::new(status).fg(status_color),
            ]);
        } else {
            table.add_row(vec![
                number,
                planned.entry.original_display_name.clone(),
                proposed,
                status,
            ]);
        }
    }

    let blocked = plan.blocked_count();
    let totals = format!("{} ok, {} blocked", plan.len() - blocked, blocked);

    if use_color {
        table.add_row(vec![
            Cell::new("─────").fg(Color::DarkGrey),
            Cell::new("─────────").fg(Color::DarkGrey),
            Cell::new("─────────").fg(Color::DarkGrey),
            Cell::new("─────────").fg(Color::DarkGrey),
        ]);
        table.add_row(vec![
            Cell::new("TOTALS").fg(Color::Cyan),
            Cell::new(format!("{} files", plan.len())).fg(Color::White),
            Cell::new(""),
            Cell::new(totals).fg(if blocked == 0 { Color::Green } else { Color::Yellow }),
        ]);
    } else {
        table.add_row(vec!["─────", "─────────", "─────────", "─────────"]);
        table.add_row(vec![
            "TOTALS".to_string(),
            format!("{} files", plan.len()),
            String::new(),
            totals,
        ]);
    }

    let mut output = table.to_string();
    output.push('\n');
    output
}
