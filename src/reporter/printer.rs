use std::io::{self, Write};

use colored::{Color, Colorize};

use crate::dispatcher::{DispatchReport, DispatchSummary, Outcome};

use super::{preview::create_preview, Show};

pub(super) fn print_report(
    out: &mut dyn Write,
    report: &DispatchReport,
    show: Show,
    preview: Option<usize>,
) -> io::Result<()> {
    let file = report.file.display().to_string();

    let record = match &report.outcome {
        Outcome::Delivered(record) => record,
        Outcome::Skipped(reason) => {
            return writeln!(
                out,
                "{} {} {}",
                "SKIP".yellow().bold(),
                file.cyan(),
                reason.dimmed()
            );
        }
    };

    if matches!(show, Show::Status | Show::All) {
        writeln!(
            out,
            "{} {} {} {}",
            "POST".bold(),
            file.cyan(),
            record.status_text.color(status_color(record.status)),
            format!("({:.1} ms)", record.duration_ms).dimmed()
        )?;
    }

    if matches!(show, Show::Body | Show::All) {
        writeln!(out, "{}", create_preview(&record.body, preview))?;
    }

    Ok(())
}

pub(super) fn print_summary(out: &mut dyn Write, summary: &DispatchSummary) -> io::Result<()> {
    let skipped = format!("{} skipped", summary.skipped);
    writeln!(
        out,
        "{} {} of {} file(s) delivered, {}",
        "Done:".bold(),
        summary.delivered,
        summary.total,
        if summary.skipped > 0 {
            skipped.yellow()
        } else {
            skipped.dimmed()
        }
    )
}

fn status_color(status: u16) -> Color {
    if status >= 400 {
        Color::Red
    } else if status >= 300 {
        Color::Yellow
    } else {
        Color::Green
    }
}
