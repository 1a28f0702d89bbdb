mod json;
mod preview;
mod printer;

use std::io::{self, Write};

use clap::ValueEnum;

use crate::dispatcher::{DispatchReport, DispatchSummary};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Colored, human readable lines
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Show {
    Status,
    Body,
    #[default]
    All,
}

/// Writes dispatch results to stdout as they arrive.
#[derive(Debug, Clone, Copy, Default)]
pub struct Reporter {
    pub format: OutputFormat,
    pub show: Show,
    pub preview: Option<usize>,
}

impl Reporter {
    pub fn report(&self, report: &DispatchReport) {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        if let Err(err) = self.write_report(&mut out, report) {
            log::warn!("writing result for {}: {}", report.file.display(), err);
        }
    }

    pub fn summary(&self, summary: &DispatchSummary) {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        if let Err(err) = self.write_summary(&mut out, summary) {
            log::warn!("writing summary: {}", err);
        }
    }

    pub fn write_report(&self, out: &mut dyn Write, report: &DispatchReport) -> io::Result<()> {
        match self.format {
            OutputFormat::Text => printer::print_report(out, report, self.show, self.preview),
            OutputFormat::Json => {
                json::write_line(out, &json::report_line(report, self.show, self.preview))
            }
        }
    }

    pub fn write_summary(&self, out: &mut dyn Write, summary: &DispatchSummary) -> io::Result<()> {
        match self.format {
            OutputFormat::Text => printer::print_summary(out, summary),
            OutputFormat::Json => json::write_line(out, &json::summary_line(summary)),
        }
    }
}
