use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct ResponseRecord {
    pub status: u16,
    pub status_text: String,
    pub body: Vec<u8>,
    pub duration_ms: f64,
}

#[derive(Debug, Clone)]
pub enum Outcome {
    Delivered(ResponseRecord),
    Skipped(String),
}

/// Result of POSTing one file, keyed by the file it came from.
#[derive(Debug, Clone)]
pub struct DispatchReport {
    pub file: PathBuf,
    pub outcome: Outcome,
}

impl DispatchReport {
    pub fn is_delivered(&self) -> bool {
        matches!(self.outcome, Outcome::Delivered(_))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchSummary {
    pub total: usize,
    pub delivered: usize,
    pub skipped: usize,
}

impl DispatchSummary {
    pub(super) fn record(&mut self, report: &DispatchReport) {
        self.total += 1;
        if report.is_delivered() {
            self.delivered += 1;
        } else {
            self.skipped += 1;
        }
    }
}
