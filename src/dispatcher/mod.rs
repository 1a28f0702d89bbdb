mod models;
mod runner;

pub use models::{DispatchReport, DispatchSummary, Outcome, ResponseRecord};
pub use runner::dispatch;
