use std::io::{self, Write};

use chrono::{SecondsFormat, Utc};
use serde_json::{json, Map, Value};

use crate::dispatcher::{DispatchReport, DispatchSummary, Outcome};

use super::{preview::create_preview, Show};

pub(super) fn report_line(report: &DispatchReport, show: Show, preview: Option<usize>) -> Value {
    let mut line = Map::new();
    line.insert("timestamp".into(), Value::String(timestamp()));

    match &report.outcome {
        Outcome::Delivered(record) => {
            line.insert("level".into(), json!("info"));
            line.insert("file".into(), json!(report.file.display().to_string()));
            if matches!(show, Show::Status | Show::All) {
                line.insert("status".into(), json!(record.status));
                line.insert("status_text".into(), json!(record.status_text));
                line.insert(
                    "duration_ms".into(),
                    json!((record.duration_ms * 10.0).round() / 10.0),
                );
            }
            if matches!(show, Show::Body | Show::All) {
                line.insert("body".into(), json!(create_preview(&record.body, preview)));
            }
        }
        Outcome::Skipped(reason) => {
            line.insert("level".into(), json!("warn"));
            line.insert("file".into(), json!(report.file.display().to_string()));
            line.insert("error".into(), json!(reason));
        }
    }

    Value::Object(line)
}

pub(super) fn summary_line(summary: &DispatchSummary) -> Value {
    json!({
        "timestamp": timestamp(),
        "level": "info",
        "total": summary.total,
        "delivered": summary.delivered,
        "skipped": summary.skipped,
    })
}

pub(super) fn write_line(out: &mut dyn Write, value: &Value) -> io::Result<()> {
    serde_json::to_writer(&mut *out, value)?;
    out.write_all(b"\n")
}

fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
