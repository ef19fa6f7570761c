//! Output formatting for CLI

use crate::Summary;
use crate::models::ObjectType;
use std::borrow::Cow;
use std::io::{self, Write};
use std::path::Path;
use std::time::UNIX_EPOCH;

/// Maximum number of errors listed in the text summary.
const MAX_LISTED_ERRORS: usize = 5;

/// Whether a CSV field has to be wrapped in quotes.
///
/// Commas, double quotes and any byte below 0x20 (including CR and LF)
/// trigger quoting.
#[must_use]
pub fn needs_quoting(field: &str) -> bool {
    field.bytes().any(|b| b < 0x20 || b == b'"' || b == b',')
}

/// Escape one CSV field, doubling inner quotes when quoting is required.
#[must_use]
pub fn escape_csv_field(field: &str) -> Cow<'_, str> {
    if !needs_quoting(field) {
        return Cow::Borrowed(field);
    }

    let mut quoted = String::with_capacity(field.len() + 2);
    quoted.push('"');
    for ch in field.chars() {
        if ch == '"' {
            quoted.push('"');
        }
        quoted.push(ch);
    }
    quoted.push('"');
    Cow::Owned(quoted)
}

/// Write one comma-separated record terminated by a newline.
pub fn write_csv_record<W, I, S>(out: &mut W, fields: I) -> io::Result<()>
where
    W: Write + ?Sized,
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    for (idx, field) in fields.into_iter().enumerate() {
        if idx > 0 {
            out.write_all(b",")?;
        }
        out.write_all(escape_csv_field(field.as_ref()).as_bytes())?;
    }
    out.write_all(b"\n")
}

/// Line printed for every visited entry: `<type-marker> <path>`.
#[must_use]
pub fn format_visit(object_type: ObjectType, path: &Path) -> String {
    format!("{} {}", object_type.marker(), path.display())
}

/// Format summary as human-readable text
#[must_use]
pub fn format_text(summary: &Summary) -> String {
    let stats = &summary.stats;
    let mut text = format!(
        "{} -> node {}\n  {} nodes: {} directories, {} files, {} other\n",
        summary.root, summary.root_id, stats.nodes, stats.directories, stats.files, stats.others
    );

    if let Ok(elapsed) = summary.finished_at.duration_since(summary.started_at) {
        text.push_str(&format!("  elapsed: {:.2}s\n", elapsed.as_secs_f64()));
    }

    if !summary.errors.is_empty() {
        text.push_str(&format!("Errors encountered: {}\n", summary.errors.len()));
        for error in summary.errors.iter().take(MAX_LISTED_ERRORS) {
            text.push_str(&format!("  {}: {}\n", error.path, error.message));
        }
        if summary.errors.len() > MAX_LISTED_ERRORS {
            text.push_str(&format!(
                "  ... and {} more\n",
                summary.errors.len() - MAX_LISTED_ERRORS
            ));
        }
    }

    text
}

/// Format summary as JSON
#[must_use]
pub fn format_json(summary: &Summary) -> String {
    let epoch_secs = |t: std::time::SystemTime| {
        t.duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs_f64())
            .unwrap_or(0.0)
    };

    let output = serde_json::json!({
        "root": summary.root,
        "root_id": summary.root_id,
        "stats": summary.stats,
        "started_at": epoch_secs(summary.started_at),
        "finished_at": epoch_secs(summary.finished_at),
        "error_count": summary.errors.len(),
        "errors": if summary.errors.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::json!(summary.errors)
        }
    });

    serde_json::to_string_pretty(&output).unwrap_or_else(|_| "{}".to_string())
}
