// File: crates/grapher-core/src/csv_export.rs
// Summary: CSV serialization of data rows (legacy quoted-unescaped form and RFC 4180 via the csv crate).

use crate::datum::Row;
use crate::error::Result;

/// Legacy serializer.
///
/// Header is the comma-joined keys of the first row; each line is the
/// comma-joined `"value"` cells in that key order; lines are joined by `\n`
/// with no trailing newline. Embedded quotes and commas are NOT escaped.
pub fn to_csv(rows: &[Row], header: bool) -> String {
    let Some(first) = rows.first() else { return String::new() };
    let keys: Vec<&str> = first.keys().map(String::as_str).collect();
    let mut lines: Vec<String> = Vec::with_capacity(rows.len() + 1);
    if header {
        lines.push(keys.join(","));
    }
    for row in rows {
        let cells: Vec<String> = keys
            .iter()
            .map(|k| format!("\"{}\"", row.get(*k).map(ToString::to_string).unwrap_or_default()))
            .collect();
        lines.push(cells.join(","));
    }
    lines.join("\n")
}

/// RFC 4180 output: every field quoted, embedded quotes doubled, `\n` line ends.
pub fn to_csv_rfc4180(rows: &[Row], header: bool) -> Result<String> {
    let Some(first) = rows.first() else { return Ok(String::new()) };
    let keys: Vec<&str> = first.keys().map(String::as_str).collect();
    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    if header {
        writer.write_record(&keys)?;
    }
    for row in rows {
        writer.write_record(keys.iter().map(|k| row.get(*k).map(ToString::to_string).unwrap_or_default()))?;
    }
    let bytes = writer.into_inner().map_err(|e| std::io::Error::other(e.to_string()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
