//! Minimal RFC 4180 CSV codec
//!
//! Fields containing the delimiter, a quote, or a line break are quoted;
//! quotes are doubled. The reader accepts quoted fields spanning lines, so
//! multi-line expressions survive a round trip.

use crate::error::{Error, Result};

/// A header row plus data rows
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CsvTable {
    /// Column names
    pub header: Vec<String>,
    /// Data rows, each with `header.len()` fields
    pub rows: Vec<Vec<String>>,
}

/// Serialize a header and rows. Line terminator is `\r\n`.
pub fn write_csv<R, F>(header: &[&str], rows: R) -> String
where
    R: IntoIterator<Item = F>,
    F: IntoIterator,
    F::Item: AsRef<str>,
{
    let mut out = String::new();
    push_row(&mut out, header.iter());
    for row in rows {
        push_row(&mut out, row.into_iter());
    }
    out
}

fn push_row<I>(out: &mut String, fields: I)
where
    I: Iterator,
    I::Item: AsRef<str>,
{
    for (i, field) in fields.enumerate() {
        if i > 0 {
            out.push(',');
        }
        push_field(out, field.as_ref());
    }
    out.push_str("\r\n");
}

fn push_field(out: &mut String, field: &str) {
    if field.contains([',', '"', '\n', '\r']) {
        out.push('"');
        out.push_str(&field.replace('"', "\"\""));
        out.push('"');
    } else {
        out.push_str(field);
    }
}

/// Parse CSV text whose first record is a header.
///
/// Every data row must have as many fields as the header.
pub fn parse_csv(content: &str) -> Result<CsvTable> {
    let mut records = split_records(content)?.into_iter();

    let Some(header) = records.next() else {
        return Ok(CsvTable::default());
    };

    let mut rows = Vec::new();
    for (idx, row) in records.enumerate() {
        if row.len() != header.len() {
            return Err(Error::csv(format!(
                "row {} has {} fields, expected {}",
                idx + 1,
                row.len(),
                header.len()
            )));
        }
        rows.push(row);
    }

    Ok(CsvTable { header, rows })
}

fn split_records(content: &str) -> Result<Vec<Vec<String>>> {
    let mut records = Vec::new();
    let mut record = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = content.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '"' {
                // Check for escaped quote
                if chars.peek() == Some(&'"') {
                    field.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                field.push(c);
            }
            continue;
        }

        match c {
            '"' if field.is_empty() => in_quotes = true,
            ',' => record.push(std::mem::take(&mut field)),
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' => {
                record.push(std::mem::take(&mut field));
                records.push(std::mem::take(&mut record));
            }
            _ => field.push(c),
        }
    }

    if in_quotes {
        return Err(Error::csv("unterminated quoted field"));
    }

    // Last record without trailing newline
    if !field.is_empty() || !record.is_empty() {
        record.push(field);
        records.push(record);
    }

    Ok(records)
}
