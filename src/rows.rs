//! Row source – reads the CSV data table that drives sign production.
//!
//! Record 0 is always the header and supplies the field names; every later
//! record is one sign. The reader handles quoted fields (embedded commas,
//! doubled quotes, embedded newlines) and CRLF line endings. Cells are kept
//! positionally aligned with the header; a short row is padded with empty
//! strings at lookup time, never at parse time.

use std::fs;
use std::path::Path;

use crate::error::{Result, SignsheetError};

/// The parsed data table: ordered field names plus ordered data rows.
///
/// Built once per run and read-only thereafter.
#[derive(Debug, Clone)]
pub struct FieldTable {
    fields: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl FieldTable {
    /// Read and parse a CSV file.
    ///
    /// Fails with a data-format error when the file is empty (no header
    /// record) or unreadable.
    pub fn read(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| {
            SignsheetError::data_format(format!("cannot read table '{}': {e}", path.display()))
        })?;
        Self::parse(&text).map_err(|e| {
            SignsheetError::data_format(format!("table '{}': {e}", path.display()))
        })
    }

    /// Parse CSV text. The first record becomes the header.
    pub fn parse(text: &str) -> std::result::Result<Self, String> {
        let mut records = parse_records(text);
        if records.is_empty() {
            return Err("empty table: no header record".to_string());
        }
        let fields = records.remove(0);
        Ok(Self {
            fields,
            rows: records,
        })
    }

    /// Ordered field names from the header record.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Ordered data rows (header excluded).
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Value of field `field_index` in `row`, or `""` when the row is
    /// shorter than the header.
    pub fn value<'a>(row: &'a [String], field_index: usize) -> &'a str {
        row.get(field_index).map(String::as_str).unwrap_or("")
    }
}

/// Split CSV text into records of fields.
///
/// A blank line yields an empty record (zero fields), matching the reader the
/// original data files were authored against; a trailing newline yields
/// nothing.
fn parse_records(text: &str) -> Vec<Vec<String>> {
    let mut records = Vec::new();
    let mut record: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    // True once the current record has any content, so "a,b\n" does not
    // produce a phantom empty record at EOF.
    let mut record_started = false;

    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' => {
                    if chars.peek() == Some(&'"') {
                        chars.next();
                        field.push('"');
                    } else {
                        in_quotes = false;
                    }
                }
                _ => field.push(c),
            }
            continue;
        }
        match c {
            '"' => {
                // Only an opening quote at the start of a field is special;
                // mid-field quotes are ordinary characters, as in the reader
                // the original data files were authored against.
                if field.is_empty() {
                    in_quotes = true;
                } else {
                    field.push('"');
                }
                record_started = true;
            }
            ',' => {
                record.push(std::mem::take(&mut field));
                record_started = true;
            }
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                if record_started || !field.is_empty() {
                    record.push(std::mem::take(&mut field));
                }
                records.push(std::mem::take(&mut record));
                record_started = false;
            }
            '\n' => {
                if record_started || !field.is_empty() {
                    record.push(std::mem::take(&mut field));
                }
                records.push(std::mem::take(&mut record));
                record_started = false;
            }
            _ => field.push(c),
        }
    }
    if record_started || !field.is_empty() {
        record.push(field);
        records.push(record);
    }
    records
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_and_rows_split() {
        let table = FieldTable::parse("Name,Seat\nAlice,12A\nBob,7C\n").unwrap();
        assert_eq!(table.fields(), &["Name".to_string(), "Seat".to_string()]);
        assert_eq!(table.rows().len(), 2);
        assert_eq!(table.rows()[0], vec!["Alice", "12A"]);
        assert_eq!(table.rows()[1], vec!["Bob", "7C"]);
    }

    #[test]
    fn empty_input_is_an_error() {
        assert!(FieldTable::parse("").is_err());
    }

    #[test]
    fn header_only_yields_zero_rows() {
        let table = FieldTable::parse("Name,Seat\n").unwrap();
        assert_eq!(table.rows().len(), 0);
    }

    #[test]
    fn trailing_empty_cells_are_preserved() {
        let table = FieldTable::parse("A,B,C\n1,,\n").unwrap();
        assert_eq!(table.rows()[0], vec!["1", "", ""]);
    }

    #[test]
    fn short_row_reads_as_empty_at_lookup() {
        let table = FieldTable::parse("A,B,C\n1\n").unwrap();
        let row = &table.rows()[0];
        assert_eq!(FieldTable::value(row, 0), "1");
        assert_eq!(FieldTable::value(row, 1), "");
        assert_eq!(FieldTable::value(row, 2), "");
    }

    #[test]
    fn quoted_fields_keep_commas_and_quotes() {
        let table = FieldTable::parse("A,B\n\"x, y\",\"he said \"\"hi\"\"\"\n").unwrap();
        assert_eq!(table.rows()[0], vec!["x, y", "he said \"hi\""]);
    }

    #[test]
    fn mid_field_quote_is_literal() {
        // A quote that does not open the field must not start quoted mode,
        // or it would swallow the following comma and record separator.
        let table = FieldTable::parse("A,B\na\"b,c\n").unwrap();
        assert_eq!(table.rows().len(), 1);
        assert_eq!(table.rows()[0], vec!["a\"b", "c"]);
    }

    #[test]
    fn quote_after_closing_quote_is_literal() {
        let table = FieldTable::parse("A,B\n\"a\"x\"b\",c\n").unwrap();
        assert_eq!(table.rows()[0], vec!["ax\"b\"", "c"]);
    }

    #[test]
    fn quoted_fields_keep_newlines() {
        let table = FieldTable::parse("A,B\n\"line1\nline2\",z\n").unwrap();
        assert_eq!(table.rows()[0], vec!["line1\nline2", "z"]);
    }

    #[test]
    fn crlf_records_parse() {
        let table = FieldTable::parse("A,B\r\n1,2\r\n").unwrap();
        assert_eq!(table.rows()[0], vec!["1", "2"]);
    }

    #[test]
    fn no_trailing_newline_still_yields_last_row() {
        let table = FieldTable::parse("A,B\n1,2").unwrap();
        assert_eq!(table.rows()[0], vec!["1", "2"]);
    }

    #[test]
    fn blank_line_yields_empty_record() {
        let table = FieldTable::parse("A,B\n\n1,2\n").unwrap();
        assert_eq!(table.rows().len(), 2);
        assert!(table.rows()[0].is_empty());
        assert_eq!(table.rows()[1], vec!["1", "2"]);
    }
}
