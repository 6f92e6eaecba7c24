//! Template substitution – turns one data row plus the SVG template into one
//! standalone sign fragment.
//!
//! Substitution is literal, ordered find-replace over text lines: for each
//! line, each field name is replaced in field order wherever it occurs at the
//! time its turn comes. There is no parsing, no escaping, and no protection
//! against one field name being a substring of another or of an inserted
//! value – choosing non-overlapping field names is the caller's job. A value
//! containing markup-significant characters is inserted verbatim and will
//! corrupt that sign's document rather than raise an error.
//!
//! An empty field name (a blank header cell) is skipped: an empty find
//! pattern would match between every pair of characters and shred the line,
//! so its column simply never substitutes.

use std::fs;
use std::path::Path;

use crate::error::{Result, SignsheetError};
use crate::rows::FieldTable;

/// Read a template or mask document as lines, without trailing newlines.
///
/// Unreadable files surface as template errors.
pub fn load_lines(path: &Path) -> Result<Vec<String>> {
    let text =
        fs::read_to_string(path).map_err(|e| SignsheetError::template(path, &e))?;
    Ok(text.lines().map(str::to_string).collect())
}

/// Substitute one row's values into the template.
///
/// Output has the same line count and order as the template. A field with no
/// value in this row substitutes the empty string.
pub fn render(template_lines: &[String], field_names: &[String], row: &[String]) -> Vec<String> {
    template_lines
        .iter()
        .map(|line| {
            let mut out = line.clone();
            for (i, name) in field_names.iter().enumerate() {
                if name.is_empty() {
                    continue;
                }
                out = out.replace(name.as_str(), FieldTable::value(row, i));
            }
            out
        })
        .collect()
}
