//! Page assembler – composes one page-sized SVG document from positioned
//! sign fragments (or from the mask fragment repeated at every slot).
//!
//! Embedding is textual, mirroring the substitution engine: each fragment's
//! XML declaration and DOCTYPE lines are dropped, its root `<svg>`/`</svg>`
//! tags are rewritten to neutral `<g>`/`</g>` groups (the root open tag may
//! spread its attributes over several lines, so tags are rewritten rather
//! than whole lines removed), page-level post-substitutions are applied, and
//! the result is wrapped in a `translate` group at the slot coordinate.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use crate::grid::GridSpec;

/// Format a millimetre value the way the run spec wrote it: integral values
/// without a fractional part.
fn fmt_mm(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{}", v as i64)
    } else {
        format!("{v}")
    }
}

/// Page-document open tag, sized in mm with a matching viewBox.
fn page_open(page_w: f64, page_h: f64) -> String {
    let w = fmt_mm(page_w);
    let h = fmt_mm(page_h);
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"no\"?>\n\
         <svg width=\"{w}mm\" height=\"{h}mm\" viewBox=\"0 0 {w} {h}\" version=\"1.1\"\n\
         \x20    xmlns=\"http://www.w3.org/2000/svg\"\n\
         \x20    xmlns:svg=\"http://www.w3.org/2000/svg\"\n\
         \x20    xmlns:xlink=\"http://www.w3.org/1999/xlink\">\n"
    )
}

/// True for lines that belong to a document preamble, not to content.
fn is_preamble(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.starts_with("<?xml") || trimmed.starts_with("<!DOCTYPE")
}

/// Append one fragment at `(x, y)`, wrapped in a translate group.
fn embed_fragment(
    out: &mut String,
    fragment: &[String],
    x: f64,
    y: f64,
    gsub: &BTreeMap<String, String>,
) {
    let _ = writeln!(out, "<g transform=\"translate({},{})\">", fmt_mm(x), fmt_mm(y));
    for line in fragment {
        if is_preamble(line) {
            continue;
        }
        let mut line = line.replace("<svg", "<g").replace("</svg>", "</g>");
        for (find, replace) in gsub {
            line = line.replace(find.as_str(), replace.as_str());
        }
        out.push_str(&line);
        out.push('\n');
    }
    out.push_str("</g>\n");
}

/// Compose one signage page.
///
/// `fragments` holds every produced item fragment, indexed by item number
/// minus one; the occupied slots of `page_number` select which of them land
/// on this page. The last page may be partial; unoccupied slots are simply
/// absent from the document.
pub fn assemble_page(
    page_number: usize,
    grid: &GridSpec,
    fragments: &[Vec<String>],
    page_w: f64,
    page_h: f64,
    gsub: &BTreeMap<String, String>,
) -> String {
    let mut out = page_open(page_w, page_h);
    for slot in grid.occupied_slots(page_number, fragments.len()) {
        let (x, y) = grid.slot_coordinate(slot);
        let item = grid.item_number(page_number, slot);
        embed_fragment(&mut out, &fragments[item - 1], x, y, gsub);
    }
    out.push_str("</svg>\n");
    out
}

/// Compose the mask page: the mask fragment at every slot, full grid.
pub fn assemble_mask_page(
    grid: &GridSpec,
    mask: &[String],
    page_w: f64,
    page_h: f64,
    gsub: &BTreeMap<String, String>,
) -> String {
    let mut out = page_open(page_w, page_h);
    for slot in 1..=grid.slots_per_page() {
        let (x, y) = grid.slot_coordinate(slot);
        embed_fragment(&mut out, mask, x, y, gsub);
    }
    out.push_str("</svg>\n");
    out
}
