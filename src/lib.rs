//! # signsheet – CSV-driven SVG sign sheets → print-ready PDF
//!
//! This crate turns a CSV data table into a multi-page, print-ready vector
//! document: each data row becomes one sign rendered from an SVG template,
//! signs are tiled into a slot grid on fixed-size pages, a constant mask
//! overlay page is appended, and everything is merged and colour-converted
//! for production printing. The pipeline stages are:
//!
//! 1. **Rows** – read the CSV table; row 0 supplies field names ([`rows`])
//! 2. **Substitute** – literal field replacement into the template ([`template`])
//! 3. **Plan** – page count and slot coordinates for the grid ([`grid`])
//! 4. **Assemble** – position fragments on page-sized documents ([`page`])
//! 5. **Merge & convert** – export, concatenate, CMYK via external tools
//!    ([`tools`], [`pipeline`])
//!
//! Vector rasterization, page concatenation, and colour conversion are
//! delegated to external executables (Inkscape, pdfunite, Ghostscript)
//! behind the [`tools::ExternalTool`] trait.

pub mod config;
pub mod error;
pub mod grid;
pub mod page;
pub mod pipeline;
pub mod rows;
pub mod template;
pub mod tools;

// Re-exports for convenience
pub use config::RunConfig;
pub use error::{Result, SignsheetError};
pub use pipeline::{run, RunOutputs};
pub use tools::{ExternalTool, SystemTools};
