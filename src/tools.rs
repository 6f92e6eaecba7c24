//! External tools – the narrow capability boundary around the programs that
//! do the heavy lifting: Inkscape (vectorize/export), pdfunite (concatenate),
//! Ghostscript (CMYK conversion), and zip (intermediate archive).
//!
//! The pipeline only ever talks to the [`ExternalTool`] trait, so tests can
//! inject a fake implementation and never spawn a process. Every invocation
//! is synchronous; a non-zero exit aborts the run with the failing tool's
//! name and captured stderr. There are no retries and no timeouts.

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::{Result, SignsheetError};

/// One method per external program the pipeline shells out to.
pub trait ExternalTool {
    /// Convert text to outlines and export `input` as a plain document at
    /// `output`. Also used for SVG → PDF page export; the output format
    /// follows the output path's extension.
    fn vectorize(&self, input: &Path, output: &Path) -> Result<()>;

    /// Concatenate page-form PDFs, in order, into `output`.
    fn concatenate(&self, inputs: &[PathBuf], output: &Path) -> Result<()>;

    /// Re-emit `input` with its colour model converted to CMYK.
    fn convert_colour(&self, input: &Path, output: &Path) -> Result<()>;

    /// Bundle `files` (relative to `work_dir`) into the archive at `output`.
    fn archive(&self, work_dir: &Path, files: &[PathBuf], output: &Path) -> Result<()>;
}

/// The real implementation: spawns the system binaries.
///
/// Program names are overridable for installs where e.g. Ghostscript is
/// `gswin64c` rather than `gs`.
#[derive(Debug, Clone)]
pub struct SystemTools {
    pub inkscape: String,
    pub pdfunite: String,
    pub ghostscript: String,
    pub zip: String,
}

impl Default for SystemTools {
    fn default() -> Self {
        Self {
            inkscape: "inkscape".to_string(),
            pdfunite: "pdfunite".to_string(),
            ghostscript: "gs".to_string(),
            zip: "zip".to_string(),
        }
    }
}

/// Run a prepared command, mapping spawn failures and non-zero exits to
/// external-tool errors.
fn run(tool: &str, command: &mut Command) -> Result<()> {
    log::debug!("running {command:?}");
    let output = command
        .output()
        .map_err(|e| SignsheetError::tool_spawn(tool, &e))?;
    if !output.status.success() {
        return Err(SignsheetError::tool_failed(tool, output.status, &output.stderr));
    }
    Ok(())
}

impl ExternalTool for SystemTools {
    fn vectorize(&self, input: &Path, output: &Path) -> Result<()> {
        let mut cmd = Command::new(&self.inkscape);
        cmd.arg(input)
            .arg("--export-plain-svg")
            .arg("--export-text-to-path")
            .arg(format!("--export-filename={}", output.display()));
        run(&self.inkscape, &mut cmd)
    }

    fn concatenate(&self, inputs: &[PathBuf], output: &Path) -> Result<()> {
        let mut cmd = Command::new(&self.pdfunite);
        cmd.args(inputs).arg(output);
        run(&self.pdfunite, &mut cmd)
    }

    fn convert_colour(&self, input: &Path, output: &Path) -> Result<()> {
        let mut cmd = Command::new(&self.ghostscript);
        cmd.arg("-dSAFER")
            .arg("-dBATCH")
            .arg("-dNOPAUSE")
            .arg("-dNOCACHE")
            .arg("-sDEVICE=pdfwrite")
            .arg("-dAutoRotatePages=/None")
            .arg("-sColorConversionStrategy=CMYK")
            .arg("-dProcessColorModel=/DeviceCMYK")
            .arg(format!("-sOutputFile={}", output.display()))
            .arg(input);
        run(&self.ghostscript, &mut cmd)
    }

    fn archive(&self, work_dir: &Path, files: &[PathBuf], output: &Path) -> Result<()> {
        // zip resolves the member paths against its working directory, so the
        // archive holds bare filenames rather than absolute paths. The output
        // path must not resolve against that directory too: a caller-relative
        // path is anchored to the process cwd before the cwd switch.
        let output = std::path::absolute(output).map_err(|e| SignsheetError::io(output, e))?;
        let mut cmd = Command::new(&self.zip);
        cmd.current_dir(work_dir).arg(output).args(files);
        run(&self.zip, &mut cmd)
    }
}
