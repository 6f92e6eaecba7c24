//! Pipeline – ties together row reading, template substitution, grid
//! planning, page assembly, and the merge/convert steps into a single run.
//!
//! The run is strictly sequential and fail-fast: each stage completes before
//! the next begins, and the first error aborts the run leaving every
//! already-written intermediate file in place for inspection. Re-running is
//! idempotent with respect to prior intermediate state because the
//! intermediate directory is cleared up front.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::RunConfig;
use crate::error::{Result, SignsheetError};
use crate::grid::GridSpec;
use crate::page::{assemble_mask_page, assemble_page};
use crate::rows::FieldTable;
use crate::template;
use crate::tools::ExternalTool;

/// Per-run state, constructed once at the start of a run and never mutated.
#[derive(Debug, Clone)]
pub struct RunContext {
    /// `%Y%m%d%H%M%S`, stamped into every deliverable name.
    pub timestamp: String,
    /// Directory the spec file lives in; all relative paths resolve here.
    pub base_dir: PathBuf,
    pub output_dir: PathBuf,
    pub intermediate_dir: PathBuf,
    pub prefix: String,
}

impl RunContext {
    pub fn new(config: &RunConfig, base_dir: &Path) -> Self {
        Self::with_timestamp(
            config,
            base_dir,
            chrono::Local::now().format("%Y%m%d%H%M%S").to_string(),
        )
    }

    /// Like [`RunContext::new`] with an explicit timestamp, for tests that
    /// need stable deliverable names.
    pub fn with_timestamp(config: &RunConfig, base_dir: &Path, timestamp: String) -> Self {
        let output_dir = config.output_dir(base_dir);
        Self {
            timestamp,
            base_dir: base_dir.to_path_buf(),
            intermediate_dir: output_dir.join("intermediate"),
            output_dir,
            prefix: config.output.prefix.clone(),
        }
    }

    fn deliverable(&self, suffix: &str) -> PathBuf {
        self.output_dir
            .join(format!("{}{}{suffix}", self.prefix, self.timestamp))
    }
}

/// Everything one run produced, in production order.
#[derive(Debug)]
pub struct RunOutputs {
    /// Items actually rendered (after the optional cap).
    pub total_items: usize,
    /// Vectorized per-item fragments, `sign_NNNN.svg`, 1-based contiguous.
    pub fragments: Vec<PathBuf>,
    /// Assembled page documents, `page_NN.svg`.
    pub page_svgs: Vec<PathBuf>,
    /// Exported pages, `page_NN.pdf`, in page order.
    pub page_pdfs: Vec<PathBuf>,
    pub mask_svg: PathBuf,
    pub mask_pdf: PathBuf,
    /// Timestamped bundle of every intermediate SVG.
    pub archive: PathBuf,
    /// All signage pages followed by the mask page, merged.
    pub merged_rgb: PathBuf,
    /// The merged deliverable, colour-converted for production.
    pub merged_cmyk: PathBuf,
}

fn sign_filename(item: usize) -> String {
    format!("sign_{item:04}.svg")
}

fn page_svg_filename(page: usize) -> String {
    format!("page_{page:02}.svg")
}

fn page_pdf_filename(page: usize) -> String {
    format!("page_{page:02}.pdf")
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content).map_err(|e| SignsheetError::io(path, e))
}

/// Execute one full run: CSV in, merged RGB + CMYK PDFs and an intermediate
/// archive out.
pub fn run(config: &RunConfig, base_dir: &Path, tools: &dyn ExternalTool) -> Result<RunOutputs> {
    let context = RunContext::new(config, base_dir);
    run_with_context(config, &context, tools)
}

/// [`run`] with a caller-supplied context (tests pin the timestamp).
pub fn run_with_context(
    config: &RunConfig,
    context: &RunContext,
    tools: &dyn ExternalTool,
) -> Result<RunOutputs> {
    let grid = GridSpec::from_slot_config(&config.output.slot);

    // Clear any leftover intermediate state from a previous run.
    log::info!(
        "clearing intermediate directory {}",
        context.intermediate_dir.display()
    );
    match fs::remove_dir_all(&context.intermediate_dir) {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(SignsheetError::io(&context.intermediate_dir, e)),
    }
    fs::create_dir_all(&context.intermediate_dir)
        .map_err(|e| SignsheetError::io(&context.intermediate_dir, e))?;

    // Rows + template → one vectorized fragment per item.
    let table = FieldTable::read(&config.data_path(&context.base_dir))?;
    let template_lines = template::load_lines(&config.template_path(&context.base_dir))?;
    log::info!(
        "table has {} rows, fields {:?}",
        table.rows().len(),
        table.fields()
    );

    let total = grid.capped_total(table.rows().len());
    let mut fragments = Vec::with_capacity(total);
    let mut fragment_paths = Vec::with_capacity(total);
    for (index, row) in table.rows().iter().take(total).enumerate() {
        let item = index + 1;
        let lines = template::render(&template_lines, table.fields(), row);
        let path = context.intermediate_dir.join(sign_filename(item));
        write_file(&path, &(lines.join("\n") + "\n"))?;
        log::info!("vectorizing {}", path.display());
        tools.vectorize(&path, &path)?;
        // Re-read: vectorization rewrites the fragment in place.
        fragments.push(template::load_lines(&path)?);
        fragment_paths.push(path);
    }

    // Plan pages, assemble, export.
    let page_count = grid.page_count(total);
    log::info!(
        "{total} items on {page_count} pages ({} slots per page)",
        grid.slots_per_page()
    );

    let mut page_svgs = Vec::with_capacity(page_count);
    let mut page_pdfs = Vec::with_capacity(page_count);
    for page_number in 1..=page_count {
        let document = assemble_page(
            page_number,
            &grid,
            &fragments,
            config.output.w,
            config.output.h,
            &config.output.slot.gsub,
        );
        let svg_path = context.intermediate_dir.join(page_svg_filename(page_number));
        let pdf_path = context.intermediate_dir.join(page_pdf_filename(page_number));
        write_file(&svg_path, &document)?;
        log::info!("exporting {}", pdf_path.display());
        tools.vectorize(&svg_path, &pdf_path)?;
        page_svgs.push(svg_path);
        page_pdfs.push(pdf_path);
    }

    // Mask page: the constant overlay at every slot, exported once per run.
    let mask_lines = template::load_lines(&config.mask_path(&context.base_dir))?;
    let mask_document = assemble_mask_page(
        &grid,
        &mask_lines,
        config.output.w,
        config.output.h,
        &config.output.slot.gsub,
    );
    let mask_svg = context.intermediate_dir.join("mask.svg");
    let mask_pdf = context.intermediate_dir.join("mask.pdf");
    write_file(&mask_svg, &mask_document)?;
    log::info!("exporting {}", mask_pdf.display());
    tools.vectorize(&mask_svg, &mask_pdf)?;

    // Archive the source-form intermediates before merging, so a failing
    // merge still leaves the traceability bundle behind.
    let archive = context.deliverable(".zip");
    let members: Vec<PathBuf> = fragment_paths
        .iter()
        .chain(page_svgs.iter())
        .chain(std::iter::once(&mask_svg))
        .filter_map(|p| p.file_name().map(PathBuf::from))
        .collect();
    log::info!(
        "archiving {} documents into {}",
        members.len(),
        archive.display()
    );
    tools.archive(&context.intermediate_dir, &members, &archive)?;

    // Merge all pages plus the mask, then colour-convert.
    let merged_rgb = context.deliverable("_RGB.pdf");
    let mut merge_inputs = page_pdfs.clone();
    merge_inputs.push(mask_pdf.clone());
    log::info!(
        "merging {} documents into {}",
        merge_inputs.len(),
        merged_rgb.display()
    );
    tools.concatenate(&merge_inputs, &merged_rgb)?;

    let merged_cmyk = context.deliverable("_CMYK.pdf");
    log::info!("converting to CMYK: {}", merged_cmyk.display());
    tools.convert_colour(&merged_rgb, &merged_cmyk)?;

    Ok(RunOutputs {
        total_items: total,
        fragments: fragment_paths,
        page_svgs,
        page_pdfs,
        mask_svg,
        mask_pdf,
        archive,
        merged_rgb,
        merged_cmyk,
    })
}
