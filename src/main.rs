//! signsheet – command-line entry point.
//!
//! Usage:
//!   signsheet <spec.yaml>
//!
//! The YAML spec names the data table, template, and mask documents, the
//! output directory and page geometry, and the slot grid. All relative paths
//! inside the spec resolve against the spec file's own directory.

use std::{env, path::Path, process};

use signsheet::config::RunConfig;
use signsheet::pipeline;
use signsheet::tools::SystemTools;

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    let mut spec_path: Option<String> = None;
    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--help" | "-h" => {
                print_usage(&args[0]);
                process::exit(0);
            }
            other if other.starts_with('-') => {
                eprintln!("Unknown flag: {other}");
                print_usage(&args[0]);
                process::exit(1);
            }
            path => {
                if spec_path.is_some() {
                    eprintln!("Unexpected argument: {path}");
                    print_usage(&args[0]);
                    process::exit(1);
                }
                spec_path = Some(path.to_string());
            }
        }
    }

    let spec_path = match spec_path {
        Some(p) => p,
        None => {
            eprintln!("Error: no spec file specified.");
            print_usage(&args[0]);
            process::exit(1);
        }
    };

    let (config, base_dir) = match RunConfig::load(Path::new(&spec_path)) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };

    let tools = SystemTools::default();
    match pipeline::run(&config, &base_dir, &tools) {
        Ok(outputs) => {
            eprintln!(
                "Wrote '{}' and '{}' ({} sign{}, {} page{} + mask)",
                outputs.merged_rgb.display(),
                outputs.merged_cmyk.display(),
                outputs.total_items,
                if outputs.total_items == 1 { "" } else { "s" },
                outputs.page_pdfs.len(),
                if outputs.page_pdfs.len() == 1 { "" } else { "s" },
            );
        }
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }
}

fn print_usage(prog: &str) {
    eprintln!("signsheet – CSV + SVG template to print-ready PDF sign sheets");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  {prog} <spec.yaml>");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  <spec.yaml>    Run spec: input documents, page size, slot grid");
    eprintln!();
    eprintln!("Flags:");
    eprintln!("  --help         Print this message");
    eprintln!();
    eprintln!("Requires inkscape, pdfunite, gs, and zip on PATH.");
}
