//! Run configuration – the YAML spec file that drives one pipeline run.
//!
//! The spec names the three input documents (data table, sign template, mask),
//! the output page geometry, and the slot grid used to tile signs onto pages.
//! All relative paths are resolved against the directory containing the spec
//! file, so a spec can be checked in next to its assets and run from anywhere.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Result, SignsheetError};

/// Top-level run configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct RunConfig {
    pub input: InputConfig,
    pub output: OutputConfig,
}

/// Input documents, as paths relative to the spec file.
#[derive(Debug, Clone, Deserialize)]
pub struct InputConfig {
    /// CSV data table; row 0 is the header.
    pub data: PathBuf,
    /// Per-sign SVG template.
    pub template: PathBuf,
    /// Constant overlay fragment (cut lines / registration marks).
    pub mask: PathBuf,
}

/// Output directory, naming, and page geometry.
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    pub dir: PathBuf,
    /// Filename prefix for the deliverables and the archive.
    #[serde(default = "OutputConfig::default_prefix")]
    pub prefix: String,
    /// Page width in mm.
    pub w: f64,
    /// Page height in mm.
    pub h: f64,
    pub slot: SlotConfig,
}

impl OutputConfig {
    fn default_prefix() -> String {
        "output_".to_string()
    }
}

/// One grid cell: size, origin of the first cell, and the repeat pattern.
#[derive(Debug, Clone, Deserialize)]
pub struct SlotConfig {
    /// Slot width in mm.
    pub w: f64,
    /// Slot height in mm.
    pub h: f64,
    /// X of the first slot's top-left corner, mm.
    pub x: f64,
    /// Y of the first slot's top-left corner, mm.
    pub y: f64,
    /// Page-level literal find→replace pairs, applied to every embedded line.
    #[serde(default)]
    pub gsub: BTreeMap<String, String>,
    pub repeat: RepeatConfig,
}

/// Grid repeat counts and the optional item cap.
#[derive(Debug, Clone, Deserialize)]
pub struct RepeatConfig {
    /// Columns per page.
    pub x: u32,
    /// Rows per page.
    pub y: u32,
    /// Stop producing signs after this many rows, if set.
    #[serde(default)]
    pub num: Option<u32>,
}

impl RunConfig {
    /// Load and validate a spec file.
    ///
    /// Returns the config together with the directory the spec lives in,
    /// which is the base for every relative path inside it.
    pub fn load(spec_path: &Path) -> Result<(Self, PathBuf)> {
        let text = fs::read_to_string(spec_path).map_err(|e| {
            SignsheetError::config(format!("cannot read spec '{}': {e}", spec_path.display()))
        })?;
        let config: RunConfig = serde_yaml::from_str(&text).map_err(|e| {
            SignsheetError::config(format!("malformed spec '{}': {e}", spec_path.display()))
        })?;
        config.validate()?;

        let base_dir = spec_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Ok((config, base_dir))
    }

    /// Structural checks that deserialization alone cannot express.
    pub fn validate(&self) -> Result<()> {
        let repeat = &self.output.slot.repeat;
        if repeat.x < 1 || repeat.y < 1 {
            return Err(SignsheetError::config(format!(
                "slot repeat must be at least 1x1, got {}x{}",
                repeat.x, repeat.y
            )));
        }
        if self.output.w <= 0.0 || self.output.h <= 0.0 {
            return Err(SignsheetError::config(format!(
                "page size must be positive, got {}x{} mm",
                self.output.w, self.output.h
            )));
        }
        if self.output.slot.w <= 0.0 || self.output.slot.h <= 0.0 {
            return Err(SignsheetError::config(format!(
                "slot size must be positive, got {}x{} mm",
                self.output.slot.w, self.output.slot.h
            )));
        }
        Ok(())
    }

    /// Resolve the data table path against the spec directory.
    pub fn data_path(&self, base_dir: &Path) -> PathBuf {
        base_dir.join(&self.input.data)
    }

    /// Resolve the template path against the spec directory.
    pub fn template_path(&self, base_dir: &Path) -> PathBuf {
        base_dir.join(&self.input.template)
    }

    /// Resolve the mask path against the spec directory.
    pub fn mask_path(&self, base_dir: &Path) -> PathBuf {
        base_dir.join(&self.input.mask)
    }

    /// Resolve the output directory against the spec directory.
    pub fn output_dir(&self, base_dir: &Path) -> PathBuf {
        base_dir.join(&self.output.dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
input:
  data: signs.csv
  template: sign.svg
  mask: mask.svg
output:
  dir: out
  w: 297
  h: 210
  slot:
    w: 90
    h: 50
    x: 10
    y: 15
    repeat:
      x: 3
      y: 3
"#;

    fn parse(yaml: &str) -> RunConfig {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn minimal_spec_parses_with_defaults() {
        let config = parse(MINIMAL);
        assert_eq!(config.output.prefix, "output_");
        assert!(config.output.slot.gsub.is_empty());
        assert_eq!(config.output.slot.repeat.num, None);
        config.validate().unwrap();
    }

    #[test]
    fn full_spec_parses() {
        let yaml = r#"
input:
  data: signs.csv
  template: sign.svg
  mask: mask.svg
output:
  dir: out
  prefix: badge_
  w: 297
  h: 210
  slot:
    w: 90
    h: 50
    x: 10
    y: 15
    gsub:
      "stroke-width:0.5": "stroke-width:0.2"
    repeat:
      x: 3
      y: 3
      num: 12
"#;
        let config = parse(yaml);
        assert_eq!(config.output.prefix, "badge_");
        assert_eq!(config.output.slot.repeat.num, Some(12));
        assert_eq!(
            config.output.slot.gsub.get("stroke-width:0.5").unwrap(),
            "stroke-width:0.2"
        );
        config.validate().unwrap();
    }

    #[test]
    fn zero_repeat_is_rejected() {
        let mut config = parse(MINIMAL);
        config.output.slot.repeat.x = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("config error"));
    }

    #[test]
    fn non_positive_page_is_rejected() {
        let mut config = parse(MINIMAL);
        config.output.h = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn paths_resolve_against_spec_dir() {
        let config = parse(MINIMAL);
        let base = Path::new("/specs/run1");
        assert_eq!(config.data_path(base), PathBuf::from("/specs/run1/signs.csv"));
        assert_eq!(config.output_dir(base), PathBuf::from("/specs/run1/out"));
    }

    #[test]
    fn missing_spec_file_is_config_error() {
        let err = RunConfig::load(Path::new("/nonexistent/spec.yaml")).unwrap_err();
        assert!(err.to_string().contains("config error"));
    }
}
