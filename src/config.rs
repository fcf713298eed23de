//! Configuration module for docbind.
//!
//! This module transforms CLI arguments into validated, normalized
//! configurations that drive the merge and export pipelines. It handles:
//! - Validation of argument combinations
//! - Resolution of conflicting options
//! - Application of defaults
//! - Output-path extension normalization

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Default rasterization resolution for exporting PDF pages.
pub const DEFAULT_EXPORT_DPI: f32 = 200.0;

/// Default JPEG quality for exported images.
pub const DEFAULT_JPEG_QUALITY: u8 = 90;

/// Output file overwrite behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverwriteMode {
    /// Prompt the user before overwriting (default).
    #[default]
    Prompt,
    /// Always overwrite without prompting.
    Force,
    /// Never overwrite, error if file exists.
    NoClobber,
}

/// Normalize an output path so it ends in `.pdf`.
///
/// A different extension is replaced; a missing extension is appended. The
/// comparison is case-insensitive, so `out.PDF` passes through untouched.
pub fn ensure_pdf_extension(path: &Path) -> PathBuf {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("pdf") => path.to_path_buf(),
        _ => path.with_extension("pdf"),
    }
}

/// Complete configuration for a merge operation.
#[derive(Debug, Clone)]
pub struct MergeConfig {
    /// Input file paths (in merge order).
    pub inputs: Vec<PathBuf>,

    /// Output PDF file path (already normalized to `.pdf`).
    pub output: PathBuf,

    /// File overwrite behavior.
    pub overwrite_mode: OverwriteMode,

    /// Verbose output mode.
    pub verbose: bool,

    /// Quiet mode - suppress non-error output.
    pub quiet: bool,
}

impl MergeConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No input files are specified
    /// - Verbose and quiet modes are both enabled
    /// - The output path is also listed as an input
    pub fn validate(&self) -> Result<()> {
        if self.inputs.is_empty() {
            return Err(Error::NoFilesToMerge);
        }

        if self.verbose && self.quiet {
            return Err(Error::invalid_config("Cannot use both --verbose and --quiet"));
        }

        for input in &self.inputs {
            if input == &self.output {
                return Err(Error::invalid_config(format!(
                    "Output file cannot be the same as an input file: {}",
                    self.output.display()
                )));
            }
        }

        Ok(())
    }

    /// Check if non-error output should be displayed.
    pub fn should_print(&self) -> bool {
        !self.quiet
    }
}

/// Complete configuration for an export operation.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Input file paths (in export order).
    pub inputs: Vec<PathBuf>,

    /// Directory the JPG files are written to.
    pub output_dir: PathBuf,

    /// Rasterization resolution for PDF pages.
    pub dpi: f32,

    /// JPEG quality (1-100).
    pub quality: u8,

    /// Verbose output mode.
    pub verbose: bool,

    /// Quiet mode - suppress non-error output.
    pub quiet: bool,
}

impl ExportConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No input files are specified
    /// - Verbose and quiet modes are both enabled
    /// - The DPI is not positive
    /// - The quality is outside 1-100
    pub fn validate(&self) -> Result<()> {
        if self.inputs.is_empty() {
            return Err(Error::invalid_config("No input files specified for export"));
        }

        if self.verbose && self.quiet {
            return Err(Error::invalid_config("Cannot use both --verbose and --quiet"));
        }

        if !self.dpi.is_finite() || self.dpi <= 0.0 {
            return Err(Error::invalid_config(format!(
                "Invalid DPI: {}. Must be a positive number",
                self.dpi
            )));
        }

        if self.quality == 0 || self.quality > 100 {
            return Err(Error::invalid_config(format!(
                "Invalid JPEG quality: {}. Must be between 1 and 100",
                self.quality
            )));
        }

        Ok(())
    }

    /// Check if non-error output should be displayed.
    pub fn should_print(&self) -> bool {
        !self.quiet
    }
}
