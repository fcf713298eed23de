//! CLI argument parsing for docbind.
//!
//! This module defines the command-line interface structure using `clap`.
//! It handles argument parsing, validation, and conversion into the
//! pipeline configurations.
//!
//! # Examples
//!
//! ```no_run
//! use docbind::cli::Cli;
//! use clap::Parser;
//!
//! let cli = Cli::parse();
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::{
    DEFAULT_EXPORT_DPI, DEFAULT_JPEG_QUALITY, ExportConfig, MergeConfig, OverwriteMode,
    ensure_pdf_extension,
};
use crate::error::Result;
use crate::utils::collect_paths_for_patterns;

/// Merge PDF, TIFF, and JPG files into one PDF, or export their pages as JPGs.
#[derive(Parser, Debug)]
#[command(name = "docbind")]
#[command(version)]
#[command(about = "Merge PDF/TIFF/JPG files into one PDF, or export pages as JPG images", long_about = None)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Merge input files into a single PDF
    ///
    /// Inputs are combined in the order given. TIFF files contribute one
    /// page per frame, JPG files one page each.
    Merge(MergeArgs),

    /// Export every page/frame of the inputs as JPG images
    ///
    /// PDF pages are rasterized, TIFF frames re-encoded, and JPG inputs
    /// copied as-is. Existing names in the output directory are never
    /// overwritten; a numeric suffix is appended instead.
    Export(ExportArgs),

    /// Rename a file on disk, keeping a supported extension
    ///
    /// A new name without an extension inherits the file's current one.
    Rename(RenameArgs),
}

#[derive(Parser, Debug)]
pub struct MergeArgs {
    /// Input files to merge (in order)
    ///
    /// Accepts literal paths and glob patterns. Files are merged in the
    /// order provided.
    ///
    /// Examples:
    ///   docbind merge scan1.jpg scan2.tif -o combined.pdf
    ///   docbind merge 'chapter*.pdf' -o book.pdf
    #[arg(required = true, value_name = "FILE")]
    pub inputs: Vec<String>,

    /// Output PDF file path
    ///
    /// A missing or different extension is normalized to .pdf.
    #[arg(short, long, value_name = "FILE")]
    pub output: PathBuf,

    /// Force overwrite of an existing output file without confirmation
    #[arg(short, long)]
    pub force: bool,

    /// Never overwrite an existing output file
    ///
    /// If the output file already exists, exit with an error instead of
    /// prompting or overwriting.
    #[arg(long, conflicts_with = "force")]
    pub no_clobber: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress all non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Parser, Debug)]
pub struct ExportArgs {
    /// Input files to export (in order)
    ///
    /// Accepts literal paths and glob patterns.
    #[arg(required = true, value_name = "FILE")]
    pub inputs: Vec<String>,

    /// Directory the JPG files are written to
    ///
    /// Created if it does not exist.
    #[arg(short = 'd', long, value_name = "DIR")]
    pub output_dir: PathBuf,

    /// Rasterization resolution for PDF pages
    #[arg(long, value_name = "N", default_value_t = DEFAULT_EXPORT_DPI)]
    pub dpi: f32,

    /// JPEG quality for exported images (1-100)
    #[arg(long, value_name = "N", default_value_t = DEFAULT_JPEG_QUALITY)]
    pub quality: u8,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress all non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Parser, Debug)]
pub struct RenameArgs {
    /// File to rename
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// New file name
    ///
    /// An extension, if given, must be one of pdf, tif, tiff, jpg, jpeg;
    /// without one, the file's current extension is kept.
    #[arg(value_name = "NEW_NAME")]
    pub new_name: String,

    /// Overwrite an existing file with the new name
    #[arg(short, long)]
    pub force: bool,
}

impl MergeArgs {
    /// Convert the arguments into a validated [`MergeConfig`].
    ///
    /// Glob patterns in the inputs are expanded in order, and the output
    /// path is normalized to end in `.pdf`.
    pub fn to_config(&self) -> Result<MergeConfig> {
        let inputs = collect_paths_for_patterns(&self.inputs)?;

        let overwrite_mode = if self.force {
            OverwriteMode::Force
        } else if self.no_clobber {
            OverwriteMode::NoClobber
        } else {
            OverwriteMode::Prompt
        };

        let config = MergeConfig {
            inputs,
            output: ensure_pdf_extension(&self.output),
            overwrite_mode,
            verbose: self.verbose,
            quiet: self.quiet,
        };
        config.validate()?;
        Ok(config)
    }
}

impl ExportArgs {
    /// Convert the arguments into a validated [`ExportConfig`].
    pub fn to_config(&self) -> Result<ExportConfig> {
        let config = ExportConfig {
            inputs: collect_paths_for_patterns(&self.inputs)?,
            output_dir: self.output_dir.clone(),
            dpi: self.dpi,
            quality: self.quality,
            verbose: self.verbose,
            quiet: self.quiet,
        };
        config.validate()?;
        Ok(config)
    }
}
