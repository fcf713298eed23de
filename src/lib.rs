//! # docbind
//!
//! Merge PDF, TIFF, and JPG files into a single PDF, or export their pages
//! and frames as individual JPG images.
//!
//! The crate is organized around an ordered [`registry::FileRegistry`] of
//! input files and two batch pipelines that consume it:
//!
//! - [`merge::Merger`] converts raster inputs to temporary PDFs and
//!   concatenates everything, in order, into one output PDF.
//! - [`export::Exporter`] writes every page/frame as a JPG file, isolating
//!   per-file failures.
//!
//! Both pipelines sit on the [`codec::DocumentCodec`] trait, whose
//! production implementation is backed by `lopdf`, `printpdf`, the
//! `tiff`/`image` decoders, and `pdfium-render`.
//!
//! # Examples
//!
//! ```no_run
//! use docbind::merge::Merger;
//! use std::path::{Path, PathBuf};
//!
//! # fn main() -> docbind::Result<()> {
//! let inputs = vec![PathBuf::from("scan.tif"), PathBuf::from("notes.pdf")];
//! let outcome = Merger::new().merge(&inputs, Path::new("combined.pdf"))?;
//! println!("{} pages written", outcome.total_pages);
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod codec;
pub mod config;
pub mod error;
pub mod export;
pub mod merge;
pub mod registry;
pub mod utils;

pub use error::{Error, Result};
pub use export::{ExportOutcome, Exporter};
pub use merge::{MergeOutcome, Merger};
pub use registry::{FileEntry, FileRegistry};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
