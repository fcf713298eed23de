//! Merge pipeline: combine PDF/TIFF/JPG inputs into a single PDF.

mod merger;

pub use merger::{MergeOutcome, Merger};
