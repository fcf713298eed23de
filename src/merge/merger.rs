//! Core merge implementation.
//!
//! Non-PDF inputs are converted into temporary single- or multi-page PDFs
//! first, then all documents are concatenated in input order: objects from
//! each document are renumbered past the accumulated maximum, copied across,
//! and the page references spliced into the base document's page tree.
//!
//! Temporary PDFs are owned as `tempfile::TempPath` values scoped to the
//! merge call, so they are removed on every exit path, including early
//! returns on conversion failures. The output file is written only once, at
//! the end, via a temp-and-rename so a failed write never leaves a partial
//! output behind.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use lopdf::{Document, Object, ObjectId};
use tempfile::{NamedTempFile, TempPath};
use tracing::{debug, info};

use crate::codec::{DocumentCodec, FileKind, LibraryCodec};
use crate::error::{Error, Result};

/// Summary of a completed merge.
#[derive(Debug, Clone)]
pub struct MergeOutcome {
    /// Number of input files merged.
    pub files_merged: usize,

    /// Total number of pages in the output document.
    pub total_pages: usize,
}

/// Merges an ordered list of PDF/TIFF/JPG files into one PDF.
pub struct Merger<C> {
    codec: C,
}

impl Merger<LibraryCodec> {
    /// Create a merger backed by the production codec.
    pub fn new() -> Self {
        Self::with_codec(LibraryCodec::new())
    }
}

impl Default for Merger<LibraryCodec> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: DocumentCodec> Merger<C> {
    /// Create a merger with an injected codec.
    pub fn with_codec(codec: C) -> Self {
        Self { codec }
    }

    /// Merge `paths` in order into a single PDF at `output`.
    ///
    /// The caller is expected to have normalized `output` to a `.pdf` path
    /// and resolved the overwrite policy; an empty input list is defended
    /// with [`Error::NoFilesToMerge`].
    ///
    /// # Errors
    ///
    /// The first failing input aborts the merge: unsupported extensions,
    /// decode failures, and unreadable PDFs all surface as their respective
    /// error variants. Nothing is written to `output` on failure.
    pub fn merge(&self, paths: &[PathBuf], output: &Path) -> Result<MergeOutcome> {
        if paths.is_empty() {
            return Err(Error::NoFilesToMerge);
        }

        // Keeps each converted input alive (and on disk) until the merge
        // call returns; dropping a TempPath deletes the file.
        let mut artifacts: Vec<TempPath> = Vec::new();

        let mut accumulator: Option<PdfAccumulator> = None;
        for path in paths {
            let document = self.load_as_pdf(path, &mut artifacts)?;
            match accumulator.as_mut() {
                Some(acc) => acc.append(document)?,
                None => accumulator = Some(PdfAccumulator::new(document)),
            }
        }

        // Non-empty paths guarantee the accumulator was seeded.
        let mut merged = match accumulator {
            Some(acc) => acc.finish(),
            None => return Err(Error::NoFilesToMerge),
        };

        let total_pages = merged.get_pages().len();
        write_atomically(&mut merged, output)?;

        info!(
            files = paths.len(),
            pages = total_pages,
            output = %output.display(),
            "merge complete"
        );

        Ok(MergeOutcome {
            files_merged: paths.len(),
            total_pages,
        })
    }

    /// Load one input as a `lopdf` document, converting raster files to a
    /// temporary PDF first.
    fn load_as_pdf(&self, path: &Path, artifacts: &mut Vec<TempPath>) -> Result<Document> {
        match FileKind::from_path(path)? {
            FileKind::Pdf => {
                Document::load(path).map_err(|err| Error::failed_to_load_pdf(path, err.to_string()))
            }
            FileKind::Tiff | FileKind::Jpeg => {
                let frames = self.codec.decode_frames(path)?;
                let bytes = self.codec.frames_to_pdf(&frames)?;

                let mut temp = NamedTempFile::new()?;
                temp.write_all(&bytes)?;
                temp.flush()?;
                let temp_path = temp.into_temp_path();

                debug!(
                    input = %path.display(),
                    frames = frames.len(),
                    "converted raster file to temporary PDF"
                );

                let document = Document::load(&temp_path)
                    .map_err(|err| Error::conversion_failed(path, err.to_string()))?;
                artifacts.push(temp_path);
                Ok(document)
            }
        }
    }
}

/// Accumulates documents into a single page tree.
struct PdfAccumulator {
    document: Document,
    max_id: u32,
}

impl PdfAccumulator {
    fn new(first: Document) -> Self {
        let max_id = first.max_id;
        Self {
            document: first,
            max_id,
        }
    }

    /// Append another document's pages after the current ones.
    fn append(&mut self, mut doc: Document) -> Result<()> {
        // Renumber objects to avoid ID conflicts.
        doc.renumber_objects_with(self.max_id + 1);
        self.max_id = doc.max_id;

        let page_ids: Vec<ObjectId> = doc.get_pages().into_values().collect();
        self.document.objects.extend(doc.objects);
        self.add_pages_to_tree(&page_ids)
    }

    /// Splice page references into the base document's Pages dictionary.
    fn add_pages_to_tree(&mut self, page_ids: &[ObjectId]) -> Result<()> {
        let catalog = self
            .document
            .catalog_mut()
            .map_err(|err| Error::other(format!("Failed to get catalog: {err}")))?;

        let pages_id = catalog
            .get(b"Pages")
            .and_then(|p| p.as_reference())
            .map_err(|err| Error::other(format!("Failed to get pages reference: {err}")))?;

        let pages_dict = self
            .document
            .get_object_mut(pages_id)
            .map_err(|err| Error::other(format!("Failed to get pages object: {err}")))?;

        let Object::Dictionary(dict) = pages_dict else {
            return Err(Error::other("Pages object is not a dictionary"));
        };

        let kids = dict
            .get_mut(b"Kids")
            .map_err(|_| Error::other("Pages dictionary missing Kids array"))?;
        let Object::Array(kids_array) = kids else {
            return Err(Error::other("Kids is not an array"));
        };
        for &page_id in page_ids {
            kids_array.push(Object::Reference(page_id));
        }

        let current_count = dict.get(b"Count").and_then(|c| c.as_i64()).unwrap_or(0);
        dict.set("Count", Object::Integer(current_count + page_ids.len() as i64));

        Ok(())
    }

    /// Compact and renumber the finished document.
    fn finish(mut self) -> Document {
        self.document.compress();
        self.document.renumber_objects();
        self.document
    }
}

/// Write the document via a temp file and rename, so the output path never
/// holds a partially written PDF.
fn write_atomically(document: &mut Document, output: &Path) -> Result<()> {
    let tmp = tmp_path_for(output);

    let file = File::create(&tmp).map_err(|source| Error::FailedToCreateOutput {
        path: output.to_path_buf(),
        source,
    })?;
    let mut writer = BufWriter::new(file);

    let write_result = document
        .save_to(&mut writer)
        .map_err(|err| io::Error::other(err.to_string()))
        .and_then(|_| writer.flush());

    if let Err(source) = write_result {
        let _ = fs::remove_file(&tmp);
        return Err(Error::FailedToWrite {
            path: output.to_path_buf(),
            source,
        });
    }

    fs::rename(&tmp, output).map_err(|source| {
        let _ = fs::remove_file(&tmp);
        Error::FailedToWrite {
            path: output.to_path_buf(),
            source,
        }
    })
}

fn tmp_path_for(output: &Path) -> PathBuf {
    let mut name = output
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output.pdf".to_string());
    name.push_str(".tmp");
    output.with_file_name(name)
}
