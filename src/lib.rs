mod codec;
mod config;
mod document;
mod error;
mod extract;
mod fallback;
pub mod fonts;
pub mod formatted;
mod model;
mod orchestrator;
mod patch;
mod translate;

pub use codec::DocumentCodec;
pub use config::{PatchConfig, TranslateConfig};
pub use document::{Document, FontResource, Tag, TextElement, UncoveredRun};
pub use error::Error;
pub use extract::{extract_records, extract_styles};
pub use fallback::{glyph_closure, retarget, synthesize};
pub use model::{RowRecord, StyleRun, TagRecord, load_records, save_records};
pub use orchestrator::{PatchOutcome, PatchReport, patch_batch};
pub use patch::{PatchPlan, plan, rescale_style};
pub use translate::{MemoryEntry, TranslationMemory, Translator, translate_records};

use std::path::Path;

/// Reads a document and writes its text records as JSON.
pub fn parse_document(input: &Path, output: &Path) -> Result<Vec<TagRecord>, Error> {
    let doc = Document::load(input)?;
    let records = extract_records(&doc)?;
    save_records(&records, output)?;
    Ok(records)
}

/// Patches `input` with `records` and writes the result to `output`.
///
/// The output is written once every element has been processed, including
/// when some elements failed; check the report for those.
pub fn patch_document(
    input: &Path,
    records: &[TagRecord],
    output: &Path,
    config: &PatchConfig,
) -> Result<PatchReport, Error> {
    let mut doc = Document::load(input)?;
    let report = patch_batch(&mut doc, records, config)?;
    let bytes = doc.serialize()?;
    std::fs::write(output, bytes).map_err(Error::Io)?;
    Ok(report)
}

/// True when `path` holds a document (a JSON object with a tag list) rather
/// than a records file.
pub fn is_document_file(path: &Path) -> Result<bool, Error> {
    let value: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(path)?)?;
    Ok(value.get("tags").is_some_and(serde_json::Value::is_array))
}

/// Extracts the records of `input`, translates them and patches the document
/// in one go, writing the result to `output`. Returns the number of rows
/// translated with the patch report.
pub fn translate_document<T: Translator + ?Sized>(
    input: &Path,
    output: &Path,
    translator: &mut T,
    translate_config: &TranslateConfig,
    patch_config: &PatchConfig,
) -> Result<(usize, PatchReport), Error> {
    let mut doc = Document::load(input)?;
    let mut records = extract_records(&doc)?;
    let translated = translate_records(&mut records, translator, translate_config)?;
    let report = patch_batch(&mut doc, &records, patch_config)?;
    let bytes = doc.serialize()?;
    std::fs::write(output, bytes).map_err(Error::Io)?;
    Ok((translated, report))
}
