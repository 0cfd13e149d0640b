use crate::codec::DocumentCodec;
use crate::error::Error;
use crate::formatted::FormattedText;
use crate::model::{RowRecord, StyleRun, TagRecord};

/// Recovers one style per run from a formatted-text blob.
pub fn extract_styles(formatted_text: &str, run_count: usize) -> Vec<StyleRun> {
    FormattedText::parse(formatted_text).styles(run_count)
}

/// Builds a record for every text element that carries at least one non-empty
/// text, in document order.
pub fn extract_records<D: DocumentCodec + ?Sized>(doc: &D) -> Result<Vec<TagRecord>, Error> {
    let mut records = Vec::new();

    for id in doc.text_elements() {
        let texts = doc.raw_texts(id)?;
        if texts.iter().all(|t| t.is_empty()) {
            continue;
        }

        let formatted_text = doc.decode_formatted_text(id)?;
        let styles = extract_styles(&formatted_text, texts.len());
        log::debug!("element {id}: {} runs", texts.len());

        let rows = texts
            .into_iter()
            .zip(styles)
            .map(|(text, style)| RowRecord {
                original_text: text,
                translated_text: String::new(),
                height: style.height,
                letter_spacing: style.letter_spacing,
                color: style.color,
            })
            .collect();

        records.push(TagRecord { id, rows });
    }

    Ok(records)
}
