use std::collections::BTreeSet;

use crate::codec::DocumentCodec;
use crate::config::PatchConfig;
use crate::error::Error;
use crate::fonts;
use crate::formatted::FormattedText;
use crate::model::TagRecord;

/// Every distinct character in every row's original and translated text,
/// across the whole batch.
pub fn glyph_closure(records: &[TagRecord]) -> BTreeSet<char> {
    records
        .iter()
        .flat_map(|r| &r.rows)
        .flat_map(|row| row.original_text.chars().chain(row.translated_text.chars()))
        .collect()
}

/// Inserts a font covering the batch's glyph closure and returns its id.
pub fn synthesize<D: DocumentCodec + ?Sized>(
    doc: &mut D,
    records: &[TagRecord],
    config: &PatchConfig,
) -> Result<u16, Error> {
    let glyphs = glyph_closure(records);
    let family = &config.fallback_family;

    match fonts::missing_glyphs(family, &glyphs) {
        None => log::warn!("Fallback font {family} is not installed; glyph coverage unchecked"),
        Some(missing) if !missing.is_empty() => {
            let sample: String = missing.iter().take(16).collect();
            log::warn!(
                "Fallback font {family} has no glyphs for {} characters (e.g. {sample:?})",
                missing.len()
            );
        }
        Some(_) => {}
    }

    let id = doc.insert_font_resource(
        config.fallback_position,
        &glyphs,
        family,
        config.fallback_size_pt,
    )?;
    log::info!(
        "Added fallback font {id} ({family}, {} glyphs) at position {}",
        glyphs.len(),
        config.fallback_position
    );
    Ok(id)
}

/// Points every `font` directive naming one of `old` at `new`.
pub fn retarget(formatted_text: &str, old: &BTreeSet<u16>, new: u16) -> String {
    let mut text = FormattedText::parse(formatted_text);
    text.retarget_fonts(old, new);
    text.render()
}
