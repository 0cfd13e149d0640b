use std::collections::BTreeSet;

use crate::error::Error;

/// The operations the rewrite engine needs from a document container.
///
/// Element ids and font ids are character ids scoped to one document.
pub trait DocumentCodec {
    /// Ids of all text elements, in document order.
    fn text_elements(&self) -> Vec<u16>;

    /// The element's raw text strings, one per run.
    fn raw_texts(&self, element: u16) -> Result<Vec<String>, Error>;

    fn decode_formatted_text(&self, element: u16) -> Result<String, Error>;

    /// Applies a formatted-text blob plus one replacement string per run.
    /// `Ok(false)` means the element's fonts cannot render the replacement
    /// text; the element must be left unchanged in that case.
    fn encode_formatted_text(
        &mut self,
        element: u16,
        formatted_text: &str,
        replacements: &[String],
    ) -> Result<bool, Error>;

    /// Inserts a font resource holding glyphs for `glyphs` at `position` in the
    /// resource table and returns its newly allocated id.
    fn insert_font_resource(
        &mut self,
        position: usize,
        glyphs: &BTreeSet<char>,
        family: &str,
        size_pt: u16,
    ) -> Result<u16, Error>;

    fn referenced_font_ids(&self, element: u16) -> Result<BTreeSet<u16>, Error>;

    fn mark_modified(&mut self, element: u16) -> Result<(), Error>;

    fn serialize(&self) -> Result<Vec<u8>, Error>;
}
