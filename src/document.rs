//! JSON-backed reference document: an ordered tag list of font resources and
//! text elements, implementing [`DocumentCodec`].
//!
//! A text element's formatted text uses the same line syntax the rewrite
//! engine works on. Each line starting with `]` closes a record's parameter
//! block and carries that record's text, so record `i` holds run `i`.

use std::collections::{BTreeSet, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::codec::DocumentCodec;
use crate::error::Error;
use crate::formatted::{Directive, FormattedText, Line};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FontResource {
    pub id: u16,
    pub family: String,
    pub size_pt: u16,
    /// Every character the font has a glyph for.
    pub glyphs: String,
}

impl FontResource {
    pub fn covers(&self, c: char) -> bool {
        c.is_control() || self.glyphs.contains(c)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextElement {
    pub id: u16,
    pub formatted_text: String,
    pub texts: Vec<String>,
    #[serde(default)]
    pub modified: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Tag {
    Font(FontResource),
    Text(TextElement),
}

impl Tag {
    pub fn id(&self) -> u16 {
        match self {
            Tag::Font(f) => f.id,
            Tag::Text(t) => t.id,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub tags: Vec<Tag>,
}

fn escape_record_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            _ => out.push(c),
        }
    }
    out
}

fn is_record_line(line: &Line) -> bool {
    line.directive().is_none() && line.text().starts_with(']')
}

fn record_count(text: &FormattedText) -> usize {
    text.lines().iter().filter(|l| is_record_line(l)).count()
}

/// A run whose text cannot be drawn with the font in effect at its record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UncoveredRun {
    pub run: usize,
    /// Font in effect at the record, if any `font` directive precedes it.
    pub font: Option<u16>,
    /// Characters without a glyph; every drawable character when the font
    /// is missing.
    pub missing: String,
}

impl Document {
    pub fn from_json(json: &str) -> Result<Document, Error> {
        let doc: Document = serde_json::from_str(json)?;
        let mut seen = HashSet::new();
        for tag in &doc.tags {
            if !seen.insert(tag.id()) {
                return Err(Error::InvalidDocument(format!(
                    "character id {} is used more than once",
                    tag.id()
                )));
            }
            if let Tag::Text(element) = tag {
                let records = record_count(&FormattedText::parse(&element.formatted_text));
                if records != element.texts.len() {
                    return Err(Error::InvalidDocument(format!(
                        "element {} has {records} text records but {} texts",
                        element.id,
                        element.texts.len()
                    )));
                }
            }
        }
        Ok(doc)
    }

    pub fn load(path: &Path) -> Result<Document, Error> {
        Document::from_json(&std::fs::read_to_string(path)?)
    }

    pub fn font(&self, id: u16) -> Option<&FontResource> {
        self.tags.iter().find_map(|t| match t {
            Tag::Font(f) if f.id == id => Some(f),
            _ => None,
        })
    }

    pub fn element(&self, id: u16) -> Result<&TextElement, Error> {
        self.tags
            .iter()
            .find_map(|t| match t {
                Tag::Text(e) if e.id == id => Some(e),
                _ => None,
            })
            .ok_or(Error::UnknownElement(id))
    }

    fn element_mut(&mut self, id: u16) -> Result<&mut TextElement, Error> {
        self.tags
            .iter_mut()
            .find_map(|t| match t {
                Tag::Text(e) if e.id == id => Some(e),
                _ => None,
            })
            .ok_or(Error::UnknownElement(id))
    }

    fn next_id(&self) -> Result<u16, Error> {
        match self.tags.iter().map(Tag::id).max() {
            None => Ok(1),
            Some(max) => max.checked_add(1).ok_or(Error::IdsExhausted),
        }
    }

    /// Runs of `texts` that the fonts referenced by `formatted_text` cannot
    /// draw. Run `i` is checked against the font in effect at record `i`.
    pub fn uncovered_runs(&self, formatted_text: &str, texts: &[String]) -> Vec<UncoveredRun> {
        let text = FormattedText::parse(formatted_text);
        let mut current_font = None;
        let mut run = 0;
        let mut uncovered = Vec::new();
        for line in text.lines() {
            if let Some(&Directive::Font(id)) = line.directive() {
                current_font = Some(id);
                continue;
            }
            if !is_record_line(line) {
                continue;
            }
            let Some(run_text) = texts.get(run) else {
                break;
            };

            let font = current_font.and_then(|id| self.font(id));
            let missing: String = match font {
                Some(font) => run_text.chars().filter(|&c| !font.covers(c)).collect(),
                None => run_text.chars().filter(|c| !c.is_control()).collect(),
            };
            if font.is_none() || !missing.is_empty() {
                uncovered.push(UncoveredRun {
                    run,
                    font: current_font,
                    missing,
                });
            }
            run += 1;
        }
        uncovered
    }
}

impl DocumentCodec for Document {
    fn text_elements(&self) -> Vec<u16> {
        self.tags
            .iter()
            .filter_map(|t| match t {
                Tag::Text(e) => Some(e.id),
                Tag::Font(_) => None,
            })
            .collect()
    }

    fn raw_texts(&self, element: u16) -> Result<Vec<String>, Error> {
        Ok(self.element(element)?.texts.clone())
    }

    fn decode_formatted_text(&self, element: u16) -> Result<String, Error> {
        Ok(self.element(element)?.formatted_text.clone())
    }

    fn encode_formatted_text(
        &mut self,
        element: u16,
        formatted_text: &str,
        replacements: &[String],
    ) -> Result<bool, Error> {
        self.element(element)?;

        let mut text = FormattedText::parse(formatted_text);
        let records = record_count(&text);
        if records != replacements.len() {
            return Err(Error::InvalidDocument(format!(
                "element {element} has {records} text records but {} replacement strings were given",
                replacements.len()
            )));
        }

        let uncovered = self.uncovered_runs(formatted_text, replacements);
        if let Some(first) = uncovered.first() {
            match first.font {
                Some(font) if self.font(font).is_some() => log::debug!(
                    "element {element}: font {font} has no glyphs for {:?}",
                    first.missing
                ),
                _ => log::debug!("element {element}: run {} has no usable font", first.run),
            }
            return Ok(false);
        }

        let mut replacements_iter = replacements.iter();
        for line in text.lines_mut() {
            if !is_record_line(line) {
                continue;
            }
            if let Some(replacement) = replacements_iter.next() {
                line.set_literal(format!("]{}", escape_record_text(replacement)));
            }
        }

        let target = self.element_mut(element)?;
        target.formatted_text = text.render();
        target.texts = replacements.to_vec();
        Ok(true)
    }

    fn insert_font_resource(
        &mut self,
        position: usize,
        glyphs: &BTreeSet<char>,
        family: &str,
        size_pt: u16,
    ) -> Result<u16, Error> {
        let id = self.next_id()?;
        let position = position.min(self.tags.len());
        self.tags.insert(
            position,
            Tag::Font(FontResource {
                id,
                family: family.to_string(),
                size_pt,
                glyphs: glyphs.iter().collect(),
            }),
        );
        Ok(id)
    }

    fn referenced_font_ids(&self, element: u16) -> Result<BTreeSet<u16>, Error> {
        Ok(FormattedText::parse(&self.element(element)?.formatted_text).font_ids())
    }

    fn mark_modified(&mut self, element: u16) -> Result<(), Error> {
        self.element_mut(element)?.modified = true;
        Ok(())
    }

    fn serialize(&self) -> Result<Vec<u8>, Error> {
        Ok(serde_json::to_vec_pretty(self)?)
    }
}
