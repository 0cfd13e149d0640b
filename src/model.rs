use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// One text element as exchanged between the parse, translate and patch steps.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TagRecord {
    pub id: u16,
    pub rows: Vec<RowRecord>,
}

/// One run of a text element. `None` styles mean no directive was recovered
/// for this run; they are left alone on re-encode.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowRecord {
    pub original_text: String,
    #[serde(default)]
    pub translated_text: String, // empty = not translated yet
    pub height: Option<u32>,
    pub letter_spacing: Option<i32>,
    pub color: Option<String>,
}

impl RowRecord {
    /// The text that goes back into the document for this run.
    pub fn replacement_text(&self) -> &str {
        if self.translated_text.is_empty() {
            &self.original_text
        } else {
            &self.translated_text
        }
    }

    pub fn style(&self) -> StyleRun {
        StyleRun {
            height: self.height,
            letter_spacing: self.letter_spacing,
            color: self.color.clone(),
        }
    }
}

/// Style directive values recovered for a single run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StyleRun {
    pub height: Option<u32>,
    pub letter_spacing: Option<i32>,
    pub color: Option<String>,
}

pub fn load_records(path: &Path) -> Result<Vec<TagRecord>, Error> {
    let json = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json)?)
}

pub fn save_records(records: &[TagRecord], path: &Path) -> Result<(), Error> {
    let json = serde_json::to_string_pretty(records)?;
    std::fs::write(path, json).map_err(Error::Io)
}
