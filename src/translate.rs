use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::TranslateConfig;
use crate::error::Error;
use crate::model::TagRecord;

/// A translation provider.
pub trait Translator {
    /// Translates `text` into `target_lang`. An empty result means no
    /// translation is available; the row then stays untranslated.
    fn translate(
        &mut self,
        text: &str,
        source_lang: Option<&str>,
        target_lang: &str,
    ) -> Result<String, Error>;
}

/// Fills in `translated_text` for every row that has text and no translation
/// yet. Returns the number of rows translated.
pub fn translate_records<T: Translator + ?Sized>(
    records: &mut [TagRecord],
    translator: &mut T,
    config: &TranslateConfig,
) -> Result<usize, Error> {
    let total = records.len();
    let mut translated = 0;

    for (done, record) in records.iter_mut().enumerate() {
        if done % 10 == 0 {
            log::info!("Progress: {done}/{total}");
        }

        for row in &mut record.rows {
            if !row.translated_text.is_empty() || row.original_text.trim().is_empty() {
                continue;
            }
            let text = translator.translate(
                &row.original_text,
                config.source_lang.as_deref(),
                &config.target_lang,
            )?;
            if !text.is_empty() {
                row.translated_text = text;
                translated += 1;
            }
        }
    }

    log::info!("Translated {translated} rows in {total} records");
    Ok(translated)
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryEntry {
    #[serde(default)]
    pub source_lang: Option<String>,
    pub target_lang: String,
    pub original: String,
    pub translation: String,
}

/// Translator backed by previously made translations.
#[derive(Clone, Debug, Default)]
pub struct TranslationMemory {
    // original text -> entries for it, in file order
    entries: HashMap<String, Vec<MemoryEntry>>,
}

fn same_lang(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b)
}

impl TranslationMemory {
    pub fn new(entries: Vec<MemoryEntry>) -> TranslationMemory {
        let mut memory = TranslationMemory::default();
        for entry in entries {
            memory.entries.entry(entry.original.clone()).or_default().push(entry);
        }
        memory
    }

    /// Reads a JSON list of [`MemoryEntry`]. A missing or malformed file is
    /// an [`Error::Translation`].
    pub fn load(path: &Path) -> Result<TranslationMemory, Error> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            Error::Translation(format!("cannot read memory {}: {e}", path.display()))
        })?;
        let entries: Vec<MemoryEntry> = serde_json::from_str(&json).map_err(|e| {
            Error::Translation(format!("bad memory file {}: {e}", path.display()))
        })?;
        Ok(TranslationMemory::new(entries))
    }

    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn lookup(&self, text: &str, source_lang: Option<&str>, target_lang: &str) -> Option<&str> {
        self.entries
            .get(text)?
            .iter()
            .find(|e| {
                same_lang(&e.target_lang, target_lang)
                    && match (e.source_lang.as_deref(), source_lang) {
                        (Some(a), Some(b)) => same_lang(a, b),
                        _ => true,
                    }
            })
            .map(|e| e.translation.as_str())
    }
}

impl Translator for TranslationMemory {
    fn translate(
        &mut self,
        text: &str,
        source_lang: Option<&str>,
        target_lang: &str,
    ) -> Result<String, Error> {
        match self.lookup(text, source_lang, target_lang) {
            Some(t) => Ok(t.to_string()),
            None => {
                log::debug!("no {target_lang} translation for {text:?}");
                Ok(String::new())
            }
        }
    }
}
