use std::collections::{BTreeSet, HashMap};

use pretty_assertions::assert_eq;
use swf_translator::{
    DocumentCodec, Error, PatchConfig, PatchReport, RowRecord, TagRecord, glyph_closure,
    patch_batch,
};

struct Element {
    id: u16,
    formatted_text: String,
    texts: Vec<String>,
}

/// Codec whose encoder fails a scripted number of times per element.
#[derive(Default)]
struct ScriptedCodec {
    elements: Vec<Element>,
    failures: HashMap<u16, usize>,
    /// Elements whose encode returns an error.
    broken: BTreeSet<u16>,
    next_font: u16,
    encodes: Vec<(u16, String, Vec<String>)>,
    inserted: Vec<(usize, BTreeSet<char>, String, u16)>,
    modified: Vec<u16>,
}

impl ScriptedCodec {
    fn with_element(mut self, id: u16, formatted_text: &str, texts: &[&str]) -> Self {
        self.elements.push(Element {
            id,
            formatted_text: formatted_text.to_string(),
            texts: texts.iter().map(|t| t.to_string()).collect(),
        });
        self
    }

    fn failing(mut self, id: u16, times: usize) -> Self {
        self.failures.insert(id, times);
        self
    }

    fn broken(mut self, id: u16) -> Self {
        self.broken.insert(id);
        self
    }

    fn element(&self, id: u16) -> Result<&Element, Error> {
        self.elements
            .iter()
            .find(|e| e.id == id)
            .ok_or(Error::UnknownElement(id))
    }

    fn encodes_of(&self, id: u16) -> Vec<&str> {
        self.encodes
            .iter()
            .filter(|(e, _, _)| *e == id)
            .map(|(_, blob, _)| blob.as_str())
            .collect()
    }
}

impl DocumentCodec for ScriptedCodec {
    fn text_elements(&self) -> Vec<u16> {
        self.elements.iter().map(|e| e.id).collect()
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
        self.encodes
            .push((element, formatted_text.to_string(), replacements.to_vec()));
        if self.broken.contains(&element) {
            return Err(Error::InvalidDocument(format!("element {element} is corrupt")));
        }
        if let Some(left) = self.failures.get_mut(&element)
            && *left > 0
        {
            *left -= 1;
            return Ok(false);
        }
        Ok(true)
    }

    fn insert_font_resource(
        &mut self,
        position: usize,
        glyphs: &BTreeSet<char>,
        family: &str,
        size_pt: u16,
    ) -> Result<u16, Error> {
        self.inserted
            .push((position, glyphs.clone(), family.to_string(), size_pt));
        Ok(self.next_font)
    }

    fn referenced_font_ids(&self, element: u16) -> Result<BTreeSet<u16>, Error> {
        Ok(swf_translator::formatted::FormattedText::parse(
            &self.element(element)?.formatted_text,
        )
        .font_ids())
    }

    fn mark_modified(&mut self, element: u16) -> Result<(), Error> {
        self.modified.push(element);
        Ok(())
    }

    fn serialize(&self) -> Result<Vec<u8>, Error> {
        Ok(Vec::new())
    }
}

fn record(id: u16, rows: &[(&str, &str)]) -> TagRecord {
    TagRecord {
        id,
        rows: rows
            .iter()
            .map(|(original, translated)| RowRecord {
                original_text: original.to_string(),
                translated_text: translated.to_string(),
                ..RowRecord::default()
            })
            .collect(),
    }
}

fn config() -> PatchConfig {
    PatchConfig {
        fallback_family: "No Such Family For Tests".to_string(),
        ..PatchConfig::default()
    }
}

#[test]
fn successful_batch_creates_no_fallback_font() {
    let mut codec = ScriptedCodec::default()
        .with_element(1, "font 3\n]a", &["a"])
        .with_element(2, "font 3\n]b", &["b"]);
    let records = [record(1, &[("a", "x")]), record(2, &[("b", "")])];

    let report = patch_batch(&mut codec, &records, &config()).unwrap();

    assert_eq!(
        report,
        PatchReport {
            patched: vec![1, 2],
            ..PatchReport::default()
        }
    );
    assert!(codec.inserted.is_empty());
    assert_eq!(codec.modified, vec![1, 2]);
    assert_eq!(codec.encodes[0].2, vec!["x".to_string()]);
    assert_eq!(codec.encodes[1].2, vec!["b".to_string()]);
}

#[test]
fn failed_element_is_retried_with_retargeted_font() {
    let mut codec = ScriptedCodec {
        next_font: 9001,
        ..ScriptedCodec::default()
    }
    .with_element(7, "[\nfont 3\nheight 240\n]Hi\n[\nfont 31\n]There", &["Hi", "There"])
    .failing(7, 1);
    let records = [record(7, &[("Hi", "Привет"), ("There", "")])];

    let report = patch_batch(&mut codec, &records, &config()).unwrap();

    assert_eq!(report.patched, vec![7]);
    assert_eq!(report.fallback_font, Some(9001));
    assert!(report.fatal.is_empty());

    let attempts = codec.encodes_of(7);
    assert_eq!(attempts.len(), 2);
    assert!(attempts[0].contains("font 3\n"));
    assert_eq!(
        attempts[1],
        "[\nfont 9001\nheight 240\n]Hi\n[\nfont 9001\n]There"
    );
    assert_eq!(
        codec.encodes[1].2,
        vec!["Привет".to_string(), "There".to_string()]
    );
    assert_eq!(codec.modified, vec![7]);
}

#[test]
fn second_failure_is_fatal_and_batch_continues() {
    let mut codec = ScriptedCodec {
        next_font: 50,
        ..ScriptedCodec::default()
    }
    .with_element(1, "font 3\n]a", &["a"])
    .with_element(2, "font 4\n]b", &["b"])
    .failing(1, 5);
    let records = [record(1, &[("a", "ä")]), record(2, &[("b", "c")])];

    let report = patch_batch(&mut codec, &records, &config()).unwrap();

    assert_eq!(report.patched, vec![2]);
    assert_eq!(report.fatal, vec![1]);
    assert!(!report.is_complete());
    // One initial attempt and exactly one retry, never a third.
    assert_eq!(codec.encodes_of(1).len(), 2);
    assert_eq!(codec.modified, vec![2]);
}

#[test]
fn fallback_font_is_synthesized_once_per_batch() {
    let mut codec = ScriptedCodec {
        next_font: 77,
        ..ScriptedCodec::default()
    }
    .with_element(1, "font 3\n]a", &["a"])
    .with_element(2, "font 4\n]b", &["b"])
    .with_element(3, "font 5\n]c", &["c"])
    .failing(1, 1)
    .failing(3, 1);
    let records = [
        record(1, &[("a", "α")]),
        record(2, &[("b", "β")]),
        record(3, &[("c", "γ")]),
    ];

    let report = patch_batch(&mut codec, &records, &config()).unwrap();

    assert_eq!(codec.inserted.len(), 1);
    assert_eq!(report.patched, vec![2, 1, 3]);
    assert_eq!(codec.encodes_of(1)[1], "font 77\n]a");
    assert_eq!(codec.encodes_of(3)[1], "font 77\n]c");
    assert_eq!(codec.encodes_of(2).len(), 1);
}

#[test]
fn fallback_glyphs_cover_the_whole_batch() {
    let mut codec = ScriptedCodec::default()
        .with_element(1, "font 3\n]ab", &["ab"])
        .with_element(2, "font 3\n]cd", &["cd"])
        .failing(2, 1);
    let records = [record(1, &[("ab", "xy")]), record(2, &[("cd", "")])];

    patch_batch(&mut codec, &records, &config()).unwrap();

    let (position, glyphs, family, size) = &codec.inserted[0];
    assert_eq!(*position, 0);
    assert_eq!(family, "No Such Family For Tests");
    assert_eq!(*size, 18);
    assert_eq!(glyphs, &BTreeSet::from(['a', 'b', 'c', 'd', 'x', 'y']));
    assert_eq!(glyphs, &glyph_closure(&records));
}

#[test]
fn mismatched_rows_are_skipped() {
    let mut codec = ScriptedCodec::default()
        .with_element(1, "]a\n]b", &["a", "b"])
        .with_element(2, "]c", &["c"]);
    let records = [record(1, &[("a", "x")]), record(2, &[("c", "z")])];

    let report = patch_batch(&mut codec, &records, &config()).unwrap();

    assert_eq!(report.skipped, vec![1]);
    assert_eq!(report.patched, vec![2]);
    assert!(codec.encodes_of(1).is_empty());
}

#[test]
fn records_without_elements_and_elements_without_records_are_ignored() {
    let mut codec = ScriptedCodec::default()
        .with_element(1, "]a", &["a"])
        .with_element(2, "]b", &["b"]);
    let records = [record(2, &[("b", "y")]), record(40, &[("q", "r")])];

    let report = patch_batch(&mut codec, &records, &config()).unwrap();

    assert_eq!(report.patched, vec![2]);
    assert!(codec.encodes_of(1).is_empty());
}

#[test]
fn rescale_setting_reaches_the_encoder() {
    let mut codec = ScriptedCodec::default().with_element(1, "height 20\n]Hello\n]", &["Hello", ""]);
    let records = [TagRecord {
        id: 1,
        rows: vec![
            RowRecord {
                original_text: "Hello".into(),
                translated_text: "Bonjour".into(),
                height: Some(20),
                ..RowRecord::default()
            },
            RowRecord::default(),
        ],
    }];
    let config = PatchConfig {
        rescale_heights: true,
        ..config()
    };

    patch_batch(&mut codec, &records, &config).unwrap();

    assert_eq!(codec.encodes_of(1), vec!["height 14\n]Hello\n]"]);
}

#[test]
fn codec_error_on_one_element_does_not_stop_the_batch() {
    let mut codec = ScriptedCodec::default()
        .with_element(1, "font 3\n]a", &["a"])
        .with_element(2, "font 3\n]b", &["b"])
        .with_element(3, "font 3\n]c", &["c"])
        .broken(2);
    let records = [
        record(1, &[("a", "x")]),
        record(2, &[("b", "y")]),
        record(3, &[("c", "z")]),
    ];

    let report = patch_batch(&mut codec, &records, &config()).unwrap();

    assert_eq!(report.patched, vec![1, 3]);
    assert_eq!(report.failed, vec![2]);
    assert!(!report.is_complete());
    assert_eq!(codec.modified, vec![1, 3]);
}

#[test]
fn first_of_duplicate_records_wins() {
    let mut codec = ScriptedCodec::default().with_element(1, "]a", &["a"]);
    let records = [record(1, &[("a", "first")]), record(1, &[("a", "second")])];

    let report = patch_batch(&mut codec, &records, &config()).unwrap();

    assert_eq!(report.patched, vec![1]);
    assert_eq!(codec.encodes.len(), 1);
    assert_eq!(codec.encodes[0].2, vec!["first".to_string()]);
}
