use crate::formatted::FormattedText;
use crate::model::{RowRecord, StyleRun};

/// Heights at or below this are never produced by rescaling.
const MIN_RESCALED_HEIGHT: u32 = 8;

/// A candidate for the encoder: the patched blob and one text per run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PatchPlan {
    pub formatted_text: String,
    pub replacements: Vec<String>,
}

/// Writes the rows' styles into `formatted_text` and collects the replacement
/// texts. Everything but the touched directive lines stays byte-identical.
pub fn plan(formatted_text: &str, rows: &[RowRecord], rescale_heights: bool) -> PatchPlan {
    let styles: Vec<StyleRun> = rows
        .iter()
        .map(|row| {
            if rescale_heights {
                rescale_style(row)
            } else {
                row.style()
            }
        })
        .collect();

    let mut text = FormattedText::parse(formatted_text);
    text.apply_styles(&styles);

    PatchPlan {
        formatted_text: text.render(),
        replacements: rows.iter().map(|r| r.replacement_text().to_string()).collect(),
    }
}

/// Length-ratio height heuristic: `round(height * original_len / translated_len)`,
/// kept only when it stays above the minimum. Negative letter spacing is
/// clamped to zero.
pub fn rescale_style(row: &RowRecord) -> StyleRun {
    let mut style = row.style();

    let original_len = row.original_text.chars().count();
    let translated_len = row.translated_text.chars().count();
    if let Some(height) = style.height
        && translated_len > 0
    {
        let scaled = (height as f64 * original_len as f64 / translated_len as f64).round();
        if scaled > MIN_RESCALED_HEIGHT as f64 && scaled <= u32::MAX as f64 {
            style.height = Some(scaled as u32);
        }
    }

    if let Some(spacing) = style.letter_spacing
        && spacing < 0
    {
        style.letter_spacing = Some(0);
    }

    style
}
