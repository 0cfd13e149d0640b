use std::collections::HashMap;

use crate::codec::DocumentCodec;
use crate::config::PatchConfig;
use crate::error::Error;
use crate::fallback;
use crate::model::TagRecord;
use crate::patch::{self, PatchPlan};

/// Result of one encode attempt for one element.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PatchOutcome {
    Success,
    /// The element's fonts lack glyphs; retry once with the fallback font.
    NeedsFallback,
    /// The fallback font did not help either.
    Fatal,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Stage {
    Initial,
    Fallback,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PatchReport {
    /// Elements written back, in the order they were finalized.
    pub patched: Vec<u16>,
    pub fatal: Vec<u16>,
    /// Elements whose record row count does not match their run count.
    pub skipped: Vec<u16>,
    /// Elements the codec rejected with an error; left unchanged.
    pub failed: Vec<u16>,
    pub fallback_font: Option<u16>,
}

impl PatchReport {
    pub fn is_complete(&self) -> bool {
        self.fatal.is_empty() && self.skipped.is_empty() && self.failed.is_empty()
    }
}

fn attempt<D: DocumentCodec + ?Sized>(
    doc: &mut D,
    id: u16,
    plan: &PatchPlan,
    stage: Stage,
) -> Result<PatchOutcome, Error> {
    if doc.encode_formatted_text(id, &plan.formatted_text, &plan.replacements)? {
        doc.mark_modified(id)?;
        return Ok(PatchOutcome::Success);
    }
    Ok(match stage {
        Stage::Initial => PatchOutcome::NeedsFallback,
        Stage::Fallback => PatchOutcome::Fatal,
    })
}

/// Builds the plan for `id` and makes the first encode attempt.
fn first_attempt<D: DocumentCodec + ?Sized>(
    doc: &mut D,
    id: u16,
    record: &TagRecord,
    config: &PatchConfig,
) -> Result<(PatchOutcome, PatchPlan), Error> {
    let formatted_text = doc.decode_formatted_text(id)?;
    let plan = patch::plan(&formatted_text, &record.rows, config.rescale_heights);
    log::debug!("element {id} patched text:\n{}", plan.formatted_text);
    let outcome = attempt(doc, id, &plan, Stage::Initial)?;
    Ok((outcome, plan))
}

/// Patches every element that has a record, synthesizing one shared fallback
/// font for the batch if any element cannot be encoded with its own fonts.
///
/// Elements are processed in document order. Each element gets at most two
/// encode attempts; a failed second attempt is recorded in the report and the
/// batch carries on. Codec errors on one element are recorded in `failed`
/// and do not stop the others.
pub fn patch_batch<D: DocumentCodec + ?Sized>(
    doc: &mut D,
    records: &[TagRecord],
    config: &PatchConfig,
) -> Result<PatchReport, Error> {
    let mut by_id: HashMap<u16, &TagRecord> = HashMap::new();
    for record in records {
        if by_id.contains_key(&record.id) {
            log::warn!("Record {} appears more than once, keeping the first", record.id);
            continue;
        }
        by_id.insert(record.id, record);
    }

    let mut report = PatchReport::default();
    let mut pending: Vec<(u16, PatchPlan)> = Vec::new();
    let elements = doc.text_elements();

    for &id in &elements {
        let Some(record) = by_id.remove(&id) else {
            continue;
        };
        let run_count = match doc.raw_texts(id) {
            Ok(texts) => texts.len(),
            Err(e) => {
                log::error!("Element {id}: {e}");
                report.failed.push(id);
                continue;
            }
        };
        if run_count == 0 {
            continue;
        }
        if record.rows.len() != run_count {
            log::warn!(
                "Element {id}: record has {} rows but the element has {run_count} runs, skipping",
                record.rows.len()
            );
            report.skipped.push(id);
            continue;
        }

        match first_attempt(doc, id, record, config) {
            Ok((PatchOutcome::Success, _)) => report.patched.push(id),
            Ok((PatchOutcome::NeedsFallback, plan)) => {
                log::info!("Element {id}: fonts lack glyphs for the new text");
                pending.push((id, plan));
            }
            Ok((PatchOutcome::Fatal, _)) => report.fatal.push(id),
            Err(e) => {
                log::error!("Element {id}: {e}");
                report.failed.push(id);
            }
        }
    }

    for id in by_id.keys() {
        log::warn!("Record {id} has no matching text element");
    }

    if pending.is_empty() {
        return Ok(report);
    }

    let font_id = fallback::synthesize(doc, records, config)?;
    report.fallback_font = Some(font_id);

    for (id, plan) in pending {
        let outcome = doc.referenced_font_ids(id).and_then(|old_fonts| {
            let retry = PatchPlan {
                formatted_text: fallback::retarget(&plan.formatted_text, &old_fonts, font_id),
                replacements: plan.replacements,
            };
            attempt(doc, id, &retry, Stage::Fallback)
        });
        match outcome {
            Ok(PatchOutcome::Success) => report.patched.push(id),
            Ok(PatchOutcome::NeedsFallback | PatchOutcome::Fatal) => {
                log::error!("Element {id}: cannot be encoded even with fallback font {font_id}");
                report.fatal.push(id);
            }
            Err(e) => {
                log::error!("Element {id}: {e}");
                report.failed.push(id);
            }
        }
    }

    Ok(report)
}
