use crate::label::{Label, LabelEntry, LabelSet};
use crate::locator::{clean_span, find_all_occurrences};
use log::debug;

/// Per-character label sets of one text.
///
/// `len()` always equals the number of characters of the text it was built
/// from, and position `i` holds exactly the labels whose located range
/// `[start, end)` contains `i`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Coverage {
    positions: Vec<LabelSet>,
}

impl Coverage {
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&LabelSet> {
        self.positions.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &LabelSet> {
        self.positions.iter()
    }

    pub fn as_slice(&self) -> &[LabelSet] {
        &self.positions
    }
}

/// Build the label coverage of `text`.
///
/// Entries without a skill or span, and spans that do not survive
/// [`clean_span`], are skipped without complaint.
pub fn build_coverage(text: &str, entries: &[LabelEntry], min_span_chars: usize) -> Coverage {
    let len = text.chars().count();
    let mut positions = vec![LabelSet::new(); len];
    let mut skipped = 0usize;

    for entry in entries {
        let Some(label) = label_for(entry, min_span_chars) else {
            skipped += 1;
            continue;
        };

        for (start, end) in find_all_occurrences(text, label.span()) {
            let start = start.min(len);
            let end = end.clamp(start, len);
            for set in &mut positions[start..end] {
                set.insert(label.clone());
            }
        }
    }

    debug!(
        "Built coverage over {len} chars from {} entries ({skipped} skipped)",
        entries.len()
    );

    Coverage { positions }
}

fn label_for(entry: &LabelEntry, min_span_chars: usize) -> Option<Label> {
    let skill = entry.skill_name()?;
    let span = clean_span(entry.span.as_deref()?, min_span_chars)?;
    Some(Label::new(
        skill,
        entry.reason.as_deref().unwrap_or_default(),
        span,
    ))
}
