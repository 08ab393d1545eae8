use crate::coverage::Coverage;
use crate::label::LabelSet;
use serde::Serialize;

static NO_LABELS: LabelSet = LabelSet::new();

/// A maximal run of characters sharing one label set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Segment {
    /// Start offset in characters (inclusive)
    pub start: usize,

    /// End offset in characters (exclusive)
    pub end: usize,

    pub labels: LabelSet,
}

impl Segment {
    /// Number of characters in the segment; an inverted range is empty
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// The slice of `text` this segment covers
    pub fn text<'a>(&self, text: &'a str) -> &'a str {
        if self.is_empty() {
            return "";
        }
        let mut bounds = text
            .char_indices()
            .map(|(byte, _)| byte)
            .chain(std::iter::once(text.len()))
            .skip(self.start);
        let start = bounds.next().unwrap_or(text.len());
        let end = bounds.nth(self.len().saturating_sub(1)).unwrap_or(text.len());
        &text[start..end]
    }
}

/// Split `text` into maximal runs of equal coverage.
///
/// Segments are contiguous, cover the whole text and no two neighbours carry
/// equal label sets. A coverage shorter than the text is padded with empty
/// sets, so the result always spans every character.
pub fn segments_from_coverage(text: &str, coverage: &Coverage) -> Vec<Segment> {
    let len = text.chars().count();
    if len == 0 {
        return Vec::new();
    }
    if coverage.is_empty() {
        return vec![Segment {
            start: 0,
            end: len,
            labels: LabelSet::new(),
        }];
    }

    let at = |i: usize| coverage.get(i).unwrap_or(&NO_LABELS);

    let mut segments = Vec::new();
    let mut start = 0;
    let mut current = at(0);
    for i in 1..len {
        let labels = at(i);
        if labels != current {
            segments.push(Segment {
                start,
                end: i,
                labels: current.clone(),
            });
            start = i;
            current = labels;
        }
    }
    segments.push(Segment {
        start,
        end: len,
        labels: current.clone(),
    });

    segments
}
