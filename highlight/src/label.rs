use log::debug;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;

/// One annotation attached to a character range.
///
/// Identity is by value: two labels with equal fields are the same label.
/// The derived ordering (skill, then reason, then span) is the canonical
/// display and color-key order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Label {
    skill: String,
    reason: String,
    span: String,
}

impl Label {
    pub fn new(skill: impl Into<String>, reason: impl Into<String>, span: impl Into<String>) -> Self {
        Self {
            skill: skill.into(),
            reason: reason.into(),
            span: span.into(),
        }
    }

    pub fn skill(&self) -> &str {
        &self.skill
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    /// The cleaned span text this label was located by
    pub fn span(&self) -> &str {
        &self.span
    }
}

/// Deduplicated set of labels, iterated in canonical order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct LabelSet(BTreeSet<Label>);

impl LabelSet {
    pub const fn new() -> Self {
        Self(BTreeSet::new())
    }

    /// Returns `true` if the label was not present yet.
    pub fn insert(&mut self, label: Label) -> bool {
        self.0.insert(label)
    }

    pub fn contains(&self, label: &Label) -> bool {
        self.0.contains(label)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Label> {
        self.0.iter()
    }

    /// Canonical key used for color lookup and card ordering
    pub fn key(&self) -> CombinationKey {
        CombinationKey(self.0.iter().cloned().collect())
    }
}

impl FromIterator<Label> for LabelSet {
    fn from_iter<I: IntoIterator<Item = Label>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a LabelSet {
    type Item = &'a Label;
    type IntoIter = std::collections::btree_set::Iter<'a, Label>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Sorted labels of one combination.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct CombinationKey(Vec<Label>);

impl CombinationKey {
    pub fn labels(&self) -> &[Label] {
        &self.0
    }
}

/// A raw annotation record as produced by the skill extraction step.
///
/// Every field is optional on the wire; entries without `skill` or `span`
/// are skipped by the highlighter. The flags tell whether the extractor
/// considered the skill needed, optional or trainable for the activity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LabelEntry {
    #[serde(default)]
    pub skill: Option<String>,

    #[serde(default)]
    pub reason: Option<String>,

    /// Alternate reason field used by older extraction runs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub why: Option<String>,

    /// Raw span text, possibly wrapped in quotes
    #[serde(default)]
    pub span: Option<String>,

    #[serde(default, deserialize_with = "deserialize_flag")]
    pub needed: bool,

    #[serde(default, deserialize_with = "deserialize_flag")]
    pub optional: bool,

    #[serde(default, deserialize_with = "deserialize_flag")]
    pub trainable: bool,
}

impl LabelEntry {
    pub fn new(skill: impl Into<String>, reason: impl Into<String>, span: impl Into<String>) -> Self {
        Self {
            skill: Some(skill.into()),
            reason: Some(reason.into()),
            span: Some(span.into()),
            ..Default::default()
        }
    }

    pub fn needed(mut self) -> Self {
        self.needed = true;
        self
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn trainable(mut self) -> Self {
        self.trainable = true;
        self
    }

    /// True when any of the needed/optional/trainable flags is set
    pub fn is_flagged(&self) -> bool {
        self.needed || self.optional || self.trainable
    }

    /// Non-empty skill name, if any
    pub fn skill_name(&self) -> Option<&str> {
        self.skill.as_deref().filter(|s| !s.is_empty())
    }

    /// `reason`, falling back to `why`, trimmed; `None` when both are blank
    pub fn reason_text(&self) -> Option<&str> {
        [self.reason.as_deref(), self.why.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|r| !r.is_empty())
    }

    /// Parse a JSON array of entries, dropping elements that are not label
    /// objects. `null` reads as an empty list; anything else that is not an
    /// array is an error.
    pub fn parse_lenient(json: &str) -> serde_json::Result<Vec<LabelEntry>> {
        let values: Option<Vec<Value>> = serde_json::from_str(json)?;
        Ok(Self::from_values(values.unwrap_or_default()))
    }

    /// Keep the values that deserialize as entries.
    pub fn from_values(values: Vec<Value>) -> Vec<LabelEntry> {
        values
            .into_iter()
            .filter_map(|value| match serde_json::from_value(value) {
                Ok(entry) => Some(entry),
                Err(err) => {
                    debug!("skipping malformed label entry: {err}");
                    None
                }
            })
            .collect()
    }
}

/// Accepts booleans, numbers, strings and null, the way loosely typed
/// extraction output encodes its flags.
fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
        Float(f64),
        Text(String),
    }

    Ok(match Option::<Flag>::deserialize(deserializer)? {
        None => false,
        Some(Flag::Bool(b)) => b,
        Some(Flag::Int(i)) => i != 0,
        Some(Flag::Float(f)) => f != 0.0,
        Some(Flag::Text(s)) => !s.is_empty(),
    })
}
