use crate::error::DatasetError;
use esco_highlight::LabelEntry;
use log::info;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::path::Path;

/// One volunteer activity with its skill annotations
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Activity {
    #[serde(rename = "X")]
    pub text: String,

    /// Ground-truth skills
    #[serde(rename = "Y", default, deserialize_with = "null_as_empty")]
    pub ground_truth: Vec<String>,

    /// Skills predicted by the extraction model
    #[serde(rename = "y_pred", default, deserialize_with = "null_as_empty")]
    pub predicted: Vec<String>,

    #[serde(rename = "y_pred_detailed", default, deserialize_with = "lenient_entries")]
    pub detailed: Vec<LabelEntry>,
}

impl Activity {
    /// Detailed entries worth highlighting: they carry a span and at least
    /// one of the needed/optional/trainable flags.
    pub fn annotations(&self) -> Vec<LabelEntry> {
        self.detailed
            .iter()
            .filter(|e| e.span.as_deref().is_some_and(|s| !s.is_empty()) && e.is_flagged())
            .cloned()
            .collect()
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Entries that are not label objects are skipped rather than failing the row.
fn lenient_entries<'de, D>(deserializer: D) -> Result<Vec<LabelEntry>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(LabelEntry::from_values(raw))
}

/// Read a JSON array of activities from `path`.
pub fn load_activities(path: &Path) -> Result<Vec<Activity>, DatasetError> {
    let contents = std::fs::read_to_string(path).map_err(|source| DatasetError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let activities: Vec<Activity> =
        serde_json::from_str(&contents).map_err(|source| DatasetError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    info!(
        "loaded {} activities from {}",
        activities.len(),
        path.display()
    );
    Ok(activities)
}

/// Activity at `index`, or an out-of-range error naming the dataset size.
pub fn activity_at(activities: &[Activity], index: usize) -> Result<&Activity, DatasetError> {
    activities.get(index).ok_or(DatasetError::OutOfRange {
        index,
        len: activities.len(),
    })
}
