/*!
# ESCO Scoring

Match scores for (activity, person) pairs, computed by a chat model served
through LM Studio or any other OpenAI-compatible endpoint.

## Pipeline

```text
ScoreRequest
  ├─> build_prompt          (skills, goal, interests, flagged activity skills)
  ├─> ChatClient::chat      (temperature 0)
  ├─> extract_json_payload  (code fences, stray backticks)
  └─> MatchScore            (score clamped to [0, 1])
```

[`ScoringWorker::score`] never fails: any error along the way is logged and
turned into [`MatchScore::fallback`]. [`JobBoard`] runs workers in the
background, once per [`JobKey`], and polls them on a fixed interval with a
bounded number of attempts.

## Example

```rust,no_run
use esco_scoring::{JobBoard, JobKey, LmStudioClient, ModelConfig, PollPolicy};
use esco_scoring::{ScoreRequest, ScoringWorker};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let client = LmStudioClient::new(&ModelConfig::default())?;
    let mut board = JobBoard::new(ScoringWorker::new(Arc::new(client)));

    let key = JobKey::new(0, 0);
    board.submit(key, ScoreRequest::default());
    let status = board.wait(key, PollPolicy::default()).await;
    println!("{key}: {status:?}");
    Ok(())
}
```
*/

mod client;
mod config;
mod error;
mod jobs;
mod payload;
mod prompt;
mod worker;

pub use client::{ChatClient, ChatMessage, LmStudioClient};
pub use config::{ModelConfig, PollPolicy};
pub use error::{Result, ScoringError};
pub use jobs::{JobBoard, JobKey, JobStatus};
pub use payload::extract_json_payload;
pub use prompt::{RESPONSE_SHAPE, build_prompt};
pub use worker::ScoringWorker;

use esco_highlight::LabelEntry;
use serde::{Deserialize, Serialize};

/// Everything the model needs to score one person against one activity
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreRequest {
    pub activity_text: String,

    /// Detailed skill annotations of the activity
    pub labels: Vec<LabelEntry>,

    pub person_skills: Vec<String>,
    pub goal: String,
    pub interests: String,

    /// Zero-based; shown one-based in the prompt
    pub person_index: usize,
}

/// Result of one scoring run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchScore {
    /// Match quality in `[0, 1]`
    pub score: f64,
    pub explanation: String,
    pub explanation_short: String,
    pub recommend: bool,
}

impl MatchScore {
    /// Returned whenever the model call or its payload fails
    pub fn fallback() -> Self {
        Self {
            score: 0.0,
            explanation: "Model call failed".to_string(),
            explanation_short: String::new(),
            recommend: false,
        }
    }

    /// Returned when the background job itself died
    pub fn failed(kind: &str) -> Self {
        Self {
            explanation: format!("Error: {kind}"),
            ..Self::fallback()
        }
    }

    /// Score as a percentage rounded to one decimal
    pub fn percent(&self) -> f64 {
        (self.score * 1000.0).round() / 10.0
    }
}
