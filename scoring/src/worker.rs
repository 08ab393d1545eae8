use crate::client::{ChatClient, ChatMessage};
use crate::error::Result;
use crate::payload::extract_json_payload;
use crate::prompt::build_prompt;
use crate::{MatchScore, ScoreRequest};
use std::sync::Arc;
use tracing::{debug, warn};

/// Scores one (activity, person) pair through a chat model.
#[derive(Clone)]
pub struct ScoringWorker {
    client: Arc<dyn ChatClient>,
}

impl ScoringWorker {
    pub fn new(client: Arc<dyn ChatClient>) -> Self {
        Self { client }
    }

    /// Score `request`, falling back to [`MatchScore::fallback`] on any failure.
    pub async fn score(&self, request: &ScoreRequest) -> MatchScore {
        match self.try_score(request).await {
            Ok(score) => {
                debug!(
                    person = request.person_index,
                    score = score.score,
                    "scoring finished"
                );
                score
            }
            Err(err) => {
                warn!(person = request.person_index, "scoring failed: {err}");
                MatchScore::fallback()
            }
        }
    }

    /// Score `request`, surfacing client and payload errors.
    pub async fn try_score(&self, request: &ScoreRequest) -> Result<MatchScore> {
        let prompt = build_prompt(request);
        let raw = self.client.chat(&[ChatMessage::user(prompt)], 0.0).await?;
        MatchScore::from_payload(&extract_json_payload(&raw))
    }
}
