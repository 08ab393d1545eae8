use crate::config::PollPolicy;
use crate::worker::ScoringWorker;
use crate::{MatchScore, ScoreRequest};
use std::collections::HashMap;
use std::fmt;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, info, warn};

/// Identifies one scoring job: an activity scored for a person
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JobKey {
    pub activity: usize,
    pub person: usize,
}

impl JobKey {
    pub fn new(activity: usize, person: usize) -> Self {
        Self { activity, person }
    }
}

impl fmt::Display for JobKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.activity, self.person)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum JobStatus {
    /// Nothing was submitted for the key
    Missing,
    Pending,
    Done(MatchScore),
}

impl JobStatus {
    pub fn is_done(&self) -> bool {
        matches!(self, JobStatus::Done(_))
    }
}

struct Job {
    handle: Option<JoinHandle<MatchScore>>,
    result: Option<MatchScore>,
    polls: u32,
}

/// Background scoring jobs, at most one per [`JobKey`].
///
/// Jobs run on the ambient Tokio runtime; the board only tracks handles and
/// finished results. It also remembers the last score shown per key so a
/// gauge can animate from the previous value.
pub struct JobBoard {
    worker: ScoringWorker,
    jobs: HashMap<JobKey, Job>,
    last_scores: HashMap<JobKey, f64>,
}

impl JobBoard {
    pub fn new(worker: ScoringWorker) -> Self {
        Self {
            worker,
            jobs: HashMap::new(),
            last_scores: HashMap::new(),
        }
    }

    /// Start scoring `request` under `key` unless a job for it already exists.
    ///
    /// Returns `true` when a new job was spawned. Must be called from within
    /// a Tokio runtime.
    pub fn submit(&mut self, key: JobKey, request: ScoreRequest) -> bool {
        if self.jobs.contains_key(&key) {
            debug!(%key, "scoring job already submitted");
            return false;
        }

        let worker = self.worker.clone();
        let handle = tokio::spawn(async move { worker.score(&request).await });
        self.jobs.insert(
            key,
            Job {
                handle: Some(handle),
                result: None,
                polls: 0,
            },
        );
        info!(%key, "submitted scoring job");
        true
    }

    /// Check a job once without blocking on it.
    pub async fn poll(&mut self, key: JobKey) -> JobStatus {
        let Some(job) = self.jobs.get_mut(&key) else {
            return JobStatus::Missing;
        };
        job.polls += 1;

        if let Some(result) = &job.result {
            return JobStatus::Done(result.clone());
        }

        match job.handle.take() {
            Some(handle) if handle.is_finished() => {
                let result = match handle.await {
                    Ok(score) => score,
                    Err(err) => {
                        let kind = if err.is_panic() { "panic" } else { "cancelled" };
                        warn!(%key, "scoring job failed: {err}");
                        MatchScore::failed(kind)
                    }
                };
                job.result = Some(result.clone());
                JobStatus::Done(result)
            }
            Some(handle) => {
                job.handle = Some(handle);
                JobStatus::Pending
            }
            None => JobStatus::Pending,
        }
    }

    /// Poll every `policy.interval` until the job finishes or the attempt
    /// budget runs out; returns the last observed status.
    pub async fn wait(&mut self, key: JobKey, policy: PollPolicy) -> JobStatus {
        let mut status = self.poll(key).await;
        let mut attempts = 1;
        while matches!(status, JobStatus::Pending) && attempts < policy.max_attempts {
            sleep(policy.interval()).await;
            status = self.poll(key).await;
            attempts += 1;
        }
        if matches!(status, JobStatus::Pending) {
            warn!(%key, attempts, "scoring job still pending after poll budget");
        }
        status
    }

    /// Number of polls seen for `key`
    pub fn poll_count(&self, key: JobKey) -> Option<u32> {
        self.jobs.get(&key).map(|job| job.polls)
    }

    pub fn contains(&self, key: JobKey) -> bool {
        self.jobs.contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Drop every job so the next submit recomputes it.
    pub fn reset(&mut self) {
        for job in self.jobs.values() {
            if let Some(handle) = &job.handle {
                handle.abort();
            }
        }
        self.jobs.clear();
    }

    /// Remember `percent` as the last value shown for `key`.
    pub fn record_final(&mut self, key: JobKey, percent: f64) {
        self.last_scores.insert(key, percent);
    }

    /// Last value shown for `key`, 0 when none was recorded
    pub fn last_score(&self, key: JobKey) -> f64 {
        self.last_scores.get(&key).copied().unwrap_or(0.0)
    }
}

impl Drop for JobBoard {
    fn drop(&mut self) {
        self.reset();
    }
}
