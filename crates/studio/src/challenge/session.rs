use shared::{Challenge, CompletionEvent, ProgressReport, SceneObject};

use super::validator::check_progress;

/// A user's attempt at one challenge
#[derive(Debug, Clone)]
pub struct ChallengeSession {
    challenge: Challenge,
    started_at_ms: u64,
    report: ProgressReport,
    hint: Option<String>,
    completion: Option<CompletionEvent>,
}

impl ChallengeSession {
    pub fn new(challenge: Challenge, started_at_ms: u64) -> Self {
        let total = challenge.objectives.len();
        Self {
            challenge,
            started_at_ms,
            report: ProgressReport::from_completed(Default::default(), total),
            hint: None,
            completion: None,
        }
    }

    pub fn challenge(&self) -> &Challenge {
        &self.challenge
    }

    /// Most recent validation result
    pub fn report(&self) -> &ProgressReport {
        &self.report
    }

    pub fn current_hint(&self) -> Option<&str> {
        self.hint.as_deref()
    }

    /// Completion event, once the challenge has been completed
    pub fn completion(&self) -> Option<&CompletionEvent> {
        self.completion.as_ref()
    }

    pub fn is_complete(&self) -> bool {
        self.completion.is_some()
    }

    /// Re-validate the scene. Returns the completion event the first time
    /// the challenge is complete; later calls return `None` even if it stays complete.
    pub fn evaluate(&mut self, objects: &[SceneObject], now_ms: u64) -> Option<CompletionEvent> {
        self.report = check_progress(objects, &self.challenge);
        if !self.report.is_complete || self.completion.is_some() {
            return None;
        }

        let event = CompletionEvent {
            challenge_id: self.challenge.id,
            completion_time: now_ms.saturating_sub(self.started_at_ms),
        };
        tracing::info!(
            challenge = event.challenge_id,
            completion_time = event.completion_time,
            "challenge completed"
        );
        self.completion = Some(event.clone());
        Some(event)
    }

    /// Show the hint for the first objective not yet completed.
    /// Falls back to the first hint when every objective is done.
    pub fn next_hint(&mut self) -> Option<&str> {
        let index = self.report.first_incomplete().unwrap_or(0);
        self.hint = self
            .challenge
            .hint(index)
            .or_else(|| self.challenge.hints.first().map(String::as_str))
            .map(str::to_string);
        self.hint.as_deref()
    }
}
