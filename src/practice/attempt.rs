use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One checked drawing. Serialized as-is into coaching requests.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Attempt {
    pub character: String,
    #[serde(rename = "match")]
    pub is_match: bool,
    pub feedback: String,
    pub timestamp: DateTime<Utc>,
}

/// Append-only record of attempts within one practice mode.
#[derive(Clone, Debug, Default)]
pub struct AttemptHistory {
    attempts: Vec<Attempt>,
}

impl AttemptHistory {
    pub fn push(&mut self, attempt: Attempt) {
        self.attempts.push(attempt);
    }

    pub fn clear(&mut self) {
        self.attempts.clear();
    }

    pub fn len(&self) -> usize {
        self.attempts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attempts.is_empty()
    }

    pub fn as_slice(&self) -> &[Attempt] {
        &self.attempts
    }

    pub fn last(&self) -> Option<&Attempt> {
        self.attempts.last()
    }

    pub fn matched_count(&self) -> usize {
        self.attempts.iter().filter(|a| a.is_match).count()
    }
}
