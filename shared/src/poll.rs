use serde_json::Value;

use crate::error::PollError;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 20;
pub const DEFAULT_POLL_DELAY_MS: u32 = 2000;

/// One observed response from the single-slot result endpoint.
#[derive(Debug, Clone)]
pub enum Probe {
    /// 404: nothing written yet.
    NotFound,
    /// 200 with a JSON body; may belong to a different upload.
    Record(Value),
    /// Any other HTTP status, treated as not-ready.
    Status(u16),
    /// Network or parse failure on this attempt; transient.
    Transport(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Retry,
    Matched(Value),
    Exhausted,
}

/// Matches the asynchronously produced analysis record to the upload that
/// triggered it. The endpoint is not scoped to a request, so every probe is
/// classified against the expected correlation id; everything that is not an
/// exact match keeps the sequence waiting until the attempt budget runs out.
#[derive(Debug, Clone)]
pub struct Correlator {
    expected_id: String,
    max_attempts: u32,
    attempts: u32,
}

impl Correlator {
    pub fn new(expected_id: impl Into<String>, max_attempts: u32) -> Result<Self, PollError> {
        let expected_id = expected_id.into();
        if expected_id.is_empty() {
            return Err(PollError::MissingId);
        }
        Ok(Self {
            expected_id,
            max_attempts,
            attempts: 0,
        })
    }

    pub fn expected_id(&self) -> &str {
        &self.expected_id
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Consumes one probe. An id-less or mismatched record keeps the sequence
    /// alive; the budget covers exactly `max_attempts` probes.
    pub fn observe(&mut self, probe: Probe) -> Step {
        self.attempts += 1;

        if let Probe::Record(value) = probe {
            if value.get("id").and_then(Value::as_str) == Some(self.expected_id.as_str()) {
                return Step::Matched(value);
            }
        }

        if self.attempts >= self.max_attempts {
            Step::Exhausted
        } else {
            Step::Retry
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_expected_id_is_rejected_before_any_probe() {
        assert_eq!(
            Correlator::new("", DEFAULT_MAX_ATTEMPTS).unwrap_err(),
            PollError::MissingId
        );
    }

    #[test]
    fn matches_on_third_probe() {
        let mut correlator = Correlator::new("Y", DEFAULT_MAX_ATTEMPTS).unwrap();

        assert_eq!(correlator.observe(Probe::NotFound), Step::Retry);
        assert_eq!(
            correlator.observe(Probe::Record(json!({"id": "X"}))),
            Step::Retry
        );

        let record = json!({"id": "Y", "labels": [{"desc": "cat", "score": 0.9}]});
        assert_eq!(
            correlator.observe(Probe::Record(record.clone())),
            Step::Matched(record)
        );
        assert_eq!(correlator.attempts(), 3);
    }

    #[test]
    fn exhausts_after_exactly_max_attempts() {
        let mut correlator = Correlator::new("Y", 3).unwrap();

        assert_eq!(correlator.observe(Probe::NotFound), Step::Retry);
        assert_eq!(correlator.observe(Probe::NotFound), Step::Retry);
        assert_eq!(correlator.observe(Probe::NotFound), Step::Exhausted);
        assert_eq!(correlator.attempts(), 3);
    }

    #[test]
    fn idless_record_keeps_waiting() {
        let mut correlator = Correlator::new("Y", 5).unwrap();
        assert_eq!(
            correlator.observe(Probe::Record(json!({"labels": []}))),
            Step::Retry
        );
    }

    #[test]
    fn non_404_statuses_and_transport_errors_are_transient() {
        let mut correlator = Correlator::new("Y", 5).unwrap();
        assert_eq!(correlator.observe(Probe::Status(500)), Step::Retry);
        assert_eq!(
            correlator.observe(Probe::Transport("connection reset".into())),
            Step::Retry
        );
    }

    #[test]
    fn match_on_final_attempt_wins_over_exhaustion() {
        let mut correlator = Correlator::new("Y", 2).unwrap();
        assert_eq!(correlator.observe(Probe::NotFound), Step::Retry);

        let record = json!({"id": "Y"});
        assert_eq!(
            correlator.observe(Probe::Record(record.clone())),
            Step::Matched(record)
        );
    }
}
