use strum_macros::Display;

use crate::error::PollError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Phase {
    Idle,
    FileSelected,
    Uploading,
    Polling,
    Done,
    Failed,
}

/// Upload/poll lifecycle for the page. The original UI kept `polling`,
/// `currentFileId` and `selectedFile` as ambient globals; here they are
/// fields with defined reset points so independent sessions can be tested.
///
/// `epoch` identifies which upload a poll sequence belongs to. A new upload
/// bumps it, superseding any still-running loop: the loop's terminal report
/// carries its own epoch and is discarded when stale.
#[derive(Debug, Clone)]
pub struct Session {
    phase: Phase,
    expected_id: Option<String>,
    epoch: u64,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            phase: Phase::Idle,
            expected_id: None,
            epoch: 0,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn expected_id(&self) -> Option<&str> {
        self.expected_id.as_deref()
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Whether the analyze control is enabled. Only an in-flight upload
    /// blocks it; an active poll can be superseded by a fresh upload.
    pub fn can_analyze(&self) -> bool {
        !matches!(self.phase, Phase::Idle | Phase::Uploading)
    }

    /// A valid image was picked. Any pending correlation is abandoned.
    pub fn select_file(&mut self) {
        self.phase = Phase::FileSelected;
        self.expected_id = None;
        self.epoch += 1;
    }

    pub fn begin_upload(&mut self) -> bool {
        if !self.can_analyze() {
            return false;
        }
        self.phase = Phase::Uploading;
        true
    }

    pub fn upload_failed(&mut self) {
        self.phase = Phase::Failed;
    }

    /// Records the correlation id for the completed upload and opens a new
    /// epoch, cancelling any poll loop left over from an earlier upload.
    pub fn upload_succeeded(&mut self, id: impl Into<String>) -> u64 {
        self.expected_id = Some(id.into());
        self.phase = Phase::FileSelected;
        self.epoch += 1;
        self.epoch
    }

    /// Starts the poll sequence for the current epoch. `Ok(false)` means one
    /// is already running and the call is a no-op.
    pub fn begin_poll(&mut self) -> Result<bool, PollError> {
        if self.expected_id.as_deref().is_none_or(str::is_empty) {
            return Err(PollError::MissingId);
        }
        if self.phase == Phase::Polling {
            return Ok(false);
        }
        self.phase = Phase::Polling;
        Ok(true)
    }

    /// Terminal report from a poll loop. Returns whether it was accepted;
    /// reports from superseded epochs are ignored.
    pub fn poll_matched(&mut self, epoch: u64) -> bool {
        if epoch != self.epoch {
            return false;
        }
        self.phase = Phase::Done;
        true
    }

    pub fn poll_exhausted(&mut self, epoch: u64) -> bool {
        if epoch != self.epoch {
            return false;
        }
        self.phase = Phase::Failed;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uploaded_session() -> (Session, u64) {
        let mut session = Session::new();
        session.select_file();
        assert!(session.begin_upload());
        let epoch = session.upload_succeeded("file-1");
        (session, epoch)
    }

    #[test]
    fn starts_idle_with_nothing_to_analyze() {
        let session = Session::new();
        assert_eq!(session.phase(), Phase::Idle);
        assert!(!session.can_analyze());
        assert_eq!(session.expected_id(), None);
    }

    #[test]
    fn selecting_a_file_enables_analyze() {
        let mut session = Session::new();
        session.select_file();
        assert_eq!(session.phase(), Phase::FileSelected);
        assert!(session.can_analyze());
    }

    #[test]
    fn upload_disables_analyze_until_it_resolves() {
        let mut session = Session::new();
        session.select_file();
        assert!(session.begin_upload());
        assert_eq!(session.phase(), Phase::Uploading);
        assert!(!session.can_analyze());
        assert!(!session.begin_upload());

        session.upload_failed();
        assert_eq!(session.phase(), Phase::Failed);
        assert!(session.can_analyze());
    }

    #[test]
    fn poll_without_correlation_id_is_rejected() {
        let mut session = Session::new();
        session.select_file();
        assert_eq!(session.begin_poll(), Err(PollError::MissingId));
        assert_eq!(session.phase(), Phase::FileSelected);
    }

    #[test]
    fn overlapping_begin_poll_is_a_noop() {
        let (mut session, _) = uploaded_session();
        assert_eq!(session.begin_poll(), Ok(true));
        assert_eq!(session.begin_poll(), Ok(false));
        assert_eq!(session.phase(), Phase::Polling);
    }

    #[test]
    fn matched_poll_completes_the_session() {
        let (mut session, epoch) = uploaded_session();
        session.begin_poll().unwrap();
        assert!(session.poll_matched(epoch));
        assert_eq!(session.phase(), Phase::Done);
        assert!(session.can_analyze());
    }

    #[test]
    fn exhausted_poll_fails_the_session() {
        let (mut session, epoch) = uploaded_session();
        session.begin_poll().unwrap();
        assert!(session.poll_exhausted(epoch));
        assert_eq!(session.phase(), Phase::Failed);
        assert!(session.can_analyze());
    }

    #[test]
    fn new_upload_supersedes_a_running_poll() {
        let (mut session, old_epoch) = uploaded_session();
        session.begin_poll().unwrap();

        // Analyze is still available mid-poll; a second upload takes over.
        assert!(session.begin_upload());
        let new_epoch = session.upload_succeeded("file-2");
        assert_ne!(old_epoch, new_epoch);
        assert_eq!(session.expected_id(), Some("file-2"));

        // The stale loop's report is discarded, the fresh one lands.
        assert!(!session.poll_matched(old_epoch));
        assert_ne!(session.phase(), Phase::Done);

        session.begin_poll().unwrap();
        assert!(session.poll_matched(new_epoch));
        assert_eq!(session.phase(), Phase::Done);
    }

    #[test]
    fn reselecting_a_file_abandons_the_old_correlation() {
        let (mut session, old_epoch) = uploaded_session();
        session.begin_poll().unwrap();

        session.select_file();
        assert_eq!(session.expected_id(), None);
        assert!(!session.poll_exhausted(old_epoch));
        assert_eq!(session.phase(), Phase::FileSelected);
    }
}
