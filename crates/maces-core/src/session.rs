//! Session state for the logged-in user.
//!
//! The backend keeps the actual login in a cookie held by the API client's
//! cookie store. This only remembers what the officer lookup returned so the
//! display rules and submit handlers can read it. Nothing is written to disk;
//! quitting the client ends the session.

use tracing::debug;

use crate::models::OfficerStatus;

#[derive(Debug, Clone, Default)]
pub struct Session {
    officer: Option<OfficerStatus>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the officer lookup from a successful login.
    pub fn start(&mut self, status: OfficerStatus) {
        debug!(park_id = status.park_id, is_officer = status.is_officer, "Session started");
        self.officer = Some(status);
    }

    /// Forget the login, e.g. before signing in as someone else.
    pub fn clear(&mut self) {
        self.officer = None;
    }

    pub fn is_logged_in(&self) -> bool {
        self.officer.is_some()
    }

    /// Park the logged-in user belongs to
    pub fn user_park_id(&self) -> Option<i64> {
        self.officer.map(|o| o.park_id)
    }

    pub fn is_officer(&self) -> bool {
        self.officer.map(|o| o.is_officer).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_is_empty() {
        let session = Session::new();
        assert!(!session.is_logged_in());
        assert_eq!(session.user_park_id(), None);
        assert!(!session.is_officer());
    }

    #[test]
    fn test_start_and_clear() {
        let mut session = Session::new();
        session.start(OfficerStatus { is_officer: true, park_id: 42 });
        assert!(session.is_logged_in());
        assert_eq!(session.user_park_id(), Some(42));
        assert!(session.is_officer());

        session.clear();
        assert!(!session.is_logged_in());
        assert_eq!(session.user_park_id(), None);
    }
}
