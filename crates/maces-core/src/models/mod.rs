//! Data models for the attendance backend.
//!
//! - `OfficerStatus`: result of the officer lookup after login
//! - `ClassOption`: a playable class offered in the class picker
//! - `AttendanceSubmission`, `CreditSubmission`: outgoing records
//! - `SubmissionResponse`: the backend's reply to either submission
//! - `AttendanceRecord`, `Player`: stored sign-ins for a park and day

pub mod attendance;
pub mod class;
pub mod credit;
pub mod officer;

pub use attendance::{AttendanceRecord, AttendanceSubmission, Player, SubmissionResponse};
pub use class::ClassOption;
pub use credit::{CreditData, CreditLabel, CreditSubmission};
pub use officer::OfficerStatus;
