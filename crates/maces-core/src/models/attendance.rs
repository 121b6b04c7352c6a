use chrono::NaiveDate;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A player's sign-in for one class at a hosted event.
///
/// Always sent with `submitted = false`; the backend flips it once the
/// credits have been forwarded upstream.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttendanceSubmission {
    pub class_id: i64,
    pub class_name: String,
    pub host_park_id: i64,
    pub date: NaiveDate,
    pub submitted: bool,
    pub attending_in_person: bool,
    pub event_calendar_detail_id: i64,
}

impl AttendanceSubmission {
    pub fn new(
        class_id: i64,
        class_name: impl Into<String>,
        host_park_id: i64,
        date: NaiveDate,
        attending_in_person: bool,
    ) -> Self {
        Self {
            class_id,
            class_name: class_name.into(),
            host_park_id,
            date,
            submitted: false,
            attending_in_person,
            event_calendar_detail_id: 0,
        }
    }
}

/// Reply from `/attendance` (POST) and `/submit_attendance`.
///
/// The backend does not promise a shape here: most replies carry `message`,
/// a partial credit submission carries `errored_records` instead, an expired
/// session carries `error`, and validation failures are bare arrays.
/// Everything is optional; the HTTP status decides success.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SubmissionResponse {
    #[serde(skip)]
    pub status: StatusCode,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub errored_records: Vec<Value>,
}

impl SubmissionResponse {
    /// Parse a reply body, tolerating shapes that are not objects. A
    /// rejection whose body is not JSON at all still yields a response.
    pub fn from_reply(status: StatusCode, body: &str) -> serde_json::Result<Self> {
        let parsed = match serde_json::from_str::<Value>(body) {
            Ok(value @ Value::Object(_)) => serde_json::from_value(value)?,
            Ok(_) => Self::default(),
            Err(_) if !status.is_success() => Self::default(),
            Err(e) => return Err(e),
        };
        Ok(Self { status, ..parsed })
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Text to show the user for this response.
    pub fn display_message(&self) -> String {
        if let Some(ref message) = self.message {
            return message.clone();
        }
        if !self.is_success() {
            return match self.error {
                Some(ref error) => format!("Submission rejected: {}", error),
                None => format!("Submission rejected ({})", self.status),
            };
        }
        if !self.errored_records.is_empty() {
            return format!("{} record(s) failed to submit", self.errored_records.len());
        }
        "Submission sent".to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Player {
    pub mundane_id: i64,
    pub persona: String,
    pub kingdom_id: i64,
    pub park_id: i64,
}

/// A stored sign-in as returned by `GET /attendance`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub host_park_id: i64,
    pub date: NaiveDate,
    #[serde(default)]
    pub event_calendar_detail_id: i64,
    #[serde(default)]
    pub submitted: Option<bool>,
    pub player: Player,
    pub class_id: i64,
    pub class_name: String,
    pub attending_in_person: bool,
}

impl AttendanceRecord {
    /// Whether the player belongs to the park hosting the event.
    pub fn is_local(&self) -> bool {
        self.player.park_id == self.host_park_id
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted.unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
    }

    #[test]
    fn test_attendance_submission_wire_shape() {
        let submission = AttendanceSubmission::new(3, "Bard", 42, date(), true);
        let json = serde_json::to_value(&submission).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "class_id": 3,
                "class_name": "Bard",
                "host_park_id": 42,
                "date": "2024-05-01",
                "submitted": false,
                "attending_in_person": true,
                "event_calendar_detail_id": 0
            })
        );
    }

    #[test]
    fn test_submission_response_message() {
        let resp = SubmissionResponse::from_reply(
            StatusCode::OK,
            r#"{"message": "Attendance recorded successfully"}"#,
        )
        .unwrap();
        assert_eq!(resp.display_message(), "Attendance recorded successfully");
    }

    #[test]
    fn test_submission_response_errored_records() {
        let resp = SubmissionResponse::from_reply(
            StatusCode::MULTI_STATUS,
            r#"{"errored_records": [{"id": 1}, {"id": 2}]}"#,
        )
        .unwrap();
        assert_eq!(resp.message, None);
        assert_eq!(resp.display_message(), "2 record(s) failed to submit");
    }

    #[test]
    fn test_submission_response_empty_success() {
        let resp = SubmissionResponse::from_reply(StatusCode::OK, "[]").unwrap();
        assert_eq!(resp.display_message(), "Submission sent");
    }

    #[test]
    fn test_submission_rejected_with_error_field() {
        let resp = SubmissionResponse::from_reply(
            StatusCode::UNAUTHORIZED,
            r#"{"error": "Unauthorized"}"#,
        )
        .unwrap();
        assert!(!resp.is_success());
        assert_eq!(resp.display_message(), "Submission rejected: Unauthorized");
    }

    #[test]
    fn test_submission_rejected_validation_array() {
        let resp = SubmissionResponse::from_reply(
            StatusCode::BAD_REQUEST,
            r#"[{"loc": ["date"], "msg": "invalid date"}]"#,
        )
        .unwrap();
        assert_eq!(resp.display_message(), "Submission rejected (400 Bad Request)");
    }

    #[test]
    fn test_submission_rejected_message_wins() {
        let resp = SubmissionResponse::from_reply(
            StatusCode::BAD_REQUEST,
            r#"{"message": "You have already submitted attendance for this event"}"#,
        )
        .unwrap();
        assert_eq!(
            resp.display_message(),
            "You have already submitted attendance for this event"
        );
    }

    #[test]
    fn test_submission_response_invalid_json() {
        assert!(SubmissionResponse::from_reply(StatusCode::OK, "<html>").is_err());

        let resp = SubmissionResponse::from_reply(StatusCode::BAD_GATEWAY, "<html>").unwrap();
        assert_eq!(resp.display_message(), "Submission rejected (502 Bad Gateway)");
    }

    #[test]
    fn test_parse_attendance_record() {
        let json = r#"{
            "host_park_id": 42,
            "date": "2024-05-01",
            "event_calendar_detail_id": 0,
            "submitted": false,
            "player": {"MundaneId": 9, "Persona": "Sir Reginald", "KingdomId": 3, "ParkId": 17},
            "class_id": 3,
            "class_name": "Bard",
            "attending_in_person": true
        }"#;
        let record: AttendanceRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.player.persona, "Sir Reginald");
        assert!(!record.is_local());
        assert!(!record.is_submitted());
    }
}
