//! API client for the attendance backend.
//!
//! Every call is a single request/response round trip. Nothing is retried
//! or de-duplicated; transport and parse failures are returned to the caller.

use std::time::Duration;

use chrono::NaiveDate;
use reqwest::{Client, StatusCode, Url};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::event_link::DATE_FORMAT;
use crate::models::{
    AttendanceRecord, AttendanceSubmission, ClassOption, CreditData, CreditSubmission,
    OfficerStatus, SubmissionResponse,
};

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// HTTP request timeout in seconds.
/// The backend forwards to the upstream records system, which can be slow.
const REQUEST_TIMEOUT_SECS: u64 = 30;

const LOGIN_PATH: &str = "login";
const OFFICER_PATH: &str = "is_park_officer";
const CLASSES_PATH: &str = "get_classes";
const ATTENDANCE_PATH: &str = "attendance";
const SUBMIT_ATTENDANCE_PATH: &str = "submit_attendance";

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessageBody {
    message: Option<String>,
}

/// API client for the attendance backend.
/// Clone is cheap and clones share the cookie store, so they share the login.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
}

impl ApiClient {
    /// Create a client for the backend at `base_url`
    /// (e.g. `https://maces.example` or `http://localhost:5000/`).
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let mut base = base_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base).map_err(|e| ApiError::InvalidUrl(format!("{}: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(base_url.to_string()));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .cookie_store(true)
            .build()?;

        Ok(Self { client, base_url })
    }

    /// Scheme, host and port of the backend, used as the base of share links.
    pub fn origin(&self) -> String {
        self.base_url.origin().ascii_serialization()
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path)
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {}", path, e)))
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }

    async fn parse_json<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
        what: &str,
    ) -> Result<T, ApiError> {
        let text = response.text().await?;
        serde_json::from_str(&text)
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse {}: {}", what, e)))
    }

    // ===== Authentication =====

    /// Log in and look up whether the user is an officer of their park.
    ///
    /// A non-200 login reply fails with `ApiError::Authentication` carrying
    /// the backend's `message`. A failed officer lookup after a good login
    /// fails with `ApiError::OfficerStatus`.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<OfficerStatus, ApiError> {
        let url = self.endpoint(LOGIN_PATH)?;

        let response = self
            .client
            .post(url)
            .json(&LoginRequest { username, password })
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await?;
            let message = serde_json::from_str::<MessageBody>(&body)
                .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse login response: {}", e)))?
                .message
                .unwrap_or_else(|| format!("Login rejected ({})", status));
            warn!(%status, "Login rejected");
            return Err(ApiError::Authentication(message));
        }

        let officer = self.fetch_officer_status().await?;
        info!(park_id = officer.park_id, is_officer = officer.is_officer, "Logged in");
        Ok(officer)
    }

    async fn fetch_officer_status(&self) -> Result<OfficerStatus, ApiError> {
        let url = self.endpoint(OFFICER_PATH)?;
        let response = self.client.get(url).send().await?;

        if response.status() != StatusCode::OK {
            warn!(status = %response.status(), "Officer lookup failed");
            return Err(ApiError::OfficerStatus);
        }

        Self::parse_json(response, "officer status").await
    }

    // ===== Data Fetching Methods =====

    /// Fetch the playable classes, sorted ascending by class id
    pub async fn fetch_classes(&self) -> Result<Vec<ClassOption>, ApiError> {
        let url = self.endpoint(CLASSES_PATH)?;
        let response = self.client.get(url).send().await?;
        let response = Self::check_response(response).await?;

        let mut classes: Vec<ClassOption> = Self::parse_json(response, "class list").await?;
        ClassOption::sort_by_id(&mut classes);
        debug!(count = classes.len(), "Classes fetched");
        Ok(classes)
    }

    /// Fetch everyone signed in at a park on a given day
    pub async fn fetch_attendance(
        &self,
        host_park_id: i64,
        date: NaiveDate,
    ) -> Result<Vec<AttendanceRecord>, ApiError> {
        let url = self.endpoint(ATTENDANCE_PATH)?;
        let response = self
            .client
            .get(url)
            .query(&[
                ("host_park_id", host_park_id.to_string()),
                ("date", date.format(DATE_FORMAT).to_string()),
            ])
            .send()
            .await?;
        let response = Self::check_response(response).await?;

        let records: Vec<AttendanceRecord> = Self::parse_json(response, "attendance records").await?;
        debug!(count = records.len(), host_park_id, %date, "Attendance fetched");
        Ok(records)
    }

    // ===== Submissions =====

    /// Sign the logged-in player in for a class at the host park's event.
    ///
    /// The reply is returned whatever the status code, carrying that status;
    /// the backend explains rejections (e.g. a duplicate sign-in) in `message`.
    pub async fn submit_class_attendance(
        &self,
        class_id: i64,
        class_name: &str,
        host_park_id: i64,
        date: NaiveDate,
        attending_in_person: bool,
    ) -> Result<SubmissionResponse, ApiError> {
        let submission = AttendanceSubmission::new(class_id, class_name, host_park_id, date, attending_in_person);
        self.post_submission(ATTENDANCE_PATH, &submission).await
    }

    /// Ask the backend to forward the day's sign-ins upstream, awarding
    /// credits per bucket. Same reply contract as `submit_class_attendance`.
    pub async fn submit_credit_data(
        &self,
        host_park_id: i64,
        date: NaiveDate,
        credit_data: CreditData,
    ) -> Result<SubmissionResponse, ApiError> {
        let submission = CreditSubmission::new(host_park_id, date, credit_data);
        self.post_submission(SUBMIT_ATTENDANCE_PATH, &submission).await
    }

    async fn post_submission<B: Serialize>(&self, path: &str, body: &B) -> Result<SubmissionResponse, ApiError> {
        let url = self.endpoint(path)?;
        let response = self.client.post(url).json(body).send().await?;

        let status = response.status();
        let text = response.text().await?;
        debug!(path, %status, "Submission response received");
        if !status.is_success() {
            warn!(path, %status, "Submission rejected");
        }

        SubmissionResponse::from_reply(status, &text)
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse {} response: {}", path, e)))
    }
}
