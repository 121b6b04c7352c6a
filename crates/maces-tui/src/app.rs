//! Application state management for the MACES client.
//!
//! This module contains the core `App` struct: the session, form state for
//! each section, the event link, and the handlers that talk to the backend.

use std::time::Instant;

use chrono::Local;
use tracing::{debug, error, info, warn};

use maces_core::api::{ApiClient, ApiError};
use maces_core::config::Config;
use maces_core::display::{manage_display, DisplayMode, Section, SectionVisibility};
use maces_core::event_link::{parse_date, share_url, EventParams, DATE_FORMAT};
use maces_core::models::{AttendanceRecord, ClassOption, CreditData, CreditLabel};
use maces_core::session::Session;

use crate::toast::Toasts;

// ============================================================================
// Constants
// ============================================================================

/// Maximum length for username input.
const MAX_USERNAME_LENGTH: usize = 50;

/// Maximum length for password input.
/// 128 chars accommodates password managers and passphrases.
const MAX_PASSWORD_LENGTH: usize = 128;

/// Maximum length for a typed date (YYYY-MM-DD)
const MAX_DATE_LENGTH: usize = 10;

/// Maximum digits in a credit count
const MAX_CREDIT_DIGITS: usize = 4;

/// Maximum length for a pasted event link
const MAX_LINK_LENGTH: usize = 512;

/// Env vars pre-filling the login form
pub const USERNAME_ENV: &str = "MACES_USERNAME";
pub const PASSWORD_ENV: &str = "MACES_PASSWORD";

// ============================================================================
// UI State Types
// ============================================================================

/// Overall application state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    ShowingHelp,
    EditingEventLink,
    ConfirmingQuit,
    Quitting,
}

/// Login form focus state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginFocus {
    Username,
    Password,
    Button,
}

/// Class sign-in form focus state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassFocus {
    Class,
    Attending,
    Button,
}

/// Event link (park/date) form focus state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParkDateFocus {
    Date,
    Button,
}

/// Credit form focus state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreditFocus {
    Input(usize),
    Submit,
    Preview,
}

impl CreditFocus {
    pub fn next(&self) -> Self {
        match self {
            CreditFocus::Input(i) if i + 1 < CreditLabel::ALL.len() => CreditFocus::Input(i + 1),
            CreditFocus::Input(_) => CreditFocus::Submit,
            CreditFocus::Submit => CreditFocus::Preview,
            CreditFocus::Preview => CreditFocus::Input(0),
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            CreditFocus::Input(0) => CreditFocus::Preview,
            CreditFocus::Input(i) => CreditFocus::Input(i - 1),
            CreditFocus::Submit => CreditFocus::Input(CreditLabel::ALL.len() - 1),
            CreditFocus::Preview => CreditFocus::Submit,
        }
    }
}

// ============================================================================
// Main Application Struct
// ============================================================================

/// Main application state container
pub struct App {
    // Core services
    pub config: Config,
    /// Write config changes (last username) back to disk
    persist_config: bool,
    pub api: ApiClient,
    pub session: Session,

    // UI State
    pub state: AppState,
    pub visibility: SectionVisibility,
    pub display_mode: Option<DisplayMode>,
    pub focus: Section,
    pub toasts: Toasts,

    // Event link
    pub event_params: EventParams,
    pub event_link_input: String,

    // Login form state
    pub login_username: String,
    pub login_password: String,
    pub login_focus: LoginFocus,

    // Class form state
    pub classes: Vec<ClassOption>,
    pub class_selection: usize,
    pub attending_in_person: bool,
    pub class_focus: ClassFocus,

    // Park/date form state
    pub park_date: String,
    pub generated_url: Option<String>,
    pub park_date_focus: ParkDateFocus,

    // Credit form state
    pub credit_inputs: Vec<String>,
    pub credit_focus: CreditFocus,
    pub attendance_preview: Vec<AttendanceRecord>,
}

impl App {
    /// Create a new application instance from the saved config
    pub fn new(event_params: EventParams) -> anyhow::Result<Self> {
        let config = match Config::load() {
            Ok(c) => c,
            Err(e) => {
                warn!(error = %e, "Failed to load config, using defaults");
                Config::default()
            }
        };
        let base_url = config.base_url();
        debug!(%base_url, "Backend configured");

        let api = ApiClient::new(&base_url)?;
        let mut app = Self::with_client(config, api, event_params);
        app.persist_config = true;

        if let Ok(password) = std::env::var(PASSWORD_ENV) {
            app.login_password = password;
        }
        if let Ok(username) = std::env::var(USERNAME_ENV) {
            app.login_username = username;
        }
        if !app.login_username.is_empty() {
            app.login_focus = LoginFocus::Password;
        }
        Ok(app)
    }

    pub fn with_client(config: Config, api: ApiClient, event_params: EventParams) -> Self {
        let login_username = config.last_username.clone().unwrap_or_default();

        Self {
            config,
            persist_config: false,
            api,
            session: Session::new(),

            state: AppState::Normal,
            visibility: SectionVisibility::default(),
            display_mode: None,
            focus: Section::LoginForm,
            toasts: Toasts::new(),

            event_params,
            event_link_input: String::new(),

            login_username,
            login_password: String::new(),
            login_focus: LoginFocus::Username,

            classes: Vec::new(),
            class_selection: 0,
            attending_in_person: true,
            class_focus: ClassFocus::Class,

            park_date: Local::now().date_naive().format(DATE_FORMAT).to_string(),
            generated_url: None,
            park_date_focus: ParkDateFocus::Date,

            credit_inputs: vec!["0".to_string(); CreditLabel::ALL.len()],
            credit_focus: CreditFocus::Input(0),
            attendance_preview: Vec::new(),
        }
    }

    /// Periodic housekeeping run once per UI loop iteration
    pub fn tick(&mut self) {
        self.toasts.prune(Instant::now());
    }

    /// Show a transient message
    pub fn log(&mut self, message: impl Into<String>) {
        self.toasts.log(message);
    }

    // =========================================================================
    // Display
    // =========================================================================

    /// Recompute which sections are visible and move focus onto one of them
    pub fn refresh_display(&mut self) {
        self.display_mode = manage_display(&mut self.visibility, &self.session, &self.event_params);
        let visible = self.visibility.visible();
        if !visible.contains(&self.focus) {
            if let Some(first) = visible.first() {
                self.focus = *first;
            }
        }
    }

    /// Move focus to the next (or previous) visible section
    pub fn cycle_focus(&mut self, forward: bool) {
        let visible = self.visibility.visible();
        if visible.is_empty() {
            return;
        }
        let current = visible.iter().position(|s| *s == self.focus).unwrap_or(0);
        let next = if forward {
            (current + 1) % visible.len()
        } else {
            (current + visible.len() - 1) % visible.len()
        };
        self.focus = visible[next];
    }

    // =========================================================================
    // Event Link
    // =========================================================================

    pub fn start_editing_event_link(&mut self) {
        self.event_link_input.clear();
        self.state = AppState::EditingEventLink;
    }

    /// Replace the event link and recompute the display
    pub fn set_event_link(&mut self, input: &str) {
        self.event_params = EventParams::from_url(input);
        info!(park_id = ?self.event_params.park_id, date = ?self.event_params.date, "Event link set");
        if self.event_params.is_populated() {
            self.log("Event link loaded");
        } else {
            self.log("Event link needs parkId and date");
        }
        if self.session.is_logged_in() {
            self.refresh_display();
        }
    }

    /// Switch to the link just generated, as a player following it would
    pub fn open_generated_url(&mut self) {
        if let Some(url) = self.generated_url.clone() {
            self.set_event_link(&url);
        }
    }

    // =========================================================================
    // Login
    // =========================================================================

    /// Log in with the credentials from the login form
    pub async fn handle_login(&mut self) {
        let username = self.login_username.trim().to_string();
        let password = self.login_password.clone();

        if username.is_empty() || password.is_empty() {
            self.log("Username and password required");
            return;
        }

        self.log("Logging in...");
        if let Err(e) = self.login(&username, &password).await {
            error!(error = %e, "Login failed");
            self.log(format!("Login failed: {}", e));
        }
    }

    async fn login(&mut self, username: &str, password: &str) -> Result<(), ApiError> {
        let officer = self.api.authenticate(username, password).await?;
        self.session.start(officer);
        self.login_password.clear();
        self.log("Login successful!");

        self.config.last_username = Some(username.to_string());
        if self.persist_config {
            if let Err(e) = self.config.save() {
                warn!(error = %e, "Failed to save config");
            }
        }

        self.classes = self.api.fetch_classes().await?;
        self.class_selection = 0;
        self.refresh_display();
        Ok(())
    }

    // =========================================================================
    // Submissions
    // =========================================================================

    /// Sign in for the selected class at the event in the link
    pub async fn submit_class(&mut self) {
        let Some(class) = self.classes.get(self.class_selection).cloned() else {
            self.log("Select a class first");
            return;
        };
        let (Some(park_id), Some(date)) = (self.event_params.host_park_id(), self.event_params.event_date()) else {
            self.log("Event link needs a numeric parkId and a YYYY-MM-DD date");
            return;
        };

        self.log("Submitting class...");
        match self
            .api
            .submit_class_attendance(class.class_id, &class.class_name, park_id, date, self.attending_in_person)
            .await
        {
            Ok(response) => self.log(response.display_message()),
            Err(e) => {
                error!(error = %e, "Class submission failed");
                self.log(format!("Submission failed: {}", e));
            }
        }
    }

    /// Collect the credit form into label → count. Empty fields count as 0.
    pub fn credit_data(&self) -> Result<CreditData, String> {
        CreditLabel::ALL
            .iter()
            .zip(&self.credit_inputs)
            .map(|(label, input)| {
                let input = input.trim();
                if input.is_empty() {
                    return Ok((*label, 0));
                }
                input
                    .parse::<u32>()
                    .map(|n| (*label, n))
                    .map_err(|_| format!("{} must be a whole number", label))
            })
            .collect()
    }

    /// Forward the day's sign-ins upstream with the credit counts
    pub async fn submit_credits(&mut self) {
        let credit_data = match self.credit_data() {
            Ok(data) => data,
            Err(msg) => {
                self.log(msg);
                return;
            }
        };
        let (Some(park_id), Some(date)) = (self.event_params.host_park_id(), self.event_params.event_date()) else {
            self.log("Event link needs a numeric parkId and a YYYY-MM-DD date");
            return;
        };

        self.log("Submitting credits to ORK...");
        match self.api.submit_credit_data(park_id, date, credit_data).await {
            Ok(response) => self.log(response.display_message()),
            Err(e) => {
                error!(error = %e, "Credit submission failed");
                self.log(format!("Submission failed: {}", e));
            }
        }
    }

    /// Load who has signed in so far at the event in the link
    pub async fn preview_attendance(&mut self) {
        let (Some(park_id), Some(date)) = (self.event_params.host_park_id(), self.event_params.event_date()) else {
            self.log("Event link needs a numeric parkId and a YYYY-MM-DD date");
            return;
        };

        match self.api.fetch_attendance(park_id, date).await {
            Ok(records) => {
                self.log(format!("{} player(s) signed in", records.len()));
                self.attendance_preview = records;
            }
            Err(e) => {
                error!(error = %e, "Attendance preview failed");
                self.log(format!("Could not load attendance: {}", e));
            }
        }
    }

    /// Build the link players use to sign in at the officer's park
    pub fn generate_url(&mut self) {
        let Some(user_park_id) = self.session.user_park_id() else {
            self.log("Log in first");
            return;
        };
        let Some(date) = parse_date(&self.park_date) else {
            self.log("Enter a date as YYYY-MM-DD");
            return;
        };

        self.log("Generating url");
        let date = date.format(DATE_FORMAT).to_string();
        self.generated_url = Some(share_url(&self.api.origin(), user_park_id, &date));
    }

    // =========================================================================
    // Derived data
    // =========================================================================

    /// Number of previewed sign-ins per credit bucket
    pub fn preview_counts(&self) -> CreditData {
        let mut counts: CreditData = CreditLabel::ALL.iter().map(|l| (*l, 0)).collect();
        for record in &self.attendance_preview {
            let label = CreditLabel::for_attendance(record.attending_in_person, record.is_local());
            *counts.entry(label).or_insert(0) += 1;
        }
        counts
    }
}

// ============================================================================
// Input validation helpers (exported for use in input.rs)
// ============================================================================

/// Check if a character is valid for input (no control characters)
fn is_valid_input_char(c: char) -> bool {
    !c.is_control()
}

/// Check if a username character should be accepted
pub fn can_add_username_char(current_len: usize, c: char) -> bool {
    current_len < MAX_USERNAME_LENGTH && is_valid_input_char(c)
}

/// Check if a password character should be accepted
pub fn can_add_password_char(current_len: usize, c: char) -> bool {
    current_len < MAX_PASSWORD_LENGTH && is_valid_input_char(c)
}

pub fn can_add_date_char(current_len: usize, c: char) -> bool {
    current_len < MAX_DATE_LENGTH && (c.is_ascii_digit() || c == '-')
}

pub fn can_add_credit_char(current_len: usize, c: char) -> bool {
    current_len < MAX_CREDIT_DIGITS && c.is_ascii_digit()
}

pub fn can_add_link_char(current_len: usize, c: char) -> bool {
    current_len < MAX_LINK_LENGTH && is_valid_input_char(c) && !c.is_whitespace()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use axum::http::StatusCode;
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use serde_json::{json, Value};

    async fn spawn_backend(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind test listener");
        let addr = listener.local_addr().expect("listener address");
        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });
        format!("http://{}", addr)
    }

    fn backend(is_officer: bool) -> Router {
        Router::new()
            .route(
                "/login",
                post(|Json(body): Json<Value>| async move {
                    if body["password"] == "hunter2" {
                        (StatusCode::OK, Json(json!({"message": "login success"})))
                    } else {
                        (StatusCode::UNAUTHORIZED, Json(json!({"message": "bad password"})))
                    }
                }),
            )
            .route(
                "/is_park_officer",
                get(move || async move { Json(json!({"isOfficer": is_officer, "parkId": 42})) }),
            )
            .route(
                "/get_classes",
                get(|| async {
                    Json(json!([
                        {"class_id": 5, "class_name": "Warrior"},
                        {"class_id": 1, "class_name": "Anti-Paladin"}
                    ]))
                }),
            )
            .route(
                "/attendance",
                post(|| async { Json(json!({"message": "Attendance recorded successfully"})) }),
            )
            .route(
                "/submit_attendance",
                post(|| async { Json(json!({"message": "attendance submitted"})) }),
            )
    }

    fn app_for(base: &str, link: &str) -> App {
        let api = ApiClient::new(base).unwrap();
        let mut app = App::with_client(Config::default(), api, EventParams::from_url(link));
        app.login_username = "  sir_reginald ".to_string();
        app.login_password = "hunter2".to_string();
        app
    }

    fn messages(app: &App) -> Vec<String> {
        app.toasts.messages().map(str::to_string).collect()
    }

    // -------------------------------------------------------------------------
    // Login
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_login_wrong_password_logs_backend_message() {
        let base = spawn_backend(backend(false)).await;
        let mut app = app_for(&base, "");
        app.login_password = "nope".to_string();

        app.handle_login().await;

        assert_eq!(messages(&app), vec!["Logging in...", "Login failed: bad password"]);
        assert!(!app.session.is_logged_in());
        assert!(app.visibility.is_visible(Section::LoginForm));
    }

    #[tokio::test]
    async fn test_login_officer_without_event_shows_setup() {
        let base = spawn_backend(backend(true)).await;
        let mut app = app_for(&base, "");

        app.handle_login().await;

        assert_eq!(messages(&app), vec!["Logging in...", "Login successful!"]);
        assert_eq!(app.session.user_park_id(), Some(42));
        assert_eq!(app.display_mode, Some(DisplayMode::OfficerSetup));
        assert_eq!(app.focus, Section::ParkDateSelection);
        assert!(app.login_password.is_empty());
        let ids: Vec<i64> = app.classes.iter().map(|c| c.class_id).collect();
        assert_eq!(ids, vec![1, 5]);
    }

    #[tokio::test]
    async fn test_login_player_with_event_shows_class_form() {
        let base = spawn_backend(backend(false)).await;
        let mut app = app_for(&base, "http://x.test/?parkId=42&date=2024-05-01");

        app.handle_login().await;

        assert_eq!(app.display_mode, Some(DisplayMode::PlayerReady));
        assert_eq!(app.visibility.visible(), vec![Section::ClassSection]);
        assert_eq!(app.focus, Section::ClassSection);
    }

    #[tokio::test]
    async fn test_login_requires_credentials() {
        let api = ApiClient::new("http://127.0.0.1:9").unwrap();
        let mut app = App::with_client(Config::default(), api, EventParams::default());
        app.handle_login().await;
        assert_eq!(messages(&app), vec!["Username and password required"]);
    }

    // -------------------------------------------------------------------------
    // Submissions
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_submit_class_logs_response_message() {
        let base = spawn_backend(backend(false)).await;
        let mut app = app_for(&base, "?parkId=42&date=2024-05-01");
        app.handle_login().await;
        app.toasts = Toasts::new();

        app.submit_class().await;

        assert_eq!(
            messages(&app),
            vec!["Submitting class...", "Attendance recorded successfully"]
        );
    }

    #[tokio::test]
    async fn test_submit_credits_logs_response_message() {
        let base = spawn_backend(backend(true)).await;
        let mut app = app_for(&base, "?parkId=42&date=2024-05-01");
        app.handle_login().await;
        assert_eq!(app.display_mode, Some(DisplayMode::OfficerReady));
        app.toasts = Toasts::new();

        app.submit_credits().await;

        assert_eq!(
            messages(&app),
            vec!["Submitting credits to ORK...", "attendance submitted"]
        );
    }

    #[tokio::test]
    async fn test_rejected_submissions_are_not_reported_as_sent() {
        let router = Router::new()
            .route(
                "/attendance",
                post(|| async { (StatusCode::UNAUTHORIZED, Json(json!({"error": "Unauthorized"}))) }),
            )
            .route(
                "/submit_attendance",
                post(|| async {
                    (
                        StatusCode::BAD_REQUEST,
                        Json(json!([{"loc": ["date"], "msg": "invalid"}])),
                    )
                }),
            );
        let base = spawn_backend(router).await;
        let mut app = app_for(&base, "?parkId=42&date=2024-05-01");
        app.classes = vec![ClassOption { class_id: 3, class_name: "Bard".to_string() }];

        app.submit_class().await;
        app.submit_credits().await;

        assert_eq!(
            messages(&app),
            vec![
                "Submitting class...",
                "Submission rejected: Unauthorized",
                "Submitting credits to ORK...",
                "Submission rejected (400 Bad Request)",
            ]
        );
    }

    #[test]
    fn test_credit_data_parsing() {
        let api = ApiClient::new("http://127.0.0.1:9").unwrap();
        let mut app = App::with_client(Config::default(), api, EventParams::default());
        app.credit_inputs = vec!["2".into(), "".into(), " 1 ".into(), "0".into()];
        let data = app.credit_data().unwrap();
        assert_eq!(data[&CreditLabel::InPersonLocal], 2);
        assert_eq!(data[&CreditLabel::InPersonOutPark], 0);
        assert_eq!(data[&CreditLabel::OnlineLocal], 1);

        app.credit_inputs[3] = "x".into();
        assert_eq!(
            app.credit_data().unwrap_err(),
            "Online, out of park must be a whole number"
        );
    }

    // -------------------------------------------------------------------------
    // Event link and share URL
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_generate_url_and_open_it() {
        let base = spawn_backend(backend(true)).await;
        let mut app = app_for(&base, "");
        app.handle_login().await;
        app.park_date = "2024-05-01".to_string();

        app.generate_url();

        let expected = format!("{}?parkId=42&date=2024-05-01", base);
        assert_eq!(app.generated_url.as_deref(), Some(expected.as_str()));

        app.open_generated_url();
        assert_eq!(app.display_mode, Some(DisplayMode::OfficerReady));
        assert_eq!(app.focus, Section::ClassSection);
    }

    #[test]
    fn test_generate_url_rejects_bad_date() {
        let api = ApiClient::new("https://x.test").unwrap();
        let mut app = App::with_client(Config::default(), api, EventParams::default());
        app.session.start(maces_core::models::OfficerStatus { is_officer: true, park_id: 42 });
        app.park_date = "2024-13-01".to_string();
        app.generate_url();
        assert_eq!(app.generated_url, None);
        assert_eq!(messages(&app), vec!["Enter a date as YYYY-MM-DD"]);

        app.park_date = "2024-05-01".to_string();
        app.generate_url();
        assert_eq!(
            app.generated_url.as_deref(),
            Some("https://x.test?parkId=42&date=2024-05-01")
        );
    }

    #[test]
    fn test_cycle_focus_wraps_visible_sections() {
        let api = ApiClient::new("https://x.test").unwrap();
        let mut app = App::with_client(
            Config::default(),
            api,
            EventParams::from_query("parkId=42&date=2024-05-01"),
        );
        app.session.start(maces_core::models::OfficerStatus { is_officer: true, park_id: 42 });
        app.refresh_display();
        assert_eq!(app.focus, Section::ClassSection);

        app.cycle_focus(true);
        assert_eq!(app.focus, Section::AdminOptions);
        app.cycle_focus(true);
        assert_eq!(app.focus, Section::ClassSection);
        app.cycle_focus(false);
        assert_eq!(app.focus, Section::AdminOptions);
    }

    // -------------------------------------------------------------------------
    // Credit focus and input validation
    // -------------------------------------------------------------------------

    #[test]
    fn test_credit_focus_cycle() {
        let mut focus = CreditFocus::Input(0);
        for expected in [
            CreditFocus::Input(1),
            CreditFocus::Input(2),
            CreditFocus::Input(3),
            CreditFocus::Submit,
            CreditFocus::Preview,
            CreditFocus::Input(0),
        ] {
            focus = focus.next();
            assert_eq!(focus, expected);
        }
        assert_eq!(CreditFocus::Input(0).prev(), CreditFocus::Preview);
        assert_eq!(CreditFocus::Submit.prev(), CreditFocus::Input(3));
    }

    #[test]
    fn test_can_add_username_char() {
        assert!(can_add_username_char(0, 'a'));
        assert!(can_add_username_char(49, 'z'));
        assert!(!can_add_username_char(50, 'a'));
        assert!(!can_add_username_char(0, '\x00'));
        assert!(!can_add_username_char(0, '\n'));
    }

    #[test]
    fn test_can_add_password_char() {
        assert!(can_add_password_char(127, '!'));
        assert!(!can_add_password_char(128, 'a'));
        assert!(!can_add_password_char(0, '\r'));
    }

    #[test]
    fn test_can_add_date_and_credit_chars() {
        assert!(can_add_date_char(0, '2'));
        assert!(can_add_date_char(4, '-'));
        assert!(!can_add_date_char(10, '1'));
        assert!(!can_add_date_char(0, '/'));

        assert!(can_add_credit_char(0, '7'));
        assert!(!can_add_credit_char(4, '7'));
        assert!(!can_add_credit_char(0, '-'));
    }
}
