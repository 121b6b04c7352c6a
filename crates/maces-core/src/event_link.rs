//! Event links: the URL an officer shares so players land on a specific
//! park's event.
//!
//! A link carries the host park id and event date as `parkId` and `date`
//! query parameters, e.g. `https://maces.example?parkId=42&date=2024-05-01`.

use chrono::NaiveDate;
use reqwest::Url;

/// Query parameter naming the host park
const PARK_ID_PARAM: &str = "parkId";

/// Query parameter naming the event date
const DATE_PARAM: &str = "date";

/// Stand-in base for parsing a query string on its own
const QUERY_BASE: &str = "http://localhost/";

/// Date format used in links and submissions
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Host parameters read from an event link. Empty values count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventParams {
    pub park_id: Option<String>,
    pub date: Option<String>,
}

impl EventParams {
    /// Read the host parameters from a full URL, a link without a scheme
    /// (`maces.example/?parkId=42&date=2024-05-01`) or a bare query string
    /// (`?parkId=42&date=2024-05-01` or `parkId=42&date=2024-05-01`).
    pub fn from_url(input: &str) -> Self {
        let input = input.trim();
        if let Ok(url) = Url::parse(input) {
            return Self::from_pairs(url.query_pairs());
        }
        match input.split_once('?') {
            Some((_, query)) => Self::from_query(query),
            None => Self::from_query(input),
        }
    }

    /// Read the host parameters from a query string, with or without the
    /// leading `?`. Input that cannot be parsed yields no parameters.
    pub fn from_query(query: &str) -> Self {
        let query = query.trim().trim_start_matches('?');
        Url::parse(&format!("{}?{}", QUERY_BASE, query))
            .map(|url| Self::from_pairs(url.query_pairs()))
            .unwrap_or_default()
    }

    fn from_pairs<'a>(pairs: impl Iterator<Item = (std::borrow::Cow<'a, str>, std::borrow::Cow<'a, str>)>) -> Self {
        let mut params = Self::default();
        for (key, value) in pairs {
            if value.is_empty() {
                continue;
            }
            // First occurrence wins
            match key.as_ref() {
                PARK_ID_PARAM if params.park_id.is_none() => params.park_id = Some(value.to_string()),
                DATE_PARAM if params.date.is_none() => params.date = Some(value.to_string()),
                _ => {}
            }
        }
        params
    }

    /// Both a host park and a date are present.
    pub fn is_populated(&self) -> bool {
        self.park_id.is_some() && self.date.is_some()
    }

    /// Host park id as a number, if present and numeric.
    pub fn host_park_id(&self) -> Option<i64> {
        self.park_id.as_deref().and_then(|s| s.parse().ok())
    }

    /// Event date, if present and a valid `YYYY-MM-DD` date.
    pub fn event_date(&self) -> Option<NaiveDate> {
        self.date.as_deref().and_then(parse_date)
    }
}

/// Parse a `YYYY-MM-DD` date.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).ok()
}

/// Build the link players follow to sign in for an event.
///
/// `origin` is scheme, host and optional port; a trailing slash is dropped.
pub fn share_url(origin: &str, user_park_id: i64, date: &str) -> String {
    format!(
        "{}?{}={}&{}={}",
        origin.trim_end_matches('/'),
        PARK_ID_PARAM,
        user_park_id,
        DATE_PARAM,
        date
    )
}
