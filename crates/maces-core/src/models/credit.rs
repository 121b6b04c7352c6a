use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Credit buckets the backend awards from, keyed on whether the player
/// attended in person and whether they belong to the host park.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CreditLabel {
    #[serde(rename = "inPersonLocal")]
    InPersonLocal,
    #[serde(rename = "inPersonOutPark")]
    InPersonOutPark,
    #[serde(rename = "onlineLocal")]
    OnlineLocal,
    #[serde(rename = "onlineOutPark")]
    OnlineOutPark,
}

impl CreditLabel {
    pub const ALL: [CreditLabel; 4] = [
        CreditLabel::InPersonLocal,
        CreditLabel::InPersonOutPark,
        CreditLabel::OnlineLocal,
        CreditLabel::OnlineOutPark,
    ];

    /// Bucket a sign-in falls into.
    pub fn for_attendance(in_person: bool, local: bool) -> Self {
        match (in_person, local) {
            (true, true) => CreditLabel::InPersonLocal,
            (true, false) => CreditLabel::InPersonOutPark,
            (false, true) => CreditLabel::OnlineLocal,
            (false, false) => CreditLabel::OnlineOutPark,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            CreditLabel::InPersonLocal => "In person, local",
            CreditLabel::InPersonOutPark => "In person, out of park",
            CreditLabel::OnlineLocal => "Online, local",
            CreditLabel::OnlineOutPark => "Online, out of park",
        }
    }
}

impl fmt::Display for CreditLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

pub type CreditData = BTreeMap<CreditLabel, u32>;

/// Officer's request to forward a day's sign-ins upstream as credits.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreditSubmission {
    pub host_park_id: i64,
    pub date: NaiveDate,
    pub submitted: bool,
    pub credit_data: CreditData,
    pub event_calendar_detail_id: i64,
}

impl CreditSubmission {
    pub fn new(host_park_id: i64, date: NaiveDate, credit_data: CreditData) -> Self {
        Self {
            host_park_id,
            date,
            submitted: false,
            credit_data,
            event_calendar_detail_id: 0,
        }
    }
}
