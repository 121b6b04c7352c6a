use serde::{Deserialize, Serialize};

/// Officer lookup returned by `/is_park_officer`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfficerStatus {
    #[serde(rename = "isOfficer")]
    pub is_officer: bool,
    #[serde(rename = "parkId")]
    pub park_id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_officer_status() {
        let json = r#"{"isOfficer": true, "parkId": 42}"#;
        let status: OfficerStatus = serde_json::from_str(json).unwrap();
        assert!(status.is_officer);
        assert_eq!(status.park_id, 42);
    }
}
