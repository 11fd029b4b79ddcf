//! Vehicle status derivation.
//!
//! Status is a pure function of the response list: any critical failure
//! grounds the truck, any other failure puts it on watch, otherwise it is
//! operational. Submitters never supply a status of their own.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::inspection::{Response, Severity};

/// Fleet-level disposition of a truck after an inspection.
///
/// `PASS` is accepted on input as a synonym for `OPERATIONAL`; records
/// written by earlier clients used it for all-pass inspections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VehicleStatus {
    #[serde(alias = "PASS")]
    Operational,
    Monitor,
    Grounded,
}

impl VehicleStatus {
    pub fn from_str_db(s: &str) -> Result<Self, CoreError> {
        match s {
            "OPERATIONAL" | "PASS" => Ok(Self::Operational),
            "MONITOR" => Ok(Self::Monitor),
            "GROUNDED" => Ok(Self::Grounded),
            _ => Err(CoreError::Validation(format!(
                "Invalid vehicle status '{s}'. Must be one of: OPERATIONAL, MONITOR, GROUNDED"
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Operational => "OPERATIONAL",
            Self::Monitor => "MONITOR",
            Self::Grounded => "GROUNDED",
        }
    }

    /// Whether the truck needs a manager's attention.
    pub fn needs_attention(&self) -> bool {
        !matches!(self, Self::Operational)
    }
}

impl std::fmt::Display for VehicleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Derived status plus the number of failed items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusSummary {
    pub status: VehicleStatus,
    pub issue_count: u32,
}

/// Compute the vehicle status for a list of responses.
pub fn derive_status(responses: &[Response]) -> StatusSummary {
    let fails = responses.iter().filter(|r| r.is_fail());
    let mut issue_count = 0u32;
    let mut critical = false;
    for response in fails {
        issue_count += 1;
        if response.severity == Some(Severity::Critical) {
            critical = true;
        }
    }

    let status = if critical {
        VehicleStatus::Grounded
    } else if issue_count > 0 {
        VehicleStatus::Monitor
    } else {
        VehicleStatus::Operational
    };

    StatusSummary {
        status,
        issue_count,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inspection::Outcome;

    fn response(outcome: Outcome, severity: Option<Severity>) -> Response {
        Response {
            item_id: "x".into(),
            title: "X".into(),
            description: String::new(),
            outcome,
            severity,
            note: None,
            photo: None,
        }
    }

    #[test]
    fn empty_list_is_operational() {
        let s = derive_status(&[]);
        assert_eq!(s.status, VehicleStatus::Operational);
        assert_eq!(s.issue_count, 0);
    }

    #[test]
    fn all_pass_is_operational() {
        let rs = vec![response(Outcome::Pass, None); 4];
        assert_eq!(
            derive_status(&rs),
            StatusSummary {
                status: VehicleStatus::Operational,
                issue_count: 0
            }
        );
    }

    #[test]
    fn non_critical_failures_are_monitor() {
        let rs = vec![
            response(Outcome::Fail, Some(Severity::Minor)),
            response(Outcome::Pass, None),
            response(Outcome::Fail, Some(Severity::Moderate)),
        ];
        let s = derive_status(&rs);
        assert_eq!(s.status, VehicleStatus::Monitor);
        assert_eq!(s.issue_count, 2);
    }

    #[test]
    fn any_critical_failure_grounds() {
        let rs = vec![
            response(Outcome::Fail, Some(Severity::Minor)),
            response(Outcome::Fail, Some(Severity::Critical)),
            response(Outcome::Pass, None),
        ];
        let s = derive_status(&rs);
        assert_eq!(s.status, VehicleStatus::Grounded);
        assert_eq!(s.issue_count, 2);
    }

    #[test]
    fn issue_count_equals_failed_items() {
        let rs = vec![
            response(Outcome::Fail, Some(Severity::Minor)),
            response(Outcome::Fail, Some(Severity::Minor)),
            response(Outcome::Fail, Some(Severity::Minor)),
        ];
        assert_eq!(derive_status(&rs).issue_count, 3);
    }

    #[test]
    fn pass_label_reads_as_operational() {
        assert_eq!(
            VehicleStatus::from_str_db("PASS").unwrap(),
            VehicleStatus::Operational
        );
        let parsed: VehicleStatus = serde_json::from_str("\"PASS\"").unwrap();
        assert_eq!(parsed, VehicleStatus::Operational);
        assert_eq!(
            serde_json::to_string(&VehicleStatus::Operational).unwrap(),
            "\"OPERATIONAL\""
        );
    }

    #[test]
    fn unknown_status_is_rejected() {
        assert!(VehicleStatus::from_str_db("BROKEN").is_err());
    }

    #[test]
    fn attention_statuses() {
        assert!(!VehicleStatus::Operational.needs_attention());
        assert!(VehicleStatus::Monitor.needs_attention());
        assert!(VehicleStatus::Grounded.needs_attention());
    }
}
