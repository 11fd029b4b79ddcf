//! Inspection session state machine.
//!
//! An [`InspectionSession`] walks a checklist strictly in order, one
//! [`Response`] per item. The step index is the length of the response list,
//! so `responses.len() == step_index` cannot be violated. Stepping back pops
//! the last response; there is no random access.

use serde::{Deserialize, Serialize};

use crate::checklist::ChecklistItem;
use crate::error::CoreError;
use crate::status::{derive_status, StatusSummary};

// ---------------------------------------------------------------------------
// Outcome / severity
// ---------------------------------------------------------------------------

/// Disposition of a single checklist item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Outcome {
    Pass,
    Fail,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pass => "PASS",
            Self::Fail => "FAIL",
        }
    }
}

/// Defect criticality. Only meaningful on a failed item.
///
/// `MONITOR` is accepted as an alias of `MODERATE`; older mobile builds used
/// that label for the middle tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Minor,
    #[serde(alias = "MONITOR")]
    Moderate,
    Critical,
}

impl Severity {
    /// Parse a severity label from the wire or the database.
    pub fn from_str_db(s: &str) -> Result<Self, CoreError> {
        match s {
            "MINOR" => Ok(Self::Minor),
            "MODERATE" | "MONITOR" => Ok(Self::Moderate),
            "CRITICAL" => Ok(Self::Critical),
            _ => Err(CoreError::Validation(format!(
                "Invalid severity '{s}'. Must be one of: MINOR, MODERATE, CRITICAL"
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Minor => "MINOR",
            Self::Moderate => "MODERATE",
            Self::Critical => "CRITICAL",
        }
    }
}

// ---------------------------------------------------------------------------
// Response
// ---------------------------------------------------------------------------

/// The recorded disposition of one checklist item.
///
/// `title` and `description` are copied from the catalog at capture time so a
/// stored inspection keeps the wording the inspector actually saw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    pub item_id: String,
    pub title: String,
    pub description: String,
    pub outcome: Outcome,
    pub severity: Option<Severity>,
    pub note: Option<String>,
    pub photo: Option<String>,
}

impl Response {
    pub fn pass(item: &ChecklistItem) -> Self {
        Self {
            item_id: item.id.clone(),
            title: item.title.clone(),
            description: item.description.clone(),
            outcome: Outcome::Pass,
            severity: None,
            note: None,
            photo: None,
        }
    }

    /// Blank notes and photo references are stored as `None`.
    pub fn fail(
        item: &ChecklistItem,
        severity: Severity,
        note: Option<String>,
        photo: Option<String>,
    ) -> Self {
        Self {
            item_id: item.id.clone(),
            title: item.title.clone(),
            description: item.description.clone(),
            outcome: Outcome::Fail,
            severity: Some(severity),
            note: non_blank(note),
            photo: non_blank(photo),
        }
    }

    pub fn is_fail(&self) -> bool {
        self.outcome == Outcome::Fail
    }
}

// ---------------------------------------------------------------------------
// Pre-inspection metadata
// ---------------------------------------------------------------------------

/// Captured once before the checklist starts; never altered afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PreInspectionMeta {
    pub driver_name: String,
    pub truck_number: String,
    pub transporter: String,
    pub depot: String,
}

impl PreInspectionMeta {
    /// All four fields must be non-blank.
    pub fn validate(&self) -> Result<(), CoreError> {
        let missing: Vec<&str> = [
            ("driver name", &self.driver_name),
            ("truck number", &self.truck_number),
            ("transporter", &self.transporter),
            ("depot", &self.depot),
        ]
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(label, _)| *label)
        .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(CoreError::Validation(format!(
                "Missing Information: {}",
                missing.join(", ")
            )))
        }
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// Result of [`InspectionSession::step_back`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepBack {
    /// The last response was removed.
    Removed(Response),
    /// Already at the first item; the caller should confirm cancelling.
    CancelRequested,
}

/// An in-progress inspection of one truck.
#[derive(Debug, Clone)]
pub struct InspectionSession {
    catalog: Vec<ChecklistItem>,
    meta: PreInspectionMeta,
    responses: Vec<Response>,
}

impl InspectionSession {
    /// Start a session at step 0. Fails if any metadata field is blank.
    pub fn start(catalog: Vec<ChecklistItem>, meta: PreInspectionMeta) -> Result<Self, CoreError> {
        meta.validate()?;
        if catalog.is_empty() {
            return Err(CoreError::Validation("Checklist is empty".into()));
        }
        Ok(Self {
            catalog,
            meta,
            responses: Vec::new(),
        })
    }

    /// Rebuild a session from a submitted response list, applying the same
    /// rules as interactive capture.
    pub fn replay(
        catalog: Vec<ChecklistItem>,
        meta: PreInspectionMeta,
        inputs: &[ResponseInput],
    ) -> Result<Self, CoreError> {
        let mut session = Self::start(catalog, meta)?;
        for input in inputs {
            let expected = session.current_item()?.id.clone();
            if input.item_id != expected {
                return Err(CoreError::Validation(format!(
                    "Response {} is for '{}' but the checklist expects '{expected}'",
                    session.step_index(),
                    input.item_id
                )));
            }
            match input.outcome {
                Outcome::Pass => {
                    if input.severity.is_some() || input.note.is_some() || input.photo.is_some() {
                        return Err(CoreError::Validation(format!(
                            "Passed item '{expected}' must not carry a severity, note or photo"
                        )));
                    }
                    session.record_pass()?;
                }
                Outcome::Fail => {
                    session.record_fail(input.severity, input.note.clone(), input.photo.clone())?;
                }
            }
        }
        Ok(session)
    }

    pub fn step_index(&self) -> usize {
        self.responses.len()
    }

    pub fn len(&self) -> usize {
        self.catalog.len()
    }

    pub fn is_empty(&self) -> bool {
        self.catalog.is_empty()
    }

    pub fn is_complete(&self) -> bool {
        self.step_index() == self.catalog.len()
    }

    pub fn meta(&self) -> &PreInspectionMeta {
        &self.meta
    }

    pub fn responses(&self) -> &[Response] {
        &self.responses
    }

    /// The item awaiting a response.
    pub fn current_item(&self) -> Result<&ChecklistItem, CoreError> {
        self.catalog
            .get(self.step_index())
            .ok_or(CoreError::OutOfRange {
                index: self.step_index(),
                len: self.catalog.len(),
            })
    }

    /// Record a pass for the current item and advance.
    pub fn record_pass(&mut self) -> Result<(), CoreError> {
        let response = Response::pass(self.current_item()?);
        self.responses.push(response);
        Ok(())
    }

    /// Record a failure for the current item and advance.
    ///
    /// A severity is mandatory; without one the session is left untouched.
    /// Blank notes and photo references are stored as `None`.
    pub fn record_fail(
        &mut self,
        severity: Option<Severity>,
        note: Option<String>,
        photo: Option<String>,
    ) -> Result<(), CoreError> {
        let severity = severity.ok_or_else(|| {
            CoreError::Validation("Severity Required: choose a severity for the defect".into())
        })?;
        let response = Response::fail(self.current_item()?, severity, note, photo);
        self.responses.push(response);
        Ok(())
    }

    /// Undo the last response, or ask the caller to confirm cancellation when
    /// nothing has been recorded yet.
    pub fn step_back(&mut self) -> StepBack {
        match self.responses.pop() {
            Some(response) => StepBack::Removed(response),
            None => StepBack::CancelRequested,
        }
    }

    /// Close the session. Only valid once every item has a response.
    pub fn complete(self) -> Result<CompletedInspection, CoreError> {
        if !self.is_complete() {
            return Err(CoreError::Validation(format!(
                "Inspection is incomplete: {} of {} items recorded",
                self.step_index(),
                self.catalog.len()
            )));
        }
        let summary = derive_status(&self.responses);
        Ok(CompletedInspection {
            meta: self.meta,
            responses: self.responses,
            summary,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// A fully answered checklist with its derived status, awaiting signatures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedInspection {
    pub meta: PreInspectionMeta,
    pub responses: Vec<Response>,
    pub summary: StatusSummary,
}

// ---------------------------------------------------------------------------
// Wire input
// ---------------------------------------------------------------------------

/// One response as submitted by a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseInput {
    pub item_id: String,
    pub outcome: Outcome,
    #[serde(default)]
    pub severity: Option<Severity>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub photo: Option<String>,
}

impl From<&Response> for ResponseInput {
    fn from(r: &Response) -> Self {
        Self {
            item_id: r.item_id.clone(),
            outcome: r.outcome,
            severity: r.severity,
            note: r.note.clone(),
            photo: r.photo.clone(),
        }
    }
}

/// Request body for submitting a finished, signed inspection.
///
/// Status is deliberately absent: the server derives it from `responses`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InspectionSubmission {
    #[serde(flatten)]
    pub meta: PreInspectionMeta,
    pub responses: Vec<ResponseInput>,
    pub driver_signature: Option<String>,
    pub inspector_signature: Option<String>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
