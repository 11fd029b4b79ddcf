//! Two-signature completion gate.
//!
//! Both inspections (driver + inspector) and quality reports (inspector +
//! sealer) require two signatures before they can be persisted. The gate only
//! tracks presence; capturing the image is the front end's job.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::inspection::{CompletedInspection, PreInspectionMeta, Response};
use crate::status::VehicleStatus;
use crate::types::{DbId, Timestamp};

/// Message returned whenever a record is finalized without both signatures.
pub const SIGNATURES_REQUIRED: &str = "Signatures Required";

/// Who a signature belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Signer {
    Driver,
    Inspector,
    Sealer,
}

impl Signer {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Driver => "DRIVER",
            Self::Inspector => "INSPECTOR",
            Self::Sealer => "SEALER",
        }
    }
}

// ---------------------------------------------------------------------------
// Slots
// ---------------------------------------------------------------------------

/// A fixed pair of named signature slots, each initially empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureSlots {
    signers: [Signer; 2],
    images: [Option<String>; 2],
}

impl SignatureSlots {
    pub fn new(first: Signer, second: Signer) -> Self {
        Self {
            signers: [first, second],
            images: [None, None],
        }
    }

    /// Slots for a vehicle inspection.
    pub fn for_inspection() -> Self {
        Self::new(Signer::Driver, Signer::Inspector)
    }

    /// Slots for a quality report.
    pub fn for_quality_report() -> Self {
        Self::new(Signer::Inspector, Signer::Sealer)
    }

    fn slot(&self, signer: Signer) -> Result<usize, CoreError> {
        self.signers
            .iter()
            .position(|s| *s == signer)
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "{} does not sign this record",
                    signer.as_str()
                ))
            })
    }

    /// Store (or replace) the signature for `signer`. Blank data is rejected.
    pub fn set(&mut self, signer: Signer, image: impl Into<String>) -> Result<(), CoreError> {
        let idx = self.slot(signer)?;
        let image = image.into();
        if image.trim().is_empty() {
            return Err(CoreError::Validation(format!(
                "{} signature is empty",
                signer.as_str()
            )));
        }
        self.images[idx] = Some(image);
        Ok(())
    }

    /// Clear one slot, e.g. when the signer asks to redo it.
    pub fn clear(&mut self, signer: Signer) -> Result<(), CoreError> {
        let idx = self.slot(signer)?;
        self.images[idx] = None;
        Ok(())
    }

    pub fn get(&self, signer: Signer) -> Option<&str> {
        self.slot(signer)
            .ok()
            .and_then(|idx| self.images[idx].as_deref())
    }

    pub fn both_signed(&self) -> bool {
        self.images.iter().all(Option::is_some)
    }

    /// Take both signatures in slot order, or fail with "Signatures Required".
    pub fn take_pair(&self) -> Result<(String, String), CoreError> {
        match &self.images {
            [Some(a), Some(b)] => Ok((a.clone(), b.clone())),
            _ => Err(CoreError::Validation(SIGNATURES_REQUIRED.into())),
        }
    }
}

// ---------------------------------------------------------------------------
// Finalized inspection
// ---------------------------------------------------------------------------

/// Identity stamped onto a finalized record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inspector {
    pub id: DbId,
    pub name: String,
}

/// A complete, dual-signed inspection ready for (or read back from) storage.
///
/// Field names match the stored row: metadata is flattened and the response
/// list is called `items`. `id` is only present once the record is stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalizedInspection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<DbId>,
    pub inspector_id: DbId,
    pub inspector_name: String,
    #[serde(flatten)]
    pub meta: PreInspectionMeta,
    #[serde(rename = "items")]
    pub responses: Vec<Response>,
    pub status: VehicleStatus,
    pub issue_count: u32,
    pub driver_signature: String,
    pub inspector_signature: String,
    pub created_at: Timestamp,
}

/// Destination for finalized records. The API implements it over PostgreSQL.
pub trait RecordSink<R: Sync>: Send + Sync {
    /// What the sink hands back after a successful insert (usually the row).
    type Stored;
    /// Sink failure; must absorb domain errors raised before the insert.
    type Error: From<CoreError>;

    /// Persist `record`. Called exactly once per successful finalize.
    fn insert(
        &self,
        record: &R,
    ) -> impl std::future::Future<Output = Result<Self::Stored, Self::Error>> + Send;
}

/// Holds a completed inspection until both signatures are collected.
#[derive(Debug, Clone)]
pub struct SignatureGate {
    inspection: CompletedInspection,
    slots: SignatureSlots,
}

impl SignatureGate {
    pub fn new(inspection: CompletedInspection) -> Self {
        Self {
            inspection,
            slots: SignatureSlots::for_inspection(),
        }
    }

    pub fn inspection(&self) -> &CompletedInspection {
        &self.inspection
    }

    /// `signer` must be [`Signer::Driver`] or [`Signer::Inspector`].
    pub fn set_signature(&mut self, signer: Signer, image: impl Into<String>) -> Result<(), CoreError> {
        self.slots.set(signer, image)
    }

    pub fn both_signed(&self) -> bool {
        self.slots.both_signed()
    }

    /// Package the record. Fails with "Signatures Required" unless both
    /// slots are filled.
    pub fn finalize(&self, inspector: &Inspector, now: Timestamp) -> Result<FinalizedInspection, CoreError> {
        let (driver_signature, inspector_signature) = self.slots.take_pair()?;
        Ok(FinalizedInspection {
            id: None,
            inspector_id: inspector.id,
            inspector_name: inspector.name.clone(),
            meta: self.inspection.meta.clone(),
            responses: self.inspection.responses.clone(),
            status: self.inspection.summary.status,
            issue_count: self.inspection.summary.issue_count,
            driver_signature,
            inspector_signature,
            created_at: now,
        })
    }

    /// Finalize and hand the record to `sink`. The sink is not touched when
    /// finalization fails.
    pub async fn submit<S>(
        &self,
        sink: &S,
        inspector: &Inspector,
        now: Timestamp,
    ) -> Result<S::Stored, S::Error>
    where
        S: RecordSink<FinalizedInspection>,
    {
        let record = self.finalize(inspector, now)?;
        tracing::debug!(
            truck_number = %record.meta.truck_number,
            status = %record.status,
            issue_count = record.issue_count,
            "Finalized inspection"
        );
        sink.insert(&record).await
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
