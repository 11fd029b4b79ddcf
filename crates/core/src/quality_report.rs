//! Product quality report captured at loading.
//!
//! Unlike an inspection there is no derived status: the form is validated,
//! signed by the inspector and the sealer, and stored as-is.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::signature::{Inspector, RecordSink, SignatureSlots, Signer};
use crate::types::{DbId, Timestamp};

/// Most compartments found on a road tanker.
pub const MAX_COMPARTMENTS: usize = 6;

// ---------------------------------------------------------------------------
// Form data
// ---------------------------------------------------------------------------

/// One tank compartment as loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Compartment {
    pub litres: f64,
    /// Level stated on the loading certificate.
    pub certificate_level: String,
    /// Level measured on the truck.
    pub product_level: String,
}

/// The fixed set of product quality checks.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QualityParams {
    pub density: String,
    pub temperature: String,
    pub appearance: String,
    pub water_test: String,
    #[serde(default)]
    pub remarks: Option<String>,
}

/// Everything the inspector fills in before signing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityReportDraft {
    pub company_name: String,
    pub truck_number: String,
    pub product: String,
    pub depot: String,
    pub compartments: Vec<Compartment>,
    pub quality_params: QualityParams,
    pub sealer_name: String,
}

impl QualityReportDraft {
    pub fn validate(&self) -> Result<(), CoreError> {
        let missing: Vec<&str> = [
            ("company name", &self.company_name),
            ("truck number", &self.truck_number),
            ("product", &self.product),
            ("depot", &self.depot),
            ("sealer name", &self.sealer_name),
            ("density", &self.quality_params.density),
            ("temperature", &self.quality_params.temperature),
            ("appearance", &self.quality_params.appearance),
            ("water test", &self.quality_params.water_test),
        ]
        .iter()
        .filter(|(_, v)| v.trim().is_empty())
        .map(|(label, _)| *label)
        .collect();
        if !missing.is_empty() {
            return Err(CoreError::Validation(format!(
                "Missing Information: {}",
                missing.join(", ")
            )));
        }

        if self.compartments.is_empty() || self.compartments.len() > MAX_COMPARTMENTS {
            return Err(CoreError::Validation(format!(
                "A report must list between 1 and {MAX_COMPARTMENTS} compartments, got {}",
                self.compartments.len()
            )));
        }
        for (i, c) in self.compartments.iter().enumerate() {
            if !c.litres.is_finite() || c.litres <= 0.0 {
                return Err(CoreError::Validation(format!(
                    "Compartment {} must hold a positive number of litres",
                    i + 1
                )));
            }
        }
        Ok(())
    }

    pub fn total_litres(&self) -> f64 {
        self.compartments.iter().map(|c| c.litres).sum()
    }
}

// ---------------------------------------------------------------------------
// Finalization
// ---------------------------------------------------------------------------

/// A signed quality report ready for (or read back from) storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalizedQualityReport {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<DbId>,
    pub inspector_id: DbId,
    pub inspector_name: String,
    #[serde(flatten)]
    pub draft: QualityReportDraft,
    pub inspector_signature: String,
    pub sealer_signature: String,
    pub created_at: Timestamp,
}

/// A validated draft collecting its two signatures.
#[derive(Debug, Clone)]
pub struct QualityReportForm {
    draft: QualityReportDraft,
    slots: SignatureSlots,
}

impl QualityReportForm {
    /// Validate `draft` and open the signature slots.
    pub fn new(draft: QualityReportDraft) -> Result<Self, CoreError> {
        draft.validate()?;
        Ok(Self {
            draft,
            slots: SignatureSlots::for_quality_report(),
        })
    }

    pub fn draft(&self) -> &QualityReportDraft {
        &self.draft
    }

    /// `signer` must be [`Signer::Inspector`] or [`Signer::Sealer`].
    pub fn set_signature(&mut self, signer: Signer, image: impl Into<String>) -> Result<(), CoreError> {
        self.slots.set(signer, image)
    }

    pub fn both_signed(&self) -> bool {
        self.slots.both_signed()
    }

    pub fn finalize(&self, inspector: &Inspector, now: Timestamp) -> Result<FinalizedQualityReport, CoreError> {
        let (inspector_signature, sealer_signature) = self.slots.take_pair()?;
        Ok(FinalizedQualityReport {
            id: None,
            inspector_id: inspector.id,
            inspector_name: inspector.name.clone(),
            draft: self.draft.clone(),
            inspector_signature,
            sealer_signature,
            created_at: now,
        })
    }

    pub async fn submit<S>(
        &self,
        sink: &S,
        inspector: &Inspector,
        now: Timestamp,
    ) -> Result<S::Stored, S::Error>
    where
        S: RecordSink<FinalizedQualityReport>,
    {
        let record = self.finalize(inspector, now)?;
        sink.insert(&record).await
    }
}

/// Request body for submitting a signed quality report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityReportSubmission {
    #[serde(flatten)]
    pub draft: QualityReportDraft,
    pub inspector_signature: Option<String>,
    pub sealer_signature: Option<String>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::Utc;

    use super::*;
    use crate::signature::SIGNATURES_REQUIRED;

    fn compartment(litres: f64) -> Compartment {
        Compartment {
            litres,
            certificate_level: "1200".into(),
            product_level: "1198".into(),
        }
    }

    fn draft() -> QualityReportDraft {
        QualityReportDraft {
            company_name: "Coastal Haulage".into(),
            truck_number: "TRK-042".into(),
            product: "ULP 95".into(),
            depot: "Durban".into(),
            compartments: vec![compartment(8000.0), compartment(7500.5)],
            quality_params: QualityParams {
                density: "0.745".into(),
                temperature: "21C".into(),
                appearance: "Clear and bright".into(),
                water_test: "Negative".into(),
                remarks: None,
            },
            sealer_name: "Bongani".into(),
        }
    }

    #[test]
    fn valid_draft_passes() {
        assert!(draft().validate().is_ok());
        assert_eq!(draft().total_litres(), 15500.5);
    }

    #[test]
    fn missing_fields_are_named() {
        let mut d = draft();
        d.product.clear();
        d.quality_params.water_test = " ".into();
        let err = d.validate().unwrap_err();
        assert_matches!(err, CoreError::Validation(ref m)
            if m.contains("product") && m.contains("water test"));
    }

    #[test]
    fn compartment_count_is_bounded() {
        let mut d = draft();
        d.compartments.clear();
        assert!(d.validate().is_err());

        d.compartments = vec![compartment(100.0); MAX_COMPARTMENTS];
        assert!(d.validate().is_ok());

        d.compartments.push(compartment(100.0));
        assert!(d.validate().is_err());
    }

    #[test]
    fn non_positive_litres_rejected() {
        let mut d = draft();
        d.compartments[1].litres = 0.0;
        assert_matches!(d.validate(), Err(CoreError::Validation(ref m)) if m.contains("Compartment 2"));
        d.compartments[1].litres = f64::NAN;
        assert!(d.validate().is_err());
    }

    #[test]
    fn form_rejects_invalid_draft() {
        let mut d = draft();
        d.depot.clear();
        assert!(QualityReportForm::new(d).is_err());
    }

    #[test]
    fn finalize_needs_inspector_and_sealer() {
        let mut form = QualityReportForm::new(draft()).unwrap();
        let who = Inspector { id: 1, name: "I".into() };
        assert_matches!(
            form.finalize(&who, Utc::now()),
            Err(CoreError::Validation(ref m)) if m == SIGNATURES_REQUIRED
        );
        assert!(form.set_signature(Signer::Driver, "x").is_err());
        form.set_signature(Signer::Inspector, "i").unwrap();
        form.set_signature(Signer::Sealer, "s").unwrap();
        let rec = form.finalize(&who, Utc::now()).unwrap();
        assert_eq!(rec.sealer_signature, "s");
        assert_eq!(rec.draft.compartments.len(), 2);
    }

    #[test]
    fn submission_fields_are_flat() {
        let json = serde_json::json!({
            "company_name": "C", "truck_number": "T", "product": "P", "depot": "D",
            "compartments": [{ "litres": 10.0, "certificate_level": "a", "product_level": "b" }],
            "quality_params": { "density": "1", "temperature": "2", "appearance": "3", "water_test": "4" },
            "sealer_name": "S",
            "inspector_signature": "i",
            "sealer_signature": null
        });
        let sub: QualityReportSubmission = serde_json::from_value(json).unwrap();
        assert_eq!(sub.draft.sealer_name, "S");
        assert!(sub.sealer_signature.is_none());
        assert!(sub.draft.quality_params.remarks.is_none());
    }
}
