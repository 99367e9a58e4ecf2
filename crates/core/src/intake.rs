//! Intake wizard state machine.
//!
//! The registration wizard collects athlete data across four ordered steps
//! and persists nothing until the final submission. The machine here is
//! UI-free: validity predicates are pure functions of the form data, and
//! timestamps are injected by the caller, so every transition can be tested
//! without a clock or a component tree.
//!
//! Uploads are fire-and-forget relative to this machine: the caller uploads
//! a file through the external storage helper and, on success, records the
//! resulting URL with [`IntakeForm::record_photo`] /
//! [`IntakeForm::record_birth_certificate`]. On failure it records nothing
//! and the step gate stays closed.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::CoreError;
use crate::status::{Gender, JerseySize, Position};
use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Steps
// ---------------------------------------------------------------------------

/// The four steps of the intake wizard, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntakeStep {
    AthleteInfo,
    PhotoAndDocuments,
    Waiver,
    Review,
}

impl IntakeStep {
    /// Human-readable label, matching the wizard's progress bar.
    pub fn label(self) -> &'static str {
        match self {
            Self::AthleteInfo => "Athlete Info",
            Self::PhotoAndDocuments => "Photo & Docs",
            Self::Waiver => "Waiver",
            Self::Review => "Payment",
        }
    }

    fn next(self) -> Option<Self> {
        match self {
            Self::AthleteInfo => Some(Self::PhotoAndDocuments),
            Self::PhotoAndDocuments => Some(Self::Waiver),
            Self::Waiver => Some(Self::Review),
            Self::Review => None,
        }
    }

    fn back(self) -> Option<Self> {
        match self {
            Self::AthleteInfo => None,
            Self::PhotoAndDocuments => Some(Self::AthleteInfo),
            Self::Waiver => Some(Self::PhotoAndDocuments),
            Self::Review => Some(Self::Waiver),
        }
    }
}

// ---------------------------------------------------------------------------
// Form data
// ---------------------------------------------------------------------------

/// Step 1 data: who the athlete is.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AthleteInfo {
    pub first_name: String,
    pub last_name: String,
    pub dob: Option<chrono::NaiveDate>,
    pub gender: Option<Gender>,
    pub position: Position,
    pub jersey_size: JerseySize,
    pub medical_notes: String,
}

/// Step 2 data: references returned by prior successful uploads.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Documents {
    /// Public URL of the roster photo. Required to pass step 2.
    pub photo_url: Option<String>,
    /// Storage path of the birth certificate. Optional.
    pub birth_cert_path: Option<String>,
}

/// Step 3 data: waiver acceptance.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Waiver {
    /// Set when the acceptance box is checked; cleared when unchecked.
    pub signed_at: Option<Timestamp>,
    /// Typed guardian signature.
    pub signature: String,
}

/// The whole wizard: current step plus per-step data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntakeForm {
    step: IntakeStep,
    pub athlete: AthleteInfo,
    pub documents: Documents,
    pub waiver: Waiver,
}

impl Default for IntakeForm {
    fn default() -> Self {
        Self {
            step: IntakeStep::AthleteInfo,
            athlete: AthleteInfo::default(),
            documents: Documents::default(),
            waiver: Waiver::default(),
        }
    }
}

impl IntakeForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> IntakeStep {
        self.step
    }

    /// Validity predicate for a step, as a pure function of the form data.
    ///
    /// Step gates:
    /// 1. AthleteInfo: first name, last name and date of birth all present.
    /// 2. PhotoAndDocuments: a photo URL from a successful upload.
    /// 3. Waiver: acceptance timestamp AND a non-blank typed signature.
    /// 4. Review: no gate of its own.
    pub fn is_step_valid(&self, step: IntakeStep) -> bool {
        match step {
            IntakeStep::AthleteInfo => {
                !self.athlete.first_name.trim().is_empty()
                    && !self.athlete.last_name.trim().is_empty()
                    && self.athlete.dob.is_some()
            }
            IntakeStep::PhotoAndDocuments => self.documents.photo_url.is_some(),
            IntakeStep::Waiver => {
                self.waiver.signed_at.is_some() && !self.waiver.signature.trim().is_empty()
            }
            IntakeStep::Review => true,
        }
    }

    /// Advance one step. Fails if the current step's gate is closed; no-op
    /// (Ok) on the final step.
    pub fn next(&mut self) -> Result<(), CoreError> {
        if !self.is_step_valid(self.step) {
            return Err(CoreError::Validation(format!(
                "Step '{}' is incomplete",
                self.step.label()
            )));
        }
        if let Some(next) = self.step.next() {
            self.step = next;
        }
        Ok(())
    }

    /// Go back one step. Always allowed; no-op on the first step.
    pub fn back(&mut self) {
        if let Some(prev) = self.step.back() {
            self.step = prev;
        }
    }

    /// Record the public URL of a successfully uploaded roster photo.
    pub fn record_photo(&mut self, url: impl Into<String>) {
        self.documents.photo_url = Some(url.into());
    }

    /// Record the storage path of an uploaded birth certificate.
    pub fn record_birth_certificate(&mut self, path: impl Into<String>) {
        self.documents.birth_cert_path = Some(path.into());
    }

    /// Check the waiver acceptance box, stamping the given time.
    pub fn sign_waiver(&mut self, at: Timestamp, signature: impl Into<String>) {
        self.waiver.signed_at = Some(at);
        self.waiver.signature = signature.into();
    }

    /// Uncheck the waiver acceptance box, clearing the stamp.
    pub fn clear_waiver(&mut self) {
        self.waiver.signed_at = None;
    }

    /// Package the collected fields for submission to the registration
    /// service. Only available on the review step, and only when every
    /// earlier gate passes.
    pub fn submission(&self) -> Result<RegistrationSubmission, CoreError> {
        if self.step != IntakeStep::Review {
            return Err(CoreError::Validation(format!(
                "Cannot submit from step '{}'",
                self.step.label()
            )));
        }
        for step in [
            IntakeStep::AthleteInfo,
            IntakeStep::PhotoAndDocuments,
            IntakeStep::Waiver,
        ] {
            if !self.is_step_valid(step) {
                return Err(CoreError::Validation(format!(
                    "Step '{}' is incomplete",
                    step.label()
                )));
            }
        }

        Ok(RegistrationSubmission {
            first_name: self.athlete.first_name.trim().to_string(),
            last_name: self.athlete.last_name.trim().to_string(),
            // The step-1 gate guarantees these are present.
            dob: self.athlete.dob.ok_or_else(|| {
                CoreError::Internal("dob missing after step validation".to_string())
            })?,
            gender: self.athlete.gender.unwrap_or(Gender::Male),
            position: self.athlete.position,
            jersey_size: self.athlete.jersey_size,
            medical_notes: self.athlete.medical_notes.trim().to_string(),
            birth_cert_path: self.documents.birth_cert_path.clone(),
            photo_url: self.documents.photo_url.clone(),
            waiver_signed_at: self.waiver.signed_at,
            waiver_signature: self.waiver.signature.trim().to_string(),
        })
    }
}

// ---------------------------------------------------------------------------
// Submission payload
// ---------------------------------------------------------------------------

/// The `registrationData` payload accepted by the checkout endpoint.
///
/// The server re-validates this independently of the wizard's client-side
/// gates: enum fields reject unknown values at deserialization, and the
/// remaining field rules live on the `Validate` derive.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegistrationSubmission {
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100))]
    pub last_name: String,
    pub dob: chrono::NaiveDate,
    pub gender: Gender,
    #[serde(default)]
    pub position: Position,
    #[serde(default)]
    pub jersey_size: JerseySize,
    #[serde(default)]
    pub medical_notes: String,
    #[serde(default)]
    pub birth_cert_path: Option<String>,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub waiver_signed_at: Option<Timestamp>,
    #[serde(default)]
    pub waiver_signature: String,
}

impl RegistrationSubmission {
    /// Cross-field checks the `Validate` derive cannot express: a waiver
    /// timestamp without a typed signature (or the reverse) is rejected.
    pub fn check_waiver(&self) -> Result<(), CoreError> {
        match (&self.waiver_signed_at, self.waiver_signature.trim()) {
            (Some(_), "") => Err(CoreError::Validation(
                "Waiver is signed but the typed signature is missing".to_string(),
            )),
            (None, sig) if !sig.is_empty() => Err(CoreError::Validation(
                "A typed signature requires waiver acceptance".to_string(),
            )),
            _ => Ok(()),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
