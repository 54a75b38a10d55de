//! crates/caseforge_core/src/form.rs
//!
//! The form collector: a mutable draft of a `GenerationRequest`, the option
//! lists it offers, and the controller that submits it once and hands the
//! result to the result view.

use std::str::FromStr;
use tracing::{error, info};

use crate::domain::{Difficulty, GenerationRequest, TimeConstraint, OTHER};
use crate::handoff::{HandoffSlot, HANDOFF_KEY};
use crate::ports::CaseStudySubmitter;

pub const ROLE_OPTIONS: &[&str] = &[
    "Product Manager",
    "Project Manager",
    "Strategy Consultant",
    "Business Analyst",
    "Operations Manager",
    "Growth Manager",
    "Marketing Manager",
    "Data Analyst",
    "Product Designer",
    "General Management",
    OTHER,
];

pub const INDUSTRY_OPTIONS: &[&str] = &[
    "E-commerce",
    "Retail & FMCG",
    "FinTech",
    "EdTech",
    "Food Delivery",
    "Consulting",
    "IT Services",
    "Manufacturing",
    "Logistics & Supply Chain",
    "Media & Entertainment",
    "Hospitality",
    "Healthcare",
    "Government & Public Sector",
    "Telecommunications",
    "Energy",
    OTHER,
];

pub const DIFFICULTY_OPTIONS: &[Difficulty] = &[Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

pub const TIME_CONSTRAINT_OPTIONS: &[TimeConstraint] = &[
    TimeConstraint::NoLimit,
    TimeConstraint::Minutes(15),
    TimeConstraint::Minutes(30),
    TimeConstraint::Minutes(60),
];

/// Message shown to the user when a submission fails for any reason.
pub const FAILURE_ALERT: &str = "Failed to generate case study. Please try again.";

//=========================================================================================
// Draft
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    InterviewRole,
    Industry,
    CustomInterviewRole,
    CustomIndustry,
    Difficulty,
    TimeConstraint,
    UserSpecifications,
}

impl FromStr for FormField {
    type Err = FormError;

    /// Resolves the field from the input's `name` attribute.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "interviewRole" => Ok(FormField::InterviewRole),
            "industry" => Ok(FormField::Industry),
            "customInterviewRole" => Ok(FormField::CustomInterviewRole),
            "customIndustry" => Ok(FormField::CustomIndustry),
            "difficulty" => Ok(FormField::Difficulty),
            "timeConstraint" => Ok(FormField::TimeConstraint),
            "userSpecifications" => Ok(FormField::UserSpecifications),
            other => Err(FormError::UnknownField(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("Unknown form field: {0}")]
    UnknownField(String),
    #[error("Invalid value for {field:?}: {reason}")]
    InvalidValue { field: FormField, reason: String },
}

/// The in-progress request. Starts at the form's defaults (Medium, no time limit).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormDraft {
    request: GenerationRequest,
}

impl FormDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Updates exactly one field. Choosing "Other" for role or industry also
    /// resets the matching custom field so free text starts empty.
    pub fn set(&mut self, field: FormField, value: &str) -> Result<(), FormError> {
        let request = &mut self.request;
        match field {
            FormField::InterviewRole => {
                request.interview_role = value.to_string();
                if value == OTHER {
                    request.custom_interview_role.clear();
                }
            }
            FormField::Industry => {
                request.industry = value.to_string();
                if value == OTHER {
                    request.custom_industry.clear();
                }
            }
            FormField::CustomInterviewRole => request.custom_interview_role = value.to_string(),
            FormField::CustomIndustry => request.custom_industry = value.to_string(),
            FormField::Difficulty => {
                request.difficulty = value
                    .parse::<Difficulty>()
                    .map_err(|reason| FormError::InvalidValue { field, reason })?;
            }
            FormField::TimeConstraint => {
                request.time_constraint = value
                    .parse::<TimeConstraint>()
                    .map_err(|reason| FormError::InvalidValue { field, reason })?;
            }
            FormField::UserSpecifications => request.user_specifications = value.to_string(),
        }
        Ok(())
    }

    /// Same as `set`, addressing the field by its input name.
    pub fn set_named(&mut self, name: &str, value: &str) -> Result<(), FormError> {
        let field = name.parse::<FormField>()?;
        self.set(field, value)
    }

    /// Whether the free-text role input should be shown.
    pub fn shows_custom_role(&self) -> bool {
        self.request.interview_role == OTHER
    }

    pub fn shows_custom_industry(&self) -> bool {
        self.request.industry == OTHER
    }

    pub fn request(&self) -> &GenerationRequest {
        &self.request
    }

    pub fn to_request(&self) -> GenerationRequest {
        self.request.clone()
    }
}

//=========================================================================================
// Controller
//=========================================================================================

/// The view to move to after a successful submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Result,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The result was stored in the hand-off slot.
    Navigate(View),
    /// A blocking alert with a fixed message.
    Alert(&'static str),
    /// A submission is still in flight; nothing was sent.
    AlreadyGenerating,
}

/// Owns the draft for the form's lifetime and tracks the "generating" state.
#[derive(Debug, Default)]
pub struct FormController {
    pub draft: FormDraft,
    generating: bool,
}

impl FormController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_generating(&self) -> bool {
        self.generating
    }

    /// Sends the draft once. The generating flag is cleared whatever the outcome.
    pub async fn submit(
        &mut self,
        submitter: &dyn CaseStudySubmitter,
        slot: &HandoffSlot,
    ) -> SubmitOutcome {
        if self.generating {
            return SubmitOutcome::AlreadyGenerating;
        }
        self.generating = true;

        let request = self.draft.to_request();
        let outcome = match submitter.submit(&request).await {
            Ok(body) => {
                slot.write(&body);
                info!("Stored generated case study under '{}'", HANDOFF_KEY);
                SubmitOutcome::Navigate(View::Result)
            }
            Err(e) => {
                error!("Case study submission failed: {}", e);
                SubmitOutcome::Alert(FAILURE_ALERT)
            }
        };

        self.generating = false;
        outcome
    }
}
