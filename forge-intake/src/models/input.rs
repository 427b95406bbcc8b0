//! Campaign input model
//!
//! An input carries two orthogonal status fields: form validity
//! (pending/valid/invalid) and analysis progress
//! (not_started/analyzing/completed/error). Keeping them separate rules
//! out impossible combinations like "completed but invalid" that a
//! single flat enum would allow.

use chrono::{DateTime, Utc};
use forge_common::events::InputSummary;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Form validity of an input's current value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationStatus {
    /// Value edited, validation not yet resolved
    Pending,
    Valid,
    Invalid,
}

/// Analysis progress of an input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisStatus {
    NotStarted,
    Analyzing,
    Completed,
    Error,
}

/// Structured result of a successful analysis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Analyzer confidence, 0.0 to 1.0
    pub confidence: f64,
    /// Number of insights the analyzer extracted
    pub insight_count: u32,
}

/// One user-supplied input source for a campaign
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CampaignInput {
    /// Unique per-process identifier
    pub id: Uuid,
    /// Catalog type id this input was created from
    pub type_id: String,
    /// Raw value: URL text, pasted content, or file name
    pub value: String,
    pub validation: ValidationStatus,
    pub analysis: AnalysisStatus,
    /// Present only when validation is Invalid or analysis is Error
    pub error: Option<String>,
    /// Populated after successful analysis
    pub analysis_result: Option<AnalysisResult>,
    /// Edit counter; a bumped revision supersedes in-flight validation
    pub revision: u64,
    pub created_at: DateTime<Utc>,
}

impl CampaignInput {
    /// Create a fresh input of the given catalog type
    pub fn new(type_id: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            type_id: type_id.into(),
            value: String::new(),
            validation: ValidationStatus::Pending,
            analysis: AnalysisStatus::NotStarted,
            error: None,
            analysis_result: None,
            revision: 0,
            created_at: Utc::now(),
        }
    }

    /// Record an edit: new value, back to pending, stale state cleared
    ///
    /// Also resets analysis, since an edited value invalidates any
    /// previous analysis outcome (the edit-triggers-revalidate path).
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.validation = ValidationStatus::Pending;
        self.analysis = AnalysisStatus::NotStarted;
        self.error = None;
        self.analysis_result = None;
        self.revision += 1;
    }

    /// Apply a validation outcome
    pub fn mark_valid(&mut self) {
        self.validation = ValidationStatus::Valid;
        self.error = None;
    }

    /// Apply a failed validation outcome; `message` must be non-empty
    pub fn mark_invalid(&mut self, message: impl Into<String>) {
        self.validation = ValidationStatus::Invalid;
        self.error = Some(message.into());
    }

    pub fn begin_analysis(&mut self) {
        self.analysis = AnalysisStatus::Analyzing;
        self.error = None;
    }

    pub fn complete_analysis(&mut self, result: AnalysisResult) {
        self.analysis = AnalysisStatus::Completed;
        self.analysis_result = Some(result);
        self.error = None;
    }

    pub fn fail_analysis(&mut self, message: impl Into<String>) {
        self.analysis = AnalysisStatus::Error;
        self.error = Some(message.into());
        self.analysis_result = None;
    }

    /// Event-facing projection of this input
    pub fn summary(&self) -> InputSummary {
        let status_str = |s: &str| s.trim_matches('"').to_string();
        InputSummary {
            input_id: self.id,
            type_id: self.type_id.clone(),
            value: self.value.clone(),
            validation: status_str(&serde_json::to_string(&self.validation).unwrap_or_default()),
            analysis: status_str(&serde_json::to_string(&self.analysis).unwrap_or_default()),
            error: self.error.clone(),
        }
    }
}
