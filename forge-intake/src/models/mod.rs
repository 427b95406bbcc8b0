//! Data models for the intake core

mod draft;
mod input;

pub use draft::{CampaignDraft, CampaignType, DraftError, Style, Tone};
pub use input::{AnalysisResult, AnalysisStatus, CampaignInput, ValidationStatus};
