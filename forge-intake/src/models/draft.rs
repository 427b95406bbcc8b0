//! Campaign draft model for the first workflow step
//!
//! Holds the metadata form a user fills in before adding input sources:
//! title, description, audience, and content preferences.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Field-level validation failure for a campaign draft
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
    #[error("Campaign title is required")]
    TitleRequired,
    #[error("Campaign description is required")]
    DescriptionRequired,
}

/// Campaign content category
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CampaignType {
    #[default]
    SocialMedia,
    EmailMarketing,
    VideoContent,
    BlogPost,
    Advertisement,
    Multimedia,
}

/// Writing tone for generated content
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    Professional,
    #[default]
    Conversational,
    Friendly,
    Authoritative,
    Humorous,
    Inspiring,
}

/// Visual/editorial style for generated content
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Style {
    #[default]
    Modern,
    Classic,
    Minimalist,
    Bold,
    Elegant,
    Creative,
}

/// Step-1 campaign metadata form state
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CampaignDraft {
    pub title: String,
    pub description: String,
    pub target_audience: String,
    pub campaign_type: CampaignType,
    pub tone: Tone,
    pub style: Style,
    pub keywords: Vec<String>,
}

impl CampaignDraft {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            ..Default::default()
        }
    }

    /// Add a keyword, trimmed; blank and duplicate keywords are ignored
    ///
    /// Returns whether the keyword was added.
    pub fn add_keyword(&mut self, keyword: &str) -> bool {
        let keyword = keyword.trim();
        if keyword.is_empty() || self.keywords.iter().any(|k| k == keyword) {
            return false;
        }
        self.keywords.push(keyword.to_string());
        true
    }

    /// Remove a keyword by value
    pub fn remove_keyword(&mut self, keyword: &str) {
        self.keywords.retain(|k| k != keyword);
    }

    /// Check the draft is submittable
    pub fn validate(&self) -> Result<(), DraftError> {
        if self.title.trim().is_empty() {
            return Err(DraftError::TitleRequired);
        }
        if self.description.trim().is_empty() {
            return Err(DraftError::DescriptionRequired);
        }
        Ok(())
    }
}
