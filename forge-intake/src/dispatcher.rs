//! Analysis dispatch for valid campaign inputs
//!
//! Every valid input gets its own concurrent analyzer call; there is no
//! pool or queue. Failures never escape the dispatcher boundary: they
//! become per-input error statuses. Results land through the workflow
//! controller, which discards them when the input was removed or edited
//! while the call was in flight.

use crate::catalog::{self, InputKind};
use crate::models::{AnalysisResult, CampaignInput, ValidationStatus};
use crate::workflow::WorkflowController;
use async_trait::async_trait;
use futures::stream::{FuturesUnordered, StreamExt};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

/// Fallback message when a failure carries no usable text
pub const GENERIC_FAILURE_MESSAGE: &str = "Analysis failed";

/// Message for calls that exceed the analysis timeout
pub const TIMEOUT_MESSAGE: &str = "Analysis timed out";

/// Confidence reported for document analyses (the document endpoint
/// does not score confidence itself)
pub const DOCUMENT_CONFIDENCE: f64 = 0.85;

/// Insight count assumed for URL analyses without offer intelligence
pub const DEFAULT_URL_INSIGHTS: u32 = 5;

/// Insight count assumed for document analyses without an explicit count
pub const DEFAULT_DOCUMENT_INSIGHTS: u32 = 8;

/// Analyzer call errors
#[derive(Debug, Error)]
pub enum AnalyzerError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error {0}: {1}")]
    Api(u16, String),

    #[error("Parse error: {0}")]
    Parse(String),
}

/// URL analysis request payload
#[derive(Debug, Clone, Serialize)]
pub struct UrlAnalysisRequest {
    pub url: String,
    pub campaign_id: Uuid,
    /// Analysis flavor hint; the intake flow always submits sales pages
    pub analysis_type: String,
}

/// Document analysis request payload
///
/// File inputs carry only a name; pasted text and references travel as
/// inline content.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentAnalysisRequest {
    pub campaign_id: Uuid,
    pub name: String,
    pub content: Option<String>,
}

/// URL analyzer response
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UrlAnalysis {
    /// Analyzer confidence, 0.0 to 1.0
    pub confidence_score: f64,
    /// Offer details extracted from the page, when present
    pub offer_intelligence: Option<OfferIntelligence>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OfferIntelligence {
    pub key_offers: Option<Vec<serde_json::Value>>,
}

/// Document analyzer response
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DocumentAnalysis {
    pub insights_extracted: Option<u32>,
}

/// External analysis service boundary
///
/// The intake core only ever talks to analyzers through this trait;
/// tests substitute scripted implementations.
#[async_trait]
pub trait Analyzer: Send + Sync {
    async fn analyze_url(&self, request: UrlAnalysisRequest) -> Result<UrlAnalysis, AnalyzerError>;

    async fn analyze_document(
        &self,
        request: DocumentAnalysisRequest,
    ) -> Result<DocumentAnalysis, AnalyzerError>;
}

/// Dispatches valid inputs to the analyzer and applies the outcomes
pub struct AnalysisDispatcher {
    controller: WorkflowController,
    analyzer: Arc<dyn Analyzer>,
    timeout: Duration,
}

impl AnalysisDispatcher {
    pub fn new(
        controller: WorkflowController,
        analyzer: Arc<dyn Analyzer>,
        timeout: Duration,
    ) -> Self {
        Self {
            controller,
            analyzer,
            timeout,
        }
    }

    /// Analyze every input currently valid and not already analyzing
    ///
    /// Calls run concurrently and independently; one input's failure
    /// does not block the others. Returns the number of inputs
    /// dispatched. Resolves once every dispatched call finished.
    pub async fn analyze_all(&self) -> usize {
        let candidates: Vec<CampaignInput> = self
            .controller
            .inputs()
            .await
            .into_iter()
            .filter(|i| {
                i.validation == ValidationStatus::Valid
                    && i.analysis != crate::models::AnalysisStatus::Analyzing
                    && i.analysis != crate::models::AnalysisStatus::Completed
            })
            .collect();

        let dispatched = candidates.len();
        tracing::info!(
            campaign_id = %self.controller.campaign_id(),
            dispatched,
            "Dispatching analysis"
        );

        let mut in_flight: FuturesUnordered<_> = candidates
            .into_iter()
            .map(|input| self.analyze(input))
            .collect();
        while in_flight.next().await.is_some() {}

        dispatched
    }

    /// Analyze one input snapshot
    ///
    /// Never returns an error: every failure is converted into an
    /// error status on the input.
    pub async fn analyze(&self, input: CampaignInput) {
        let id = input.id;
        let revision = input.revision;

        if !self.controller.begin_analysis(id, revision).await {
            return;
        }

        match self.run_analyzer(&input).await {
            Ok(result) => {
                tracing::debug!(
                    input_id = %id,
                    confidence = result.confidence,
                    insights = result.insight_count,
                    "Analysis completed"
                );
                self.controller.complete_analysis(id, revision, result).await;
            }
            Err(message) => {
                tracing::warn!(input_id = %id, error = %message, "Analysis failed");
                self.controller.fail_analysis(id, revision, message).await;
            }
        }
    }

    /// Route to the analyzer call for the input's kind and map the
    /// response into an `AnalysisResult`
    async fn run_analyzer(&self, input: &CampaignInput) -> Result<AnalysisResult, String> {
        let kind = catalog::descriptor(&input.type_id)
            .map(|d| d.kind)
            .unwrap_or(InputKind::Text);
        let campaign_id = self.controller.campaign_id();

        let outcome = match kind {
            InputKind::Url => {
                let request = UrlAnalysisRequest {
                    url: input.value.clone(),
                    campaign_id,
                    analysis_type: "sales_page".to_string(),
                };
                tokio::time::timeout(self.timeout, self.analyzer.analyze_url(request))
                    .await
                    .map(|r| r.map(map_url_analysis))
            }
            InputKind::File => {
                let request = DocumentAnalysisRequest {
                    campaign_id,
                    name: input.value.clone(),
                    content: None,
                };
                tokio::time::timeout(self.timeout, self.analyzer.analyze_document(request))
                    .await
                    .map(|r| r.map(map_document_analysis))
            }
            InputKind::Text | InputKind::Analytics | InputKind::ProductReference => {
                let request = DocumentAnalysisRequest {
                    campaign_id,
                    name: input.type_id.clone(),
                    content: Some(input.value.clone()),
                };
                tokio::time::timeout(self.timeout, self.analyzer.analyze_document(request))
                    .await
                    .map(|r| r.map(map_document_analysis))
            }
        };

        match outcome {
            Ok(Ok(result)) => Ok(result),
            Ok(Err(e)) => {
                let message = e.to_string();
                if message.trim().is_empty() {
                    Err(GENERIC_FAILURE_MESSAGE.to_string())
                } else {
                    Err(message)
                }
            }
            Err(_) => Err(TIMEOUT_MESSAGE.to_string()),
        }
    }
}

fn map_url_analysis(analysis: UrlAnalysis) -> AnalysisResult {
    let insight_count = analysis
        .offer_intelligence
        .and_then(|oi| oi.key_offers)
        .map(|offers| offers.len() as u32)
        .unwrap_or(DEFAULT_URL_INSIGHTS);
    AnalysisResult {
        confidence: analysis.confidence_score,
        insight_count,
    }
}

fn map_document_analysis(analysis: DocumentAnalysis) -> AnalysisResult {
    AnalysisResult {
        confidence: DOCUMENT_CONFIDENCE,
        insight_count: analysis
            .insights_extracted
            .unwrap_or(DEFAULT_DOCUMENT_INSIGHTS),
    }
}
