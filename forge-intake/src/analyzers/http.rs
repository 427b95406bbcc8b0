//! HTTP analyzer client for the CampaignForge backend
//!
//! Talks to the backend intelligence endpoints over JSON. Non-2xx
//! responses are mapped to `AnalyzerError::Api` with a best-effort
//! message extracted from the response body.

use crate::dispatcher::{
    Analyzer, AnalyzerError, DocumentAnalysis, DocumentAnalysisRequest, UrlAnalysis,
    UrlAnalysisRequest,
};
use async_trait::async_trait;
use forge_common::config::IntakeConfig;
use serde::de::DeserializeOwned;
use std::time::Duration;

const USER_AGENT: &str = concat!("CampaignForge-Intake/", env!("CARGO_PKG_VERSION"));

/// Connect-level timeout; the per-analysis timeout is enforced by the
/// dispatcher on top of this
const CLIENT_TIMEOUT: Duration = Duration::from_secs(120);

/// `Analyzer` implementation backed by the backend intelligence API
pub struct HttpAnalyzer {
    http_client: reqwest::Client,
    base_url: String,
    api_token: Option<String>,
}

impl HttpAnalyzer {
    pub fn new(base_url: impl Into<String>, api_token: Option<String>) -> Result<Self, AnalyzerError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(CLIENT_TIMEOUT)
            .build()
            .map_err(|e| AnalyzerError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_token,
        })
    }

    pub fn from_config(config: &IntakeConfig) -> Result<Self, AnalyzerError> {
        Self::new(config.api_base_url.clone(), config.api_token.clone())
    }

    async fn post_json<B: serde::Serialize, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<R, AnalyzerError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(url = %url, "Calling analyzer endpoint");

        let mut request = self.http_client.post(&url).json(body);
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AnalyzerError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AnalyzerError::Api(status.as_u16(), extract_message(&body)));
        }

        response
            .json()
            .await
            .map_err(|e| AnalyzerError::Parse(e.to_string()))
    }
}

/// Pull a human-readable message out of an error body
///
/// The backend wraps errors as `{"detail": "..."}`; fall back to the
/// raw body, then to a generic message.
fn extract_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(detail) = value.get("detail").and_then(|d| d.as_str()) {
            return detail.to_string();
        }
        if let Some(message) = value.get("message").and_then(|m| m.as_str()) {
            return message.to_string();
        }
    }
    if body.trim().is_empty() {
        "Analysis failed".to_string()
    } else {
        body.trim().to_string()
    }
}

#[async_trait]
impl Analyzer for HttpAnalyzer {
    async fn analyze_url(&self, request: UrlAnalysisRequest) -> Result<UrlAnalysis, AnalyzerError> {
        let analysis: UrlAnalysis = self
            .post_json("/api/intelligence/analyze-url", &request)
            .await?;

        tracing::info!(
            url = %request.url,
            confidence = analysis.confidence_score,
            "URL analysis retrieved"
        );
        Ok(analysis)
    }

    async fn analyze_document(
        &self,
        request: DocumentAnalysisRequest,
    ) -> Result<DocumentAnalysis, AnalyzerError> {
        let analysis: DocumentAnalysis = self
            .post_json("/api/intelligence/upload-document", &request)
            .await?;

        tracing::info!(
            name = %request.name,
            insights = ?analysis.insights_extracted,
            "Document analysis retrieved"
        );
        Ok(analysis)
    }
}
