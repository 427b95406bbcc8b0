//! Shared test fixtures for the integration suites

use async_trait::async_trait;
use forge_intake::dispatcher::{
    AnalyzerError, DocumentAnalysis, DocumentAnalysisRequest, OfferIntelligence, UrlAnalysis,
    UrlAnalysisRequest,
};
use forge_intake::Analyzer;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Scripted analyzer for exercising the dispatcher without a backend.
///
/// Responses are keyed by URL (for `analyze_url`) or document name (for
/// `analyze_document`); unscripted calls get a plain success. URLs
/// registered through `fail_url` return an API error instead.
pub struct MockAnalyzer {
    url_responses: Mutex<HashMap<String, UrlAnalysis>>,
    doc_responses: Mutex<HashMap<String, DocumentAnalysis>>,
    failing_urls: Mutex<Vec<String>>,
    delay: Option<Duration>,
    pub url_calls: AtomicUsize,
    pub doc_calls: AtomicUsize,
}

impl MockAnalyzer {
    pub fn new() -> Self {
        Self {
            url_responses: Mutex::new(HashMap::new()),
            doc_responses: Mutex::new(HashMap::new()),
            failing_urls: Mutex::new(Vec::new()),
            delay: None,
            url_calls: AtomicUsize::new(0),
            doc_calls: AtomicUsize::new(0),
        }
    }

    /// Delays every call, for exercising in-flight edit and timeout paths
    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::new()
        }
    }

    pub fn script_url(&self, url: &str, confidence_score: f64, key_offers: usize) {
        let offers = (0..key_offers)
            .map(|i| serde_json::json!({ "offer": i }))
            .collect();
        self.url_responses.lock().unwrap().insert(
            url.to_string(),
            UrlAnalysis {
                confidence_score,
                offer_intelligence: Some(OfferIntelligence {
                    key_offers: Some(offers),
                }),
            },
        );
    }

    pub fn script_document(&self, name: &str, insights_extracted: u32) {
        self.doc_responses.lock().unwrap().insert(
            name.to_string(),
            DocumentAnalysis {
                insights_extracted: Some(insights_extracted),
            },
        );
    }

    pub fn fail_url(&self, url: &str) {
        self.failing_urls.lock().unwrap().push(url.to_string());
    }

    pub fn url_call_count(&self) -> usize {
        self.url_calls.load(Ordering::SeqCst)
    }

    pub fn doc_call_count(&self) -> usize {
        self.doc_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Analyzer for MockAnalyzer {
    async fn analyze_url(&self, request: UrlAnalysisRequest) -> Result<UrlAnalysis, AnalyzerError> {
        self.url_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing_urls.lock().unwrap().contains(&request.url) {
            return Err(AnalyzerError::Api(500, "scripted failure".to_string()));
        }
        let scripted = self.url_responses.lock().unwrap().get(&request.url).cloned();
        Ok(scripted.unwrap_or(UrlAnalysis {
            confidence_score: 0.5,
            offer_intelligence: None,
        }))
    }

    async fn analyze_document(
        &self,
        request: DocumentAnalysisRequest,
    ) -> Result<DocumentAnalysis, AnalyzerError> {
        self.doc_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let scripted = self
            .doc_responses
            .lock()
            .unwrap()
            .get(&request.name)
            .cloned();
        Ok(scripted.unwrap_or(DocumentAnalysis {
            insights_extracted: None,
        }))
    }
}
