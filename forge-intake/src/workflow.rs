//! Workflow controller for the campaign input list
//!
//! Owns the ordered list of inputs for one campaign and mediates every
//! mutation. Edits re-enter pending and arm a per-input debounce timer;
//! the timer captures the input's revision so a superseded validation
//! resolves to a no-op (last edit wins). Analysis results land through
//! the same guarded path, so a result for a removed or re-edited input
//! is discarded instead of mutating a stale entry.

use crate::catalog;
use crate::models::{AnalysisResult, AnalysisStatus, CampaignInput, ValidationStatus};
use crate::validation::{self, Validation};
use chrono::Utc;
use forge_common::events::{EventBus, ForgeEvent};
use forge_common::{Error, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Derived aggregate state over the input list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputAggregate {
    /// At least one input validated successfully
    pub has_valid_inputs: bool,
    /// At least one input failed validation (gates the analyze action)
    pub has_invalid_inputs: bool,
    /// List is non-empty and every input's analysis completed
    pub all_analyzed: bool,
    /// Inputs with completed analysis
    pub analyzed_count: usize,
    /// Total inputs in the list
    pub total: usize,
    /// Completed analyses as a percentage of the list, 0 when empty
    pub progress_percent: u8,
}

/// Controller owning one campaign's ordered input list
///
/// Cheap to clone; clones share the same list. All mutation goes
/// through this type and every change is broadcast as
/// `ForgeEvent::InputsChanged` for the host to persist or render.
#[derive(Clone)]
pub struct WorkflowController {
    campaign_id: Uuid,
    event_bus: EventBus,
    debounce: Duration,
    inputs: Arc<Mutex<Vec<CampaignInput>>>,
}

impl WorkflowController {
    pub fn new(campaign_id: Uuid, event_bus: EventBus, debounce: Duration) -> Self {
        Self {
            campaign_id,
            event_bus,
            debounce,
            inputs: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn campaign_id(&self) -> Uuid {
        self.campaign_id
    }

    /// Append a new input of the given catalog type
    ///
    /// Unknown type ids are rejected. Duplicate types are permitted
    /// (the picker UI filters them, the underlying add does not) but
    /// logged, since most hosts expect one input per suggested type.
    pub async fn add_input(&self, type_id: &str) -> Result<Uuid> {
        let descriptor = catalog::descriptor(type_id)
            .ok_or_else(|| Error::NotFound(format!("Unknown input type: {}", type_id)))?;

        let mut inputs = self.inputs.lock().await;
        if inputs.iter().any(|i| i.type_id == type_id) {
            tracing::warn!(type_id, "Adding duplicate input type");
        }

        let input = CampaignInput::new(descriptor.id);
        let id = input.id;
        inputs.push(input);

        tracing::debug!(input_id = %id, type_id, "Input added");
        self.emit_inputs_changed(&inputs);
        Ok(id)
    }

    /// Record an edit and arm the debounced validation timer
    ///
    /// The input drops back to pending immediately; validation resolves
    /// after the debounce window unless a newer edit supersedes it.
    pub async fn update_input(&self, id: Uuid, value: &str) -> Result<()> {
        let revision = {
            let mut inputs = self.inputs.lock().await;
            let input = inputs
                .iter_mut()
                .find(|i| i.id == id)
                .ok_or_else(|| Error::NotFound(format!("Unknown input: {}", id)))?;
            input.set_value(value);
            let revision = input.revision;
            self.emit_inputs_changed(&inputs);
            revision
        };

        let controller = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(controller.debounce).await;
            controller.resolve_validation(id, revision).await;
        });
        Ok(())
    }

    /// Remove an input by id, preserving the order of the rest
    ///
    /// Returns whether an input was removed.
    pub async fn remove_input(&self, id: Uuid) -> bool {
        let mut inputs = self.inputs.lock().await;
        let before = inputs.len();
        inputs.retain(|i| i.id != id);
        let removed = inputs.len() < before;
        if removed {
            tracing::debug!(input_id = %id, "Input removed");
            self.emit_inputs_changed(&inputs);
        }
        removed
    }

    /// Snapshot of the current input list, in insertion order
    pub async fn inputs(&self) -> Vec<CampaignInput> {
        self.inputs.lock().await.clone()
    }

    /// Compute the derived aggregate flags
    pub async fn aggregate(&self) -> InputAggregate {
        compute_aggregate(&self.inputs.lock().await)
    }

    /// Run the debounced validation for one input
    ///
    /// No-op when the input was removed or re-edited since the timer
    /// was armed.
    async fn resolve_validation(&self, id: Uuid, revision: u64) {
        let mut inputs = self.inputs.lock().await;
        let Some(input) = inputs.iter_mut().find(|i| i.id == id) else {
            tracing::debug!(input_id = %id, "Input removed before validation resolved");
            return;
        };
        if input.revision != revision {
            tracing::debug!(input_id = %id, revision, "Stale validation discarded");
            return;
        }
        let Some(descriptor) = catalog::descriptor(&input.type_id) else {
            return;
        };

        match validation::validate(descriptor.kind, &input.value) {
            Validation::Valid => input.mark_valid(),
            Validation::Invalid { message } => input.mark_invalid(message),
        }

        let valid = input.validation == ValidationStatus::Valid;
        let error = input.error.clone();
        tracing::debug!(input_id = %id, valid, "Validation resolved");

        self.event_bus.emit_lossy(ForgeEvent::InputValidated {
            campaign_id: self.campaign_id,
            input_id: id,
            valid,
            error,
            timestamp: Utc::now(),
        });
        self.emit_inputs_changed(&inputs);
    }

    /// Transition an input to analyzing
    ///
    /// Returns false (and changes nothing) when the input is gone, was
    /// edited since the snapshot, or is not valid.
    pub(crate) async fn begin_analysis(&self, id: Uuid, revision: u64) -> bool {
        let mut inputs = self.inputs.lock().await;
        let Some(input) = inputs.iter_mut().find(|i| i.id == id) else {
            return false;
        };
        if input.revision != revision || input.validation != ValidationStatus::Valid {
            tracing::debug!(input_id = %id, "Skipping analysis for stale or non-valid input");
            return false;
        }
        input.begin_analysis();

        self.event_bus.emit_lossy(ForgeEvent::InputAnalysisStarted {
            campaign_id: self.campaign_id,
            input_id: id,
            timestamp: Utc::now(),
        });
        self.emit_inputs_changed(&inputs);
        true
    }

    /// Apply a successful analysis result
    ///
    /// Discarded when the input was removed or edited while the call
    /// was in flight. Emits `AllInputsAnalyzed` when this completion
    /// finishes the whole list.
    pub(crate) async fn complete_analysis(
        &self,
        id: Uuid,
        revision: u64,
        result: AnalysisResult,
    ) -> bool {
        let mut inputs = self.inputs.lock().await;
        let Some(input) = inputs.iter_mut().find(|i| i.id == id && i.revision == revision) else {
            tracing::debug!(input_id = %id, "Analysis result for missing or re-edited input discarded");
            return false;
        };
        input.complete_analysis(result);

        self.event_bus.emit_lossy(ForgeEvent::InputAnalyzed {
            campaign_id: self.campaign_id,
            input_id: id,
            success: true,
            confidence: Some(result.confidence),
            insight_count: Some(result.insight_count),
            error: None,
            timestamp: Utc::now(),
        });
        self.emit_inputs_changed(&inputs);

        let aggregate = compute_aggregate(&inputs);
        if aggregate.all_analyzed {
            tracing::info!(
                campaign_id = %self.campaign_id,
                analyzed_count = aggregate.analyzed_count,
                "All inputs analyzed"
            );
            self.event_bus.emit_lossy(ForgeEvent::AllInputsAnalyzed {
                campaign_id: self.campaign_id,
                analyzed_count: aggregate.analyzed_count,
                timestamp: Utc::now(),
            });
        }
        true
    }

    /// Record a failed analysis
    ///
    /// Same guards as `complete_analysis`.
    pub(crate) async fn fail_analysis(&self, id: Uuid, revision: u64, message: String) -> bool {
        let mut inputs = self.inputs.lock().await;
        let Some(input) = inputs.iter_mut().find(|i| i.id == id && i.revision == revision) else {
            tracing::debug!(input_id = %id, "Analysis failure for missing or re-edited input discarded");
            return false;
        };
        input.fail_analysis(message.clone());

        self.event_bus.emit_lossy(ForgeEvent::InputAnalyzed {
            campaign_id: self.campaign_id,
            input_id: id,
            success: false,
            confidence: None,
            insight_count: None,
            error: Some(message),
            timestamp: Utc::now(),
        });
        self.emit_inputs_changed(&inputs);
        true
    }

    fn emit_inputs_changed(&self, inputs: &[CampaignInput]) {
        self.event_bus.emit_lossy(ForgeEvent::InputsChanged {
            campaign_id: self.campaign_id,
            inputs: inputs.iter().map(|i| i.summary()).collect(),
            timestamp: Utc::now(),
        });
    }
}

fn compute_aggregate(inputs: &[CampaignInput]) -> InputAggregate {
    let total = inputs.len();
    let analyzed_count = inputs
        .iter()
        .filter(|i| i.analysis == AnalysisStatus::Completed)
        .count();

    InputAggregate {
        has_valid_inputs: inputs.iter().any(|i| i.validation == ValidationStatus::Valid),
        has_invalid_inputs: inputs
            .iter()
            .any(|i| i.validation == ValidationStatus::Invalid),
        all_analyzed: total > 0 && analyzed_count == total,
        analyzed_count,
        total,
        progress_percent: if total == 0 {
            0
        } else {
            ((analyzed_count as f64 / total as f64) * 100.0).round() as u8
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> WorkflowController {
        WorkflowController::new(
            Uuid::new_v4(),
            EventBus::new(64),
            Duration::from_millis(10),
        )
    }

    #[tokio::test]
    async fn add_rejects_unknown_type_id() {
        let wc = controller();
        assert!(matches!(
            wc.add_input("not_a_type").await,
            Err(Error::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn remove_preserves_order_of_remaining_inputs() {
        let wc = controller();
        let a = wc.add_input("salespage_url").await.unwrap();
        let b = wc.add_input("product_description").await.unwrap();
        let c = wc.add_input("performance_data").await.unwrap();

        assert!(wc.remove_input(b).await);
        let inputs = wc.inputs().await;
        assert_eq!(inputs.len(), 2);
        assert_eq!(inputs[0].id, a);
        assert_eq!(inputs[1].id, c);
        assert!(!wc.remove_input(b).await);
    }

    #[tokio::test]
    async fn empty_list_is_never_all_analyzed() {
        let wc = controller();
        let aggregate = wc.aggregate().await;
        assert!(!aggregate.all_analyzed);
        assert_eq!(aggregate.progress_percent, 0);
    }

    #[tokio::test]
    async fn debounced_validation_applies_after_window() {
        let wc = controller();
        let id = wc.add_input("salespage_url").await.unwrap();
        wc.update_input(id, "https://example.com/page").await.unwrap();

        tokio::time::sleep(Duration::from_millis(50)).await;

        let input = &wc.inputs().await[0];
        assert_eq!(input.validation, ValidationStatus::Valid);
        assert!(input.error.is_none());
    }

    #[tokio::test]
    async fn newer_edit_supersedes_inflight_validation() {
        let wc = controller();
        let id = wc.add_input("salespage_url").await.unwrap();

        // First edit is invalid; second lands before the first timer fires
        wc.update_input(id, "not-a-url").await.unwrap();
        wc.update_input(id, "https://example.com").await.unwrap();

        tokio::time::sleep(Duration::from_millis(50)).await;

        let input = &wc.inputs().await[0];
        assert_eq!(input.validation, ValidationStatus::Valid);
        assert!(input.error.is_none());
    }

    #[tokio::test]
    async fn validation_for_removed_input_is_a_no_op() {
        let wc = controller();
        let id = wc.add_input("salespage_url").await.unwrap();
        wc.update_input(id, "https://example.com").await.unwrap();
        wc.remove_input(id).await;

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(wc.inputs().await.is_empty());
    }

    #[tokio::test]
    async fn stale_analysis_result_is_discarded() {
        let wc = controller();
        let id = wc.add_input("salespage_url").await.unwrap();
        wc.update_input(id, "https://example.com").await.unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;

        let revision = wc.inputs().await[0].revision;
        assert!(wc.begin_analysis(id, revision).await);

        // Edit while "in flight": the completion must not apply
        wc.update_input(id, "https://example.com/other").await.unwrap();
        let applied = wc
            .complete_analysis(
                id,
                revision,
                AnalysisResult {
                    confidence: 0.9,
                    insight_count: 3,
                },
            )
            .await;

        assert!(!applied);
        assert!(wc.inputs().await[0].analysis_result.is_none());
    }

    #[tokio::test]
    async fn aggregate_flags_track_statuses() {
        let wc = controller();
        let a = wc.add_input("salespage_url").await.unwrap();
        let b = wc.add_input("product_description").await.unwrap();

        wc.update_input(a, "not-a-url").await.unwrap();
        wc.update_input(b, "A fine product").await.unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;

        let aggregate = wc.aggregate().await;
        assert!(aggregate.has_valid_inputs);
        assert!(aggregate.has_invalid_inputs);
        assert!(!aggregate.all_analyzed);

        // Fix the URL, analyze both
        wc.update_input(a, "https://example.com").await.unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;

        for input in wc.inputs().await {
            assert!(wc.begin_analysis(input.id, input.revision).await);
            assert!(
                wc.complete_analysis(
                    input.id,
                    input.revision,
                    AnalysisResult {
                        confidence: 0.8,
                        insight_count: 5,
                    },
                )
                .await
            );
        }

        let aggregate = wc.aggregate().await;
        assert!(aggregate.all_analyzed);
        assert_eq!(aggregate.analyzed_count, 2);
        assert_eq!(aggregate.progress_percent, 100);
    }

    #[tokio::test]
    async fn all_analyzed_event_fires_on_final_completion() {
        let wc = controller();
        let mut rx = {
            let id = wc.add_input("salespage_url").await.unwrap();
            wc.update_input(id, "https://example.com").await.unwrap();
            tokio::time::sleep(Duration::from_millis(50)).await;

            let rx = wc.event_bus.subscribe();
            let input = &wc.inputs().await[0];
            wc.begin_analysis(input.id, input.revision).await;
            wc.complete_analysis(
                input.id,
                input.revision,
                AnalysisResult {
                    confidence: 0.9,
                    insight_count: 3,
                },
            )
            .await;
            rx
        };

        let mut saw_all_analyzed = false;
        while let Ok(event) = rx.try_recv() {
            if let ForgeEvent::AllInputsAnalyzed { analyzed_count, .. } = event {
                assert_eq!(analyzed_count, 1);
                saw_all_analyzed = true;
            }
        }
        assert!(saw_all_analyzed);
    }
}
