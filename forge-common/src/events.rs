//! Event types for the CampaignForge event system
//!
//! Provides the shared event definitions and the `EventBus` that intake
//! components use to notify the host application. Events are broadcast
//! and can be serialized for transmission to a UI layer.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

/// Snapshot of one campaign input, as carried in events
///
/// A projection of the full input model: enough for a host to persist
/// or render the current list without depending on the intake crate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputSummary {
    /// Input instance identifier
    pub input_id: Uuid,
    /// Catalog type id (e.g. "salespage_url")
    pub type_id: String,
    /// Raw user-supplied value
    pub value: String,
    /// Form validity: "pending", "valid", or "invalid"
    pub validation: String,
    /// Analysis progress: "not_started", "analyzing", "completed", or "error"
    pub analysis: String,
    /// Human-readable message when invalid or errored
    pub error: Option<String>,
}

/// CampaignForge event types
///
/// Broadcast via `EventBus`; every intake-side state change the host
/// may care about flows through this enum.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ForgeEvent {
    /// The input list changed (add, edit, remove, or status update)
    ///
    /// Carries the full current list so the host can persist or
    /// re-render without a follow-up query.
    InputsChanged {
        campaign_id: Uuid,
        inputs: Vec<InputSummary>,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Debounced validation resolved for one input
    InputValidated {
        campaign_id: Uuid,
        input_id: Uuid,
        valid: bool,
        error: Option<String>,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Analysis started for one input
    InputAnalysisStarted {
        campaign_id: Uuid,
        input_id: Uuid,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Analysis finished for one input
    InputAnalyzed {
        campaign_id: Uuid,
        input_id: Uuid,
        success: bool,
        confidence: Option<f64>,
        insight_count: Option<u32>,
        error: Option<String>,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Every input in a non-empty list reached completed analysis
    ///
    /// Hosts typically auto-advance the surrounding step sequencer on
    /// this event.
    AllInputsAnalyzed {
        campaign_id: Uuid,
        analyzed_count: usize,
        timestamp: chrono::DateTime<chrono::Utc>,
    },
}

/// Event broadcast bus
///
/// Wraps `tokio::sync::broadcast` with lossy emission: emitting with no
/// subscribers is not an error, and slow subscribers drop old events
/// rather than blocking producers.
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<ForgeEvent>,
    capacity: usize,
}

impl EventBus {
    /// Create a new EventBus with the given channel capacity
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx, capacity }
    }

    /// Subscribe to all future events
    ///
    /// Events emitted before subscription are not received.
    pub fn subscribe(&self) -> broadcast::Receiver<ForgeEvent> {
        self.tx.subscribe()
    }

    /// Emit an event to all subscribers
    ///
    /// Returns the subscriber count, or an error when nobody is
    /// listening.
    pub fn emit(&self, event: ForgeEvent) -> std::result::Result<usize, Box<ForgeEvent>> {
        self.tx.send(event).map_err(|e| Box::new(e.0))
    }

    /// Emit an event, ignoring the no-subscriber case
    ///
    /// Intake components publish state changes regardless of whether a
    /// host is currently listening.
    pub fn emit_lossy(&self, event: ForgeEvent) {
        let _ = self.tx.send(event);
    }

    /// Configured channel capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("capacity", &self.capacity)
            .field("subscribers", &self.tx.receiver_count())
            .finish()
    }
}
