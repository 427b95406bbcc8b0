//! forge-intake - campaign input collection and analysis core
//!
//! Implements the intake phase of a CampaignForge campaign: a catalog
//! of input-source types, per-input validation, a controller owning the
//! ordered input list, concurrent dispatch of valid inputs to remote
//! analyzers, and the multi-step workflow sequencer that carries a user
//! through onboarding and campaign creation.
//!
//! Rendering, persistence, and the backend API itself are host
//! concerns; hosts observe intake state through the
//! `forge_common::events::EventBus`.

pub mod analyzers;
pub mod catalog;
pub mod dispatcher;
pub mod models;
pub mod sequencer;
pub mod validation;
pub mod workflow;

pub use catalog::{InputKind, InputTypeDescriptor, Persona};
pub use dispatcher::{AnalysisDispatcher, Analyzer, AnalyzerError};
pub use models::{AnalysisResult, AnalysisStatus, CampaignInput, ValidationStatus};
pub use sequencer::{StepSequencer, WorkflowStep};
pub use workflow::{InputAggregate, WorkflowController};
