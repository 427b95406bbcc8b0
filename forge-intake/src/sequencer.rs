//! Multi-step workflow sequencer
//!
//! Advances a cursor through an ordered step list. A step may carry a
//! call-to-action closure that owns navigation itself; otherwise the
//! cursor advances, and advancing past the last step fires the host's
//! completion callback exactly once. Completion is fire-and-forget: a
//! rejected callback is logged and the sequencer still ends terminal.
//! A terminal sequencer is not reusable; create a fresh instance for a
//! new run.

use forge_common::{Error, Result};
use futures::future::BoxFuture;

/// Side-effecting step action; when present, it substitutes for the
/// default advance on `next()`
pub type CtaAction = Box<dyn Fn() + Send + Sync>;

/// Host completion callback, awaited at the terminal transition
pub type CompletionCallback =
    Box<dyn Fn() -> BoxFuture<'static, anyhow::Result<()>> + Send + Sync>;

/// Host skip callback, recording a "skipped" rather than "completed"
/// outcome
pub type SkipCallback = Box<dyn Fn() + Send + Sync>;

/// One step in a sequenced workflow
pub struct WorkflowStep {
    pub id: &'static str,
    pub title: String,
    pub description: String,
    /// Label for the step's primary button
    pub cta_text: String,
    /// When set, `next()` runs this instead of advancing the cursor
    pub cta_action: Option<CtaAction>,
    pub skip_allowed: bool,
}

impl WorkflowStep {
    pub fn new(
        id: &'static str,
        title: impl Into<String>,
        description: impl Into<String>,
        cta_text: impl Into<String>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            description: description.into(),
            cta_text: cta_text.into(),
            cta_action: None,
            skip_allowed: false,
        }
    }

    pub fn with_cta_action(mut self, action: CtaAction) -> Self {
        self.cta_action = Some(action);
        self
    }

    pub fn skippable(mut self) -> Self {
        self.skip_allowed = true;
        self
    }
}

impl std::fmt::Debug for WorkflowStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkflowStep")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("cta_action", &self.cta_action.is_some())
            .field("skip_allowed", &self.skip_allowed)
            .finish()
    }
}

/// How a sequencer run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceOutcome {
    Completed,
    Skipped,
}

/// Cursor over an ordered step list with terminal completion
pub struct StepSequencer {
    steps: Vec<WorkflowStep>,
    index: usize,
    busy: bool,
    outcome: Option<SequenceOutcome>,
    on_complete: CompletionCallback,
    on_skip: Option<SkipCallback>,
}

impl StepSequencer {
    /// Create a sequencer over a non-empty step list
    pub fn new(
        steps: Vec<WorkflowStep>,
        on_complete: CompletionCallback,
        on_skip: Option<SkipCallback>,
    ) -> Result<Self> {
        if steps.is_empty() {
            return Err(Error::InvalidInput(
                "A step sequence needs at least one step".to_string(),
            ));
        }
        Ok(Self {
            steps,
            index: 0,
            busy: false,
            outcome: None,
            on_complete,
            on_skip,
        })
    }

    /// Current step; None once terminal
    pub fn current_step(&self) -> Option<&WorkflowStep> {
        if self.is_terminal() {
            None
        } else {
            self.steps.get(self.index)
        }
    }

    /// Zero-based cursor position
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    /// Whether the completion callback is in flight
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn is_terminal(&self) -> bool {
        self.outcome.is_some()
    }

    /// How the run ended, once terminal
    pub fn outcome(&self) -> Option<SequenceOutcome> {
        self.outcome
    }

    /// Primary navigation action
    ///
    /// Runs the current step's cta_action when present (the action owns
    /// navigation; the cursor does not move). Otherwise advances, and
    /// from the last step transitions to terminal, firing the
    /// completion callback exactly once. No-op while busy or terminal.
    pub async fn next(&mut self) {
        if self.busy || self.is_terminal() {
            return;
        }

        if let Some(action) = &self.steps[self.index].cta_action {
            tracing::debug!(step = self.steps[self.index].id, "Running step action");
            action();
            return;
        }

        if self.index < self.steps.len() - 1 {
            self.index += 1;
            tracing::debug!(step = self.steps[self.index].id, "Advanced to step");
        } else {
            self.complete().await;
        }
    }

    /// Step back, clamped at the first step; no-op while busy or
    /// terminal
    pub fn back(&mut self) {
        if self.busy || self.is_terminal() {
            return;
        }
        self.index = self.index.saturating_sub(1);
    }

    /// Skip out of the sequence
    ///
    /// Only permitted when the current step allows skipping. Invokes
    /// the distinct skip callback when one was provided; otherwise
    /// falls through to the completion path.
    pub async fn skip(&mut self) {
        if self.busy || self.is_terminal() {
            return;
        }
        if !self.steps[self.index].skip_allowed {
            return;
        }

        match &self.on_skip {
            Some(on_skip) => {
                tracing::debug!(step = self.steps[self.index].id, "Sequence skipped");
                on_skip();
                self.outcome = Some(SequenceOutcome::Skipped);
            }
            None => self.complete().await,
        }
    }

    /// Terminal transition: mark completed, then fire-and-forget the
    /// host callback
    ///
    /// The outcome is set before the await so re-entrant navigation
    /// observes terminal state; a callback rejection is logged, not
    /// retried, and does not undo completion.
    async fn complete(&mut self) {
        self.outcome = Some(SequenceOutcome::Completed);
        self.busy = true;

        if let Err(e) = (self.on_complete)().await {
            tracing::warn!(error = %e, "Completion callback failed");
        }

        self.busy = false;
    }
}

/// Onboarding step sets per user type
///
/// `final_action` is attached to the last product-creator step, which
/// hands off to the dashboard instead of completing in place.
pub fn onboarding_steps(user_type: &str, final_action: Option<CtaAction>) -> Vec<WorkflowStep> {
    match user_type.to_ascii_lowercase().as_str() {
        "product_creator" => {
            let mut last = WorkflowStep::new(
                "first_action",
                "Launch Your Affiliate Army!",
                "Submit your sales page URL and watch the Content Library create promotional assets that affiliates love.",
                "Create My Content Library",
            );
            if let Some(action) = final_action {
                last = last.with_cta_action(action);
            }
            vec![
                WorkflowStep::new(
                    "welcome",
                    "Welcome, Product Creator!",
                    "You have been invited to supercharge your product promotion with AI-powered marketing intelligence.",
                    "Lets Get Started",
                )
                .skippable(),
                WorkflowStep::new(
                    "dashboard_tour",
                    "Your Product Creator Dashboard",
                    "Discover how your sales page analysis creates marketing assets that drive affiliate success.",
                    "Show Me the Content Library",
                )
                .skippable(),
                last,
            ]
        }
        "affiliate_marketer" => vec![WorkflowStep::new(
            "welcome",
            "Welcome, Affiliate Marketer!",
            "Turn any product into a winning affiliate campaign.",
            "Lets Build Campaigns",
        )
        .skippable()],
        "business_owner" => vec![WorkflowStep::new(
            "welcome",
            "Welcome, Business Owner!",
            "Scale your business with AI-powered marketing intelligence.",
            "Explore Business Tools",
        )
        .skippable()],
        _ => vec![WorkflowStep::new(
            "welcome",
            "Welcome to CampaignForge!",
            "Lets get you started with the right tools for your needs.",
            "Continue",
        )
        .skippable()],
    }
}
