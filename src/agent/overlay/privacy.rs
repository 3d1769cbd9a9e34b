use std::sync::Arc;

use serde_json::Value;
use tracing::warn;

use crate::agent::Agent;
use crate::agent::planner::{PlanContext, Planner};
use crate::error::StrategyError;
use crate::plan::{Decision, Observation, Plan};

/// Strips or masks sensitive content from a value.
///
/// Shared between the perceive-side overlay and the planner decorator via
/// `Arc`, so one anonymizer instance covers both paths.
pub trait Anonymizer: Send + Sync {
    /// Anonymize one value
    fn anonymize(&self, value: Value) -> Result<Value, StrategyError>;
}

/// Scrub a value, keeping the original when anonymization fails.
///
/// Fail-open by contract: a failing anonymizer must not block the data it
/// was asked to protect, so the raw value proceeds with a warning. Callers
/// wanting fail-closed semantics wrap their anonymizer to return a
/// redacted constant on internal failure instead of an error.
fn scrub(anonymizer: &dyn Anonymizer, value: Value) -> Value {
    match anonymizer.anonymize(value.clone()) {
        Ok(scrubbed) => scrubbed,
        Err(err) => {
            warn!(error = %err, "Anonymization failed, passing original value through");
            value
        }
    }
}

/// Scrub a string, additionally treating a non-string answer as a failure.
fn scrub_text(anonymizer: &dyn Anonymizer, text: String) -> String {
    match anonymizer.anonymize(Value::String(text.clone())) {
        Ok(Value::String(scrubbed)) => scrubbed,
        Ok(other) => {
            warn!(got = %other, "Anonymizer returned non-string for text, passing original through");
            text
        }
        Err(err) => {
            warn!(error = %err, "Anonymization failed, passing original text through");
            text
        }
    }
}

/// Overlay that anonymizes observations before the wrapped agent sees them.
///
/// Runs before any other perception work, so modality processing, memory
/// writes and planning only ever touch scrubbed data. Placed outermost in
/// an overlay stack for exactly that reason.
pub struct PrivacyOverlay<A: Agent> {
    inner: A,
    anonymizer: Arc<dyn Anonymizer>,
}

impl<A: Agent> PrivacyOverlay<A> {
    /// Wrap an agent behind an anonymizer
    pub fn new(inner: A, anonymizer: Arc<dyn Anonymizer>) -> Self {
        Self { inner, anonymizer }
    }

    /// The wrapped agent
    pub fn inner(&self) -> &A {
        &self.inner
    }

    /// Mutable access to the wrapped agent
    pub fn inner_mut(&mut self) -> &mut A {
        &mut self.inner
    }

    /// Unwrap the overlay
    pub fn into_inner(self) -> A {
        self.inner
    }
}

impl<A: Agent> Agent for PrivacyOverlay<A> {
    fn perceive(&mut self, observation: Observation) {
        let Observation { text, modalities } = observation;

        let scrubbed = Observation {
            text: scrub_text(self.anonymizer.as_ref(), text),
            modalities: modalities
                .into_iter()
                .map(|(name, payload)| (name, scrub(self.anonymizer.as_ref(), payload)))
                .collect(),
        };

        self.inner.perceive(scrubbed);
    }

    fn decide_next_action(&mut self) -> Decision {
        self.inner.decide_next_action()
    }

    fn remember(&mut self, key: &str, value: Value) {
        self.inner.remember(key, value);
    }

    fn recall(&self, key: &str) -> Option<Value> {
        self.inner.recall(key)
    }

    fn supports_task_type(&self, task_type: &str) -> bool {
        self.inner.supports_task_type(task_type)
    }
}

/// Planner decorator that anonymizes the planning input before delegating.
///
/// Covers the path where planning input arrives from somewhere other than
/// a scrubbed observation, e.g. a dispatcher feeding task content straight
/// into a planning turn.
pub struct PrivacyPlanner {
    inner: Box<dyn Planner>,
    anonymizer: Arc<dyn Anonymizer>,
}

impl PrivacyPlanner {
    /// Wrap a planner behind an anonymizer
    pub fn new(inner: Box<dyn Planner>, anonymizer: Arc<dyn Anonymizer>) -> Self {
        Self { inner, anonymizer }
    }
}

impl Planner for PrivacyPlanner {
    fn generate(&mut self, ctx: PlanContext<'_>) -> Result<Plan, StrategyError> {
        let scrubbed = scrub_text(self.anonymizer.as_ref(), ctx.input.to_string());
        self.inner.generate(ctx.with_input(&scrubbed))
    }
}
