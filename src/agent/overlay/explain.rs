use serde_json::Value;
use tracing::warn;

use crate::agent::Agent;
use crate::error::StrategyError;
use crate::plan::{Action, Decision, Observation};

/// Produces a human-readable account of why an action was chosen.
pub trait Explainer: Send {
    /// Explain one action
    fn explain(&self, action: &Action) -> Result<String, StrategyError>;
}

/// Overlay that attaches an explanation to every decision.
///
/// The wrapped agent decides first; the explainer then sees the final
/// action, so stacking this outside tracking or planning overlays explains
/// what was actually served. An explainer failure keeps the decision shape
/// intact and attaches a text describing the failure instead, so callers
/// never need a separate error path.
pub struct ExplainOverlay<A: Agent> {
    inner: A,
    explainer: Box<dyn Explainer>,
    explanations: Vec<String>,
}

impl<A: Agent> ExplainOverlay<A> {
    /// Wrap an agent with an explainer
    pub fn new(inner: A, explainer: Box<dyn Explainer>) -> Self {
        Self {
            inner,
            explainer,
            explanations: Vec::new(),
        }
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

    /// Every explanation the explainer produced, in decision order.
    /// Failure texts are attached to their decisions but not recorded here.
    pub fn explanations(&self) -> &[String] {
        &self.explanations
    }
}

impl<A: Agent> Agent for ExplainOverlay<A> {
    fn perceive(&mut self, observation: Observation) {
        self.inner.perceive(observation);
    }

    fn decide_next_action(&mut self) -> Decision {
        let decision = self.inner.decide_next_action();

        let explanation = match self.explainer.explain(&decision.action) {
            Ok(text) => {
                self.explanations.push(text.clone());
                text
            }
            Err(err) => {
                warn!(error = %err, "Explainer failed, attaching failure text");
                format!("explanation unavailable: {err}")
            }
        };

        Decision::explained(decision.action, explanation)
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
