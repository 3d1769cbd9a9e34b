use serde_json::Value;
use tracing::debug;

use crate::agent::Agent;
use crate::plan::{Action, Decision, Observation};

/// Observes decided actions and scores accumulated histories.
pub trait PerformanceTracker: Send {
    /// Note one decided action
    fn record(&mut self, action: &Action);

    /// Summarize a full action history
    fn evaluate(&self, history: &[Action]) -> Value;
}

/// Consumes an evaluation summary and adjusts whatever the agent improves.
pub trait ImprovementStrategy: Send {
    /// Apply one evaluation summary
    fn apply(&mut self, summary: &Value);
}

/// Overlay that keeps a history of decided actions for self-evaluation.
///
/// Every decision is appended to the history and reported to the tracker
/// before being returned unchanged. [`TrackingOverlay::evaluate_performance`]
/// scores the whole history and hands the summary to the improvement
/// strategy. Both collaborators are optional; the history is kept either
/// way.
pub struct TrackingOverlay<A: Agent> {
    inner: A,
    tracker: Option<Box<dyn PerformanceTracker>>,
    improver: Option<Box<dyn ImprovementStrategy>>,
    history: Vec<Action>,
}

impl<A: Agent> TrackingOverlay<A> {
    /// Wrap an agent with no collaborators attached
    pub fn new(inner: A) -> Self {
        Self {
            inner,
            tracker: None,
            improver: None,
            history: Vec::new(),
        }
    }

    /// Attach a performance tracker
    pub fn with_tracker(mut self, tracker: Box<dyn PerformanceTracker>) -> Self {
        self.tracker = Some(tracker);
        self
    }

    /// Attach an improvement strategy
    pub fn with_improver(mut self, improver: Box<dyn ImprovementStrategy>) -> Self {
        self.improver = Some(improver);
        self
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

    /// Every action this overlay has seen decided, oldest first
    pub fn history(&self) -> &[Action] {
        &self.history
    }

    /// Score the accumulated history and apply improvements.
    ///
    /// Asks the tracker to evaluate the full history, feeds the summary to
    /// the improvement strategy, and returns the summary. Without a tracker
    /// there is nothing to score and `Value::Null` comes back.
    pub fn evaluate_performance(&mut self) -> Value {
        let Some(tracker) = self.tracker.as_ref() else {
            debug!("No performance tracker attached, skipping evaluation");
            return Value::Null;
        };

        let summary = tracker.evaluate(&self.history);
        debug!(actions = self.history.len(), "Evaluated performance history");

        if let Some(improver) = self.improver.as_mut() {
            improver.apply(&summary);
        }

        summary
    }
}

impl<A: Agent> Agent for TrackingOverlay<A> {
    fn perceive(&mut self, observation: Observation) {
        self.inner.perceive(observation);
    }

    fn decide_next_action(&mut self) -> Decision {
        let decision = self.inner.decide_next_action();

        self.history.push(decision.action.clone());
        if let Some(tracker) = self.tracker.as_mut() {
            tracker.record(&decision.action);
        }

        decision
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::{EchoPlanner, PlanExecutor};
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct CountingTracker {
        recorded: Arc<Mutex<Vec<String>>>,
    }

    impl PerformanceTracker for CountingTracker {
        fn record(&mut self, action: &Action) {
            self.recorded.lock().unwrap().push(action.kind().to_string());
        }

        fn evaluate(&self, history: &[Action]) -> Value {
            json!({ "actions": history.len() })
        }
    }

    #[derive(Clone, Default)]
    struct RecordingImprover {
        summaries: Arc<Mutex<Vec<Value>>>,
    }

    impl ImprovementStrategy for RecordingImprover {
        fn apply(&mut self, summary: &Value) {
            self.summaries.lock().unwrap().push(summary.clone());
        }
    }

    fn base_agent() -> PlanExecutor {
        PlanExecutor::new(Box::new(EchoPlanner))
    }

    #[test]
    fn decisions_are_recorded_and_returned_unchanged() {
        let tracker = CountingTracker::default();
        let recorded = tracker.recorded.clone();
        let mut agent = TrackingOverlay::new(base_agent()).with_tracker(Box::new(tracker));
        agent.perceive(Observation::text("hello"));

        let decision = agent.decide_next_action();

        assert_eq!(decision.action, Action::respond("Received input: hello"));
        assert_eq!(recorded.lock().unwrap().as_slice(), &["respond"]);
        assert_eq!(agent.history().len(), 1);
    }

    #[test]
    fn evaluation_scores_history_and_feeds_the_improver() {
        let improver = RecordingImprover::default();
        let summaries = improver.summaries.clone();
        let mut agent = TrackingOverlay::new(base_agent())
            .with_tracker(Box::new(CountingTracker::default()))
            .with_improver(Box::new(improver));

        agent.perceive(Observation::text("one"));
        agent.decide_next_action();
        agent.decide_next_action();

        let summary = agent.evaluate_performance();

        assert_eq!(summary, json!({ "actions": 2 }));
        assert_eq!(summaries.lock().unwrap().as_slice(), &[json!({ "actions": 2 })]);
    }

    #[test]
    fn evaluation_without_a_tracker_is_null() {
        let mut agent = TrackingOverlay::new(base_agent());
        agent.perceive(Observation::text("one"));
        agent.decide_next_action();

        assert_eq!(agent.evaluate_performance(), Value::Null);
        // History is still kept without collaborators.
        assert_eq!(agent.history().len(), 1);
    }
}
