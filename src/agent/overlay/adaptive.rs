use serde_json::Value;
use tracing::{debug, warn};

use crate::agent::Agent;
use crate::error::StrategyError;
use crate::plan::{Decision, Observation};

/// Turns raw feedback text into structured adaptation data.
pub trait FeedbackInterpreter: Send {
    /// Interpret one piece of feedback
    fn interpret(&mut self, feedback: &str) -> Result<Value, StrategyError>;
}

/// Applies interpreted feedback to whatever the agent tunes.
pub trait TuningStrategy: Send {
    /// Apply one batch of adaptation data
    fn apply(&mut self, data: &Value) -> Result<(), StrategyError>;
}

/// Overlay that adapts the wrapped agent from user feedback.
///
/// Feedback flows interpreter → tuner. Both collaborators are optional:
/// without them [`AdaptiveOverlay::receive_feedback`] is a no-op. An
/// interpreter failure skips the adaptation; a tuner failure is the one
/// collaborator failure that surfaces to the caller, since a half-applied
/// tune is something the caller may need to react to.
pub struct AdaptiveOverlay<A: Agent> {
    inner: A,
    interpreter: Option<Box<dyn FeedbackInterpreter>>,
    tuner: Option<Box<dyn TuningStrategy>>,
}

impl<A: Agent> AdaptiveOverlay<A> {
    /// Wrap an agent with no collaborators attached
    pub fn new(inner: A) -> Self {
        Self {
            inner,
            interpreter: None,
            tuner: None,
        }
    }

    /// Attach a feedback interpreter
    pub fn with_interpreter(mut self, interpreter: Box<dyn FeedbackInterpreter>) -> Self {
        self.interpreter = Some(interpreter);
        self
    }

    /// Attach a tuning strategy
    pub fn with_tuner(mut self, tuner: Box<dyn TuningStrategy>) -> Self {
        self.tuner = Some(tuner);
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

    /// Accept feedback and adapt.
    ///
    /// Interprets the feedback and, when the interpretation carries any
    /// content, forwards it to the tuner. Missing collaborators and
    /// interpreter failures end the turn quietly; only a tuner failure
    /// comes back as `Err`.
    pub fn receive_feedback(&mut self, feedback: &str) -> Result<(), StrategyError> {
        let Some(interpreter) = self.interpreter.as_mut() else {
            debug!("No feedback interpreter attached, feedback dropped");
            return Ok(());
        };

        let interpreted = match interpreter.interpret(feedback) {
            Ok(data) => data,
            Err(err) => {
                warn!(error = %err, "Feedback interpretation failed, skipping adaptation");
                return Ok(());
            }
        };

        if is_empty_interpretation(&interpreted) {
            debug!("Interpreted feedback is empty, nothing to adapt");
            return Ok(());
        }

        match self.tuner.as_mut() {
            Some(tuner) => tuner.apply(&interpreted),
            None => {
                debug!("No tuning strategy attached, adaptation dropped");
                Ok(())
            }
        }
    }
}

fn is_empty_interpretation(data: &Value) -> bool {
    match data {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

impl<A: Agent> Agent for AdaptiveOverlay<A> {
    fn perceive(&mut self, observation: Observation) {
        self.inner.perceive(observation);
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::{EchoPlanner, PlanExecutor};
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    struct KeywordInterpreter;

    impl FeedbackInterpreter for KeywordInterpreter {
        fn interpret(&mut self, feedback: &str) -> Result<Value, StrategyError> {
            if feedback.contains("helpful") {
                Ok(json!({ "signal": "positive" }))
            } else {
                Ok(Value::Null)
            }
        }
    }

    struct BrokenInterpreter;

    impl FeedbackInterpreter for BrokenInterpreter {
        fn interpret(&mut self, _feedback: &str) -> Result<Value, StrategyError> {
            Err(StrategyError::failed("interpreter offline"))
        }
    }

    #[derive(Clone, Default)]
    struct RecordingTuner {
        applied: Arc<Mutex<Vec<Value>>>,
    }

    impl TuningStrategy for RecordingTuner {
        fn apply(&mut self, data: &Value) -> Result<(), StrategyError> {
            self.applied.lock().unwrap().push(data.clone());
            Ok(())
        }
    }

    struct BrokenTuner;

    impl TuningStrategy for BrokenTuner {
        fn apply(&mut self, _data: &Value) -> Result<(), StrategyError> {
            Err(StrategyError::failed("weights locked"))
        }
    }

    fn base_agent() -> PlanExecutor {
        PlanExecutor::new(Box::new(EchoPlanner))
    }

    #[test]
    fn feedback_flows_interpreter_to_tuner() {
        let tuner = RecordingTuner::default();
        let applied = tuner.applied.clone();
        let mut agent = AdaptiveOverlay::new(base_agent())
            .with_interpreter(Box::new(KeywordInterpreter))
            .with_tuner(Box::new(tuner));

        agent.receive_feedback("that was helpful").unwrap();

        assert_eq!(
            applied.lock().unwrap().as_slice(),
            &[json!({ "signal": "positive" })]
        );
    }

    #[test]
    fn empty_interpretation_skips_the_tuner() {
        let tuner = RecordingTuner::default();
        let applied = tuner.applied.clone();
        let mut agent = AdaptiveOverlay::new(base_agent())
            .with_interpreter(Box::new(KeywordInterpreter))
            .with_tuner(Box::new(tuner));

        agent.receive_feedback("meh").unwrap();

        assert!(applied.lock().unwrap().is_empty());
    }

    #[test]
    fn interpreter_failure_is_swallowed() {
        let tuner = RecordingTuner::default();
        let applied = tuner.applied.clone();
        let mut agent = AdaptiveOverlay::new(base_agent())
            .with_interpreter(Box::new(BrokenInterpreter))
            .with_tuner(Box::new(tuner));

        assert!(agent.receive_feedback("anything").is_ok());
        assert!(applied.lock().unwrap().is_empty());
    }

    #[test]
    fn tuner_failure_surfaces_to_the_caller() {
        let mut agent = AdaptiveOverlay::new(base_agent())
            .with_interpreter(Box::new(KeywordInterpreter))
            .with_tuner(Box::new(BrokenTuner));

        let err = agent.receive_feedback("very helpful").unwrap_err();
        assert_eq!(err, StrategyError::failed("weights locked"));
    }

    #[test]
    fn missing_collaborators_are_noops() {
        let mut bare = AdaptiveOverlay::new(base_agent());
        assert!(bare.receive_feedback("ignored").is_ok());

        let mut no_tuner =
            AdaptiveOverlay::new(base_agent()).with_interpreter(Box::new(KeywordInterpreter));
        assert!(no_tuner.receive_feedback("helpful").is_ok());
    }

    #[test]
    fn agent_surface_passes_through() {
        let mut agent = AdaptiveOverlay::new(base_agent());

        agent.perceive(Observation::text("ping"));
        assert_eq!(
            agent.decide_next_action().action,
            crate::plan::Action::respond("Received input: ping")
        );
    }
}
