use tracing::warn;

use crate::agent::planner::{PlanContext, Planner};
use crate::error::StrategyError;
use crate::plan::{Action, Plan};

/// Judges whether a piece of outward-facing text is permitted.
pub trait GuidelineCheck: Send {
    /// Whether the text stays within guidelines
    fn permits(&self, text: &str) -> bool;
}

/// Flags text carrying bias the agent must not emit.
pub trait BiasDetector: Send {
    /// Whether the text reads as biased
    fn is_biased(&self, text: &str) -> bool;
}

/// Planner decorator that filters outward-facing plan steps.
///
/// Placed outermost on the planner side so it sees the final plan: every
/// `Respond` step whose content fails validation is replaced with a
/// refusal, other step kinds pass through untouched. Validation requires
/// both checks to pass: permitted by guidelines and free of detected
/// bias.
pub struct EthicalPlanner {
    inner: Box<dyn Planner>,
    guidelines: Box<dyn GuidelineCheck>,
    bias: Box<dyn BiasDetector>,
}

impl EthicalPlanner {
    /// Text served in place of a response that failed validation.
    pub const REFUSAL: &'static str =
        "I cannot provide that response. Let me rephrase to stay within my guidelines.";

    /// Wrap a planner with a guideline check and a bias detector
    pub fn new(
        inner: Box<dyn Planner>,
        guidelines: Box<dyn GuidelineCheck>,
        bias: Box<dyn BiasDetector>,
    ) -> Self {
        Self {
            inner,
            guidelines,
            bias,
        }
    }

    /// Whether text may be emitted: within guidelines and unbiased
    pub fn validate_output(&self, text: &str) -> bool {
        self.guidelines.permits(text) && !self.bias.is_biased(text)
    }

    fn filter_step(&self, action: Action) -> Action {
        match action {
            Action::Respond { content } if !self.validate_output(&content) => {
                warn!(content = %content, "Response failed ethics validation, replaced with refusal");
                Action::respond(Self::REFUSAL)
            }
            other => other,
        }
    }
}

impl Planner for EthicalPlanner {
    fn generate(&mut self, ctx: PlanContext<'_>) -> Result<Plan, StrategyError> {
        let plan = self.inner.generate(ctx)?;
        let steps = plan
            .steps()
            .iter()
            .cloned()
            .map(|action| self.filter_step(action))
            .collect();
        Ok(Plan::new(steps))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::planner::EchoPlanner;

    struct NoProfanity;

    impl GuidelineCheck for NoProfanity {
        fn permits(&self, text: &str) -> bool {
            !text.contains("bad")
        }
    }

    struct KeywordBias;

    impl BiasDetector for KeywordBias {
        fn is_biased(&self, text: &str) -> bool {
            text.contains("bias")
        }
    }

    struct ScriptedPlanner(Vec<Action>);

    impl Planner for ScriptedPlanner {
        fn generate(&mut self, _ctx: PlanContext<'_>) -> Result<Plan, StrategyError> {
            Ok(Plan::new(self.0.clone()))
        }
    }

    fn ethical(inner: Box<dyn Planner>) -> EthicalPlanner {
        EthicalPlanner::new(inner, Box::new(NoProfanity), Box::new(KeywordBias))
    }

    #[test]
    fn validation_requires_both_checks() {
        let planner = ethical(Box::new(EchoPlanner));

        assert!(planner.validate_output("This is good"));
        assert!(!planner.validate_output("This is bad"));
        assert!(!planner.validate_output("This contains bias"));
    }

    #[test]
    fn failing_responses_become_refusals() {
        let steps = vec![
            Action::respond("a perfectly fine answer"),
            Action::respond("a bad answer"),
        ];
        let mut planner = ethical(Box::new(ScriptedPlanner(steps)));

        let plan = planner.generate(PlanContext::new("whatever")).unwrap();

        assert_eq!(plan.steps()[0], Action::respond("a perfectly fine answer"));
        assert_eq!(plan.steps()[1], Action::respond(EthicalPlanner::REFUSAL));
    }

    #[test]
    fn non_response_steps_pass_through() {
        let steps = vec![Action::analyze("a bad biased thing to study")];
        let mut planner = ethical(Box::new(ScriptedPlanner(steps.clone())));

        let plan = planner.generate(PlanContext::new("whatever")).unwrap();

        // Only outward-facing responses are filtered.
        assert_eq!(plan.steps(), steps.as_slice());
    }

    #[test]
    fn inner_planner_failure_propagates() {
        struct Refusing;
        impl Planner for Refusing {
            fn generate(&mut self, _ctx: PlanContext<'_>) -> Result<Plan, StrategyError> {
                Err(StrategyError::failed("offline"))
            }
        }

        let mut planner = ethical(Box::new(Refusing));
        assert!(planner.generate(PlanContext::new("x")).is_err());
    }
}
