use serde_json::Value;
use tracing::{debug, warn};

use super::planner::{PlanContext, Planner};
use super::Agent;
use crate::memory::MemoryStore;
use crate::plan::{Action, Decision, Observation, Plan, PlanState};
use crate::tool::{ToolOutcome, ToolParams, ToolRegistry};

/// The plan-driven state machine at the heart of the cognition loop.
///
/// An executor owns exactly one plan at a time. `perceive` records the
/// latest observation; `decide_next_action` serves the plan's next step,
/// regenerating through the attached [`Planner`] whenever the plan is
/// exhausted or was never produced. Tools and memory are optional
/// attachments; their absence degrades the related operations to no-ops
/// instead of errors.
///
/// # Example
///
/// ```rust
/// use noema::agent::{Agent, EchoPlanner, PlanExecutor};
/// use noema::plan::{Action, Observation};
///
/// let mut agent = PlanExecutor::new(Box::new(EchoPlanner));
/// agent.perceive(Observation::text("status report"));
///
/// let decision = agent.decide_next_action();
/// assert_eq!(decision.action, Action::respond("Received input: status report"));
/// ```
pub struct PlanExecutor {
    planner: Box<dyn Planner>,
    tools: ToolRegistry,
    memory: Option<Box<dyn MemoryStore>>,
    plan: Plan,
    last_observation: Option<Observation>,
    eager_tools: bool,
}

impl PlanExecutor {
    /// Create an executor around a planning strategy, with no tools or
    /// memory attached
    pub fn new(planner: Box<dyn Planner>) -> Self {
        Self {
            planner,
            tools: ToolRegistry::new(),
            memory: None,
            plan: Plan::empty(),
            last_observation: None,
            eager_tools: false,
        }
    }

    /// Attach a tool registry
    pub fn with_tools(mut self, tools: ToolRegistry) -> Self {
        self.tools = tools;
        self
    }

    /// Attach a memory store
    pub fn with_memory(mut self, memory: Box<dyn MemoryStore>) -> Self {
        self.memory = Some(memory);
        self
    }

    /// Execute `ToolUse` steps as they are served, persisting each outcome
    /// under `tool_result_<tool_name>`. Off by default; the served action is
    /// returned unchanged either way.
    pub fn with_eager_tools(mut self) -> Self {
        self.eager_tools = true;
        self
    }

    /// Execution state of the current plan
    pub fn plan_state(&self) -> PlanState {
        self.plan.state()
    }

    /// The current plan, served steps included
    pub fn plan(&self) -> &Plan {
        &self.plan
    }

    /// The most recently perceived observation
    pub fn last_observation(&self) -> Option<&Observation> {
        self.last_observation.as_ref()
    }

    /// Invoke a registered tool directly.
    ///
    /// The outcome is not stored; callers that want persistence follow up
    /// with [`Agent::remember`]. Unknown names and tool failures come back
    /// as `Failure` outcomes, never panics.
    pub fn invoke_tool(&self, name: &str, params: &ToolParams) -> ToolOutcome {
        self.tools.invoke(name, params)
    }

    /// Throw away the current plan and regenerate from new context.
    ///
    /// The context replaces the last observation, so later regenerations
    /// plan from it too. If the strategy fails, the old plan stays in place.
    pub fn replan(&mut self, context: &str) {
        self.last_observation = Some(Observation::text(context));
        match self.run_planner(context.to_string()) {
            Ok(plan) => {
                debug!(steps = plan.len(), "Replanned from new context");
                self.plan = plan;
            }
            Err(err) => {
                warn!(error = %err, "Replanning failed, keeping current plan");
            }
        }
    }

    fn run_planner(&mut self, input: String) -> Result<Plan, crate::error::StrategyError> {
        let ctx = match &self.memory {
            Some(memory) => PlanContext::new(&input).with_memory(memory.as_ref()),
            None => PlanContext::new(&input),
        };
        self.planner.generate(ctx)
    }

    fn regenerate_plan(&mut self) {
        let input = self
            .last_observation
            .as_ref()
            .map(|obs| obs.text.clone())
            .unwrap_or_default();

        match self.run_planner(input) {
            Ok(plan) => {
                debug!(steps = plan.len(), "Generated fresh plan");
                self.plan = plan;
            }
            Err(err) => {
                // Plan state stays untouched; the caller serves the
                // clarification fallback instead.
                warn!(error = %err, "Plan generation failed");
            }
        }
    }

    fn run_eager_tool(&mut self, action: &Action) {
        if let Action::ToolUse {
            tool_name,
            parameters,
        } = action
        {
            let outcome = self.tools.invoke(tool_name, parameters);
            let key = format!("tool_result_{tool_name}");
            self.remember(&key, outcome.to_value());
        }
    }
}

impl Agent for PlanExecutor {
    fn perceive(&mut self, observation: Observation) {
        if let Some(memory) = self.memory.as_mut() {
            // Best effort: perception must survive a memory failure.
            if let Err(err) = memory.add(&observation) {
                warn!(error = %err, "Failed to record observation in memory");
            }
        }
        self.last_observation = Some(observation);
    }

    fn decide_next_action(&mut self) -> Decision {
        if matches!(self.plan.state(), PlanState::NoPlan | PlanState::Exhausted) {
            self.regenerate_plan();
        }

        match self.plan.next_action() {
            Some(action) => {
                debug!(kind = action.kind(), cursor = self.plan.cursor(), "Serving plan step");
                if self.eager_tools {
                    self.run_eager_tool(&action);
                }
                Decision::from(action)
            }
            None => {
                debug!("No plan available, serving clarification fallback");
                Decision::from(Action::clarification())
            }
        }
    }

    fn remember(&mut self, key: &str, value: Value) {
        if let Some(memory) = self.memory.as_mut() {
            if let Err(err) = memory.store(key, value) {
                warn!(key = %key, error = %err, "Failed to store memory entry");
            }
        }
    }

    fn recall(&self, key: &str) -> Option<Value> {
        let memory = self.memory.as_ref()?;
        match memory.retrieve(key) {
            Ok(value) => value,
            Err(err) => {
                warn!(key = %key, error = %err, "Failed to load memory entry");
                None
            }
        }
    }
}
