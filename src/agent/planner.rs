use tracing::warn;

use crate::error::StrategyError;
use crate::memory::MemoryStore;
use crate::plan::{Action, Plan};
use crate::tool::ToolParams;

/// What one planning turn gets to see: the planning input plus a read-only
/// view of the agent's memory for strategies that recall context.
#[derive(Clone, Copy)]
pub struct PlanContext<'a> {
    /// Text the plan should be produced for, usually the latest observation
    pub input: &'a str,
    /// Read-only view of the executor's memory, when one is attached
    pub memory: Option<&'a dyn MemoryStore>,
}

impl<'a> PlanContext<'a> {
    /// Context over bare input with no memory view
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            memory: None,
        }
    }

    /// Attach a memory view
    pub fn with_memory(mut self, memory: &'a dyn MemoryStore) -> Self {
        self.memory = Some(memory);
        self
    }

    /// The same context with the input swapped out, for decorators that
    /// rewrite the input but forward the memory view.
    pub fn with_input<'b>(&self, input: &'b str) -> PlanContext<'b>
    where
        'a: 'b,
    {
        PlanContext {
            input,
            memory: self.memory,
        }
    }
}

/// A pluggable planning strategy: turns planning input into a [`Plan`].
///
/// Injected reasoning engines, plan generators and the decorators that
/// augment them all live behind this seam. A strategy reports failure
/// through `Err`; whoever invokes it decides how to degrade (the executor
/// serves a clarification action, [`FallbackPlanner`] serves its fallback
/// plan).
pub trait Planner: Send {
    /// Produce a plan for the given context
    fn generate(&mut self, ctx: PlanContext<'_>) -> Result<Plan, StrategyError>;
}

/// Base planning behavior: echo the input back as a single respond step.
///
/// Useful as the innermost strategy under decorators and as the default in
/// tests; it never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct EchoPlanner;

impl Planner for EchoPlanner {
    fn generate(&mut self, ctx: PlanContext<'_>) -> Result<Plan, StrategyError> {
        Ok(Plan::single(Action::respond(format!(
            "Received input: {}",
            ctx.input
        ))))
    }
}

/// Guards a planning strategy with a fallback plan.
///
/// When the primary strategy fails, the failure is logged and the fallback
/// plan is built from the same input, so a strategy failure never crosses
/// this boundary. The fallback builder itself is expected to be infallible.
pub struct FallbackPlanner {
    primary: Box<dyn Planner>,
    fallback: Box<dyn Fn(&str) -> Plan + Send>,
}

impl FallbackPlanner {
    /// Guard `primary` with the given fallback plan builder
    pub fn new(
        primary: Box<dyn Planner>,
        fallback: impl Fn(&str) -> Plan + Send + 'static,
    ) -> Self {
        Self {
            primary,
            fallback: Box::new(fallback),
        }
    }

    /// Guard `primary` with the canned three-step research fallback:
    /// analyze the input, query the `search_engine` tool, respond.
    pub fn searching(primary: Box<dyn Planner>) -> Self {
        Self::new(primary, |input| {
            let mut params = ToolParams::new();
            params.insert("query".into(), input.into());
            Plan::new(vec![
                Action::analyze(input),
                Action::tool_use("search_engine", params),
                Action::respond("Here is the information I found."),
            ])
        })
    }
}

impl Planner for FallbackPlanner {
    fn generate(&mut self, ctx: PlanContext<'_>) -> Result<Plan, StrategyError> {
        match self.primary.generate(ctx) {
            Ok(plan) => Ok(plan),
            Err(err) => {
                warn!(error = %err, "Planning strategy failed, serving fallback plan");
                Ok((self.fallback)(ctx.input))
            }
        }
    }
}
