use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::agent::planner::{PlanContext, Planner};
use crate::error::StrategyError;
use crate::plan::Plan;

/// Planner decorator that prepends recent memory to the planning input.
///
/// When the context carries a memory view, the last `window` stored values
/// are rendered one per line and stitched in front of the input as
/// `"<lines>\nInput: <input>"`, so the wrapped strategy plans with context.
/// Without memory, with an empty window, or when the read fails, the input
/// is delegated unchanged.
pub struct RecallPlanner {
    inner: Box<dyn Planner>,
    window: usize,
}

impl RecallPlanner {
    /// Default number of memory entries recalled per planning turn.
    pub const DEFAULT_WINDOW: usize = 10;

    /// Wrap a planner with the default recall window
    pub fn new(inner: Box<dyn Planner>) -> Self {
        Self {
            inner,
            window: Self::DEFAULT_WINDOW,
        }
    }

    /// Set how many recent entries are recalled
    pub fn with_window(mut self, window: usize) -> Self {
        self.window = window;
        self
    }

    fn recall_context(&self, ctx: &PlanContext<'_>) -> Option<String> {
        let memory = ctx.memory?;
        match memory.recent(self.window) {
            Ok(values) if values.is_empty() => None,
            Ok(values) => {
                let lines: Vec<String> = values.iter().map(render_line).collect();
                Some(lines.join("\n"))
            }
            Err(err) => {
                warn!(error = %err, "Memory recall failed, planning without context");
                None
            }
        }
    }
}

fn render_line(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl Planner for RecallPlanner {
    fn generate(&mut self, ctx: PlanContext<'_>) -> Result<Plan, StrategyError> {
        match self.recall_context(&ctx) {
            Some(context) => {
                debug!(window = self.window, "Planning with recalled context");
                let augmented = format!("{context}\nInput: {}", ctx.input);
                self.inner.generate(ctx.with_input(&augmented))
            }
            None => self.inner.generate(ctx),
        }
    }
}

/// Outcome of checking a hypothesis against a set of remembered facts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Inference {
    /// Fraction of facts supporting the hypothesis, in `[0, 1]`
    pub confidence: f64,
    /// Human-readable account of the supporting counts
    pub explanation: String,
}

/// Score how strongly a set of facts supports a hypothesis.
///
/// A fact counts as supporting when its text contains the hypothesis,
/// case-insensitively. Confidence is the supporting fraction; an empty
/// fact set scores zero.
pub fn hypothesis_support(facts: &[Value], hypothesis: &str) -> Inference {
    let needle = hypothesis.to_lowercase();
    let matches = facts
        .iter()
        .filter(|fact| render_line(fact).to_lowercase().contains(&needle))
        .count();
    let confidence = matches as f64 / facts.len().max(1) as f64;

    Inference {
        confidence,
        explanation: format!("Supported by {matches} out of {} facts.", facts.len()),
    }
}
