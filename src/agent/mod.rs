//! # Agent Module
//!
//! The uniform call surface of a cognition-loop agent and the pieces that
//! implement it: the [`Planner`] strategy seam, the [`PlanExecutor`] state
//! machine driving perceive/decide turns, and the capability overlays that
//! wrap an agent without changing its contract.
//!
//! ## Core Components
//!
//! - **[Agent]**: Trait every agent exposes (perceive, decide, remember,
//!   recall, capability queries)
//! - **[Planner]**: Pluggable planning strategy turning input into a [`Plan`](crate::plan::Plan)
//! - **[PlanExecutor]**: Plan-driven state machine implementing [`Agent`]
//! - **[overlay]**: Decorators adding feedback, recall, multimodality,
//!   privacy, explanations, tracking and ethics filtering

pub mod executor;
pub mod overlay;
pub mod planner;

pub use executor::PlanExecutor;
pub use planner::{EchoPlanner, FallbackPlanner, PlanContext, Planner};

use serde_json::Value;

use crate::plan::{Decision, Observation};

/// The call surface every cognition-loop agent exposes.
///
/// `perceive` and `decide_next_action` are the loop itself; the remaining
/// methods are optional capabilities with conservative defaults, so
/// wrappers and dispatchers can query any agent uniformly. Dispatch
/// decisions ask the trait (`supports_task_type`), never reflection.
pub trait Agent {
    /// Take in one observation. Implementations record it as the next
    /// planning input and, when memory is attached, persist it best-effort.
    fn perceive(&mut self, observation: Observation);

    /// Produce the next decision. Never fails: internal collaborator
    /// failures degrade to fallbacks rather than propagate.
    fn decide_next_action(&mut self) -> Decision;

    /// Store a keyed value in agent memory. Without a memory attachment
    /// this is a silent no-op.
    fn remember(&mut self, _key: &str, _value: Value) {}

    /// Fetch a keyed value from agent memory. Without a memory attachment
    /// this answers `None`.
    fn recall(&self, _key: &str) -> Option<Value> {
        None
    }

    /// Whether this agent volunteers to handle tasks of the given type.
    /// Used by dispatchers scanning for a capable worker.
    fn supports_task_type(&self, _task_type: &str) -> bool {
        false
    }
}
