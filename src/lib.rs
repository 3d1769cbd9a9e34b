//! # Noema
//!
//! A cognition-loop runtime for autonomous agents.
//!
//! Agents perceive observations and decide actions by executing plans
//! produced by pluggable planning strategies. Capabilities such as
//! feedback-driven adaptation, memory recall, multimodal perception,
//! privacy scrubbing, explainability, performance tracking and ethics
//! filtering are overlays composed around a core executor, not subclasses
//! of it.
//!
//! ## Features
//!
//! - **Plan execution**: A state machine serving plan steps in order and
//!   regenerating through its strategy when the plan runs out
//! - **Pluggable planning**: Reasoning engines, fallbacks and decorators
//!   behind one [`Planner`] seam
//! - **Tools and memory**: Named external capabilities and a recency-aware
//!   key-value store, both failure-isolated from the loop
//! - **Overlays**: Wrap any [`Agent`] with extra capabilities while keeping
//!   its contract intact
//! - **Coordination**: Route sub-tasks to capable workers or fan one task
//!   out across a peer set with shared knowledge
//! - **Streaming**: Drive an agent from a queue on a background task under
//!   a soft latency budget
//!
//! ## Example
//!
//! ```rust
//! use noema::agent::{Agent, EchoPlanner, PlanExecutor};
//! use noema::memory::InMemoryStore;
//! use noema::plan::{Action, Observation};
//!
//! let mut agent = PlanExecutor::new(Box::new(EchoPlanner))
//!     .with_memory(Box::new(InMemoryStore::new()));
//!
//! agent.perceive(Observation::text("summarize the incident report"));
//!
//! let decision = agent.decide_next_action();
//! assert_eq!(
//!     decision.action,
//!     Action::respond("Received input: summarize the incident report"),
//! );
//! ```

pub mod agent;
pub mod coordination;
pub mod error;
pub mod memory;
pub mod plan;
pub mod runtime;
pub mod tool;

pub use agent::overlay::{
    AdaptiveOverlay, Anonymizer, BiasDetector, EthicalPlanner, ExplainOverlay, Explainer,
    FeedbackInterpreter, GuidelineCheck, ImprovementStrategy, Inference, ModalityProcessor,
    MultimodalOverlay, PerformanceTracker, PrivacyOverlay, PrivacyPlanner, RecallPlanner,
    TrackingOverlay, TuningStrategy,
};
pub use agent::{Agent, EchoPlanner, FallbackPlanner, PlanContext, PlanExecutor, Planner};
pub use coordination::{CoordinationHub, HubPlanner, Task, TaskDispatcher};
pub use error::{DispatchError, MemoryError, StrategyError, StreamError};
pub use memory::{DurableStore, InMemoryStore, MemoryStore, TieredMemory};
pub use plan::{Action, Decision, Observation, PeerOutcome, Plan, PlanState};
pub use runtime::{StreamConfig, StreamOutcome, StreamProcessor};
pub use tool::{Tool, ToolOutcome, ToolParams, ToolRegistry};
