//! # Overlay Module
//!
//! Capability overlays add one cross-cutting behavior each (feedback
//! adaptation, context recall, modality processing, privacy scrubbing,
//! decision explanations, performance tracking, ethics filtering) by
//! wrapping either an [`Agent`](crate::agent::Agent) or a
//! [`Planner`](crate::agent::Planner) without changing its contract.
//! Composition is explicit nesting at construction time, so the order in
//! which behaviors run is visible where the stack is built.
//!
//! ## Core Components
//!
//! - **[AdaptiveOverlay]**: Feeds interpreted user feedback to a tuner
//! - **[MultimodalOverlay]**: Runs modality processors on perceived payloads
//! - **[PrivacyOverlay] / [PrivacyPlanner]**: Anonymizes data before any
//!   processing or memory write (fail-open on anonymizer failure)
//! - **[ExplainOverlay]**: Attaches an explanation to every decision
//! - **[TrackingOverlay]**: Records decided actions for self-evaluation
//! - **[RecallPlanner]**: Prepends recent memory to planning input
//! - **[EthicalPlanner]**: Replaces guideline-violating responses
//!
//! ## Composition order
//!
//! On the agent side, wrap outside-in: privacy outermost so anonymization
//! runs before modality processing and before any memory write, then
//! multimodal, then explainability, then tracking, then the executor. On
//! the planner side: ethics outermost so the final plan is filtered, then
//! privacy to scrub the input before reasoning, then recall to prepend
//! context, then the engine or fallback stack.
//!
//! ```rust
//! use noema::agent::overlay::{ExplainOverlay, Explainer, PrivacyOverlay, Anonymizer};
//! use noema::agent::{EchoPlanner, PlanExecutor};
//! use noema::error::StrategyError;
//! use noema::plan::Action;
//! use serde_json::Value;
//! use std::sync::Arc;
//!
//! struct Redactor;
//!
//! impl Anonymizer for Redactor {
//!     fn anonymize(&self, value: Value) -> Result<Value, StrategyError> {
//!         Ok(value)
//!     }
//! }
//!
//! struct WhyNot;
//!
//! impl Explainer for WhyNot {
//!     fn explain(&self, action: &Action) -> Result<String, StrategyError> {
//!         Ok(format!("chose a {} step", action.kind()))
//!     }
//! }
//!
//! let executor = PlanExecutor::new(Box::new(EchoPlanner));
//! let agent = PrivacyOverlay::new(
//!     ExplainOverlay::new(executor, Box::new(WhyNot)),
//!     Arc::new(Redactor),
//! );
//! # let _ = agent;
//! ```

pub mod adaptive;
pub mod ethics;
pub mod explain;
pub mod multimodal;
pub mod privacy;
pub mod recall;
pub mod track;

pub use adaptive::{AdaptiveOverlay, FeedbackInterpreter, TuningStrategy};
pub use ethics::{BiasDetector, EthicalPlanner, GuidelineCheck};
pub use explain::{ExplainOverlay, Explainer};
pub use multimodal::{ModalityProcessor, MultimodalOverlay};
pub use privacy::{Anonymizer, PrivacyOverlay, PrivacyPlanner};
pub use recall::{Inference, RecallPlanner, hypothesis_support};
pub use track::{ImprovementStrategy, PerformanceTracker, TrackingOverlay};
