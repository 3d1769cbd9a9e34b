//! # Coordination Module
//!
//! Multi-agent flows: routing one sub-task to a capable worker and fanning
//! one task out across a static peer set with a shared knowledge map. Both
//! components double as [`Planner`](crate::agent::Planner)s, so a
//! [`PlanExecutor`](crate::agent::PlanExecutor) driven by one becomes a
//! coordinator-style agent without a separate agent type.
//!
//! ## Core Components
//!
//! - **[Task]**: Stateless dispatch envelope (`type` + `content`)
//! - **[TaskDispatcher]**: Registration-ordered task → worker routing
//! - **[CoordinationHub]**: Peer fan-out plus a lock-guarded knowledge map
//! - **[HubPlanner]**: Plans by coordinating a task across hub peers

pub mod dispatcher;
pub mod hub;

pub use dispatcher::TaskDispatcher;
pub use hub::{CoordinationHub, HubPlanner};

use serde::{Deserialize, Serialize};

/// One sub-task on its way from a coordinator to a worker agent.
///
/// Pure envelope: it carries a routing type and the content the worker
/// will perceive, holds no state and is never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Routing key the dispatcher matches workers against
    #[serde(rename = "type")]
    pub task_type: String,
    /// What the selected worker gets to perceive
    pub content: String,
}

impl Task {
    /// Create a task envelope
    pub fn new(task_type: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            task_type: task_type.into(),
            content: content.into(),
        }
    }
}
