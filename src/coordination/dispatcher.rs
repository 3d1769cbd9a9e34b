use tracing::{debug, warn};

use super::Task;
use crate::agent::Agent;
use crate::agent::planner::{PlanContext, Planner};
use crate::error::{DispatchError, StrategyError};
use crate::plan::{Action, Decision, Observation, PeerOutcome, Plan};

struct Worker {
    task_type: String,
    agent: Box<dyn Agent + Send>,
}

/// Routes tasks to worker agents by task type.
///
/// Workers keep their registration order. Selection matches the registered
/// type exactly first; failing that, it scans the workers for the first
/// one whose [`Agent::supports_task_type`] volunteers for the type. First
/// match wins either way; there is no priority weighting.
///
/// The dispatcher also implements [`Planner`]: planning input is split
/// into sentences, each sentence delegated as an `analyze` task, and the
/// answers assembled into a plan of `delegated_result` steps in sentence
/// order. That makes a [`PlanExecutor`](crate::agent::PlanExecutor) over a
/// dispatcher a coordinator agent.
#[derive(Default)]
pub struct TaskDispatcher {
    workers: Vec<Worker>,
}

impl TaskDispatcher {
    /// Create a dispatcher with no workers
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a worker under a task type, consuming and returning the
    /// dispatcher for chained construction
    pub fn with_worker(
        mut self,
        task_type: impl Into<String>,
        agent: Box<dyn Agent + Send>,
    ) -> Self {
        self.register(task_type, agent);
        self
    }

    /// Register a worker under a task type
    pub fn register(&mut self, task_type: impl Into<String>, agent: Box<dyn Agent + Send>) {
        self.workers.push(Worker {
            task_type: task_type.into(),
            agent,
        });
    }

    /// Number of registered workers
    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    /// Registered task types, in registration order
    pub fn task_types(&self) -> Vec<&str> {
        self.workers.iter().map(|w| w.task_type.as_str()).collect()
    }

    /// Pick the worker for a task type: exact registration match first,
    /// then the first worker that volunteers for the type. `None` when no
    /// worker qualifies.
    pub fn select(&mut self, task_type: &str) -> Option<&mut (dyn Agent + Send)> {
        let index = self
            .workers
            .iter()
            .position(|worker| worker.task_type == task_type)
            .or_else(|| {
                self.workers
                    .iter()
                    .position(|worker| worker.agent.supports_task_type(task_type))
            })?;

        Some(self.workers[index].agent.as_mut())
    }

    /// Route one task to a worker and run its turn.
    ///
    /// The task content goes through the worker's `perceive` and the
    /// worker's next decision comes back. With no matching worker the
    /// explicit routing error is returned and no agent's plan state is
    /// touched.
    pub fn delegate(&mut self, task: &Task) -> Result<Decision, DispatchError> {
        debug!(task_type = %task.task_type, "Delegating task");

        let Some(worker) = self.select(&task.task_type) else {
            warn!(task_type = %task.task_type, "No suitable agent for task");
            return Err(DispatchError::NoSuitableAgent {
                task_type: task.task_type.clone(),
            });
        };

        worker.perceive(Observation::text(task.content.clone()));
        Ok(worker.decide_next_action())
    }
}

impl Planner for TaskDispatcher {
    fn generate(&mut self, ctx: PlanContext<'_>) -> Result<Plan, StrategyError> {
        let sentences: Vec<&str> = ctx
            .input
            .split('.')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();

        let steps = sentences
            .into_iter()
            .map(|sentence| {
                let outcome = match self.delegate(&Task::new("analyze", sentence)) {
                    Ok(decision) => PeerOutcome::completed(decision),
                    Err(err) => PeerOutcome::failed(err.to_string()),
                };
                Action::DelegatedResult { outcome }
            })
            .collect();

        Ok(Plan::new(steps))
    }
}
