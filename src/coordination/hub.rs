use std::collections::HashMap;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::{Arc, Mutex, PoisonError};

use serde_json::Value;
use tracing::{debug, warn};

use super::Task;
use crate::agent::Agent;
use crate::agent::planner::{PlanContext, Planner};
use crate::error::StrategyError;
use crate::plan::{Action, Observation, PeerOutcome, Plan};

struct Peer {
    name: String,
    agent: Mutex<Box<dyn Agent + Send>>,
}

impl Peer {
    // A panic inside the turn is contained here; it poisons this peer's
    // lock as the guard unwinds, so later sweeps keep reporting the peer
    // as unavailable without ever reaching it again.
    fn turn(&self, task: &Task) -> PeerOutcome {
        let outcome = catch_unwind(AssertUnwindSafe(|| {
            let Ok(mut agent) = self.agent.lock() else {
                warn!(peer = %self.name, "Peer lock poisoned, recording failure");
                return PeerOutcome::failed(self.unavailable());
            };
            agent.perceive(Observation::text(task.content.clone()));
            PeerOutcome::completed(agent.decide_next_action())
        }));

        outcome.unwrap_or_else(|_| {
            warn!(peer = %self.name, "Peer panicked mid-turn, recording failure");
            PeerOutcome::failed(self.unavailable())
        })
    }

    fn unavailable(&self) -> String {
        format!("peer '{}' unavailable", self.name)
    }
}

/// A static peer set with a shared knowledge map.
///
/// Peers are registered once and kept in registration order. The knowledge
/// map is a plain key-value store behind a single mutually exclusive lock;
/// `broadcast` overwrites, last write wins, and no callbacks run under the
/// lock. Each peer sits behind its own lock and its turn is run with the
/// panic contained, so one peer crashing leaves every other peer usable
/// and never aborts a sweep.
///
/// The hub is shared as `Arc<CoordinationHub>`; [`HubPlanner`] turns that
/// shared handle into a planning strategy.
#[derive(Default)]
pub struct CoordinationHub {
    peers: Vec<Peer>,
    knowledge: Mutex<HashMap<String, Value>>,
}

impl CoordinationHub {
    /// Create a hub with no peers and empty knowledge
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a named peer, consuming and returning the hub for chained
    /// construction
    pub fn with_peer(mut self, name: impl Into<String>, agent: Box<dyn Agent + Send>) -> Self {
        self.register_peer(name, agent);
        self
    }

    /// Register a named peer
    pub fn register_peer(&mut self, name: impl Into<String>, agent: Box<dyn Agent + Send>) {
        self.peers.push(Peer {
            name: name.into(),
            agent: Mutex::new(agent),
        });
    }

    /// Number of registered peers
    pub fn peer_count(&self) -> usize {
        self.peers.len()
    }

    /// Peer names, in registration order
    pub fn peer_names(&self) -> Vec<&str> {
        self.peers.iter().map(|p| p.name.as_str()).collect()
    }

    /// Publish a value into the shared knowledge map. Overwrites any
    /// earlier value under the key.
    pub fn broadcast(&self, key: impl Into<String>, value: Value) {
        let key = key.into();
        debug!(key = %key, "Broadcasting knowledge");
        self.knowledge_lock().insert(key, value);
    }

    /// Read a value from the shared knowledge map
    pub fn receive(&self, key: &str) -> Option<Value> {
        self.knowledge_lock().get(key).cloned()
    }

    /// Clone out the whole knowledge map, for diagnostics
    pub fn knowledge_snapshot(&self) -> HashMap<String, Value> {
        self.knowledge_lock().clone()
    }

    /// Run one task across every peer, in registration order.
    ///
    /// Each peer perceives the task content and decides; its decision comes
    /// back as `Completed`. A peer that panics mid-turn, or whose lock an
    /// earlier panic left poisoned, yields `Failed` and collection
    /// continues. Exactly one outcome per peer.
    pub fn coordinate(&self, task: &Task) -> Vec<PeerOutcome> {
        debug!(
            peer_count = self.peers.len(),
            task_type = %task.task_type,
            "Coordinating task across peers"
        );

        self.peers.iter().map(|peer| peer.turn(task)).collect()
    }

    // The map holds plain data, so a panic mid-insert cannot leave it
    // half-updated; recover the guard instead of propagating the poison.
    fn knowledge_lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Value>> {
        self.knowledge
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// Planning strategy that fans the input out across hub peers.
///
/// Every planning turn wraps the input as a `collaborative_task` and maps
/// the peers' outcomes to `collaboration_result` steps, one per peer in
/// registration order. It never fails; unavailable peers are embedded as
/// failed outcomes.
pub struct HubPlanner {
    hub: Arc<CoordinationHub>,
}

impl HubPlanner {
    /// Plan through the given hub
    pub fn new(hub: Arc<CoordinationHub>) -> Self {
        Self { hub }
    }
}

impl Planner for HubPlanner {
    fn generate(&mut self, ctx: PlanContext<'_>) -> Result<Plan, StrategyError> {
        let task = Task::new("collaborative_task", ctx.input);
        let steps = self
            .hub
            .coordinate(&task)
            .into_iter()
            .map(|outcome| Action::CollaborationResult { outcome })
            .collect();
        Ok(Plan::new(steps))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::PlanExecutor;
    use crate::plan::Decision;
    use serde_json::json;

    struct TaggedPeer {
        tag: &'static str,
        last: Option<String>,
    }

    impl TaggedPeer {
        fn new(tag: &'static str) -> Self {
            Self { tag, last: None }
        }
    }

    impl Agent for TaggedPeer {
        fn perceive(&mut self, observation: Observation) {
            self.last = Some(observation.text);
        }

        fn decide_next_action(&mut self) -> Decision {
            let content = self.last.as_deref().unwrap_or_default();
            Decision::from(Action::respond(format!("{}: {content}", self.tag)))
        }
    }

    struct PanickyPeer;

    impl Agent for PanickyPeer {
        fn perceive(&mut self, _observation: Observation) {}

        fn decide_next_action(&mut self) -> Decision {
            panic!("peer crashed mid-turn");
        }
    }

    fn completed_content(outcome: &PeerOutcome) -> &str {
        outcome
            .decision()
            .and_then(|d| d.action.response_content())
            .unwrap()
    }

    #[test]
    fn broadcast_then_receive_round_trips() {
        let hub = CoordinationHub::new();

        hub.broadcast("weather", json!("sunny"));
        assert_eq!(hub.receive("weather"), Some(json!("sunny")));
        assert_eq!(hub.receive("traffic"), None);
    }

    #[test]
    fn broadcast_overwrites_with_the_last_value() {
        let hub = CoordinationHub::new();

        hub.broadcast("status", json!("starting"));
        hub.broadcast("status", json!("ready"));

        assert_eq!(hub.receive("status"), Some(json!("ready")));
    }

    #[test]
    fn snapshot_clones_the_whole_map() {
        let hub = CoordinationHub::new();
        hub.broadcast("a", json!(1));
        hub.broadcast("b", json!(2));

        let snapshot = hub.knowledge_snapshot();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot["a"], json!(1));

        // Later writes do not retroactively change the clone.
        hub.broadcast("a", json!(99));
        assert_eq!(snapshot["a"], json!(1));
    }

    #[test]
    fn peer_names_keep_registration_order() {
        let hub = CoordinationHub::new()
            .with_peer("alpha", Box::new(TaggedPeer::new("alpha")))
            .with_peer("beta", Box::new(TaggedPeer::new("beta")));

        assert_eq!(hub.peer_count(), 2);
        assert_eq!(hub.peer_names(), vec!["alpha", "beta"]);
    }

    #[test]
    fn coordinate_collects_one_outcome_per_peer_in_order() {
        let hub = CoordinationHub::new()
            .with_peer("alpha", Box::new(TaggedPeer::new("alpha")))
            .with_peer("beta", Box::new(TaggedPeer::new("beta")))
            .with_peer("gamma", Box::new(TaggedPeer::new("gamma")));

        let outcomes = hub.coordinate(&Task::new("collaborative_task", "plan the sprint"));

        assert_eq!(outcomes.len(), 3);
        assert_eq!(completed_content(&outcomes[0]), "alpha: plan the sprint");
        assert_eq!(completed_content(&outcomes[1]), "beta: plan the sprint");
        assert_eq!(completed_content(&outcomes[2]), "gamma: plan the sprint");
    }

    #[test]
    fn a_panicking_peer_fails_alone_and_others_still_answer() {
        let hub = CoordinationHub::new()
            .with_peer("steady", Box::new(TaggedPeer::new("steady")))
            .with_peer("flaky", Box::new(PanickyPeer))
            .with_peer("tail", Box::new(TaggedPeer::new("tail")));

        // The flaky peer panics during this very sweep; the sweep itself
        // must still return one outcome per peer, in order.
        let outcomes = hub.coordinate(&Task::new("collaborative_task", "round one"));

        assert_eq!(outcomes.len(), 3);
        assert_eq!(completed_content(&outcomes[0]), "steady: round one");
        assert_eq!(outcomes[1], PeerOutcome::failed("peer 'flaky' unavailable"));
        assert_eq!(completed_content(&outcomes[2]), "tail: round one");
    }

    #[test]
    fn a_peer_stays_failed_once_its_lock_is_poisoned() {
        let hub = CoordinationHub::new()
            .with_peer("steady", Box::new(TaggedPeer::new("steady")))
            .with_peer("flaky", Box::new(PanickyPeer));

        // The first sweep panics inside the flaky peer and poisons its lock.
        hub.coordinate(&Task::new("collaborative_task", "round one"));

        let outcomes = hub.coordinate(&Task::new("collaborative_task", "round two"));

        assert_eq!(outcomes.len(), 2);
        assert!(outcomes[0].is_completed());
        assert_eq!(outcomes[1], PeerOutcome::failed("peer 'flaky' unavailable"));
    }

    #[test]
    fn hub_planner_plans_collaboration_results_in_peer_order() {
        let hub = Arc::new(
            CoordinationHub::new()
                .with_peer("left", Box::new(TaggedPeer::new("left")))
                .with_peer("right", Box::new(TaggedPeer::new("right"))),
        );
        let mut planner = HubPlanner::new(Arc::clone(&hub));

        let plan = planner.generate(PlanContext::new("share notes")).unwrap();

        assert_eq!(plan.len(), 2);
        let contents: Vec<&str> = plan
            .steps()
            .iter()
            .map(|step| match step {
                Action::CollaborationResult { outcome } => completed_content(outcome),
                other => panic!("expected collaboration_result, got {other:?}"),
            })
            .collect();
        assert_eq!(contents, vec!["left: share notes", "right: share notes"]);
    }

    #[test]
    fn an_executor_over_a_hub_planner_is_a_collaborative_agent() {
        let hub = Arc::new(
            CoordinationHub::new().with_peer("solo", Box::new(TaggedPeer::new("solo"))),
        );
        let mut agent = PlanExecutor::new(Box::new(HubPlanner::new(hub)));

        agent.perceive(Observation::text("sync up"));

        let decision = agent.decide_next_action();
        match decision.action {
            Action::CollaborationResult { outcome } => {
                assert_eq!(completed_content(&outcome), "solo: sync up");
            }
            other => panic!("expected collaboration_result, got {other:?}"),
        }
    }
}
