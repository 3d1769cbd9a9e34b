use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::agent::Agent;
use crate::error::StreamError;
use crate::plan::{Decision, Observation};

/// Tuning knobs for the background stream consumer.
#[derive(Debug, Clone)]
pub struct StreamConfig {
    /// Soft per-item latency budget. Exceeding it logs a warning; the
    /// result is still delivered.
    pub max_latency: Duration,
}

impl StreamConfig {
    /// Set the per-item latency budget
    pub fn with_max_latency(mut self, max_latency: Duration) -> Self {
        self.max_latency = max_latency;
        self
    }
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            max_latency: Duration::from_millis(100),
        }
    }
}

struct StreamItem {
    id: Uuid,
    observation: Observation,
}

/// What the response callback sees for each processed item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamOutcome {
    /// Correlation id handed back by `enqueue`
    pub item_id: Uuid,
    /// The agent's decision for the item
    pub decision: Decision,
    /// Wall-clock duration of the perceive/decide turn
    pub elapsed: Duration,
    /// When the decision was produced
    pub decided_at: DateTime<Utc>,
}

/// Background consumer running an agent's cognition loop over a queue of
/// observations.
///
/// Items are enqueued without blocking and consumed in FIFO order by a
/// worker task, one perceive/decide turn per item. The worker starts once:
/// after it exits, whether through [`stop`](Self::stop) or queue closure,
/// the processor cannot be restarted and further enqueues report
/// [`StreamError::QueueClosed`].
///
/// Shutdown honors the item in flight; items still queued when the signal
/// lands are dropped.
///
/// # Example
///
/// ```rust,no_run
/// use noema::agent::{EchoPlanner, PlanExecutor};
/// use noema::plan::Observation;
/// use noema::runtime::{StreamConfig, StreamProcessor};
///
/// # async fn run() {
/// let agent = PlanExecutor::new(Box::new(EchoPlanner));
/// let mut processor = StreamProcessor::new(agent, StreamConfig::default())
///     .on_decision(|outcome| println!("{:?}", outcome.decision.action));
///
/// processor.enqueue(Observation::text("first reading")).unwrap();
/// processor.start();
/// # }
/// ```
pub struct StreamProcessor<A: Agent + Send + 'static> {
    queue_tx: mpsc::UnboundedSender<StreamItem>,
    queue_rx: Option<mpsc::UnboundedReceiver<StreamItem>>,
    shutdown_tx: watch::Sender<bool>,
    shutdown_rx: watch::Receiver<bool>,
    agent: Option<A>,
    callback: Option<Box<dyn FnMut(StreamOutcome) + Send>>,
    config: StreamConfig,
    worker: Option<JoinHandle<()>>,
}

impl<A: Agent + Send + 'static> StreamProcessor<A> {
    /// Create a processor around an agent.
    ///
    /// The queue exists from this point on, so items can be enqueued before
    /// the worker starts; they are consumed once it runs.
    pub fn new(agent: A, config: StreamConfig) -> Self {
        let (queue_tx, queue_rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        Self {
            queue_tx,
            queue_rx: Some(queue_rx),
            shutdown_tx,
            shutdown_rx,
            agent: Some(agent),
            callback: None,
            config,
            worker: None,
        }
    }

    /// Install the response callback, invoked once per processed item.
    /// Without one, decisions are produced and dropped.
    pub fn on_decision(mut self, callback: impl FnMut(StreamOutcome) + Send + 'static) -> Self {
        self.callback = Some(Box::new(callback));
        self
    }

    /// Queue an observation for processing. Never blocks.
    ///
    /// Returns the item's correlation id, echoed back in the matching
    /// [`StreamOutcome`]. Fails once the worker has exited.
    pub fn enqueue(&self, observation: Observation) -> Result<Uuid, StreamError> {
        let id = Uuid::new_v4();
        self.queue_tx
            .send(StreamItem { id, observation })
            .map_err(|_| StreamError::QueueClosed)?;
        Ok(id)
    }

    /// Spawn the worker task. Requires a tokio runtime context.
    ///
    /// Calling `start` while the worker is live is logged and ignored. The
    /// worker consumes the queue and the agent, so a processor whose worker
    /// has exited cannot be started again.
    pub fn start(&mut self) {
        if self.is_running() {
            debug!("Stream worker already running, ignoring start");
            return;
        }

        let (Some(mut queue_rx), Some(mut agent)) = (self.queue_rx.take(), self.agent.take())
        else {
            warn!("Stream worker already consumed its queue, ignoring start");
            return;
        };

        let mut callback = self.callback.take();
        let mut shutdown_rx = self.shutdown_rx.clone();
        let max_latency = self.config.max_latency;

        self.worker = Some(tokio::spawn(async move {
            // A stop signaled before the worker started still counts.
            if *shutdown_rx.borrow() {
                info!("Stream worker stopped before processing");
                return;
            }

            loop {
                tokio::select! {
                    changed = shutdown_rx.changed() => {
                        if changed.is_err() || *shutdown_rx.borrow() {
                            info!("Stream worker shutting down");
                            break;
                        }
                    }
                    item = queue_rx.recv() => {
                        let Some(item) = item else {
                            info!("Stream queue closed, worker exiting");
                            break;
                        };

                        let started = Instant::now();
                        agent.perceive(item.observation);
                        let decision = agent.decide_next_action();
                        let elapsed = started.elapsed();

                        if elapsed > max_latency {
                            warn!(
                                item_id = %item.id,
                                elapsed_ms = elapsed.as_millis() as u64,
                                budget_ms = max_latency.as_millis() as u64,
                                "Stream item exceeded latency budget"
                            );
                        }

                        if let Some(callback) = callback.as_mut() {
                            callback(StreamOutcome {
                                item_id: item.id,
                                decision,
                                elapsed,
                                decided_at: Utc::now(),
                            });
                        }
                    }
                }
            }
        }));
    }

    /// Signal the worker to shut down. Best effort, returns immediately;
    /// the item in flight completes first.
    pub fn stop(&self) {
        debug!("Signaling stream worker shutdown");
        let _ = self.shutdown_tx.send(true);
    }

    /// Whether the worker task is live
    pub fn is_running(&self) -> bool {
        self.worker
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}
