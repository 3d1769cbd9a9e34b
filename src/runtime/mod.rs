//! # Runtime Module
//!
//! Background execution of the cognition loop. The stream processor feeds
//! queued observations through an agent one at a time on a dedicated tokio
//! task, delivering each decision to a response callback and holding every
//! item to a soft latency budget.
//!
//! ## Core Components
//!
//! - **[StreamProcessor]**: FIFO queue plus worker task driving an agent
//! - **[StreamConfig]**: Latency budget tuning
//! - **[StreamOutcome]**: Per-item result delivered to the callback

pub mod stream;

pub use stream::{StreamConfig, StreamOutcome, StreamProcessor};
