//! Brieflink engagement event bus.
//!
//! - [`EventBus`]: in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`EngagementEvent`]: the envelope published whenever a notification
//!   is recorded.
//! - [`EventTracer`]: background subscriber that writes every event to the
//!   tracing log.

pub mod bus;
pub mod tracer;

pub use bus::{EngagementEvent, EventBus};
pub use tracer::EventTracer;
