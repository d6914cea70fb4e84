//! Connectivity core for a family of battery/mains powered field sensor
//! nodes (soil moisture, light, air quality, temperature/humidity).
//!
//! The crate owns the part that is shared by every node and hard to get
//! right: a cooperative, never-blocking run loop that keeps two dependent
//! connections alive (wireless link, then broker session), hands timed work
//! from interrupt context to loop context through single-bit flags, and
//! publishes one best-effort reading per sample tick.
//!
//! Hardware stays behind traits ([`node::transport::LinkTransport`],
//! [`node::transport::SessionTransport`], [`sensors::SensorSource`],
//! [`codec::Codec`]), so the whole state machine runs under `cargo test`
//! on the host with scripted collaborators.

#![no_std]

pub mod codec;
pub mod node;
pub mod sensors;

pub use node::config::{BrokerEndpoint, LinkCredentials, NodeConfig};
pub use node::flags::{NodeFlags, PendingFlag};
pub use node::run_loop::CooperativeLoop;
pub use node::scheduler::{SchedulerError, TimerHandle, TimerMode, TimerScheduler};
