//! The connectivity supervisor and cooperative scheduler.
//!
//! Execution model: one logical thread of control (the cooperative loop)
//! plus an interrupt-like timer context that may preempt it at any point.
//! The only state the timer context ever writes is a [`flags::PendingFlag`];
//! everything else (link state, session state, timer handles, buffers) is
//! owned and mutated exclusively from loop context.

pub mod config;
pub mod flags;
pub mod link;
pub mod publisher;
pub mod run_loop;
pub mod scheduler;
pub mod session;
pub mod telemetry;
pub mod transport;
