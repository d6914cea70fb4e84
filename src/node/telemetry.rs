//! In-process connectivity counters.
//!
//! Written from loop context only; read from anywhere (serial console
//! dumps, tests). Relaxed ordering is enough because each counter is an
//! independent word with no cross-counter invariant.

use core::sync::atomic::{AtomicI32, AtomicU32, Ordering};

static LINK_CONNECT_REQUESTS: AtomicU32 = AtomicU32::new(0);
static LINK_UP_EVENTS: AtomicU32 = AtomicU32::new(0);
static LINK_DOWN_EVENTS: AtomicU32 = AtomicU32::new(0);
static SESSION_CONNECT_ATTEMPTS: AtomicU32 = AtomicU32::new(0);
static SESSION_CONNECT_FAILURES: AtomicU32 = AtomicU32::new(0);
static SESSION_UP_EVENTS: AtomicU32 = AtomicU32::new(0);
static SESSION_DROPS: AtomicU32 = AtomicU32::new(0);
static SESSION_LAST_REFUSAL_CODE: AtomicI32 = AtomicI32::new(0);
static SAMPLES_INVALID: AtomicU32 = AtomicU32::new(0);
static PUBLISH_SUCCESSES: AtomicU32 = AtomicU32::new(0);
static PUBLISH_FAILURES: AtomicU32 = AtomicU32::new(0);
static SCHEDULER_DEGRADED: AtomicU32 = AtomicU32::new(0);

pub(crate) fn record_link_connect_request() {
    LINK_CONNECT_REQUESTS.fetch_add(1, Ordering::Relaxed);
}

pub(crate) fn record_link_up() {
    LINK_UP_EVENTS.fetch_add(1, Ordering::Relaxed);
}

pub(crate) fn record_link_down() {
    LINK_DOWN_EVENTS.fetch_add(1, Ordering::Relaxed);
}

pub(crate) fn record_session_attempt() {
    SESSION_CONNECT_ATTEMPTS.fetch_add(1, Ordering::Relaxed);
}

pub(crate) fn record_session_refused(code: i16) {
    SESSION_CONNECT_FAILURES.fetch_add(1, Ordering::Relaxed);
    SESSION_LAST_REFUSAL_CODE.store(i32::from(code), Ordering::Relaxed);
}

pub(crate) fn record_session_up() {
    SESSION_UP_EVENTS.fetch_add(1, Ordering::Relaxed);
}

pub(crate) fn record_session_drop() {
    SESSION_DROPS.fetch_add(1, Ordering::Relaxed);
}

pub(crate) fn record_sample_invalid() {
    SAMPLES_INVALID.fetch_add(1, Ordering::Relaxed);
}

pub(crate) fn record_publish_success() {
    PUBLISH_SUCCESSES.fetch_add(1, Ordering::Relaxed);
}

pub(crate) fn record_publish_failure() {
    PUBLISH_FAILURES.fetch_add(1, Ordering::Relaxed);
}

pub(crate) fn record_scheduler_degraded() {
    SCHEDULER_DEGRADED.fetch_add(1, Ordering::Relaxed);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TelemetrySnapshot {
    pub link_connect_requests: u32,
    pub link_up_events: u32,
    pub link_down_events: u32,
    pub session_connect_attempts: u32,
    pub session_connect_failures: u32,
    pub session_up_events: u32,
    pub session_drops: u32,
    pub session_last_refusal_code: i32,
    pub samples_invalid: u32,
    pub publish_successes: u32,
    pub publish_failures: u32,
    pub scheduler_degraded: u32,
}

pub fn snapshot() -> TelemetrySnapshot {
    TelemetrySnapshot {
        link_connect_requests: LINK_CONNECT_REQUESTS.load(Ordering::Relaxed),
        link_up_events: LINK_UP_EVENTS.load(Ordering::Relaxed),
        link_down_events: LINK_DOWN_EVENTS.load(Ordering::Relaxed),
        session_connect_attempts: SESSION_CONNECT_ATTEMPTS.load(Ordering::Relaxed),
        session_connect_failures: SESSION_CONNECT_FAILURES.load(Ordering::Relaxed),
        session_up_events: SESSION_UP_EVENTS.load(Ordering::Relaxed),
        session_drops: SESSION_DROPS.load(Ordering::Relaxed),
        session_last_refusal_code: SESSION_LAST_REFUSAL_CODE.load(Ordering::Relaxed),
        samples_invalid: SAMPLES_INVALID.load(Ordering::Relaxed),
        publish_successes: PUBLISH_SUCCESSES.load(Ordering::Relaxed),
        publish_failures: PUBLISH_FAILURES.load(Ordering::Relaxed),
        scheduler_degraded: SCHEDULER_DEGRADED.load(Ordering::Relaxed),
    }
}
