//! Node identity, credentials and timing policy.
//!
//! Intervals follow the deployed nodes: the link layer is polled every
//! 500 ms while associating, the broker session is retried every 3 s, and
//! readings publish every 3 s. Fixed-interval retry is deliberate — there
//! is no exponential backoff anywhere in this design.

/// Link poll cadence while the association is in progress.
pub const LINK_POLL_INTERVAL_MS: u32 = 500;
/// Session handshake retry cadence once the link is up.
pub const SESSION_RETRY_INTERVAL_MS: u32 = 3_000;
/// Sampling/publish cadence once the session is up.
pub const SAMPLE_INTERVAL_MS: u32 = 3_000;

pub const INTERVAL_MIN_MS: u32 = 100;
pub const INTERVAL_MAX_MS: u32 = 600_000;

/// Wireless network credentials. The firmware binary supplies these; the
/// core never stores them anywhere else.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LinkCredentials {
    pub ssid: &'static str,
    pub password: &'static str,
}

/// Broker address and port (the deployed brokers listen on 1883/1884).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BrokerEndpoint {
    pub addr: [u8; 4],
    pub port: u16,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NodeConfig {
    pub link: LinkCredentials,
    pub broker: BrokerEndpoint,
    pub client_id: &'static str,
    pub link_poll_interval_ms: u32,
    pub session_retry_interval_ms: u32,
    pub sample_interval_ms: u32,
}

impl NodeConfig {
    pub const fn new(
        link: LinkCredentials,
        broker: BrokerEndpoint,
        client_id: &'static str,
    ) -> Self {
        Self {
            link,
            broker,
            client_id,
            link_poll_interval_ms: LINK_POLL_INTERVAL_MS,
            session_retry_interval_ms: SESSION_RETRY_INTERVAL_MS,
            sample_interval_ms: SAMPLE_INTERVAL_MS,
        }
    }

    /// Clamp intervals into the supported band. Zero-period timers would
    /// degenerate into fire-every-tick, so the floor is enforced here
    /// rather than in the scheduler.
    pub const fn sanitized(self) -> Self {
        Self {
            link_poll_interval_ms: clamp_u32(
                self.link_poll_interval_ms,
                INTERVAL_MIN_MS,
                INTERVAL_MAX_MS,
            ),
            session_retry_interval_ms: clamp_u32(
                self.session_retry_interval_ms,
                INTERVAL_MIN_MS,
                INTERVAL_MAX_MS,
            ),
            sample_interval_ms: clamp_u32(
                self.sample_interval_ms,
                INTERVAL_MIN_MS,
                INTERVAL_MAX_MS,
            ),
            ..self
        }
    }
}

const fn clamp_u32(value: u32, min: u32, max: u32) -> u32 {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}
