use super::config::{BrokerEndpoint, LinkCredentials};

/// Link association state as reported by the wireless driver.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkStatus {
    Disconnected,
    Connecting,
    Connected,
}

impl LinkStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
        }
    }
}

/// Lower-layer wireless association (station join). Both calls must return
/// promptly; the driver owns its own retry cadence once `connect` has been
/// issued.
pub trait LinkTransport {
    /// Issue a non-blocking connect request. Progress is observed through
    /// [`LinkTransport::status`], never awaited here.
    fn connect(&mut self, credentials: &LinkCredentials);

    fn status(&self) -> LinkStatus;
}

/// Broker refusal reason, surfaced as diagnostics only. The numeric code is
/// provider-specific (for an MQTT client this is the client state / CONNACK
/// return code).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionRefused {
    pub code: i16,
}

/// Upper-layer broker session. Every call is non-blocking: `connect` is a
/// single handshake attempt that reports success or refusal immediately,
/// `service` runs the protocol housekeeping one step (heartbeat/ack
/// processing) and reports whether the session is still alive.
pub trait SessionTransport {
    /// Set the broker endpoint. Called once, before the first `connect`.
    fn configure(&mut self, endpoint: &BrokerEndpoint);

    /// One non-blocking handshake attempt under `client_id`.
    fn connect(&mut self, client_id: &str) -> Result<(), SessionRefused>;

    fn is_connected(&self) -> bool;

    /// Protocol housekeeping for one loop iteration. Returns `false` when
    /// the session has silently dropped.
    fn service(&mut self) -> bool;

    /// Best-effort publish. `false` reports a transport-level failure; the
    /// caller must not infer session loss from it.
    fn publish(&mut self, topic: &str, payload: &[u8]) -> bool;
}

/// Platform idle/watchdog hook, run once at the end of every loop
/// iteration. Must not block for an unbounded period.
pub trait IdleHook {
    fn idle(&mut self);
}

/// Monotonic milliseconds since boot.
pub trait Clock {
    fn now_ms(&self) -> u64;
}
