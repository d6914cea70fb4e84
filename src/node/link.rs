use log::{info, warn};

use super::config::LinkCredentials;
use super::flags::PendingFlag;
use super::scheduler::{TimerHandle, TimerMode, TimerScheduler};
use super::telemetry;
use super::transport::{LinkStatus, LinkTransport};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkState {
    Disconnected,
    Connecting,
    Connected,
}

impl LinkState {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
        }
    }
}

/// Edge observed by one poll, routed by the loop to the session supervisor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkEvent {
    None,
    CameUp,
    WentDown,
}

/// State machine for the wireless association.
///
/// Never waits: `begin` issues one non-blocking connect request and arms
/// the poll timer; every later transition happens inside a flag-driven
/// `poll`. The driver's own cadence governs reconnection attempts, so there
/// is no retry bookkeeping here — just status observation.
pub struct LinkSupervisor<'a, T: LinkTransport, const N: usize> {
    transport: T,
    state: LinkState,
    scheduler: &'a TimerScheduler<N>,
    poll_flag: &'static PendingFlag,
    poll_interval_ms: u32,
    poll_timer: Option<TimerHandle>,
    degraded: bool,
}

impl<'a, T: LinkTransport, const N: usize> LinkSupervisor<'a, T, N> {
    pub fn new(
        transport: T,
        scheduler: &'a TimerScheduler<N>,
        poll_flag: &'static PendingFlag,
        poll_interval_ms: u32,
    ) -> Self {
        Self {
            transport,
            state: LinkState::Disconnected,
            scheduler,
            poll_flag,
            poll_interval_ms,
            poll_timer: None,
            degraded: false,
        }
    }

    pub fn state(&self) -> LinkState {
        self.state
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// `true` when the poll timer could not be armed and the loop must
    /// dispatch `poll` on every iteration instead.
    pub fn polls_every_iteration(&self) -> bool {
        self.degraded
    }

    /// Start the association. Idempotent: while already `Connecting` or
    /// `Connected` this is a no-op, so no second connect request can ever
    /// be outstanding.
    pub fn begin(&mut self, now_ms: u64, credentials: &LinkCredentials) {
        if self.state != LinkState::Disconnected {
            return;
        }
        info!("link: connecting ssid={}", credentials.ssid);
        telemetry::record_link_connect_request();
        self.transport.connect(credentials);
        self.state = LinkState::Connecting;
        self.ensure_poll_timer(now_ms);
    }

    /// Observe the driver status and advance the state machine. Driven by
    /// the poll flag (or every iteration in degraded mode); performs no
    /// waiting of any kind.
    pub fn poll(&mut self, _now_ms: u64) -> LinkEvent {
        let associated = self.transport.status() == LinkStatus::Connected;
        match (self.state, associated) {
            (LinkState::Connecting | LinkState::Disconnected, true) => {
                self.state = LinkState::Connected;
                telemetry::record_link_up();
                info!("link: up");
                LinkEvent::CameUp
            }
            (LinkState::Connected, false) => {
                // The driver keeps retrying on its own; the poll timer
                // stays armed so the next association is observed.
                self.state = LinkState::Disconnected;
                telemetry::record_link_down();
                warn!("link: down");
                LinkEvent::WentDown
            }
            _ => LinkEvent::None,
        }
    }

    fn ensure_poll_timer(&mut self, now_ms: u64) {
        if self.poll_timer.is_some() || self.degraded {
            return;
        }
        match self.scheduler.arm(
            now_ms,
            self.poll_interval_ms,
            TimerMode::Repeating,
            self.poll_flag,
        ) {
            Ok(handle) => self.poll_timer = Some(handle),
            Err(err) => {
                // Degraded mode: the loop polls us on every iteration.
                self.degraded = true;
                telemetry::record_scheduler_degraded();
                warn!("link: poll timer unavailable ({}), polling every iteration", err.as_str());
            }
        }
    }
}
