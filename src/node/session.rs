use log::{info, warn};

use super::config::BrokerEndpoint;
use super::flags::PendingFlag;
use super::scheduler::{TimerHandle, TimerMode, TimerScheduler};
use super::telemetry;
use super::transport::{SessionRefused, SessionTransport};

/// `Disconnected` means the link is down (or never came up); `Connecting`
/// means the link is up and handshake attempts are running on the retry
/// cadence. The invariant that `Connecting`/`Connected` imply a live link
/// holds because `on_link_down` is the only entry into `Disconnected` and
/// `on_link_up` the only exit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    Disconnected,
    Connecting,
    Connected,
}

impl SessionState {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
        }
    }
}

/// State machine for the broker session. Depends on the link supervisor
/// reporting up/down edges; arbitrates handshake retries at a fixed
/// interval and owns the sample timer so that sampling can only be armed
/// while a session exists.
pub struct SessionSupervisor<'a, S: SessionTransport, const N: usize> {
    transport: S,
    state: SessionState,
    scheduler: &'a TimerScheduler<N>,
    retry_flag: &'static PendingFlag,
    sample_flag: &'static PendingFlag,
    retry_interval_ms: u32,
    sample_interval_ms: u32,
    retry_timer: Option<TimerHandle>,
    sample_timer: Option<TimerHandle>,
    endpoint: BrokerEndpoint,
    client_id: &'static str,
    endpoint_configured: bool,
    last_refusal: Option<SessionRefused>,
    retry_degraded: bool,
    sample_degraded: bool,
}

impl<'a, S: SessionTransport, const N: usize> SessionSupervisor<'a, S, N> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        transport: S,
        scheduler: &'a TimerScheduler<N>,
        retry_flag: &'static PendingFlag,
        sample_flag: &'static PendingFlag,
        endpoint: BrokerEndpoint,
        client_id: &'static str,
        retry_interval_ms: u32,
        sample_interval_ms: u32,
    ) -> Self {
        Self {
            transport,
            state: SessionState::Disconnected,
            scheduler,
            retry_flag,
            sample_flag,
            retry_interval_ms,
            sample_interval_ms,
            retry_timer: None,
            sample_timer: None,
            endpoint,
            client_id,
            endpoint_configured: false,
            last_refusal: None,
            retry_degraded: false,
            sample_degraded: false,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn transport(&self) -> &S {
        &self.transport
    }

    /// Last broker refusal, kept for the serial console. Cleared on a
    /// successful handshake.
    pub fn last_refusal(&self) -> Option<SessionRefused> {
        self.last_refusal
    }

    /// `true` when the retry timer could not be armed and the loop must
    /// dispatch `poll` on every iteration instead.
    pub fn polls_every_iteration(&self) -> bool {
        self.retry_degraded && self.state == SessionState::Connecting
    }

    /// `true` when the sample timer could not be armed; the publisher then
    /// gates its own cadence while the loop dispatches it every iteration.
    pub fn samples_every_iteration(&self) -> bool {
        self.sample_degraded && self.state == SessionState::Connected
    }

    /// Link came up: configure the endpoint once, start the retry cadence,
    /// and attempt the first handshake immediately rather than waiting a
    /// full interval.
    pub fn on_link_up(&mut self, now_ms: u64) {
        if self.state != SessionState::Disconnected {
            return;
        }
        if !self.endpoint_configured {
            self.transport.configure(&self.endpoint);
            self.endpoint_configured = true;
        }
        self.state = SessionState::Connecting;
        self.arm_retry_timer(now_ms);
        self.poll(now_ms);
    }

    /// Link went down: the session is gone with it, whatever the broker
    /// thinks. Publishing stays suppressed until both layers recover.
    pub fn on_link_down(&mut self) {
        if self.state == SessionState::Disconnected {
            return;
        }
        if self.state == SessionState::Connected {
            telemetry::record_session_drop();
        }
        self.state = SessionState::Disconnected;
        self.disarm_retry_timer();
        self.disarm_sample_timer();
        warn!("session: down (link lost)");
    }

    /// One non-blocking handshake attempt. Gated on the link being up
    /// (`Connecting` state); a stale retry flag after a link drop lands
    /// here as a no-op.
    pub fn poll(&mut self, now_ms: u64) {
        if self.state != SessionState::Connecting {
            return;
        }
        telemetry::record_session_attempt();
        match self.transport.connect(self.client_id) {
            Ok(()) => {
                self.state = SessionState::Connected;
                self.last_refusal = None;
                self.disarm_retry_timer();
                self.arm_sample_timer(now_ms);
                telemetry::record_session_up();
                info!("session: up client_id={}", self.client_id);
            }
            Err(refused) => {
                // Diagnostics only; next attempt on the timer cadence.
                self.last_refusal = Some(refused);
                telemetry::record_session_refused(refused.code);
                warn!("session: connect refused rc={}", refused.code);
            }
        }
    }

    /// Runs every loop iteration while `Connected`: one housekeeping step
    /// of the session protocol. A dead return means the session silently
    /// dropped — go back to retrying on the fixed cadence.
    pub fn keep_alive(&mut self, now_ms: u64) {
        if self.state != SessionState::Connected {
            return;
        }
        if self.transport.service() {
            return;
        }
        telemetry::record_session_drop();
        warn!("session: dropped (keep-alive)");
        self.state = SessionState::Connecting;
        self.disarm_sample_timer();
        self.arm_retry_timer(now_ms);
    }

    /// Best-effort publish, gated on a live session. `false` covers both
    /// "not connected" and a transport-level failure; neither touches the
    /// session state (only `keep_alive` detection does).
    pub fn publish(&mut self, topic: &str, payload: &[u8]) -> bool {
        if self.state != SessionState::Connected {
            return false;
        }
        self.transport.publish(topic, payload)
    }

    fn arm_retry_timer(&mut self, now_ms: u64) {
        if self.retry_timer.is_some() || self.retry_degraded {
            return;
        }
        match self.scheduler.arm(
            now_ms,
            self.retry_interval_ms,
            TimerMode::Repeating,
            self.retry_flag,
        ) {
            Ok(handle) => self.retry_timer = Some(handle),
            Err(err) => {
                self.retry_degraded = true;
                telemetry::record_scheduler_degraded();
                warn!(
                    "session: retry timer unavailable ({}), polling every iteration",
                    err.as_str()
                );
            }
        }
    }

    fn disarm_retry_timer(&mut self) {
        if let Some(handle) = self.retry_timer.take() {
            self.scheduler.disarm(handle);
        }
    }

    fn arm_sample_timer(&mut self, now_ms: u64) {
        if self.sample_timer.is_some() || self.sample_degraded {
            return;
        }
        match self.scheduler.arm(
            now_ms,
            self.sample_interval_ms,
            TimerMode::Repeating,
            self.sample_flag,
        ) {
            Ok(handle) => self.sample_timer = Some(handle),
            Err(err) => {
                self.sample_degraded = true;
                telemetry::record_scheduler_degraded();
                warn!(
                    "session: sample timer unavailable ({}), publisher self-paces",
                    err.as_str()
                );
            }
        }
    }

    fn disarm_sample_timer(&mut self) {
        if let Some(handle) = self.sample_timer.take() {
            self.scheduler.disarm(handle);
        }
    }
}
