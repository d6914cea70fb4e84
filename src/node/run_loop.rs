use super::config::NodeConfig;
use super::flags::NodeFlags;
use super::link::{LinkEvent, LinkSupervisor};
use super::publisher::SamplingPublisher;
use super::session::{SessionState, SessionSupervisor};
use super::transport::{Clock, IdleHook, LinkTransport, SessionTransport};
use crate::codec::Codec;
use crate::sensors::SensorSource;

/// The single run loop. One iteration is a fixed-priority sweep of
/// flag-check-then-dispatch steps — connectivity recovery is always
/// serviced before sampling, which bounds how stale a connectivity
/// decision can be when a publish is attempted:
///
/// 1. link flag → link poll, routing up/down edges to the session
/// 2. session flag → session handshake attempt
/// 3. sample flag → sample/encode/publish
/// 4. session keep-alive (while connected)
/// 5. platform idle/watchdog hook
///
/// Nothing in the sweep blocks; the only waiting in the system is the
/// platform's own idle hook.
pub struct CooperativeLoop<'a, L, S, Src, C, I, const N: usize>
where
    L: LinkTransport,
    S: SessionTransport,
    Src: SensorSource,
    C: Codec<Src::Reading>,
    I: IdleHook,
{
    link: LinkSupervisor<'a, L, N>,
    session: SessionSupervisor<'a, S, N>,
    publisher: SamplingPublisher<Src, C>,
    idle: I,
    flags: &'static NodeFlags,
    credentials: super::config::LinkCredentials,
}

impl<'a, L, S, Src, C, I, const N: usize> CooperativeLoop<'a, L, S, Src, C, I, N>
where
    L: LinkTransport,
    S: SessionTransport,
    Src: SensorSource,
    C: Codec<Src::Reading>,
    I: IdleHook,
{
    /// Wire the three state machines to one scheduler, one flag set and
    /// one config. The config is sanitized here so every component sees
    /// the same clamped intervals.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        scheduler: &'a super::scheduler::TimerScheduler<N>,
        flags: &'static NodeFlags,
        config: NodeConfig,
        link_transport: L,
        session_transport: S,
        source: Src,
        codec: C,
        idle: I,
    ) -> Self {
        let config = config.sanitized();
        let link = LinkSupervisor::new(
            link_transport,
            scheduler,
            &flags.link_poll,
            config.link_poll_interval_ms,
        );
        let session = SessionSupervisor::new(
            session_transport,
            scheduler,
            &flags.session_retry,
            &flags.sample,
            config.broker,
            config.client_id,
            config.session_retry_interval_ms,
            config.sample_interval_ms,
        );
        let publisher = SamplingPublisher::new(source, codec, config.sample_interval_ms);
        Self {
            link,
            session,
            publisher,
            idle,
            flags,
            credentials: config.link,
        }
    }

    pub fn link(&self) -> &LinkSupervisor<'a, L, N> {
        &self.link
    }

    pub fn session(&self) -> &SessionSupervisor<'a, S, N> {
        &self.session
    }

    pub fn publisher(&self) -> &SamplingPublisher<Src, C> {
        &self.publisher
    }

    /// Kick off the link association. Everything after this is driven by
    /// timer flags through [`CooperativeLoop::poll_once`].
    pub fn start(&mut self, now_ms: u64) {
        let credentials = self.credentials;
        self.link.begin(now_ms, &credentials);
    }

    /// One loop iteration. Also the test entry point: scenarios drive the
    /// scheduler and this method with a hand-rolled clock.
    pub fn poll_once(&mut self, now_ms: u64) {
        if self.flags.link_poll.take() || self.link.polls_every_iteration() {
            match self.link.poll(now_ms) {
                LinkEvent::CameUp => self.session.on_link_up(now_ms),
                LinkEvent::WentDown => self.session.on_link_down(),
                LinkEvent::None => {}
            }
        }

        if self.flags.session_retry.take() || self.session.polls_every_iteration() {
            self.session.poll(now_ms);
        }

        let self_paced = self.session.samples_every_iteration();
        if self.flags.sample.take() || self_paced {
            self.publisher
                .on_sample_tick(now_ms, self_paced, &mut self.session);
        }

        if self.session.state() == SessionState::Connected {
            self.session.keep_alive(now_ms);
        }

        self.idle.idle();
    }

    /// Run forever. The firmware binary passes its monotonic clock; the
    /// idle hook is where the watchdog gets serviced.
    pub fn run(&mut self, clock: &impl Clock) -> ! {
        self.start(clock.now_ms());
        loop {
            self.poll_once(clock.now_ms());
        }
    }
}
