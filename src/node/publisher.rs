use log::{debug, warn};

use super::session::{SessionState, SessionSupervisor};
use super::telemetry;
use super::transport::SessionTransport;
use crate::codec::Codec;
use crate::sensors::SensorSource;

/// Samples on each sample-timer tick, encodes, and attempts one
/// best-effort publish through the session.
///
/// All failure handling is local: a disconnected session drops the tick
/// (no backlog), an invalid reading is skipped, a failed publish is
/// counted. None of it feeds back into connectivity state.
pub struct SamplingPublisher<Src, C> {
    source: Src,
    codec: C,
    sample_interval_ms: u32,
    last_publish_attempt_ms: Option<u64>,
}

impl<Src, C> SamplingPublisher<Src, C>
where
    Src: SensorSource,
    C: Codec<Src::Reading>,
{
    pub fn new(source: Src, codec: C, sample_interval_ms: u32) -> Self {
        Self {
            source,
            codec,
            sample_interval_ms,
            last_publish_attempt_ms: None,
        }
    }

    pub fn source(&self) -> &Src {
        &self.source
    }

    /// One sample tick. `self_paced` is set when the sample timer could
    /// not be armed and the loop dispatches every iteration; the publisher
    /// then enforces the cadence itself.
    pub fn on_sample_tick<S, const N: usize>(
        &mut self,
        now_ms: u64,
        self_paced: bool,
        session: &mut SessionSupervisor<'_, S, N>,
    ) where
        S: SessionTransport,
    {
        if session.state() != SessionState::Connected {
            // Tick dropped, no backlog; next tick starts fresh.
            return;
        }
        if self_paced && !self.cadence_due(now_ms) {
            return;
        }
        self.last_publish_attempt_ms = Some(now_ms);

        let Some(reading) = self.source.sample() else {
            telemetry::record_sample_invalid();
            warn!("sample: invalid reading, skipping publish");
            return;
        };
        let payload = match self.codec.encode(&reading) {
            Ok(payload) => payload,
            Err(err) => {
                telemetry::record_sample_invalid();
                warn!("sample: encode failed ({})", err.as_str());
                return;
            }
        };
        if session.publish(payload.topic, &payload.bytes) {
            telemetry::record_publish_success();
            debug!(
                "publish: topic={} len={}",
                payload.topic,
                payload.bytes.len()
            );
        } else {
            // Session state is keep-alive's call, not ours.
            telemetry::record_publish_failure();
            warn!("publish: failed topic={}", payload.topic);
        }
    }

    fn cadence_due(&self, now_ms: u64) -> bool {
        match self.last_publish_attempt_ms {
            None => true,
            Some(last) => now_ms.saturating_sub(last) >= u64::from(self.sample_interval_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{EncodeError, PublishPayload};
    use crate::node::config::BrokerEndpoint;
    use crate::node::flags::PendingFlag;
    use crate::node::scheduler::TimerScheduler;
    use crate::node::transport::SessionRefused;
    use core::cell::Cell;

    struct FakeSensor<'c> {
        value: &'c Cell<Option<u16>>,
        samples: &'c Cell<u32>,
    }

    impl SensorSource for FakeSensor<'_> {
        type Reading = u16;

        fn sample(&mut self) -> Option<u16> {
            self.samples.set(self.samples.get() + 1);
            self.value.get()
        }
    }

    struct RawCodec<'c> {
        encodes: &'c Cell<u32>,
    }

    impl Codec<u16> for RawCodec<'_> {
        fn encode(&self, reading: &u16) -> Result<PublishPayload, EncodeError> {
            self.encodes.set(self.encodes.get() + 1);
            PublishPayload::from_bytes("soil", &reading.to_be_bytes())
        }
    }

    struct CountingSession<'c> {
        publishes: &'c Cell<u32>,
        publish_ok: &'c Cell<bool>,
        connected: bool,
    }

    impl SessionTransport for CountingSession<'_> {
        fn configure(&mut self, _endpoint: &BrokerEndpoint) {}
        fn connect(&mut self, _client_id: &str) -> Result<(), SessionRefused> {
            self.connected = true;
            Ok(())
        }
        fn is_connected(&self) -> bool {
            self.connected
        }
        fn service(&mut self) -> bool {
            true
        }
        fn publish(&mut self, _topic: &str, _payload: &[u8]) -> bool {
            self.publishes.set(self.publishes.get() + 1);
            self.publish_ok.get()
        }
    }

    const BROKER: BrokerEndpoint = BrokerEndpoint {
        addr: [10, 228, 245, 75],
        port: 1883,
    };

    #[test]
    fn tick_is_dropped_while_session_disconnected() {
        static RETRY: PendingFlag = PendingFlag::new();
        static SAMPLE: PendingFlag = PendingFlag::new();
        let scheduler: TimerScheduler<4> = TimerScheduler::new();
        let publishes = Cell::new(0);
        let publish_ok = Cell::new(true);
        let mut session = SessionSupervisor::new(
            CountingSession {
                publishes: &publishes,
                publish_ok: &publish_ok,
                connected: false,
            },
            &scheduler,
            &RETRY,
            &SAMPLE,
            BROKER,
            "ESP8266_SUELO",
            3_000,
            3_000,
        );

        let value = Cell::new(Some(512));
        let samples = Cell::new(0);
        let encodes = Cell::new(0);
        let mut publisher = SamplingPublisher::new(
            FakeSensor {
                value: &value,
                samples: &samples,
            },
            RawCodec { encodes: &encodes },
            3_000,
        );

        publisher.on_sample_tick(0, false, &mut session);
        assert_eq!(samples.get(), 0);
        assert_eq!(encodes.get(), 0);
        assert_eq!(publishes.get(), 0);
    }

    #[test]
    fn invalid_reading_skips_publish_and_next_tick_recovers() {
        static RETRY: PendingFlag = PendingFlag::new();
        static SAMPLE: PendingFlag = PendingFlag::new();
        let scheduler: TimerScheduler<4> = TimerScheduler::new();
        let publishes = Cell::new(0);
        let publish_ok = Cell::new(true);
        let mut session = SessionSupervisor::new(
            CountingSession {
                publishes: &publishes,
                publish_ok: &publish_ok,
                connected: false,
            },
            &scheduler,
            &RETRY,
            &SAMPLE,
            BROKER,
            "ESP8266_SUELO",
            3_000,
            3_000,
        );
        session.on_link_up(0);
        assert_eq!(session.state(), SessionState::Connected);

        let value = Cell::new(None);
        let samples = Cell::new(0);
        let encodes = Cell::new(0);
        let mut publisher = SamplingPublisher::new(
            FakeSensor {
                value: &value,
                samples: &samples,
            },
            RawCodec { encodes: &encodes },
            3_000,
        );

        publisher.on_sample_tick(3_000, false, &mut session);
        assert_eq!(samples.get(), 1);
        assert_eq!(encodes.get(), 0);
        assert_eq!(publishes.get(), 0);
        assert_eq!(session.state(), SessionState::Connected);

        value.set(Some(733));
        publisher.on_sample_tick(6_000, false, &mut session);
        assert_eq!(publishes.get(), 1);
    }

    #[test]
    fn publish_failure_leaves_session_connected() {
        static RETRY: PendingFlag = PendingFlag::new();
        static SAMPLE: PendingFlag = PendingFlag::new();
        let scheduler: TimerScheduler<4> = TimerScheduler::new();
        let publishes = Cell::new(0);
        let publish_ok = Cell::new(false);
        let mut session = SessionSupervisor::new(
            CountingSession {
                publishes: &publishes,
                publish_ok: &publish_ok,
                connected: false,
            },
            &scheduler,
            &RETRY,
            &SAMPLE,
            BROKER,
            "ESP8266_SUELO",
            3_000,
            3_000,
        );
        session.on_link_up(0);

        let value = Cell::new(Some(512));
        let samples = Cell::new(0);
        let encodes = Cell::new(0);
        let mut publisher = SamplingPublisher::new(
            FakeSensor {
                value: &value,
                samples: &samples,
            },
            RawCodec { encodes: &encodes },
            3_000,
        );

        publisher.on_sample_tick(3_000, false, &mut session);
        assert_eq!(publishes.get(), 1);
        assert_eq!(session.state(), SessionState::Connected);
        session.keep_alive(3_001);
        assert_eq!(session.state(), SessionState::Connected);
    }

    #[test]
    fn self_paced_mode_enforces_the_sample_interval() {
        static RETRY: PendingFlag = PendingFlag::new();
        static SAMPLE: PendingFlag = PendingFlag::new();
        let scheduler: TimerScheduler<4> = TimerScheduler::new();
        let publishes = Cell::new(0);
        let publish_ok = Cell::new(true);
        let mut session = SessionSupervisor::new(
            CountingSession {
                publishes: &publishes,
                publish_ok: &publish_ok,
                connected: false,
            },
            &scheduler,
            &RETRY,
            &SAMPLE,
            BROKER,
            "ESP8266_SUELO",
            3_000,
            3_000,
        );
        session.on_link_up(0);

        let value = Cell::new(Some(512));
        let samples = Cell::new(0);
        let encodes = Cell::new(0);
        let mut publisher = SamplingPublisher::new(
            FakeSensor {
                value: &value,
                samples: &samples,
            },
            RawCodec { encodes: &encodes },
            3_000,
        );

        // Loop iterations every 10ms; only the 3s boundaries publish.
        publisher.on_sample_tick(0, true, &mut session);
        publisher.on_sample_tick(10, true, &mut session);
        publisher.on_sample_tick(2_990, true, &mut session);
        assert_eq!(publishes.get(), 1);
        publisher.on_sample_tick(3_000, true, &mut session);
        assert_eq!(publishes.get(), 2);
    }
}
