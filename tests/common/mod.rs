//! Scripted collaborators for driving the whole loop on the host.
//!
//! Shared-handle mocks: the test keeps one `Rc` side to script link drops,
//! broker refusals and sensor values while the loop owns the other.

use std::cell::RefCell;
use std::rc::Rc;

use agronode::codec::json::SoilJsonCodec;
use agronode::node::config::{BrokerEndpoint, LinkCredentials, NodeConfig};
use agronode::node::flags::NodeFlags;
use agronode::node::run_loop::CooperativeLoop;
use agronode::node::scheduler::TimerScheduler;
use agronode::node::transport::{
    IdleHook, LinkStatus, LinkTransport, SessionRefused, SessionTransport,
};
use agronode::sensors::{SensorSource, SoilReading};

pub const CREDENTIALS: LinkCredentials = LinkCredentials {
    ssid: "invernadero",
    password: "secret",
};

pub const BROKER: BrokerEndpoint = BrokerEndpoint {
    addr: [10, 228, 245, 75],
    port: 1883,
};

pub fn soil_config() -> NodeConfig {
    NodeConfig::new(CREDENTIALS, BROKER, "ESP8266_SUELO")
}

pub struct LinkScript {
    pub status: LinkStatus,
    pub connect_calls: u32,
}

#[derive(Clone)]
pub struct ScriptedLink(pub Rc<RefCell<LinkScript>>);

impl ScriptedLink {
    pub fn new() -> Self {
        Self(Rc::new(RefCell::new(LinkScript {
            status: LinkStatus::Disconnected,
            connect_calls: 0,
        })))
    }

    pub fn set_status(&self, status: LinkStatus) {
        self.0.borrow_mut().status = status;
    }

    pub fn connect_calls(&self) -> u32 {
        self.0.borrow().connect_calls
    }
}

impl LinkTransport for ScriptedLink {
    fn connect(&mut self, _credentials: &LinkCredentials) {
        let mut inner = self.0.borrow_mut();
        inner.connect_calls += 1;
        if inner.status == LinkStatus::Disconnected {
            inner.status = LinkStatus::Connecting;
        }
    }

    fn status(&self) -> LinkStatus {
        self.0.borrow().status
    }
}

pub struct SessionScript {
    /// Broker accepts handshakes at or after this time; the test advances
    /// `now` before each poll sweep.
    pub accept_from_ms: u64,
    pub now_ms: u64,
    pub refuse_code: i16,
    pub alive: bool,
    pub publish_ok: bool,
    pub connected: bool,
    pub configure_calls: u32,
    pub connect_calls: u32,
    pub service_calls: u32,
    pub publishes: Vec<(String, Vec<u8>, u64)>,
}

#[derive(Clone)]
pub struct ScriptedSession(pub Rc<RefCell<SessionScript>>);

impl ScriptedSession {
    pub fn new(accept_from_ms: u64) -> Self {
        Self(Rc::new(RefCell::new(SessionScript {
            accept_from_ms,
            now_ms: 0,
            refuse_code: -2,
            alive: true,
            publish_ok: true,
            connected: false,
            configure_calls: 0,
            connect_calls: 0,
            service_calls: 0,
            publishes: Vec::new(),
        })))
    }

    pub fn advance_to(&self, now_ms: u64) {
        self.0.borrow_mut().now_ms = now_ms;
    }

    pub fn kill(&self) {
        self.0.borrow_mut().alive = false;
    }

    pub fn revive(&self) {
        self.0.borrow_mut().alive = true;
    }

    pub fn set_publish_ok(&self, ok: bool) {
        self.0.borrow_mut().publish_ok = ok;
    }

    pub fn connect_calls(&self) -> u32 {
        self.0.borrow().connect_calls
    }

    pub fn service_calls(&self) -> u32 {
        self.0.borrow().service_calls
    }

    pub fn publishes(&self) -> Vec<(String, Vec<u8>, u64)> {
        self.0.borrow().publishes.clone()
    }
}

impl SessionTransport for ScriptedSession {
    fn configure(&mut self, _endpoint: &BrokerEndpoint) {
        self.0.borrow_mut().configure_calls += 1;
    }

    fn connect(&mut self, _client_id: &str) -> Result<(), SessionRefused> {
        let mut inner = self.0.borrow_mut();
        inner.connect_calls += 1;
        if inner.now_ms >= inner.accept_from_ms && inner.alive {
            inner.connected = true;
            Ok(())
        } else {
            Err(SessionRefused {
                code: inner.refuse_code,
            })
        }
    }

    fn is_connected(&self) -> bool {
        self.0.borrow().connected
    }

    fn service(&mut self) -> bool {
        let mut inner = self.0.borrow_mut();
        inner.service_calls += 1;
        if !inner.alive {
            inner.connected = false;
        }
        inner.alive
    }

    fn publish(&mut self, topic: &str, payload: &[u8]) -> bool {
        let mut inner = self.0.borrow_mut();
        let now = inner.now_ms;
        inner.publishes.push((topic.to_owned(), payload.to_vec(), now));
        inner.publish_ok
    }
}

#[derive(Clone)]
pub struct ScriptedSensor(pub Rc<RefCell<Option<SoilReading>>>);

impl ScriptedSensor {
    pub fn reading(raw: u16) -> Self {
        Self(Rc::new(RefCell::new(Some(SoilReading::from_raw(raw)))))
    }

    pub fn set_raw(&self, raw: u16) {
        *self.0.borrow_mut() = Some(SoilReading::from_raw(raw));
    }

    pub fn set_invalid(&self) {
        *self.0.borrow_mut() = None;
    }
}

impl SensorSource for ScriptedSensor {
    type Reading = SoilReading;

    fn sample(&mut self) -> Option<SoilReading> {
        *self.0.borrow()
    }
}

#[derive(Clone, Default)]
pub struct IdleCounter(pub Rc<RefCell<u32>>);

impl IdleCounter {
    pub fn count(&self) -> u32 {
        *self.0.borrow()
    }
}

impl IdleHook for IdleCounter {
    fn idle(&mut self) {
        *self.0.borrow_mut() += 1;
    }
}

pub type SoilLoop<'a> =
    CooperativeLoop<'a, ScriptedLink, ScriptedSession, ScriptedSensor, SoilJsonCodec, IdleCounter, 8>;

pub struct Rig<'a> {
    pub scheduler: &'a TimerScheduler<8>,
    pub link: ScriptedLink,
    pub session: ScriptedSession,
    pub sensor: ScriptedSensor,
    pub idle: IdleCounter,
    pub node: SoilLoop<'a>,
}

impl<'a> Rig<'a> {
    pub fn new(
        scheduler: &'a TimerScheduler<8>,
        flags: &'static NodeFlags,
        accept_from_ms: u64,
    ) -> Self {
        let link = ScriptedLink::new();
        let session = ScriptedSession::new(accept_from_ms);
        let sensor = ScriptedSensor::reading(661);
        let idle = IdleCounter::default();
        let node = CooperativeLoop::new(
            scheduler,
            flags,
            soil_config(),
            link.clone(),
            session.clone(),
            sensor.clone(),
            SoilJsonCodec,
            idle.clone(),
        );
        Self {
            scheduler,
            link,
            session,
            sensor,
            idle,
            node,
        }
    }

    /// Advance time in `step_ms` increments up to `until_ms`, running the
    /// timer interrupt and then one loop iteration at each step — the same
    /// interleaving the firmware sees.
    pub fn run_until(&mut self, until_ms: u64, step_ms: u64) {
        let mut now = self.session.0.borrow().now_ms;
        while now < until_ms {
            now += step_ms;
            self.session.advance_to(now);
            self.scheduler.tick(now);
            self.node.poll_once(now);
        }
    }
}
