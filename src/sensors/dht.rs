pub const DHT_CLIENT_ID: &str = "NodeMCU_DHT11";

/// One temperature/humidity measurement from the DHT probe.
///
/// The driver signals a failed read with NaN in either channel;
/// [`ClimateReading::from_measurement`] maps that to `None` so the
/// publisher skips the tick instead of shipping garbage.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClimateReading {
    pub temperature_c: f32,
    pub humidity_pct: f32,
}

impl ClimateReading {
    pub fn from_measurement(temperature_c: f32, humidity_pct: f32) -> Option<Self> {
        if temperature_c.is_nan() || humidity_pct.is_nan() {
            return None;
        }
        Some(Self {
            temperature_c,
            humidity_pct,
        })
    }
}
