//! The sensor catalog: one fixed-shape reading type per node kind, plus
//! the raw-ADC scaling shared by the analog probes.

pub mod dht;
pub mod ldr;
pub mod mq135;
pub mod soil;

pub use dht::ClimateReading;
pub use ldr::LightReading;
pub use mq135::AirQualityReading;
pub use soil::SoilReading;

/// One measurement source. `sample` must return promptly (no blocking
/// I/O); a failed or out-of-range read maps to `None`.
pub trait SensorSource {
    type Reading;

    fn sample(&mut self) -> Option<Self::Reading>;
}

/// Linear raw-to-percent scaling with saturation at both ends.
///
/// `raw_at_zero`/`raw_at_full` are the calibration endpoints and may be
/// inverted (the soil probe reads *lower* when wet), which is why the math
/// runs in i32.
pub fn scale_to_percent(raw: u16, raw_at_zero: u16, raw_at_full: u16) -> u8 {
    let span = i32::from(raw_at_full) - i32::from(raw_at_zero);
    if span == 0 {
        return 0;
    }
    let offset = i32::from(raw) - i32::from(raw_at_zero);
    let percent = offset * 100 / span;
    percent.clamp(0, 100) as u8
}
