use super::scale_to_percent;

/// Calibration endpoints for the resistive probe on the analog pin.
/// Re-calibrate per probe batch; these match the deployed nodes.
pub const SOIL_RAW_DRY: u16 = 1_023; // probe in air
pub const SOIL_RAW_WET: u16 = 300; // probe in water

pub const SOIL_CLIENT_ID: &str = "ESP8266_SUELO";

/// One soil-moisture measurement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SoilReading {
    pub raw: u16,
    pub moisture_pct: u8,
}

impl SoilReading {
    pub fn from_raw(raw: u16) -> Self {
        Self {
            raw,
            moisture_pct: scale_to_percent(raw, SOIL_RAW_DRY, SOIL_RAW_WET),
        }
    }
}
