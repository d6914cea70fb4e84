use super::scale_to_percent;

/// The LDR divider reads the full ADC range; 0 % is dark, 100 % is
/// maximum light.
pub const LDR_RAW_DARK: u16 = 0;
pub const LDR_RAW_BRIGHT: u16 = 1_023;

pub const LDR_CLIENT_ID: &str = "ESP8266_LDR";

/// One ambient-light measurement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LightReading {
    pub raw: u16,
    pub light_pct: u8,
}

impl LightReading {
    pub fn from_raw(raw: u16) -> Self {
        Self {
            raw,
            light_pct: scale_to_percent(raw, LDR_RAW_DARK, LDR_RAW_BRIGHT),
        }
    }
}
