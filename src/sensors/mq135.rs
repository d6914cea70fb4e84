use super::scale_to_percent;

pub const MQ135_RAW_MIN: u16 = 0;
pub const MQ135_RAW_MAX: u16 = 1_023;

pub const MQ135_CLIENT_ID: &str = "ESP8266_MQ135";

/// One air-quality measurement. The percentage is an index, not a gas
/// concentration: the raw value tracks the sensing element's resistance,
/// and with this divider a higher reading means cleaner air (0 ≈ heavily
/// contaminated, 100 ≈ clean).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AirQualityReading {
    pub raw: u16,
    pub quality_pct: u8,
}

impl AirQualityReading {
    pub fn from_raw(raw: u16) -> Self {
        Self {
            raw,
            quality_pct: scale_to_percent(raw, MQ135_RAW_MIN, MQ135_RAW_MAX),
        }
    }
}
