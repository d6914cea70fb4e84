//! JSON wire shapes, written with `core::fmt` into fixed stack buffers
//! (no allocator, no serde). Field names and topics are the deployed
//! ones — the dashboards on the broker side key on them, so they are part
//! of the external contract even though Spanish and English mix.

use core::fmt::Write;

use heapless::String;

use super::{Codec, EncodeError, PublishPayload, PAYLOAD_MAX};
use crate::sensors::{AirQualityReading, ClimateReading, LightReading, SoilReading};

pub const SOIL_TOPIC: &str = "soil";
pub const LDR_TOPIC: &str = "ldr";
pub const MQ135_TOPIC: &str = "mq135";
pub const DHT_TOPIC: &str = "dht11";

fn payload_from(
    topic: &'static str,
    body: String<PAYLOAD_MAX>,
) -> Result<PublishPayload, EncodeError> {
    PublishPayload::from_bytes(topic, body.as_bytes())
}

/// `{"humedad":<pct>,"raw":<raw>}` on topic `soil`.
pub struct SoilJsonCodec;

impl Codec<SoilReading> for SoilJsonCodec {
    fn encode(&self, reading: &SoilReading) -> Result<PublishPayload, EncodeError> {
        let mut body: String<PAYLOAD_MAX> = String::new();
        write!(
            body,
            "{{\"humedad\":{},\"raw\":{}}}",
            reading.moisture_pct, reading.raw
        )
        .map_err(|_| EncodeError::BufferFull)?;
        payload_from(SOIL_TOPIC, body)
    }
}

/// `{"luz":<pct>,"raw":<raw>}` on topic `ldr`.
pub struct LightJsonCodec;

impl Codec<LightReading> for LightJsonCodec {
    fn encode(&self, reading: &LightReading) -> Result<PublishPayload, EncodeError> {
        let mut body: String<PAYLOAD_MAX> = String::new();
        write!(
            body,
            "{{\"luz\":{},\"raw\":{}}}",
            reading.light_pct, reading.raw
        )
        .map_err(|_| EncodeError::BufferFull)?;
        payload_from(LDR_TOPIC, body)
    }
}

/// `{"raw":<raw>,"percentage":<pct>}` on topic `mq135`.
pub struct AirQualityJsonCodec;

impl Codec<AirQualityReading> for AirQualityJsonCodec {
    fn encode(&self, reading: &AirQualityReading) -> Result<PublishPayload, EncodeError> {
        let mut body: String<PAYLOAD_MAX> = String::new();
        write!(
            body,
            "{{\"raw\":{},\"percentage\":{}}}",
            reading.raw, reading.quality_pct
        )
        .map_err(|_| EncodeError::BufferFull)?;
        payload_from(MQ135_TOPIC, body)
    }
}

/// `{"temperatura":<t>,"humedad":<h>}` on topic `dht11`, one decimal per
/// channel (DHT11 resolution is 1 °C / 1 %RH anyway).
pub struct ClimateJsonCodec;

impl Codec<ClimateReading> for ClimateJsonCodec {
    fn encode(&self, reading: &ClimateReading) -> Result<PublishPayload, EncodeError> {
        let mut body: String<PAYLOAD_MAX> = String::new();
        write!(
            body,
            "{{\"temperatura\":{:.1},\"humedad\":{:.1}}}",
            reading.temperature_c, reading.humidity_pct
        )
        .map_err(|_| EncodeError::BufferFull)?;
        payload_from(DHT_TOPIC, body)
    }
}
