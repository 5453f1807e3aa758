//! The 32-bit response tail: weather code, raw temperature, precipitation.

use crate::error::{WipError, WipResult};

pub const TAIL_LEN: usize = 4;

/// Offset applied to Celsius on the wire. Authoritative form per the
/// temperature Open Question: `raw = celsius + 100`; conversion to Celsius
/// happens only at the facade boundary.
pub const TEMPERATURE_OFFSET: i32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseTail {
    pub weather_code: u16,
    pub temperature_raw: u8,
    pub precipitation_prob: u8,
}

impl ResponseTail {
    pub fn from_celsius(weather_code: u16, celsius: i32, precipitation_prob: u8) -> WipResult<Self> {
        let raw = celsius + TEMPERATURE_OFFSET;
        if !(0..=255).contains(&raw) {
            return Err(WipError::InvalidPacket(format!("temperature {celsius}C does not fit the raw 8-bit encoding")));
        }
        Ok(Self { weather_code, temperature_raw: raw as u8, precipitation_prob })
    }

    pub fn temperature_celsius(&self) -> i32 {
        self.temperature_raw as i32 - TEMPERATURE_OFFSET
    }

    pub fn encode(&self) -> [u8; TAIL_LEN] {
        let mut buf = [0u8; TAIL_LEN];
        buf[0..2].copy_from_slice(&self.weather_code.to_le_bytes());
        buf[2] = self.temperature_raw;
        buf[3] = self.precipitation_prob;
        buf
    }

    pub fn decode(bytes: &[u8]) -> WipResult<Self> {
        if bytes.len() < TAIL_LEN {
            return Err(WipError::InvalidPacket("buffer shorter than the 4-byte response tail".into()));
        }
        Ok(Self {
            weather_code: u16::from_le_bytes([bytes[0], bytes[1]]),
            temperature_raw: bytes[2],
            precipitation_prob: bytes[3],
        })
    }
}
