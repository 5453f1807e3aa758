//! Typed TLV-style extension records.
//!
//! Each record is a 16-bit little-endian header `(key << 10) | length`
//! followed by `length` payload bytes. The codec itself never interprets
//! payloads by key — it only frames them; the typed constructors and
//! accessors below build/read the reserved keys described in the data
//! model. Unknown keys round-trip as raw bytes.

use crate::error::{WipError, WipResult};

pub const KEY_ALERT: u8 = 1;
pub const KEY_DISASTER: u8 = 2;
pub const KEY_COORDINATE: u8 = 3;
pub const KEY_AUTH_HASH: u8 = 4;
pub const KEY_CUSTOM_DATA: u8 = 5;
pub const KEY_SENSOR_READING: u8 = 6;
pub const KEY_METADATA: u8 = 7;
pub const KEY_LATITUDE: u8 = 33;
pub const KEY_LONGITUDE: u8 = 34;
pub const KEY_SOURCE_INFO: u8 = 40;

const MAX_KEY: u8 = 0x3F;
const MAX_LENGTH: usize = 0x3FF;
const COORD_FIXED_POINT_SCALE: f64 = 1_000_000.0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extension {
    pub key: u8,
    pub payload: Vec<u8>,
}

impl Extension {
    pub fn new(key: u8, payload: Vec<u8>) -> WipResult<Self> {
        if key > MAX_KEY {
            return Err(WipError::InvalidPacket(format!("extension key {key} exceeds 6 bits")));
        }
        if payload.len() > MAX_LENGTH {
            return Err(WipError::InvalidPacket(format!(
                "extension payload of {} bytes exceeds the 10-bit length field",
                payload.len()
            )));
        }
        Ok(Self { key, payload })
    }

    /// Key 33: `i32` little-endian, scaled by 1e6.
    pub fn latitude(value: f64) -> WipResult<Self> {
        Self::fixed_point(KEY_LATITUDE, value)
    }

    /// Key 34: `i32` little-endian, scaled by 1e6.
    pub fn longitude(value: f64) -> WipResult<Self> {
        Self::fixed_point(KEY_LONGITUDE, value)
    }

    fn fixed_point(key: u8, value: f64) -> WipResult<Self> {
        let scaled = (value * COORD_FIXED_POINT_SCALE).round();
        if !scaled.is_finite() || scaled < i32::MIN as f64 || scaled > i32::MAX as f64 {
            return Err(WipError::InvalidPacket(format!("coordinate value {value} is out of range")));
        }
        Self::new(key, (scaled as i32).to_le_bytes().to_vec())
    }

    /// Decodes a fixed-point latitude/longitude extension back to degrees.
    pub fn decode_fixed_point(&self) -> WipResult<f64> {
        let raw = i32::from_le_bytes(
            self.payload
                .as_slice()
                .try_into()
                .map_err(|_| WipError::InvalidPacket("fixed-point extension payload must be 4 bytes".into()))?,
        );
        Ok(raw as f64 / COORD_FIXED_POINT_SCALE)
    }

    /// Key 3: two IEEE-754 float32 values, little-endian (latitude, longitude).
    pub fn coordinate(latitude: f32, longitude: f32) -> WipResult<Self> {
        let mut payload = Vec::with_capacity(8);
        payload.extend_from_slice(&latitude.to_le_bytes());
        payload.extend_from_slice(&longitude.to_le_bytes());
        Self::new(KEY_COORDINATE, payload)
    }

    pub fn decode_coordinate(&self) -> WipResult<(f32, f32)> {
        if self.payload.len() != 8 {
            return Err(WipError::InvalidPacket("coordinate extension payload must be 8 bytes".into()));
        }
        let lat = f32::from_le_bytes(self.payload[0..4].try_into().unwrap());
        let lon = f32::from_le_bytes(self.payload[4..8].try_into().unwrap());
        Ok((lat, lon))
    }

    /// Keys 1/2 (Alert/Disaster): a list of UTF-8 strings, each preceded by
    /// its own 16-bit little-endian byte length.
    pub fn string_list(key: u8, items: &[String]) -> WipResult<Self> {
        let mut payload = Vec::new();
        for item in items {
            let bytes = item.as_bytes();
            if bytes.len() > u16::MAX as usize {
                return Err(WipError::InvalidPacket("string-list element too long to length-prefix".into()));
            }
            payload.extend_from_slice(&(bytes.len() as u16).to_le_bytes());
            payload.extend_from_slice(bytes);
        }
        Self::new(key, payload)
    }

    pub fn decode_string_list(&self) -> WipResult<Vec<String>> {
        let mut items = Vec::new();
        let mut pos = 0;
        while pos < self.payload.len() {
            if pos + 2 > self.payload.len() {
                return Err(WipError::InvalidPacket("truncated string-list element length".into()));
            }
            let len = u16::from_le_bytes([self.payload[pos], self.payload[pos + 1]]) as usize;
            pos += 2;
            if pos + len > self.payload.len() {
                return Err(WipError::InvalidPacket("truncated string-list element".into()));
            }
            let s = String::from_utf8(self.payload[pos..pos + len].to_vec())
                .map_err(|e| WipError::InvalidPacket(format!("invalid utf-8 in string-list element: {e}")))?;
            items.push(s);
            pos += len;
        }
        Ok(items)
    }

    /// Key 4: lower-case ASCII hex of an HMAC digest.
    pub fn auth_hash(hex: String) -> WipResult<Self> {
        Self::new(KEY_AUTH_HASH, hex.into_bytes())
    }

    pub fn decode_utf8(&self) -> WipResult<String> {
        String::from_utf8(self.payload.clone()).map_err(|e| WipError::InvalidPacket(format!("invalid utf-8 extension payload: {e}")))
    }
}

/// Emits each extension's 2-byte header and payload in order.
pub fn encode_extensions(extensions: &[Extension]) -> WipResult<Vec<u8>> {
    let mut buf = Vec::new();
    for ext in extensions {
        if ext.key > MAX_KEY {
            return Err(WipError::InvalidPacket(format!("extension key {} exceeds 6 bits", ext.key)));
        }
        if ext.payload.len() > MAX_LENGTH {
            return Err(WipError::InvalidPacket(format!(
                "extension payload of {} bytes exceeds the 10-bit length field",
                ext.payload.len()
            )));
        }
        let header = ((ext.key as u16) << 10) | (ext.payload.len() as u16);
        buf.extend_from_slice(&header.to_le_bytes());
        buf.extend_from_slice(&ext.payload);
    }
    Ok(buf)
}

/// Reads extension records until `buf` is exhausted. A header promising
/// more payload bytes than remain is `InvalidPacket`, not a silent drop.
pub fn decode_extensions(buf: &[u8]) -> WipResult<Vec<Extension>> {
    let mut extensions = Vec::new();
    let mut pos = 0;
    while pos < buf.len() {
        if pos + 2 > buf.len() {
            return Err(WipError::InvalidPacket("truncated extension header".into()));
        }
        let header = u16::from_le_bytes([buf[pos], buf[pos + 1]]);
        let key = (header >> 10) as u8;
        let length = (header & 0x3FF) as usize;
        pos += 2;
        if pos + length > buf.len() {
            return Err(WipError::InvalidPacket("extension payload truncated".into()));
        }
        extensions.push(Extension { key, payload: buf[pos..pos + length].to_vec() });
        pos += length;
    }
    Ok(extensions)
}
