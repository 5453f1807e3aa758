//! The 128-bit fixed header: version, packet id, type, flags, day,
//! timestamp and area code.

use crate::error::{WipError, WipResult};
use crate::wip_common_rs::packet::core::{bitcodec, checksum};

pub const HEADER_LEN: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PacketType {
    CoordinateRequest = 0,
    CoordinateResponse = 1,
    WeatherRequest = 2,
    WeatherResponse = 3,
    ReportRequest = 4,
    ReportResponse = 5,
    Error = 7,
}

impl PacketType {
    pub fn from_u8(value: u8) -> WipResult<Self> {
        match value {
            0 => Ok(Self::CoordinateRequest),
            1 => Ok(Self::CoordinateResponse),
            2 => Ok(Self::WeatherRequest),
            3 => Ok(Self::WeatherResponse),
            4 => Ok(Self::ReportRequest),
            5 => Ok(Self::ReportResponse),
            7 => Ok(Self::Error),
            other => Err(WipError::InvalidPacket(format!("unrecognized packet type {other}"))),
        }
    }

    /// `response_tail present <-> type in {CoordResp, WeatherResp, ReportResp}`.
    pub fn has_response_tail(self) -> bool {
        matches!(self, Self::CoordinateResponse | Self::WeatherResponse | Self::ReportResponse)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub version: u8,
    pub packet_id: u16,
    pub packet_type: PacketType,
    pub flag_weather: bool,
    pub flag_temperature: bool,
    pub flag_precipitation: bool,
    pub flag_alert: bool,
    pub flag_disaster: bool,
    pub flag_extended: bool,
    pub flag_request_auth: bool,
    pub flag_response_auth: bool,
    pub day: u8,
    pub timestamp: u64,
    pub area_code: u32,
}

impl Header {
    /// Validates field ranges and writes every field except the checksum,
    /// which packet assembly (C6) fills in once the whole buffer exists.
    pub fn encode(&self) -> WipResult<[u8; HEADER_LEN]> {
        if self.version > 0xF {
            return Err(WipError::InvalidPacket(format!("version {} exceeds 4 bits", self.version)));
        }
        if self.packet_id > 0x0FFF {
            return Err(WipError::InvalidPacket(format!("packet_id {} exceeds 12 bits", self.packet_id)));
        }
        if self.day > 7 {
            return Err(WipError::InvalidPacket(format!("day {} exceeds 3 bits", self.day)));
        }
        if self.area_code > 0xFFFFF {
            return Err(WipError::InvalidPacket(format!("area_code {} exceeds 20 bits", self.area_code)));
        }

        let mut buf = [0u8; HEADER_LEN];
        bitcodec::set_bits(&mut buf, 0, 4, self.version as u64);
        bitcodec::set_bits(&mut buf, 4, 12, self.packet_id as u64);
        bitcodec::set_bits(&mut buf, 16, 3, self.packet_type as u64);
        bitcodec::set_bits(&mut buf, 19, 1, self.flag_weather as u64);
        bitcodec::set_bits(&mut buf, 20, 1, self.flag_temperature as u64);
        bitcodec::set_bits(&mut buf, 21, 1, self.flag_precipitation as u64);
        bitcodec::set_bits(&mut buf, 22, 1, self.flag_alert as u64);
        bitcodec::set_bits(&mut buf, 23, 1, self.flag_disaster as u64);
        bitcodec::set_bits(&mut buf, 24, 1, self.flag_extended as u64);
        bitcodec::set_bits(&mut buf, 25, 1, self.flag_request_auth as u64);
        bitcodec::set_bits(&mut buf, 26, 1, self.flag_response_auth as u64);
        bitcodec::set_bits(&mut buf, 27, 3, self.day as u64);
        bitcodec::set_bits(&mut buf, 30, 2, 0);
        bitcodec::set_bits(&mut buf, 32, 64, self.timestamp);
        bitcodec::set_bits(&mut buf, 96, 20, self.area_code as u64);
        // bits 116..127 (checksum) are left zero here by design.
        Ok(buf)
    }

    /// Parses header fields out of the first 16 bytes without touching the
    /// checksum; callers that decode a full packet verify the checksum
    /// themselves over the whole buffer first (see `Packet::decode`).
    pub(crate) fn parse_fields(bytes: &[u8]) -> WipResult<Self> {
        if bytes.len() < HEADER_LEN {
            return Err(WipError::InvalidPacket("buffer shorter than the 16-byte header".into()));
        }
        Ok(Header {
            version: bitcodec::get_bits(bytes, 0, 4) as u8,
            packet_id: bitcodec::get_bits(bytes, 4, 12) as u16,
            packet_type: PacketType::from_u8(bitcodec::get_bits(bytes, 16, 3) as u8)?,
            flag_weather: bitcodec::get_bits(bytes, 19, 1) != 0,
            flag_temperature: bitcodec::get_bits(bytes, 20, 1) != 0,
            flag_precipitation: bitcodec::get_bits(bytes, 21, 1) != 0,
            flag_alert: bitcodec::get_bits(bytes, 22, 1) != 0,
            flag_disaster: bitcodec::get_bits(bytes, 23, 1) != 0,
            flag_extended: bitcodec::get_bits(bytes, 24, 1) != 0,
            flag_request_auth: bitcodec::get_bits(bytes, 25, 1) != 0,
            flag_response_auth: bitcodec::get_bits(bytes, 26, 1) != 0,
            day: bitcodec::get_bits(bytes, 27, 3) as u8,
            timestamp: bitcodec::get_bits(bytes, 32, 64),
            area_code: bitcodec::get_bits(bytes, 96, 20) as u32,
        })
    }

    /// Decodes a standalone header, verifying the checksum over exactly the
    /// 16 bytes given (useful for header-only round-trip tests); full
    /// packets should go through `Packet::decode` instead, since checksum
    /// coverage extends past the header.
    pub fn decode(bytes: &[u8]) -> WipResult<Self> {
        if bytes.len() < HEADER_LEN {
            return Err(WipError::InvalidPacket("buffer shorter than the 16-byte header".into()));
        }
        if !checksum::verify_checksum12(&bytes[..HEADER_LEN]) {
            return Err(WipError::ChecksumMismatch);
        }
        Self::parse_fields(bytes)
    }
}
