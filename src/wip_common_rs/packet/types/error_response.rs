//! ErrorResponse — type 7. No response tail (not in the
//! `{CoordResp, WeatherResp, ReportResp}` set); the error code and message
//! travel in a Metadata extension.

use crate::error::{WipError, WipResult};
use crate::wip_common_rs::packet::assembly::Packet;
use crate::wip_common_rs::packet::core::extensions::{Extension, KEY_METADATA};
use crate::wip_common_rs::packet::header::{Header, PacketType};

pub fn error_response(packet_id: u16, timestamp: u64, area_code: u32, error_code: u16, message: &str) -> WipResult<Packet> {
    let header = Header {
        version: 1,
        packet_id,
        packet_type: PacketType::Error,
        flag_weather: false,
        flag_temperature: false,
        flag_precipitation: false,
        flag_alert: false,
        flag_disaster: false,
        flag_extended: false,
        flag_request_auth: false,
        flag_response_auth: false,
        day: 0,
        timestamp,
        area_code,
    };
    let mut payload = error_code.to_le_bytes().to_vec();
    payload.extend_from_slice(message.as_bytes());
    let extensions = vec![Extension::new(KEY_METADATA, payload)?];
    Packet::new(header, None, extensions)
}

pub fn parse_error_response(packet: &Packet) -> WipResult<(u16, String)> {
    if packet.header.packet_type != PacketType::Error {
        return Err(WipError::InvalidPacket(format!("expected ErrorResponse, got {:?}", packet.header.packet_type)));
    }
    let ext = packet
        .find_extension(KEY_METADATA)
        .ok_or_else(|| WipError::InvalidPacket("ErrorResponse missing Metadata extension".into()))?;
    if ext.payload.len() < 2 {
        return Err(WipError::InvalidPacket("ErrorResponse Metadata payload shorter than the error code".into()));
    }
    let error_code = u16::from_le_bytes([ext.payload[0], ext.payload[1]]);
    let message = String::from_utf8(ext.payload[2..].to_vec())
        .map_err(|e| WipError::InvalidPacket(format!("invalid utf-8 error message: {e}")))?;
    Ok((error_code, message))
}

/// HTTP-style error codes are fatal (never retryable) at 500 and above.
pub fn is_fatal_error(error_code: u16) -> bool {
    (500..600).contains(&error_code)
}
