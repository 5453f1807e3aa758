//! CoordinateRequest / CoordinateResponse — types 0 and 1.
//!
//! A coordinate response still carries the header.area_code as the
//! resolved value and, per the packet invariant, a response tail — its
//! weather/temperature/precipitation fields are not meaningful for a
//! resolution reply and are always zeroed.

use crate::error::{WipError, WipResult};
use crate::wip_common_rs::packet::assembly::Packet;
use crate::wip_common_rs::packet::core::extensions::Extension;
use crate::wip_common_rs::packet::header::{Header, PacketType};
use crate::wip_common_rs::packet::tail::ResponseTail;

pub fn coordinate_request(packet_id: u16, timestamp: u64, latitude: f64, longitude: f64) -> WipResult<Packet> {
    if !is_valid_coordinate(latitude, longitude) {
        return Err(WipError::InvalidPacket(format!("coordinate ({latitude}, {longitude}) is out of range")));
    }
    let header = Header {
        version: 1,
        packet_id,
        packet_type: PacketType::CoordinateRequest,
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
        area_code: 0,
    };
    let extensions = vec![Extension::latitude(latitude)?, Extension::longitude(longitude)?];
    Packet::new(header, None, extensions)
}

pub fn coordinate_response(packet_id: u16, timestamp: u64, area_code: u32) -> WipResult<Packet> {
    let header = Header {
        version: 1,
        packet_id,
        packet_type: PacketType::CoordinateResponse,
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
    let tail = ResponseTail { weather_code: 0, temperature_raw: 0, precipitation_prob: 0 };
    Packet::new(header, Some(tail), Vec::new())
}

/// Extracts the resolved 20-bit area code and the request's latitude and
/// longitude, if carried as extensions.
pub fn parse_coordinate_request(packet: &Packet) -> WipResult<(f64, f64)> {
    if packet.header.packet_type != PacketType::CoordinateRequest {
        return Err(WipError::InvalidPacket(format!("expected CoordinateRequest, got {:?}", packet.header.packet_type)));
    }
    use crate::wip_common_rs::packet::core::extensions::{KEY_LATITUDE, KEY_LONGITUDE};
    let lat = packet
        .find_extension(KEY_LATITUDE)
        .ok_or_else(|| WipError::InvalidPacket("CoordinateRequest missing Latitude extension".into()))?
        .decode_fixed_point()?;
    let lon = packet
        .find_extension(KEY_LONGITUDE)
        .ok_or_else(|| WipError::InvalidPacket("CoordinateRequest missing Longitude extension".into()))?
        .decode_fixed_point()?;
    Ok((lat, lon))
}

pub fn parse_coordinate_response(packet: &Packet) -> WipResult<u32> {
    if packet.header.packet_type != PacketType::CoordinateResponse {
        return Err(WipError::InvalidPacket(format!("expected CoordinateResponse, got {:?}", packet.header.packet_type)));
    }
    Ok(packet.header.area_code)
}

pub fn is_valid_coordinate(latitude: f64, longitude: f64) -> bool {
    latitude.is_finite() && longitude.is_finite() && (-90.0..=90.0).contains(&latitude) && (-180.0..=180.0).contains(&longitude)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scenario_s4_coordinate_request_carries_fixed_point_extensions() {
        let packet = coordinate_request(1, 1_000, 35.6895, 139.6917).unwrap();
        let (lat, lon) = parse_coordinate_request(&packet).unwrap();
        assert!((lat - 35.6895).abs() < 1e-6);
        assert!((lon - 139.6917).abs() < 1e-6);
    }

    #[test]
    fn coordinate_response_carries_resolved_area_code() {
        let packet = coordinate_response(1, 1_000, 130_010).unwrap();
        let bytes = packet.encode().unwrap();
        let decoded = Packet::decode(&bytes).unwrap();
        assert_eq!(parse_coordinate_response(&decoded).unwrap(), 130_010);
    }

    #[test]
    fn rejects_out_of_range_coordinates() {
        assert!(coordinate_request(1, 0, 91.0, 0.0).is_err());
        assert!(coordinate_request(1, 0, 0.0, 181.0).is_err());
    }
}
