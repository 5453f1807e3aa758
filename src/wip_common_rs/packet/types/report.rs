//! ReportRequest / ReportResponse — types 4 and 5.
//!
//! Structurally a one-shot query: the sensor's reading travels as a
//! SensorReading extension shaped like a response tail (weather code,
//! raw temperature, precipitation), and the ack travels as a short
//! status string in a Metadata extension.

use crate::error::{WipError, WipResult};
use crate::wip_common_rs::packet::assembly::Packet;
use crate::wip_common_rs::packet::core::extensions::{Extension, KEY_METADATA, KEY_SENSOR_READING};
use crate::wip_common_rs::packet::header::{Header, PacketType};
use crate::wip_common_rs::packet::tail::ResponseTail;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorReading {
    pub weather_code: u16,
    pub temperature_celsius: i32,
    pub precipitation_prob: u8,
}

pub fn report_request(packet_id: u16, timestamp: u64, area_code: u32, reading: SensorReading) -> WipResult<Packet> {
    let header = Header {
        version: 1,
        packet_id,
        packet_type: PacketType::ReportRequest,
        flag_weather: true,
        flag_temperature: true,
        flag_precipitation: true,
        flag_alert: false,
        flag_disaster: false,
        flag_extended: false,
        flag_request_auth: false,
        flag_response_auth: false,
        day: 0,
        timestamp,
        area_code,
    };
    let tail = ResponseTail::from_celsius(reading.weather_code, reading.temperature_celsius, reading.precipitation_prob)?;
    let extensions = vec![Extension::new(KEY_SENSOR_READING, tail.encode().to_vec())?];
    Packet::new(header, None, extensions)
}

pub fn parse_report_request(packet: &Packet) -> WipResult<SensorReading> {
    if packet.header.packet_type != PacketType::ReportRequest {
        return Err(WipError::InvalidPacket(format!("expected ReportRequest, got {:?}", packet.header.packet_type)));
    }
    let ext = packet
        .find_extension(KEY_SENSOR_READING)
        .ok_or_else(|| WipError::InvalidPacket("ReportRequest missing SensorReading extension".into()))?;
    let tail = ResponseTail::decode(&ext.payload)?;
    Ok(SensorReading {
        weather_code: tail.weather_code,
        temperature_celsius: tail.temperature_celsius(),
        precipitation_prob: tail.precipitation_prob,
    })
}

pub fn report_response(packet_id: u16, timestamp: u64, area_code: u32, status: &str) -> WipResult<Packet> {
    let header = Header {
        version: 1,
        packet_id,
        packet_type: PacketType::ReportResponse,
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
    let extensions = vec![Extension::new(KEY_METADATA, status.as_bytes().to_vec())?];
    Packet::new(header, Some(tail), extensions)
}

pub fn parse_report_response(packet: &Packet) -> WipResult<String> {
    if packet.header.packet_type != PacketType::ReportResponse {
        return Err(WipError::InvalidPacket(format!("expected ReportResponse, got {:?}", packet.header.packet_type)));
    }
    match packet.find_extension(KEY_METADATA) {
        Some(ext) => ext.decode_utf8(),
        None => Ok(String::from("ok")),
    }
}
