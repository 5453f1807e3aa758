//! WeatherRequest / WeatherResponse — types 2 and 3.

use crate::error::{WipError, WipResult};
use crate::wip_common_rs::packet::assembly::Packet;
use crate::wip_common_rs::packet::core::extensions::{Extension, KEY_ALERT, KEY_DISASTER};
use crate::wip_common_rs::packet::header::{Header, PacketType};
use crate::wip_common_rs::packet::tail::ResponseTail;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WeatherRequestFlags {
    pub weather: bool,
    pub temperature: bool,
    pub precipitation: bool,
    pub alert: bool,
    pub disaster: bool,
}

pub fn weather_request(packet_id: u16, timestamp: u64, area_code: u32, day: u8, flags: WeatherRequestFlags) -> WipResult<Packet> {
    let header = Header {
        version: 1,
        packet_id,
        packet_type: PacketType::WeatherRequest,
        flag_weather: flags.weather,
        flag_temperature: flags.temperature,
        flag_precipitation: flags.precipitation,
        flag_alert: flags.alert,
        flag_disaster: flags.disaster,
        flag_extended: false,
        flag_request_auth: false,
        flag_response_auth: false,
        day,
        timestamp,
        area_code,
    };
    Packet::new(header, None, Vec::new())
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeatherResponseData {
    pub weather_code: u16,
    pub temperature_celsius: i32,
    pub precipitation_prob: u8,
    pub alerts: Vec<String>,
    pub disasters: Vec<String>,
}

pub fn weather_response(
    packet_id: u16,
    timestamp: u64,
    area_code: u32,
    day: u8,
    data: &WeatherResponseData,
) -> WipResult<Packet> {
    let header = Header {
        version: 1,
        packet_id,
        packet_type: PacketType::WeatherResponse,
        flag_weather: true,
        flag_temperature: true,
        flag_precipitation: true,
        flag_alert: !data.alerts.is_empty(),
        flag_disaster: !data.disasters.is_empty(),
        flag_extended: false,
        flag_request_auth: false,
        flag_response_auth: false,
        day,
        timestamp,
        area_code,
    };
    let tail = ResponseTail::from_celsius(data.weather_code, data.temperature_celsius, data.precipitation_prob)?;
    let mut extensions = Vec::new();
    if !data.alerts.is_empty() {
        extensions.push(Extension::string_list(KEY_ALERT, &data.alerts)?);
    }
    if !data.disasters.is_empty() {
        extensions.push(Extension::string_list(KEY_DISASTER, &data.disasters)?);
    }
    Packet::new(header, Some(tail), extensions)
}

pub fn parse_weather_response(packet: &Packet) -> WipResult<WeatherResponseData> {
    if packet.header.packet_type != PacketType::WeatherResponse {
        return Err(WipError::InvalidPacket(format!("expected WeatherResponse, got {:?}", packet.header.packet_type)));
    }
    let tail = packet
        .response_tail
        .ok_or_else(|| WipError::InvalidPacket("WeatherResponse missing its response tail".into()))?;
    let alerts = match packet.find_extension(KEY_ALERT) {
        Some(ext) => ext.decode_string_list()?,
        None => Vec::new(),
    };
    let disasters = match packet.find_extension(KEY_DISASTER) {
        Some(ext) => ext.decode_string_list()?,
        None => Vec::new(),
    };
    Ok(WeatherResponseData {
        weather_code: tail.weather_code,
        temperature_celsius: tail.temperature_celsius(),
        precipitation_prob: tail.precipitation_prob,
        alerts,
        disasters,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scenario_s1_weather_request_fields() {
        let flags = WeatherRequestFlags { weather: true, temperature: true, ..Default::default() };
        let packet = weather_request(0x123, 0x0123_4567_89AB_CDEF, 130_010, 2, flags).unwrap();
        let bytes = packet.encode().unwrap();
        assert_eq!(bytes.len(), 16);
        let decoded = Packet::decode(&bytes).unwrap();
        assert_eq!(decoded.header.packet_id, 0x123);
        assert_eq!(decoded.header.area_code, 130_010);
        assert!(decoded.header.flag_weather && decoded.header.flag_temperature);
    }

    #[test]
    fn response_round_trip_preserves_temperature_and_alerts() {
        let data = WeatherResponseData {
            weather_code: 100,
            temperature_celsius: 25,
            precipitation_prob: 40,
            alerts: vec!["heavy rain".to_string()],
            disasters: vec![],
        };
        let packet = weather_response(1, 1_000, 130_010, 0, &data).unwrap();
        let bytes = packet.encode().unwrap();
        let decoded = Packet::decode(&bytes).unwrap();
        let parsed = parse_weather_response(&decoded).unwrap();
        assert_eq!(parsed, data);
    }
}
