//! Direct-mode orchestrator (C9): resolve-then-query dispatch and the
//! facade-boundary result shape. Grounded on `WipClient::get_weather`'s
//! dispatch decision, collapsed onto the single `transactor::transact`
//! entry point so the coordinate and area-code flows share one UDP
//! transaction path instead of two parallel ones.

use crate::config::EndpointConfig;
use crate::error::{WipError, WipResult};
use crate::wip_common_rs::auth::{self, AuthAlgorithm};
use crate::wip_common_rs::packet::header::PacketType;
use crate::wip_common_rs::packet::types::location::{coordinate_request, parse_coordinate_response};
use crate::wip_common_rs::packet::types::weather::{weather_request, parse_weather_response, WeatherRequestFlags, WeatherResponseData};
use crate::wip_common_rs::transactor;

/// Result shape at the facade boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherResult {
    pub area_code: String,
    pub weather_code: Option<u16>,
    pub temperature_c: Option<i32>,
    pub precipitation_prob: Option<u8>,
    pub alerts: Option<Vec<String>>,
    pub disasters: Option<Vec<String>>,
}

fn format_area_code(code: u32) -> String {
    format!("{code:06}")
}

pub fn into_weather_result(area_code: u32, data: WeatherResponseData) -> WeatherResult {
    WeatherResult {
        area_code: format_area_code(area_code),
        weather_code: Some(data.weather_code),
        temperature_c: Some(data.temperature_celsius),
        precipitation_prob: Some(data.precipitation_prob),
        alerts: if data.alerts.is_empty() { None } else { Some(data.alerts) },
        disasters: if data.disasters.is_empty() { None } else { Some(data.disasters) },
    }
}

/// An explicit area code wins over coordinates; coordinates alone
/// trigger resolution; neither is `InvalidPacket`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Dispatch {
    DirectAreaCode(u32),
    ResolveThenQuery(f64, f64),
}

pub fn dispatch_area_code(area_code: Option<u32>, coordinates: Option<(f64, f64)>) -> WipResult<Dispatch> {
    match (area_code, coordinates) {
        (Some(code), _) => {
            log::debug!("dispatching direct area code {code:06}");
            Ok(Dispatch::DirectAreaCode(code))
        }
        (None, Some((lat, lon))) => {
            log::debug!("dispatching resolve-then-query for ({lat}, {lon})");
            Ok(Dispatch::ResolveThenQuery(lat, lon))
        }
        (None, None) => Err(WipError::InvalidPacket("neither area_code nor coordinates were supplied".into())),
    }
}

/// Resolves `(latitude, longitude)` to an area code against the
/// location-resolver endpoint, attaching and optionally verifying auth.
pub async fn resolve_coordinates(
    endpoint: &EndpointConfig,
    algo: AuthAlgorithm,
    packet_id: u16,
    timestamp: u64,
    latitude: f64,
    longitude: f64,
    verify_passphrase: Option<&str>,
) -> WipResult<u32> {
    let mut request = coordinate_request(packet_id, timestamp, latitude, longitude)?;
    if endpoint.auth_enabled {
        auth::attach_auth_hash(&mut request, algo, &endpoint.passphrase);
    }
    let bytes = request.encode()?;
    let response = transactor::transact(
        &endpoint.host,
        endpoint.port,
        &bytes,
        packet_id,
        transactor::DEFAULT_RECV_TIMEOUT,
        transactor::DEFAULT_DEADLINE,
    )
    .await?;
    if let Some(passphrase) = verify_passphrase {
        if !auth::verify_auth_hash(algo, response.header.packet_id, response.header.timestamp, passphrase, &response) {
            log::warn!("location resolver response for pid {packet_id:#06x} failed MAC verification");
            return Err(WipError::AuthFailure("location resolver response failed MAC verification".into()));
        }
    }
    match response.header.packet_type {
        PacketType::CoordinateResponse => {
            let area_code = parse_coordinate_response(&response)?;
            log::info!("resolved ({latitude}, {longitude}) to area code {area_code:06}");
            Ok(area_code)
        }
        PacketType::Error => Err(WipError::InvalidPacket("location resolver returned an error response".into())),
        other => Err(WipError::InvalidPacket(format!("expected CoordinateResponse, got {other:?}"))),
    }
}

/// Issues one `WeatherRequest` against `endpoint` for `area_code`.
#[allow(clippy::too_many_arguments)]
pub async fn query_weather(
    endpoint: &EndpointConfig,
    algo: AuthAlgorithm,
    packet_id: u16,
    timestamp: u64,
    area_code: u32,
    day: u8,
    flags: WeatherRequestFlags,
    verify_passphrase: Option<&str>,
) -> WipResult<WeatherResponseData> {
    let mut request = weather_request(packet_id, timestamp, area_code, day, flags)?;
    if endpoint.auth_enabled {
        auth::attach_auth_hash(&mut request, algo, &endpoint.passphrase);
    }
    let bytes = request.encode()?;
    let response = transactor::transact(
        &endpoint.host,
        endpoint.port,
        &bytes,
        packet_id,
        transactor::DEFAULT_RECV_TIMEOUT,
        transactor::DEFAULT_DEADLINE,
    )
    .await?;
    if let Some(passphrase) = verify_passphrase {
        if !auth::verify_auth_hash(algo, response.header.packet_id, response.header.timestamp, passphrase, &response) {
            log::warn!("query generator response for pid {packet_id:#06x} failed MAC verification");
            return Err(WipError::AuthFailure("query generator response failed MAC verification".into()));
        }
    }
    match response.header.packet_type {
        PacketType::WeatherResponse => parse_weather_response(&response),
        PacketType::Error => Err(WipError::InvalidPacket("query generator returned an error response".into())),
        other => Err(WipError::InvalidPacket(format!("expected WeatherResponse, got {other:?}"))),
    }
}
