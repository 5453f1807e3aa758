//! Client facade (C11): the single entry point holding mutable client
//! state — coordinates, area code, config, auth — and exposing the
//! direct-mode operations as async methods, plus blocking and
//! future-returning mirrors. Grounded on `WipClient`, collapsed from
//! four independently-pooled/cached per-role client structs onto one
//! facade sharing a single orchestrator, cache, and packet-id
//! generator.
//!
//! Async is the primary form here (tokio sockets throughout); the
//! synchronous API drives it to completion on an ephemeral
//! current-thread runtime (`WipClient::*_blocking`), and the
//! future-based API spawns it onto the ambient runtime
//! (`WipClient::*_future`). Cancellation is cooperative-at-deadline
//! either way — see `DESIGN.md` for the reasoning.

use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use tokio::task::JoinHandle;

use crate::config::WipConfig;
use crate::error::{WipError, WipResult};
use crate::wip_common_rs::auth;
use crate::wip_common_rs::cache::CoordinateCache;
use crate::wip_common_rs::orchestrator::{self, Dispatch, WeatherResult};
use crate::wip_common_rs::packet::header::PacketType;
use crate::wip_common_rs::packet::types::report::{self, SensorReading};
use crate::wip_common_rs::packet::types::weather::WeatherRequestFlags;
use crate::wip_common_rs::transactor;
use crate::wip_common_rs::utils::packet_id_generator::PacketIdGenerator;

fn now_secs() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_secs()
}

/// Canonical cache key: six decimal places is more precision than any
/// real area-code boundary needs, but cheap and collision-free.
fn cache_key(latitude: f64, longitude: f64) -> String {
    format!("coord:{latitude:.6},{longitude:.6}")
}

#[derive(Debug, Clone, Default)]
struct ClientState {
    latitude: Option<f64>,
    longitude: Option<f64>,
    area_code: Option<u32>,
}

/// Holds per-role endpoint config, the packet-id generator, the
/// coordinate cache, and the client's mutable coordinate/area-code
/// state. Cheap to clone: every field is an `Arc`, matching the
/// `Clone`-over-`Arc` pattern `LocationClientImpl`/`WeatherClientAsync`
/// already use to share one client across concurrently spawned tasks.
#[derive(Clone)]
pub struct WipClient {
    config: Arc<WipConfig>,
    packet_ids: Arc<PacketIdGenerator>,
    cache: Arc<CoordinateCache>,
    state: Arc<Mutex<ClientState>>,
}

impl WipClient {
    pub fn new(config: WipConfig) -> Self {
        let cache = CoordinateCache::new(&config.coordinate_cache_path, config.coordinate_cache_ttl_secs);
        Self {
            config: Arc::new(config),
            packet_ids: Arc::new(PacketIdGenerator::new()),
            cache: Arc::new(cache),
            state: Arc::new(Mutex::new(ClientState::default())),
        }
    }

    /// Loads configuration from the environment and constructs a client.
    pub fn from_env() -> WipResult<Self> {
        Ok(Self::new(WipConfig::load()?))
    }

    pub fn set_area_code(&self, area_code: u32) {
        let mut state = self.state.lock().unwrap();
        state.area_code = Some(area_code);
        state.latitude = None;
        state.longitude = None;
    }

    /// Sets coordinates directly, without resolving them yet; the next
    /// `get_weather` call resolves through the location endpoint.
    pub fn set_coordinates(&self, latitude: f64, longitude: f64) {
        let mut state = self.state.lock().unwrap();
        state.latitude = Some(latitude);
        state.longitude = Some(longitude);
        state.area_code = None;
    }

    fn verify_passphrase<'a>(&'a self, endpoint_passphrase: &'a str) -> Option<&'a str> {
        self.config.verify_response_auth.then_some(endpoint_passphrase)
    }

    /// Resolves coordinates to an area code, consulting the persistent
    /// cache first and populating it on a miss.
    pub async fn resolve_area_code(&self, latitude: f64, longitude: f64) -> WipResult<u32> {
        let key = cache_key(latitude, longitude);
        if let Some(cached) = self.cache.get(&key) {
            log::debug!("coordinate cache hit for {key}");
            return cached
                .parse()
                .map_err(|_| WipError::InvalidPacket("cached area code is not numeric".into()));
        }
        log::debug!("coordinate cache miss for {key}, resolving against location resolver");

        let packet_id = self.packet_ids.next_id().await;
        let timestamp = now_secs();
        let endpoint = &self.config.location_resolver;
        let area_code = orchestrator::resolve_coordinates(
            endpoint,
            self.config.auth_algorithm,
            packet_id,
            timestamp,
            latitude,
            longitude,
            self.verify_passphrase(&endpoint.passphrase),
        )
        .await?;

        self.cache.set(&key, &format!("{area_code:06}"))?;
        Ok(area_code)
    }

    /// Queries weather for a known area code against the query-generator endpoint.
    pub async fn get_weather_by_area_code(&self, area_code: u32, day: u8, flags: WeatherRequestFlags) -> WipResult<WeatherResult> {
        let packet_id = self.packet_ids.next_id().await;
        let timestamp = now_secs();
        let endpoint = &self.config.query_generator;
        let data = orchestrator::query_weather(
            endpoint,
            self.config.auth_algorithm,
            packet_id,
            timestamp,
            area_code,
            day,
            flags,
            self.verify_passphrase(&endpoint.passphrase),
        )
        .await?;
        Ok(orchestrator::into_weather_result(area_code, data))
    }

    /// Two-step direct-mode transaction: resolve, then query, caching
    /// the resolved area code and updating client state along the way.
    pub async fn get_weather_by_coordinates(&self, latitude: f64, longitude: f64, day: u8, flags: WeatherRequestFlags) -> WipResult<WeatherResult> {
        let area_code = self.resolve_area_code(latitude, longitude).await?;
        {
            let mut state = self.state.lock().unwrap();
            state.latitude = Some(latitude);
            state.longitude = Some(longitude);
            state.area_code = Some(area_code);
        }
        self.get_weather_by_area_code(area_code, day, flags).await
    }

    /// Dispatches from current client state: an area code set via
    /// `set_area_code` wins; otherwise coordinates set via
    /// `set_coordinates` trigger resolution; neither is `InvalidPacket`.
    pub async fn get_weather(&self, day: u8, flags: WeatherRequestFlags) -> WipResult<WeatherResult> {
        let dispatch = {
            let state = self.state.lock().unwrap();
            orchestrator::dispatch_area_code(state.area_code, state.latitude.zip(state.longitude))?
        };
        match dispatch {
            Dispatch::DirectAreaCode(area_code) => self.get_weather_by_area_code(area_code, day, flags).await,
            Dispatch::ResolveThenQuery(latitude, longitude) => self.get_weather_by_coordinates(latitude, longitude, day, flags).await,
        }
    }

    /// Proxy mode: a single request to a pre-aggregating endpoint, no
    /// resolution step.
    pub async fn get_weather_proxy(&self, area_code: u32, day: u8, flags: WeatherRequestFlags) -> WipResult<WeatherResult> {
        let packet_id = self.packet_ids.next_id().await;
        let timestamp = now_secs();
        let endpoint = &self.config.weather_proxy;
        let data = orchestrator::query_weather(
            endpoint,
            self.config.auth_algorithm,
            packet_id,
            timestamp,
            area_code,
            day,
            flags,
            self.verify_passphrase(&endpoint.passphrase),
        )
        .await?;
        Ok(orchestrator::into_weather_result(area_code, data))
    }

    /// Report-submission flow: structurally a one-shot query carrying
    /// a sensor reading, correlated the same way as a weather query.
    pub async fn send_report(&self, area_code: u32, reading: SensorReading) -> WipResult<String> {
        let packet_id = self.packet_ids.next_id().await;
        let timestamp = now_secs();
        let endpoint = &self.config.report_endpoint;

        let mut request = report::report_request(packet_id, timestamp, area_code, reading)?;
        if endpoint.auth_enabled {
            auth::attach_auth_hash(&mut request, self.config.auth_algorithm, &endpoint.passphrase);
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
        if let Some(passphrase) = self.verify_passphrase(&endpoint.passphrase) {
            if !auth::verify_auth_hash(self.config.auth_algorithm, response.header.packet_id, response.header.timestamp, passphrase, &response) {
                return Err(WipError::AuthFailure("report endpoint response failed MAC verification".into()));
            }
        }
        match response.header.packet_type {
            PacketType::ReportResponse => report::parse_report_response(&response),
            PacketType::Error => Err(WipError::InvalidPacket("report endpoint returned an error response".into())),
            other => Err(WipError::InvalidPacket(format!("expected ReportResponse, got {other:?}"))),
        }
    }

    /// Blocking mirror of `get_weather`, for callers outside a tokio runtime.
    pub fn get_weather_blocking(&self, day: u8, flags: WeatherRequestFlags) -> WipResult<WeatherResult> {
        block_on(self.get_weather(day, flags))
    }

    pub fn get_weather_by_area_code_blocking(&self, area_code: u32, day: u8, flags: WeatherRequestFlags) -> WipResult<WeatherResult> {
        block_on(self.get_weather_by_area_code(area_code, day, flags))
    }

    pub fn get_weather_by_coordinates_blocking(&self, latitude: f64, longitude: f64, day: u8, flags: WeatherRequestFlags) -> WipResult<WeatherResult> {
        block_on(self.get_weather_by_coordinates(latitude, longitude, day, flags))
    }

    pub fn send_report_blocking(&self, area_code: u32, reading: SensorReading) -> WipResult<String> {
        block_on(self.send_report(area_code, reading))
    }

    /// Future-returning mirror of `get_weather`: spawns onto the
    /// ambient tokio runtime and returns immediately. A caller who
    /// drops the handle lets the task run to its own deadline and
    /// discard its result — cancellation is not modelled.
    pub fn get_weather_future(&self, day: u8, flags: WeatherRequestFlags) -> JoinHandle<WipResult<WeatherResult>> {
        let client = self.clone();
        tokio::spawn(async move { client.get_weather(day, flags).await })
    }

    pub fn get_weather_by_area_code_future(&self, area_code: u32, day: u8, flags: WeatherRequestFlags) -> JoinHandle<WipResult<WeatherResult>> {
        let client = self.clone();
        tokio::spawn(async move { client.get_weather_by_area_code(area_code, day, flags).await })
    }

    pub fn get_weather_by_coordinates_future(&self, latitude: f64, longitude: f64, day: u8, flags: WeatherRequestFlags) -> JoinHandle<WipResult<WeatherResult>> {
        let client = self.clone();
        tokio::spawn(async move { client.get_weather_by_coordinates(latitude, longitude, day, flags).await })
    }

    pub fn send_report_future(&self, area_code: u32, reading: SensorReading) -> JoinHandle<WipResult<String>> {
        let client = self.clone();
        tokio::spawn(async move { client.send_report(area_code, reading).await })
    }
}

fn block_on<F: std::future::Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("failed to start an ephemeral runtime for a blocking WIP call")
        .block_on(future)
}
