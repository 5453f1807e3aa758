//! Configuration loaded from the environment, per the external interfaces
//! table: per-role endpoints, per-role auth enablement and passphrases, a
//! process-wide response-verification toggle, and the default hash
//! algorithm. `dotenvy` is invoked once so a local `.env` file populates
//! `std::env` before any of these are read, matching the pattern already
//! used by the async clients this crate's config loader descends from.

use std::env;

use crate::error::{WipError, WipResult};
use crate::wip_common_rs::auth::AuthAlgorithm;

fn env_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn env_port(name: &str, default: u16) -> WipResult<u16> {
    match env::var(name) {
        Ok(value) => value
            .parse()
            .map_err(|_| WipError::InvalidPacket(format!("{name} is not a valid port number: {value}"))),
        Err(_) => Ok(default),
    }
}

fn env_flag(name: &str) -> bool {
    env::var(name).map(|v| v.eq_ignore_ascii_case("true")).unwrap_or(false)
}

#[derive(Debug, Clone)]
pub struct EndpointConfig {
    pub host: String,
    pub port: u16,
    pub auth_enabled: bool,
    pub passphrase: String,
}

#[derive(Debug, Clone)]
pub struct WipConfig {
    pub location_resolver: EndpointConfig,
    pub query_generator: EndpointConfig,
    pub weather_proxy: EndpointConfig,
    pub report_endpoint: EndpointConfig,
    pub verify_response_auth: bool,
    pub auth_algorithm: AuthAlgorithm,
    pub coordinate_cache_path: String,
    pub coordinate_cache_ttl_secs: u64,
}

impl WipConfig {
    /// Loads a `.env` file if present (a missing file is not an error),
    /// then reads every field from the environment, falling back to the
    /// documented defaults.
    pub fn load() -> WipResult<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            location_resolver: EndpointConfig {
                host: env_or("LOCATION_RESOLVER_HOST", "127.0.0.1"),
                port: env_port("LOCATION_RESOLVER_PORT", 4109)?,
                auth_enabled: env_flag("LOCATION_REQUEST_AUTH_ENABLED"),
                passphrase: env_or("LOCATION_SERVER_PASSPHRASE", ""),
            },
            query_generator: EndpointConfig {
                host: env_or("QUERY_GENERATOR_HOST", "127.0.0.1"),
                port: env_port("QUERY_GENERATOR_PORT", 4111)?,
                auth_enabled: env_flag("QUERY_REQUEST_AUTH_ENABLED"),
                passphrase: env_or("QUERY_SERVER_PASSPHRASE", ""),
            },
            weather_proxy: EndpointConfig {
                host: env_or("WEATHER_SERVER_HOST", "127.0.0.1"),
                port: env_port("WEATHER_SERVER_PORT", 4110)?,
                auth_enabled: env_flag("WEATHER_REQUEST_AUTH_ENABLED"),
                passphrase: env_or("WEATHER_SERVER_PASSPHRASE", ""),
            },
            report_endpoint: EndpointConfig {
                host: env_or("QUERY_GENERATOR_HOST", "127.0.0.1"),
                port: env_port("REPORT_SERVER_PORT", 4112)?,
                auth_enabled: env_flag("REPORT_REQUEST_AUTH_ENABLED"),
                passphrase: env_or("REPORT_SERVER_PASSPHRASE", ""),
            },
            verify_response_auth: env_flag("WIP_CLIENT_VERIFY_RESPONSE_AUTH"),
            auth_algorithm: AuthAlgorithm::parse(&env_or("WIP_AUTH_ALGO", "sha256")),
            coordinate_cache_path: env_or("WIP_COORDINATE_CACHE_PATH", "coordinate_cache.json"),
            coordinate_cache_ttl_secs: env::var("WIP_COORDINATE_CACHE_TTL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3600),
        })
    }
}
