//! Client library for the Weather Information Protocol (WIP): a
//! compact, bit-packed, UDP-oriented request/response protocol for
//! weather observations, coordinate-to-area-code resolution, and
//! sensor reports.
//!
//! The protocol core is the center of gravity here: the bit-exact
//! packet codec with its 12-bit folded checksum, the variable
//! extended-field layer, HMAC-based authentication bit-compatible with
//! a non-Rust peer, the direct-mode client state machine, and a
//! persistent coordinate cache. CLI front-ends, debug formatters, mock
//! servers, and benchmark harnesses are external collaborators, not
//! part of this crate.
//!
//! ```no_run
//! use wip_client::prelude::*;
//!
//! # async fn run() -> WipResult<()> {
//! let client = WipClient::from_env()?;
//! client.set_area_code(130_010);
//! let weather = client.get_weather(0, WeatherRequestFlags { weather: true, temperature: true, ..Default::default() }).await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod wip_common_rs;

/// Common imports for WIP client users.
pub mod prelude {
    pub use crate::config::{EndpointConfig, WipConfig};
    pub use crate::error::{WipError, WipResult};
    pub use crate::wip_common_rs::auth::AuthAlgorithm;
    pub use crate::wip_common_rs::facade::WipClient;
    pub use crate::wip_common_rs::orchestrator::WeatherResult;
    pub use crate::wip_common_rs::packet::assembly::Packet;
    pub use crate::wip_common_rs::packet::header::{Header, PacketType};
    pub use crate::wip_common_rs::packet::types::weather::WeatherRequestFlags;
}
