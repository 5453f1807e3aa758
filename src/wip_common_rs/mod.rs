//! Protocol core (C1–C11): packet codec, auth, UDP transaction,
//! direct-mode orchestration, persistent cache, and the client facade.

pub mod auth;
pub mod cache;
pub mod facade;
pub mod orchestrator;
pub mod packet;
pub mod transactor;
pub mod utils;

pub use facade::WipClient;
