//! HMAC-based message authentication (C7).
//!
//! Default algorithm is HMAC-SHA-256; MD5 and SHA-1 are selectable for
//! compatibility with a reference peer. The MAC is computed over
//! `"{packet_id}:{timestamp}:{passphrase}"`, keyed by the passphrase itself
//! — the passphrase appears in both key and message by protocol design, so
//! the hash stays bit-identical with a non-Rust peer computing the same
//! thing. Only the static compute/verify helpers are kept; this module is
//! purely functional and holds no session or token state.

use hmac::{Hmac, Mac};
use md5::Md5;
use sha1::Sha1;
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::wip_common_rs::packet::assembly::Packet;
use crate::wip_common_rs::packet::core::extensions::{self, Extension};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthAlgorithm {
    Md5,
    Sha1,
    Sha256,
}

impl AuthAlgorithm {
    /// Parses `WIP_AUTH_ALGO`-style names (`"md5"`, `"sha1"`, `"sha256"`);
    /// anything else falls back to the SHA-256 default.
    pub fn parse(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "md5" => Self::Md5,
            "sha1" => Self::Sha1,
            _ => Self::Sha256,
        }
    }

    pub fn digest_size(self) -> usize {
        match self {
            Self::Md5 => 16,
            Self::Sha1 => 20,
            Self::Sha256 => 32,
        }
    }
}

impl Default for AuthAlgorithm {
    fn default() -> Self {
        Self::Sha256
    }
}

fn mac_message(packet_id: u16, timestamp: u64, passphrase: &str) -> String {
    format!("{packet_id}:{timestamp}:{passphrase}")
}

/// Computes the raw MAC bytes over `"{packet_id}:{timestamp}:{passphrase}"`.
pub fn compute_mac(algo: AuthAlgorithm, packet_id: u16, timestamp: u64, passphrase: &str) -> Vec<u8> {
    let message = mac_message(packet_id, timestamp, passphrase);
    match algo {
        AuthAlgorithm::Md5 => {
            let mut mac = Hmac::<Md5>::new_from_slice(passphrase.as_bytes()).expect("HMAC accepts a key of any length");
            mac.update(message.as_bytes());
            mac.finalize().into_bytes().to_vec()
        }
        AuthAlgorithm::Sha1 => {
            let mut mac = Hmac::<Sha1>::new_from_slice(passphrase.as_bytes()).expect("HMAC accepts a key of any length");
            mac.update(message.as_bytes());
            mac.finalize().into_bytes().to_vec()
        }
        AuthAlgorithm::Sha256 => {
            let mut mac = Hmac::<Sha256>::new_from_slice(passphrase.as_bytes()).expect("HMAC accepts a key of any length");
            mac.update(message.as_bytes());
            mac.finalize().into_bytes().to_vec()
        }
    }
}

/// Lower-case ASCII hex of `compute_mac`, `2 * digest_size` characters long.
pub fn compute_mac_hex(algo: AuthAlgorithm, packet_id: u16, timestamp: u64, passphrase: &str) -> String {
    hex::encode(compute_mac(algo, packet_id, timestamp, passphrase))
}

/// Attaches an `AuthHash` extension and sets `flag_request_auth`. Returns
/// `false` without modifying the packet if `passphrase` is empty. Must run
/// before `Packet::encode` so the checksum covers the extension.
pub fn attach_auth_hash(packet: &mut Packet, algo: AuthAlgorithm, passphrase: &str) -> bool {
    if passphrase.is_empty() {
        return false;
    }
    let hex = compute_mac_hex(algo, packet.header.packet_id, packet.header.timestamp, passphrase);
    let ext =
        Extension::auth_hash(hex).expect("a hex-encoded digest is always far under the 1023-byte extension limit");
    packet.extensions.push(ext);
    packet.header.flag_extended = true;
    packet.header.flag_request_auth = true;
    true
}

/// Recomputes the MAC for `(pid, ts, passphrase)` and compares it in
/// constant time against the hex string in `received`'s AuthHash extension
/// (if any is present; absence or malformed hex fails closed).
pub fn verify_auth_hash(algo: AuthAlgorithm, packet_id: u16, timestamp: u64, passphrase: &str, received: &Packet) -> bool {
    let expected = compute_mac_hex(algo, packet_id, timestamp, passphrase);
    let Some(ext) = received.find_extension(extensions::KEY_AUTH_HASH) else {
        log::warn!("packet {packet_id:#06x} carries no AuthHash extension to verify");
        return false;
    };
    let Ok(actual) = std::str::from_utf8(&ext.payload) else {
        log::warn!("packet {packet_id:#06x} AuthHash extension is not valid UTF-8");
        return false;
    };
    if actual.len() != expected.len() || !bool::from(actual.as_bytes().ct_eq(expected.as_bytes())) {
        log::warn!("packet {packet_id:#06x} failed MAC verification");
        return false;
    }
    true
}
