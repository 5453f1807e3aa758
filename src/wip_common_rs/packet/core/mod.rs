//! Packet core: checksum, bit-level codec, and extension framing.

pub mod bitcodec;
pub mod checksum;
pub mod extensions;

pub use checksum::{calc_checksum12, embed_checksum12, verify_checksum12};
pub use extensions::{decode_extensions, encode_extensions, Extension};
