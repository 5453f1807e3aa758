//! Packet codec: core bit/checksum/extension machinery, the fixed header
//! and response tail, whole-packet assembly, and the typed packet
//! constructors in `types`.

pub mod assembly;
pub mod core;
pub mod header;
pub mod tail;
pub mod types;

pub use assembly::Packet;
pub use header::{Header, PacketType, HEADER_LEN};
pub use tail::{ResponseTail, TAIL_LEN};
