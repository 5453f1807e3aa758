//! Packet assembly: header + optional response tail + ordered extensions,
//! checksummed as one unit.

use crate::error::{WipError, WipResult};
use crate::wip_common_rs::packet::core::{checksum, extensions};
use crate::wip_common_rs::packet::core::extensions::Extension;
use crate::wip_common_rs::packet::header::{Header, HEADER_LEN};
use crate::wip_common_rs::packet::tail::{ResponseTail, TAIL_LEN};

#[derive(Debug, Clone, PartialEq)]
pub struct Packet {
    pub header: Header,
    pub response_tail: Option<ResponseTail>,
    pub extensions: Vec<Extension>,
}

impl Packet {
    pub fn new(header: Header, response_tail: Option<ResponseTail>, extensions: Vec<Extension>) -> WipResult<Self> {
        if header.packet_type.has_response_tail() != response_tail.is_some() {
            return Err(WipError::InvalidPacket(format!(
                "packet type {:?} requires response-tail presence {}, got {}",
                header.packet_type,
                header.packet_type.has_response_tail(),
                response_tail.is_some()
            )));
        }
        Ok(Self { header, response_tail, extensions })
    }

    pub fn find_extension(&self, key: u8) -> Option<&Extension> {
        self.extensions.iter().find(|ext| ext.key == key)
    }

    /// Emits header (checksum deferred), tail, then extensions in order,
    /// and finally patches the whole-packet Checksum-12 into place.
    pub fn encode(&self) -> WipResult<Vec<u8>> {
        let mut header = self.header;
        header.flag_extended = !self.extensions.is_empty();
        let mut buf = header.encode()?.to_vec();
        if let Some(tail) = &self.response_tail {
            buf.extend_from_slice(&tail.encode());
        }
        buf.extend_from_slice(&extensions::encode_extensions(&self.extensions)?);
        checksum::embed_checksum12(&mut buf);
        Ok(buf)
    }

    /// Verifies the checksum over the whole buffer, then parses header,
    /// response tail (if the type demands one), and extensions in order.
    pub fn decode(buf: &[u8]) -> WipResult<Self> {
        if buf.len() < HEADER_LEN {
            return Err(WipError::InvalidPacket("packet shorter than the 16-byte header".into()));
        }
        if !checksum::verify_checksum12(buf) {
            return Err(WipError::ChecksumMismatch);
        }
        let header = Header::parse_fields(&buf[..HEADER_LEN])?;
        let mut pos = HEADER_LEN;
        let response_tail = if header.packet_type.has_response_tail() {
            if buf.len() < pos + TAIL_LEN {
                return Err(WipError::InvalidPacket("response packet missing its 4-byte tail".into()));
            }
            let tail = ResponseTail::decode(&buf[pos..pos + TAIL_LEN])?;
            pos += TAIL_LEN;
            Some(tail)
        } else {
            None
        };
        let extensions = extensions::decode_extensions(&buf[pos..])?;
        Packet::new(header, response_tail, extensions)
    }
}
