//! Monotonically incrementing 12-bit packet-id generator, mutex-protected
//! for sharing across concurrent transactions from one client.

use tokio::sync::Mutex;

#[derive(Debug)]
pub struct PacketIdGenerator {
    current: Mutex<u16>,
}

impl PacketIdGenerator {
    pub fn new() -> Self {
        Self { current: Mutex::new(1) }
    }

    /// Returns the next id and advances the counter, wrapping from 4095
    /// back to 1 (0 is skipped, matching the id space's reserved value).
    pub async fn next_id(&self) -> u16 {
        let mut current = self.current.lock().await;
        let id = *current;
        *current = if *current >= 0x0FFF { 1 } else { *current + 1 };
        id
    }
}

impl Default for PacketIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}
