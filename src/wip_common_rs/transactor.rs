//! UDP transactor (C8): single-request/single-response correlation by
//! packet id, one dedicated socket per transaction. Grounded on the
//! send/receive-loop already used by `LocationClientImpl::send_location_request`
//! and `WeatherClientAsync::receive_with_id`, narrowed to an exact
//! discard-and-continue contract: no retransmission, no buffering of
//! mismatched datagrams, no connection pooling.

use std::net::SocketAddr;
use std::time::{Duration, Instant};

use tokio::net::UdpSocket;
use tokio::time::timeout as tokio_timeout;

use crate::error::{WipError, WipResult};
use crate::wip_common_rs::packet::assembly::Packet;
use crate::wip_common_rs::packet::core::bitcodec;
use crate::wip_common_rs::packet::header::HEADER_LEN;

const RECV_BUF_LEN: usize = 2048;

pub const DEFAULT_RECV_TIMEOUT: Duration = Duration::from_millis(500);
pub const DEFAULT_DEADLINE: Duration = Duration::from_secs(10);

/// Resolves `host` (an IPv4 literal or a hostname needing an A-record
/// lookup), opens a socket bound for this transaction alone, sends
/// `request`, then loops receiving until a datagram whose 12-bit
/// packet id matches `expected_pid` arrives or `deadline` elapses.
/// Datagrams under 16 bytes or with a mismatched id are discarded and
/// never surface to the caller.
pub async fn transact(
    host: &str,
    port: u16,
    request: &[u8],
    expected_pid: u16,
    recv_timeout: Duration,
    deadline: Duration,
) -> WipResult<Packet> {
    let addr = resolve(host, port).await?;

    let socket = UdpSocket::bind("0.0.0.0:0").await?;
    socket.send_to(request, addr).await?;
    log::debug!("sent {} bytes to {addr} for pid {expected_pid:#06x}", request.len());

    let start = Instant::now();
    let mut buf = [0u8; RECV_BUF_LEN];
    loop {
        let remaining = deadline.checked_sub(start.elapsed()).unwrap_or(Duration::ZERO);
        if remaining.is_zero() {
            log::warn!("transaction with {addr} timed out waiting for pid {expected_pid:#06x}");
            return Err(WipError::Timeout);
        }
        let per_recv = remaining.min(recv_timeout);
        match tokio_timeout(per_recv, socket.recv_from(&mut buf)).await {
            Ok(Ok((len, from))) => {
                if len < HEADER_LEN {
                    log::debug!("discarding {len}-byte datagram from {from}: shorter than a header");
                    continue;
                }
                let pid = bitcodec::get_bits(&buf[..len], 4, 12) as u16;
                if pid != expected_pid {
                    log::debug!("discarding datagram from {from} with mismatched pid {pid:#06x}");
                    continue;
                }
                log::debug!("received {len}-byte response from {from} for pid {pid:#06x}");
                return Packet::decode(&buf[..len]);
            }
            Ok(Err(e)) => return Err(WipError::Io(e)),
            Err(_) => continue,
        }
    }
}

async fn resolve(host: &str, port: u16) -> WipResult<SocketAddr> {
    if let Ok(ip) = host.parse::<std::net::IpAddr>() {
        return Ok(SocketAddr::new(ip, port));
    }
    tokio::net::lookup_host((host, port))
        .await?
        .next()
        .ok_or_else(|| WipError::Io(std::io::Error::new(std::io::ErrorKind::NotFound, format!("no A record for {host}"))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wip_common_rs::packet::header::{Header, PacketType};
    use crate::wip_common_rs::packet::tail::ResponseTail;

    fn weather_response_packet(packet_id: u16) -> Vec<u8> {
        let header = Header {
            version: 1,
            packet_id,
            packet_type: PacketType::WeatherResponse,
            flag_weather: true,
            flag_temperature: true,
            flag_precipitation: true,
            flag_alert: false,
            flag_disaster: false,
            flag_extended: false,
            flag_request_auth: false,
            flag_response_auth: false,
            day: 0,
            timestamp: 1_000,
            area_code: 130_010,
        };
        let tail = ResponseTail::from_celsius(100, 25, 40).unwrap();
        Packet::new(header, Some(tail), Vec::new()).unwrap().encode().unwrap()
    }

    #[tokio::test]
    async fn scenario_s5_ignores_mismatched_pid_then_returns_the_matching_datagram() {
        let server = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let server_addr = server.local_addr().unwrap();

        let responder = tokio::spawn(async move {
            let mut buf = [0u8; RECV_BUF_LEN];
            let (_, client_addr) = server.recv_from(&mut buf).await.unwrap();
            server.send_to(&weather_response_packet(999), client_addr).await.unwrap();
            server.send_to(&weather_response_packet(0x123), client_addr).await.unwrap();
        });

        let result = transact(
            &server_addr.ip().to_string(),
            server_addr.port(),
            &[0u8; 16],
            0x123,
            Duration::from_millis(200),
            Duration::from_secs(2),
        )
        .await
        .unwrap();

        responder.await.unwrap();
        assert_eq!(result.header.packet_id, 0x123);
    }

    #[tokio::test]
    async fn times_out_without_a_matching_datagram() {
        let server = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let server_addr = server.local_addr().unwrap();
        let _keep_alive = server;

        let result = transact(
            &server_addr.ip().to_string(),
            server_addr.port(),
            &[0u8; 16],
            0x123,
            Duration::from_millis(50),
            Duration::from_millis(200),
        )
        .await;

        assert!(matches!(result, Err(WipError::Timeout)));
    }
}
