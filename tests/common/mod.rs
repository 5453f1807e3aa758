//! Shared helpers for the integration suite: a minimal fake WIP peer
//! bound to an ephemeral UDP port, used in place of a real location
//! resolver / query generator / report endpoint.

use tokio::net::UdpSocket;

use wip_client::wip_common_rs::auth::{self, AuthAlgorithm};
use wip_client::wip_common_rs::packet::assembly::Packet;
use wip_client::wip_common_rs::packet::header::PacketType;
use wip_client::wip_common_rs::packet::types::location::coordinate_response;
use wip_client::wip_common_rs::packet::types::report::report_response;
use wip_client::wip_common_rs::packet::types::weather::{weather_response, WeatherResponseData};

/// Binds a fake peer that answers exactly one request, matching its
/// reply's `area_code` and a canned payload to the request's type, and
/// returns its socket address.
pub async fn spawn_fake_peer(area_code: u32) -> std::net::SocketAddr {
    let _ = env_logger::builder().is_test(true).try_init();

    let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let addr = socket.local_addr().unwrap();

    tokio::spawn(async move {
        let mut buf = [0u8; 2048];
        let (len, client_addr) = socket.recv_from(&mut buf).await.unwrap();
        let request = Packet::decode(&buf[..len]).unwrap();
        let packet_id = request.header.packet_id;
        let timestamp = request.header.timestamp;

        let response = match request.header.packet_type {
            PacketType::CoordinateRequest => coordinate_response(packet_id, timestamp, area_code).unwrap(),
            PacketType::WeatherRequest => weather_response(
                packet_id,
                timestamp,
                area_code,
                request.header.day,
                &WeatherResponseData {
                    weather_code: 100,
                    temperature_celsius: 25,
                    precipitation_prob: 40,
                    alerts: vec![],
                    disasters: vec![],
                },
            )
            .unwrap(),
            PacketType::ReportRequest => report_response(packet_id, timestamp, area_code, "ok").unwrap(),
            other => panic!("fake peer received an unexpected packet type: {other:?}"),
        };

        socket.send_to(&response.encode().unwrap(), client_addr).await.unwrap();
    });

    addr
}

/// A fake query generator that stamps its `WeatherResponse` with its own
/// timestamp (deliberately different from the request's) and attaches a
/// response-auth hash computed over that response timestamp, the way a
/// real peer would. Exercises response-auth verification against a peer
/// that does not merely echo the request's clock.
pub async fn spawn_fake_peer_with_response_auth(area_code: u32, passphrase: &'static str) -> std::net::SocketAddr {
    let _ = env_logger::builder().is_test(true).try_init();

    let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let addr = socket.local_addr().unwrap();

    tokio::spawn(async move {
        let mut buf = [0u8; 2048];
        let (len, client_addr) = socket.recv_from(&mut buf).await.unwrap();
        let request = Packet::decode(&buf[..len]).unwrap();
        let packet_id = request.header.packet_id;
        let response_timestamp = request.header.timestamp + 12_345;

        let mut response = weather_response(
            packet_id,
            response_timestamp,
            area_code,
            request.header.day,
            &WeatherResponseData {
                weather_code: 100,
                temperature_celsius: 25,
                precipitation_prob: 40,
                alerts: vec![],
                disasters: vec![],
            },
        )
        .unwrap();
        auth::attach_auth_hash(&mut response, AuthAlgorithm::Sha256, passphrase);

        socket.send_to(&response.encode().unwrap(), client_addr).await.unwrap();
    });

    addr
}

/// A fake location resolver that always answers with `area_code`, and
/// a fake query generator that always answers with a fixed weather
/// payload — run on two distinct sockets so a direct-mode transaction
/// exercises a real two-endpoint resolve-then-query round trip.
pub async fn spawn_fake_location_and_query_servers(area_code: u32) -> (std::net::SocketAddr, std::net::SocketAddr) {
    (spawn_fake_peer(area_code).await, spawn_fake_peer(area_code).await)
}
