use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use wip_client::wip_common_rs::packet::core::checksum::{calc_checksum12, embed_checksum12, verify_checksum12};
use wip_client::wip_common_rs::packet::types::location::coordinate_request;

fn benchmark_coordinate_request_creation(c: &mut Criterion) {
    c.bench_function("coordinate_request_creation", |b| {
        b.iter(|| {
            let packet = coordinate_request(
                black_box(12_345),
                black_box(1_700_000_000),
                black_box(35.6812),
                black_box(139.7671),
            );
            black_box(packet)
        });
    });
}

fn benchmark_coordinate_request_encoding(c: &mut Criterion) {
    let packet = coordinate_request(12_345, 1_700_000_000, 35.6812, 139.7671).unwrap();

    c.bench_function("coordinate_request_encoding", |b| {
        b.iter(|| black_box(packet.encode()));
    });
}

fn benchmark_checksum_calculation(c: &mut Criterion) {
    let mut group = c.benchmark_group("checksum_calculation");

    for size in [16, 64, 256, 1024] {
        let data: Vec<u8> = (0..size).map(|i| (i % 256) as u8).collect();
        group.bench_with_input(BenchmarkId::new("calc_checksum12", size), &data, |b, data| {
            b.iter(|| black_box(calc_checksum12(black_box(data))));
        });
    }

    group.finish();
}

fn benchmark_checksum_embed_and_verify(c: &mut Criterion) {
    let header: Vec<u8> = (0..16).map(|i| (i * 17) as u8).collect();

    c.bench_function("checksum_embed", |b| {
        b.iter(|| {
            let mut buf = header.clone();
            embed_checksum12(black_box(&mut buf));
            black_box(buf)
        });
    });

    let mut verified = header.clone();
    embed_checksum12(&mut verified);
    c.bench_function("checksum_verify", |b| {
        b.iter(|| black_box(verify_checksum12(black_box(&verified))));
    });
}

fn benchmark_bulk_coordinate_requests(c: &mut Criterion) {
    let mut group = c.benchmark_group("bulk_operations");

    for count in [10, 50, 100] {
        group.bench_with_input(BenchmarkId::new("bulk_coordinate_requests", count), &count, |b, &count| {
            b.iter(|| {
                let mut encoded = Vec::with_capacity(count);
                for i in 0..count {
                    let lat = 35.0 + (i as f64 * 0.001);
                    let lon = 139.0 + (i as f64 * 0.001);
                    let packet = coordinate_request(i as u16, 1_700_000_000, lat, lon).unwrap();
                    encoded.push(packet.encode().unwrap());
                }
                black_box(encoded)
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_coordinate_request_creation,
    benchmark_coordinate_request_encoding,
    benchmark_checksum_calculation,
    benchmark_checksum_embed_and_verify,
    benchmark_bulk_coordinate_requests,
);

criterion_main!(benches);
