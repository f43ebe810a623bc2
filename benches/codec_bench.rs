//! Criterion benchmark untuk codec dan loopback session
//!
//! Run dengan: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use cornflake::core::{Arena, DEFAULT_ARENA_CAPACITY};
use cornflake::network::{EchoSession, LoopbackTransport};
use cornflake::protocol::{EchoCodec, GetMessage};
use cornflake::EchoConfig;

fn bench_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec");
    group.throughput(Throughput::Elements(1));

    let arena = Arena::reserve(DEFAULT_ARENA_CAPACITY).unwrap();

    for field_size in [64usize, 1024, 4096] {
        let codec = EchoCodec::new(field_size);

        group.bench_function(format!("serialize_{}", field_size), |b| {
            b.iter(|| {
                let mut msg = GetMessage::default();
                black_box(codec.serialize(&mut msg, black_box(&arena)).unwrap());
            });
        });

        let mut msg = GetMessage::default();
        let sga = codec.serialize(&mut msg, &arena).unwrap();
        group.bench_function(format!("deserialize_{}", field_size), |b| {
            b.iter(|| {
                let back: GetMessage = codec.deserialize(black_box(&sga)).unwrap();
                black_box(back);
            });
        });
    }

    group.finish();
}

fn bench_loopback(c: &mut Criterion) {
    let mut group = c.benchmark_group("loopback");

    for field_size in [64usize, 4096] {
        group.throughput(Throughput::Bytes(field_size as u64));
        group.bench_function(format!("round_trip_{}", field_size), |b| {
            let config = EchoConfig::default().with_field_size(field_size);
            let mut session = EchoSession::new(&config, LoopbackTransport::default()).unwrap();
            b.iter(|| black_box(session.round_trip().unwrap()));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_codec, bench_loopback);
criterion_main!(benches);
