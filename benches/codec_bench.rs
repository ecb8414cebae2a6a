use criterion::{criterion_group, criterion_main, BatchSize, Criterion, Throughput};
use glyphwire::config::PROTOCOL_UTF8_TEXT;
use glyphwire::core::codec::{bytes_to_string, string_to_bytes};
use glyphwire::protocol::registry::{Payload, ProtocolRegistry};
use glyphwire::utils::crypto::{AesCbc, DesBlock};
use glyphwire::Carrier;
use rand::rngs::mock::StepRng;

#[allow(clippy::unwrap_used)]
fn bench_glyph_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("glyph_codec");
    let payload_sizes = [64usize, 280, 2048, 65536];

    for &size in &payload_sizes {
        let data = vec![0x5Au8; size];
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_function(format!("encode_{size}b"), |b| {
            b.iter(|| {
                let rendered = bytes_to_string(&data);
                assert!(rendered.is_ok());
            })
        });
        group.bench_function(format!("decode_{size}b"), |b| {
            let rendered = bytes_to_string(&data).unwrap();
            b.iter(|| {
                let recovered = string_to_bytes(&rendered);
                assert!(recovered.is_ok());
            })
        });
    }

    group.finish();
}

#[allow(clippy::unwrap_used)]
fn bench_carrier_round_trip(c: &mut Criterion) {
    let mut group = c.benchmark_group("carrier_round_trip");
    let payload_sizes = [64usize, 271, 816, 4096];

    for &size in &payload_sizes {
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_function(format!("encode_{size}b"), |b| {
            b.iter_batched(
                || {
                    (
                        Carrier::new(
                            AesCbc::new([0x42; 16]),
                            DesBlock::new([0x17; 8]),
                            StepRng::new(0, 0x9E37_79B9),
                            ProtocolRegistry::with_builtin(),
                        ),
                        Payload::Utf8("a".repeat(size)),
                    )
                },
                |(mut carrier, payload)| {
                    let units = carrier.encode(PROTOCOL_UTF8_TEXT, &payload);
                    assert!(units.is_ok());
                },
                BatchSize::SmallInput,
            )
        });
        group.bench_function(format!("decode_{size}b"), |b| {
            let mut carrier = Carrier::new(
                AesCbc::new([0x42; 16]),
                DesBlock::new([0x17; 8]),
                StepRng::new(0, 0x9E37_79B9),
                ProtocolRegistry::with_builtin(),
            );
            let units = carrier
                .encode(PROTOCOL_UTF8_TEXT, &Payload::Utf8("a".repeat(size)))
                .unwrap();
            b.iter(|| {
                let decoded = carrier.decode(&units);
                assert!(decoded.is_ok());
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_glyph_codec, bench_carrier_round_trip);
criterion_main!(benches);
