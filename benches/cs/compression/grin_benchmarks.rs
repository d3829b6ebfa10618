use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use grin::{decode_bytes, encode_bytes};

fn generate_test_data(size: usize, data_type: &str) -> Vec<u8> {
    match data_type {
        "text" => {
            let alphabet = b"etaoin shrdlu cmfwyp vbgkqjxz";
            (0..size)
                .map(|i| alphabet[(i * i + 7 * i) % alphabet.len()])
                .collect()
        }
        "uniform" => (0..size).map(|i| ((i * 7 + 13) % 256) as u8).collect(),
        "repetitive" => vec![b'A'; size],
        _ => panic!("unknown data type {}", data_type),
    }
}

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("grin_encode");
    for data_type in ["text", "uniform", "repetitive"] {
        for &size in &[1024, 64 * 1024, 1024 * 1024] {
            let data = generate_test_data(size, data_type);
            group.throughput(Throughput::Bytes(size as u64));
            group.bench_with_input(
                BenchmarkId::new(data_type, size),
                &data,
                |b, data| b.iter(|| encode_bytes(black_box(data)).unwrap()),
            );
        }
    }
    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("grin_decode");
    for data_type in ["text", "uniform", "repetitive"] {
        for &size in &[1024, 64 * 1024, 1024 * 1024] {
            let encoded = encode_bytes(&generate_test_data(size, data_type)).unwrap();
            group.throughput(Throughput::Bytes(size as u64));
            group.bench_with_input(
                BenchmarkId::new(data_type, size),
                &encoded,
                |b, encoded| b.iter(|| decode_bytes(black_box(encoded)).unwrap()),
            );
        }
    }
    group.finish();
}

criterion_group!(benches, bench_encode, bench_decode);
criterion_main!(benches);
