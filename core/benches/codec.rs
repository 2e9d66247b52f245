use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use mtc_core::compression::{decode, encode, LzParams};
use mtc_core::pipeline::{compress_bytes, ApiConfig, ParallelismProfile, PipelineConfig};

fn text_like(len: usize) -> Vec<u8> {
    let mut state = 0x2545_f491_u32;
    let mut out = Vec::with_capacity(len);
    while out.len() < len {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        // Narrow alphabet so the encoder finds matches.
        out.push(b"etaoin shrdlu"[(state % 13) as usize]);
    }
    out
}

fn bench_codec(c: &mut Criterion) {
    let data = text_like(256 * 1024);
    let mut group = c.benchmark_group("lz77");
    group.throughput(Throughput::Bytes(data.len() as u64));

    for window in [256usize, 4096] {
        let params = LzParams::new(window, 255).unwrap();
        group.bench_with_input(BenchmarkId::new("encode", window), &params, |b, p| {
            b.iter(|| encode(black_box(&data), p))
        });
    }

    let stream = encode(&data, &LzParams::default());
    group.bench_function("decode", |b| b.iter(|| decode(black_box(&stream)).unwrap()));
    group.finish();
}

fn bench_pipeline(c: &mut Criterion) {
    let data = text_like(4 * 1024 * 1024);
    let mut group = c.benchmark_group("pipeline");
    group.throughput(Throughput::Bytes(data.len() as u64));
    group.sample_size(10);

    for workers in [1usize, 4] {
        let cfg = ApiConfig::new(
            PipelineConfig::default().with_chunk_size(256 * 1024),
            ParallelismProfile::with_workers(workers),
        );
        group.bench_with_input(BenchmarkId::new("compress", workers), &cfg, |b, cfg| {
            b.iter(|| compress_bytes(data.clone(), cfg).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_codec, bench_pipeline);
criterion_main!(benches);
