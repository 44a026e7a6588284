use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use squeez::Codec;

fn sample_text(len: usize) -> String {
    let mut rng = StdRng::seed_from_u64(42);
    // skewed towards the first letters, like natural text
    let alphabet: Vec<char> = "eeeeettttaaaoooiinnsshrdlu \n.,é€".chars().collect();
    (0..len)
        .map(|_| alphabet[rng.gen_range(0..alphabet.len())])
        .collect()
}

fn bench_encode(c: &mut Criterion) {
    let codec = Codec::default();
    let mut group = c.benchmark_group("encode");
    for size in [1_024, 65_536, 1_048_576] {
        let text = sample_text(size);
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &text, |b, text| {
            b.iter(|| codec.encode(black_box(text)).unwrap())
        });
    }
    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let codec = Codec::default();
    let mut group = c.benchmark_group("decode");
    for size in [1_024, 65_536, 1_048_576] {
        let text = sample_text(size);
        let frame = codec.encode(&text).unwrap();
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &frame, |b, frame| {
            b.iter(|| codec.decode(black_box(frame)).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_encode, bench_decode);
criterion_main!(benches);
