use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use aegis_work::{validate_work, WorkGenerator, WorkTemplate};

fn bench_nonce_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("nonce_search");
    let generator = WorkGenerator::default();
    let template = WorkTemplate::new(b"1|1700000000000|[]|0000abcd");

    // Difficulty 4 and up is too slow to sample.
    for difficulty in [0u32, 1, 2, 3] {
        group.bench_with_input(
            BenchmarkId::new("generate", difficulty),
            &difficulty,
            |b, &diff| {
                b.iter(|| black_box(generator.generate(black_box(&template), black_box(diff)).unwrap()));
            },
        );
    }

    group.finish();
}

fn bench_block_hash(c: &mut Criterion) {
    // A block carrying ten mid-sized transactions.
    let prefix = vec![b'x'; 10 * 512];
    let template = WorkTemplate::new(&prefix);

    c.bench_function("template_hash", |b| {
        let mut nonce = 0u64;
        b.iter(|| {
            nonce += 1;
            black_box(template.hash(black_box(nonce)))
        });
    });
}

fn bench_difficulty_check(c: &mut Criterion) {
    let template = WorkTemplate::new(b"validate");
    let solution = WorkGenerator::default().generate(&template, 3).unwrap();

    c.bench_function("meets_difficulty", |b| {
        b.iter(|| black_box(validate_work(black_box(&solution.hash), black_box(3))))
    });

    c.bench_function("misses_difficulty", |b| {
        b.iter(|| black_box(validate_work(black_box(&solution.hash), black_box(64))))
    });
}

criterion_group!(benches, bench_nonce_search, bench_block_hash, bench_difficulty_check);
criterion_main!(benches);
