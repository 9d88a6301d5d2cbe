use criterion::{black_box, criterion_group, criterion_main, Criterion};

use cogbench_core::similarity::{partial_credit, phoneme_accuracy, positional_accuracy};

fn bench_similarity(c: &mut Criterion) {
    let pairs = [
        ("cave", "cav"),
        ("dinosaur", "dinosuar"),
        ("magazine", "magasine"),
        ("knife", "nife"),
        ("tape", "taep"),
    ];

    let mut group = c.benchmark_group("similarity");
    group.bench_function("phoneme_accuracy", |b| {
        b.iter(|| {
            for (word, attempt) in &pairs {
                black_box(phoneme_accuracy(black_box(word), black_box(attempt)));
            }
        })
    });
    group.bench_function("positional_accuracy", |b| {
        b.iter(|| {
            for (word, attempt) in &pairs {
                black_box(positional_accuracy(black_box(word), black_box(attempt)));
            }
        })
    });
    group.bench_function("partial_credit", |b| {
        b.iter(|| {
            for (word, attempt) in &pairs {
                black_box(partial_credit(black_box(word), black_box(attempt)));
            }
        })
    });

    let long_word = "a".repeat(64) + &"b".repeat(64);
    let long_attempt = "b".repeat(64) + &"a".repeat(64);
    group.bench_function("phoneme_accuracy 128 chars", |b| {
        b.iter(|| phoneme_accuracy(black_box(&long_word), black_box(&long_attempt)))
    });
    group.finish();
}

criterion_group!(benches, bench_similarity);
criterion_main!(benches);
