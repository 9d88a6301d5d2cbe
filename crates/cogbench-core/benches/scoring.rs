use criterion::{black_box, criterion_group, criterion_main, Criterion};

use cogbench_core::model::{AttentionSession, Color, GridSize, SpellingSession, TimedRecallSession};
use cogbench_core::{AttentionScorer, AuditoryProcessingScorer, ProcessingSpeedScorer, Scorer};

const WORDS: [&str; 5] = ["magazine", "dinosaur", "knife", "tape", "cave"];

fn attention_sessions(n: u32) -> Vec<AttentionSession> {
    (1..=n)
        .map(|i| {
            let word = Color::ALL[i as usize % 5];
            let congruent = i % 3 == 0;
            let ink = if congruent { word } else { Color::ALL[(i as usize + 1) % 5] };
            AttentionSession {
                trial_number: i,
                is_congruent: congruent,
                word_shown: word,
                ink_color: ink,
                selected_color: ink,
                is_correct: i % 4 != 0,
                response_time_ms: 1500 + (i as u64 % 7) * 400,
            }
        })
        .collect()
}

fn spelling_sessions(n: u32) -> Vec<SpellingSession> {
    (1..=n)
        .map(|i| {
            let word = WORDS[i as usize % WORDS.len()];
            let typed = if i % 2 == 0 { word.to_string() } else { word[1..].to_string() };
            SpellingSession {
                trial_number: i,
                word: word.to_string(),
                is_correct: typed == word,
                partial_credit: 0.0,
                phoneme_accuracy: 0.5,
                user_spelling: typed,
                response_time_ms: 6000,
            }
        })
        .collect()
}

fn bench_attention(c: &mut Criterion) {
    let mut group = c.benchmark_group("attention");
    for n in [5u32, 500] {
        let mut scorer = AttentionScorer::new(n);
        for s in attention_sessions(n) {
            scorer.add_session(s);
        }
        group.bench_function(format!("score n={n}"), |b| b.iter(|| black_box(&scorer).score()));
        group.bench_function(format!("analysis n={n}"), |b| {
            b.iter(|| black_box(&scorer).analysis())
        });
    }
    group.finish();
}

fn bench_auditory(c: &mut Criterion) {
    let mut scorer = AuditoryProcessingScorer::new(500);
    for s in spelling_sessions(500) {
        scorer.add_session(s);
    }
    c.bench_function("auditory score n=500", |b| b.iter(|| black_box(&scorer).score()));
}

fn bench_processing_speed(c: &mut Criterion) {
    let mut scorer = ProcessingSpeedScorer::new(500);
    for i in 1..=500u32 {
        scorer.add_session(TimedRecallSession {
            trial_number: i,
            grid_size: GridSize::Four,
            sequence_length: i as usize,
            success: i % 2 == 0,
            completed_on_time: i % 5 != 0,
            attempts: 1,
            total_rounds: i,
            response_time_ms: 3000,
            allowed_time_ms: 7000,
        });
    }
    c.bench_function("processing speed score n=500", |b| {
        b.iter(|| black_box(&scorer).score())
    });
}

criterion_group!(benches, bench_attention, bench_auditory, bench_processing_speed);
criterion_main!(benches);
