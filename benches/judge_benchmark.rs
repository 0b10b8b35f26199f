use beatlane::model::{JudgeWindows, Note};
use beatlane::play::judge::JudgmentEngine;
use beatlane::play::stream::NoteStream;
use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};

fn dense_stream(note_count: usize) -> NoteStream {
    let notes: Vec<Note> = (0..note_count)
        .map(|i| Note::tap(i % 6, 1000 + i as i64 * 40))
        .collect();
    let mut stream = NoteStream::new(notes, &JudgeWindows::base());
    stream.advance(i64::MAX / 2);
    stream
}

fn judge_press_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("judge");

    // An early out-of-window press scans every candidate without
    // resolving any, so one stream serves every iteration.
    group.bench_function("press_scan_dense_lane", |b| {
        let engine = JudgmentEngine::new(JudgeWindows::base());
        let mut stream = dense_stream(512);
        b.iter(|| {
            let outcome = engine.judge_press(black_box(&mut stream), black_box(0), black_box(500));
            black_box(outcome);
        });
    });

    group.bench_function("press_resolve", |b| {
        let engine = JudgmentEngine::new(JudgeWindows::base());
        b.iter_batched(
            || dense_stream(64),
            |mut stream| {
                let outcome =
                    engine.judge_press(black_box(&mut stream), black_box(0), black_box(1000));
                black_box(outcome);
            },
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

fn stream_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("stream");

    group.bench_function("advance_full_chart", |b| {
        let notes: Vec<Note> = (0..2048).map(|i| Note::tap(i % 6, i as i64 * 25)).collect();
        b.iter_batched(
            || NoteStream::new(notes.clone(), &JudgeWindows::base()),
            |mut stream| {
                stream.advance(black_box(i64::MAX / 2));
                black_box(stream.next_index());
            },
            BatchSize::SmallInput,
        );
    });

    group.bench_function("sweep_no_misses", |b| {
        let mut stream = dense_stream(512);
        b.iter(|| {
            let missed = stream.sweep_auto_miss(black_box(0));
            black_box(missed);
        });
    });

    group.finish();
}

criterion_group!(benches, judge_press_benchmark, stream_benchmark);
criterion_main!(benches);
