//! Benchmarks for a full session mix: every voice of a chart sounding at once.

use std::{hint::black_box, sync::Arc};

use astrosonic::synth::{SessionRenderer, SharedControls, SynthMessage, VoiceBank};
use astrosonic::{generate, Genre};
use criterion::{BenchmarkId, Criterion};
use rtrb::RingBuffer;

use super::sample_chart;
use crate::BLOCK_SIZES;

pub fn bench_session(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/session");
    let (timeline, _) = generate(&sample_chart(0.0), Genre::Orchestral);
    let instruments = timeline.instruments();

    for &size in BLOCK_SIZES {
        let (mut tx, rx) = RingBuffer::new(64);
        let bank = VoiceBank::new(&instruments, timeline.genre());
        let mut renderer = SessionRenderer::new(bank, rx, Arc::new(SharedControls::new(0.8)), 0.25);
        for (voice, _) in instruments.iter().enumerate() {
            let _ = tx.push(SynthMessage::NoteOn {
                voice,
                note_id: voice as u32,
                frequency: 110.0 * (voice + 1) as f32,
                velocity: 0.7,
            });
        }

        let mut stereo = vec![0.0f32; size * 2];
        group.bench_with_input(BenchmarkId::new("all_voices_stereo", size), &size, |b, _| {
            b.iter(|| {
                renderer.render_interleaved(black_box(&mut stereo), 2, 48_000.0);
            })
        });
    }

    group.finish();
}
