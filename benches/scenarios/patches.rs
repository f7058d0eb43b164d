//! Benchmarks for every instrument patch as a single held note.

use std::hint::black_box;

use astrosonic::graph::node::{GraphNode, RenderCtx};
use astrosonic::patch::Patch;
use astrosonic::{Genre, InstrumentClass};
use criterion::{BenchmarkId, Criterion};

pub fn bench_patches(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/patches");
    let ctx = RenderCtx::new(48_000.0, 220.0, 0.8);
    let size = 256;

    for instrument in InstrumentClass::ALL {
        let mut buffer = vec![0.0f32; size];
        let mut voice = Patch::for_instrument(instrument, Genre::Electronic).build();
        voice.note_on(&ctx);

        group.bench_with_input(BenchmarkId::new(instrument.name(), size), &size, |b, _| {
            b.iter(|| {
                voice.render_block(black_box(&mut buffer), black_box(&ctx));
            })
        });
    }

    group.finish();
}
