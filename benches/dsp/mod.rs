//! Benchmarks for low-level DSP primitives.

mod filter;
mod oscillator;

pub use filter::bench_filter;
pub use oscillator::bench_oscillator;
