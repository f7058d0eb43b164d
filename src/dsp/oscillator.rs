use std::f32::consts::TAU;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::graph::node::RenderCtx;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Saw,
    Square,
    Triangle,
    Noise,
}

/// Phase-accumulating oscillator.
///
/// Phase runs in [0, 1); the waveform shapes are computed directly from it.
/// Noise ignores the phase and draws from a xorshift generator so renders stay
/// reproducible.
pub struct OscillatorBlock {
    waveform: Waveform,
    phase: f32,
    noise_state: u32,
}

const NOISE_SEED: u32 = 0x9E37_79B9;

impl OscillatorBlock {
    pub fn new(waveform: Waveform) -> Self {
        Self {
            waveform,
            phase: 0.0,
            noise_state: NOISE_SEED,
        }
    }

    pub fn waveform(&self) -> Waveform {
        self.waveform
    }

    /// Restart the cycle (called on note-on so attacks line up).
    pub fn reset(&mut self) {
        self.phase = 0.0;
        self.noise_state = NOISE_SEED;
    }

    fn next_noise(&mut self) -> f32 {
        let mut x = self.noise_state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.noise_state = x;
        (x as f32 / u32::MAX as f32) * 2.0 - 1.0
    }

    pub fn next_sample(&mut self, frequency: f32, sample_rate: f32) -> f32 {
        let sample = match self.waveform {
            Waveform::Sine => (TAU * self.phase).sin(),
            Waveform::Saw => 2.0 * self.phase - 1.0,
            Waveform::Square => {
                if self.phase < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
            Waveform::Triangle => 1.0 - 4.0 * (self.phase - 0.5).abs(),
            Waveform::Noise => self.next_noise(),
        };

        self.phase = (self.phase + frequency / sample_rate).fract();
        sample
    }

    pub fn render(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        for sample in out.iter_mut() {
            *sample = self.next_sample(ctx.frequency, ctx.sample_rate);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(waveform: Waveform, frequency: f32, frames: usize) -> Vec<f32> {
        let ctx = RenderCtx::new(48_000.0, frequency, 1.0);
        let mut osc = OscillatorBlock::new(waveform);
        let mut buffer = vec![0.0; frames];
        osc.render(&mut buffer, &ctx);
        buffer
    }

    #[test]
    fn sine_matches_closed_form() {
        let buffer = render(Waveform::Sine, 440.0, 64);
        let expected = (TAU * 440.0 * 12.0 / 48_000.0).sin();
        assert!((buffer[12] - expected).abs() < 1e-4);
    }

    #[test]
    fn every_waveform_stays_in_unit_range() {
        for waveform in [
            Waveform::Sine,
            Waveform::Saw,
            Waveform::Square,
            Waveform::Triangle,
            Waveform::Noise,
        ] {
            let buffer = render(waveform, 220.0, 512);
            assert!(
                buffer.iter().all(|s| (-1.0..=1.0).contains(s)),
                "{waveform:?} left [-1, 1]"
            );
        }
    }

    #[test]
    fn noise_is_reproducible_after_reset() {
        let ctx = RenderCtx::new(48_000.0, 0.0, 1.0);
        let mut osc = OscillatorBlock::new(Waveform::Noise);
        let mut first = vec![0.0; 32];
        osc.render(&mut first, &ctx);
        osc.reset();
        let mut second = vec![0.0; 32];
        osc.render(&mut second, &ctx);
        assert_eq!(first, second);
        assert!(first.iter().any(|&s| s != first[0]));
    }
}
