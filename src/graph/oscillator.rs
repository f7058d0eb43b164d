use crate::dsp::oscillator::{OscillatorBlock, Waveform};
use crate::graph::node::{GraphNode, RenderCtx};

/// Oscillator node.
///
/// Tracks the note pitch from the render context. Detune shifts the tracked pitch in cents, which is how
/// patches thicken a sound with a second, slightly sharp oscillator.
pub struct OscNode {
    osc: OscillatorBlock,
    detune_cents: f32,
    octave_ratio: f32,
}

impl OscNode {
    pub fn new(waveform: Waveform) -> Self {
        Self {
            osc: OscillatorBlock::new(waveform),
            detune_cents: 0.0,
            octave_ratio: 1.0,
        }
    }

    pub fn sine() -> Self {
        Self::new(Waveform::Sine)
    }

    pub fn sawtooth() -> Self {
        Self::new(Waveform::Saw)
    }

    pub fn square() -> Self {
        Self::new(Waveform::Square)
    }

    pub fn with_detune(mut self, cents: f32) -> Self {
        self.detune_cents = cents;
        self
    }

    /// Play `octaves` above (or below, when negative) the tracked pitch.
    pub fn with_octave(mut self, octaves: i32) -> Self {
        self.octave_ratio = 2.0_f32.powi(octaves);
        self
    }

    fn frequency(&self, ctx: &RenderCtx) -> f32 {
        let base = ctx.frequency * self.octave_ratio;
        if self.detune_cents == 0.0 {
            base
        } else {
            base * 2.0_f32.powf(self.detune_cents / 1200.0)
        }
    }
}

impl GraphNode for OscNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        let ctx = RenderCtx {
            frequency: self.frequency(ctx),
            ..*ctx
        };
        self.osc.render(out, &ctx);
    }

    fn note_on(&mut self, _ctx: &RenderCtx) {
        self.osc.reset();
    }
}
