use crate::{graph::node::RenderCtx, MIN_TIME};

/*
Linear ADSR
===========

    level
      1 ┐   ╱╲
      S │  ╱  ╲_________
        │ ╱             ╲
      0 └╱───────────────╲──→ t
         A  D     S      R

Gate on starts Attack from zero. Gate off starts Release from whatever level
the envelope is at, so releasing mid-attack does not click. Release is
interpolated over a sample count fixed at gate-off, which lands exactly on 0.
*/

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeStage {
    Idle,
    Attack,
    Decay,
    Sustain,
    Release,
}

pub struct Envelope {
    attack: f32,
    decay: f32,
    sustain: f32,
    release: f32,

    stage: EnvelopeStage,
    level: f32,

    release_from: f32,
    release_samples: u32,
    release_elapsed: u32,
}

impl Envelope {
    /// Times in seconds, sustain as a level in [0, 1].
    pub fn adsr(attack: f32, decay: f32, sustain: f32, release: f32) -> Self {
        Self {
            attack: attack.max(MIN_TIME),
            decay: decay.max(MIN_TIME),
            sustain: sustain.clamp(0.0, 1.0),
            release: release.max(MIN_TIME),
            stage: EnvelopeStage::Idle,
            level: 0.0,
            release_from: 0.0,
            release_samples: 1,
            release_elapsed: 0,
        }
    }

    pub fn note_on(&mut self) {
        self.level = 0.0;
        self.release_elapsed = 0;
        self.stage = EnvelopeStage::Attack;
    }

    pub fn note_off(&mut self, ctx: &RenderCtx) {
        if self.stage == EnvelopeStage::Idle {
            return;
        }
        self.release_from = self.level;
        self.release_samples = (self.release * ctx.sample_rate).round().max(1.0) as u32;
        self.release_elapsed = 0;
        self.stage = EnvelopeStage::Release;
    }

    /// Drop straight to silence without a release tail.
    pub fn kill(&mut self) {
        self.stage = EnvelopeStage::Idle;
        self.level = 0.0;
        self.release_elapsed = 0;
    }

    pub fn next_sample(&mut self, ctx: &RenderCtx) -> f32 {
        match self.stage {
            EnvelopeStage::Idle => self.level = 0.0,
            EnvelopeStage::Attack => {
                self.level += 1.0 / (self.attack * ctx.sample_rate);
                if self.level >= 1.0 {
                    self.level = 1.0;
                    self.stage = EnvelopeStage::Decay;
                }
            }
            EnvelopeStage::Decay => {
                self.level -= (1.0 - self.sustain) / (self.decay * ctx.sample_rate);
                if self.level <= self.sustain {
                    self.level = self.sustain;
                    self.stage = EnvelopeStage::Sustain;
                }
            }
            EnvelopeStage::Sustain => self.level = self.sustain,
            EnvelopeStage::Release => {
                let progress = self.release_elapsed as f32 / self.release_samples as f32;
                self.level = (self.release_from * (1.0 - progress)).max(0.0);
                self.release_elapsed += 1;
                if self.release_elapsed >= self.release_samples {
                    self.level = 0.0;
                    self.stage = EnvelopeStage::Idle;
                }
            }
        }
        self.level
    }

    pub fn render(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        for sample in out.iter_mut() {
            *sample = self.next_sample(ctx);
        }
    }

    pub fn is_active(&self) -> bool {
        self.stage != EnvelopeStage::Idle
    }

    pub fn level(&self) -> f32 {
        self.level
    }

    pub fn stage(&self) -> EnvelopeStage {
        self.stage
    }
}
