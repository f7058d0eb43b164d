//! Instrument patches.
//!
//! A patch describes how one instrument class sounds: oscillator layers, an
//! amplitude envelope and an optional filter. The genre hint reshapes the
//! base patch (softer attacks and darker filters for ambient, snappier and
//! brighter for electronic) without touching pitch or timing.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    dsp::{filter::FilterType, oscillator::Waveform},
    graph::{
        envelope::EnvNode, extensions::NodeExt, filter::FilterNode, node::GraphNode,
        oscillator::OscNode,
    },
    sequencing::{Genre, InstrumentClass},
};

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OscillatorDescriptor {
    pub waveform: Waveform,
    pub detune_cents: f32,
    pub octave: i32,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnvelopeDescriptor {
    pub attack: f32,
    pub decay: f32,
    pub sustain: f32,
    pub release: f32,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterDescriptor {
    pub filter_type: FilterType,
    pub cutoff_hz: f32,
    pub resonance: f32,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Patch {
    pub primary: OscillatorDescriptor,
    /// Second oscillator and its mix balance
    pub layer: Option<(OscillatorDescriptor, f32)>,
    pub envelope: EnvelopeDescriptor,
    pub filter: Option<FilterDescriptor>,
}

const fn osc(waveform: Waveform, detune_cents: f32, octave: i32) -> OscillatorDescriptor {
    OscillatorDescriptor {
        waveform,
        detune_cents,
        octave,
    }
}

const fn env(attack: f32, decay: f32, sustain: f32, release: f32) -> EnvelopeDescriptor {
    EnvelopeDescriptor {
        attack,
        decay,
        sustain,
        release,
    }
}

const fn lowpass(cutoff_hz: f32) -> Option<FilterDescriptor> {
    Some(FilterDescriptor {
        filter_type: FilterType::LowPass,
        cutoff_hz,
        resonance: 0.0,
    })
}

impl OscillatorDescriptor {
    fn node(&self) -> OscNode {
        OscNode::new(self.waveform)
            .with_detune(self.detune_cents)
            .with_octave(self.octave)
    }
}

impl Patch {
    /// Base sound of an instrument class, before genre shaping.
    pub fn base(instrument: InstrumentClass) -> Patch {
        use Waveform::*;

        let (primary, layer, envelope, filter) = match instrument {
            InstrumentClass::Lead => (
                osc(Saw, 0.0, 0),
                Some((osc(Square, 7.0, 0), 0.3)),
                env(0.02, 0.15, 0.7, 0.3),
                lowpass(2800.0),
            ),
            InstrumentClass::Pad => (
                osc(Saw, 0.0, 0),
                Some((osc(Saw, 9.0, 0), 0.5)),
                env(0.4, 0.3, 0.8, 0.8),
                lowpass(1800.0),
            ),
            InstrumentClass::Pluck => (osc(Triangle, 0.0, 0), None, env(0.002, 0.18, 0.0, 0.12), lowpass(4000.0)),
            InstrumentClass::Bell => (
                osc(Sine, 0.0, 0),
                Some((osc(Sine, 3.0, 1), 0.35)),
                env(0.002, 0.6, 0.2, 0.9),
                None,
            ),
            InstrumentClass::Bass => (
                osc(Square, 0.0, -1),
                Some((osc(Saw, 0.0, -1), 0.4)),
                env(0.01, 0.2, 0.6, 0.2),
                lowpass(600.0),
            ),
            InstrumentClass::Strings => (
                osc(Saw, 0.0, 0),
                Some((osc(Saw, -6.0, 0), 0.5)),
                env(0.25, 0.2, 0.85, 0.5),
                lowpass(2400.0),
            ),
            InstrumentClass::Organ => (
                osc(Sine, 0.0, 0),
                Some((osc(Sine, 0.0, 1), 0.4)),
                env(0.01, 0.05, 0.9, 0.1),
                None,
            ),
            InstrumentClass::Ambient => (
                osc(Sine, 0.0, 0),
                Some((osc(Triangle, 5.0, 0), 0.5)),
                env(0.6, 0.4, 0.7, 1.2),
                lowpass(1500.0),
            ),
            InstrumentClass::Percussion => (
                osc(Sine, 0.0, 0),
                Some((osc(Noise, 0.0, 0), 0.35)),
                env(0.001, 0.12, 0.0, 0.06),
                lowpass(3000.0),
            ),
        };

        Patch {
            primary,
            layer,
            envelope,
            filter,
        }
    }

    /// Patch for an instrument class under a genre hint.
    pub fn for_instrument(instrument: InstrumentClass, genre: Genre) -> Patch {
        let mut patch = Self::base(instrument);
        let (attack_scale, release_scale, cutoff_scale, resonance) = match genre {
            Genre::Ambient => (1.5, 2.0, 0.7, 0.0),
            Genre::Electronic => (0.5, 0.7, 1.6, 0.3),
            Genre::Orchestral => (1.2, 1.2, 1.0, 0.0),
        };

        patch.envelope.attack *= attack_scale;
        patch.envelope.release *= release_scale;
        if let Some(filter) = patch.filter.as_mut() {
            filter.cutoff_hz *= cutoff_scale;
            filter.resonance = resonance;
        }
        // Orchestral timbres trade the buzzy square layers for rounder triangles
        if genre == Genre::Orchestral {
            for desc in std::iter::once(&mut patch.primary).chain(patch.layer.as_mut().map(|(d, _)| d)) {
                if desc.waveform == Waveform::Square {
                    desc.waveform = Waveform::Triangle;
                }
            }
        }
        patch
    }

    /// Build the node graph: oscillators → envelope → filter.
    pub fn build(&self) -> Box<dyn GraphNode> {
        let source = match self.layer {
            Some((layer, balance)) => self.primary.node().mix(layer.node(), balance).boxed(),
            None => self.primary.node().boxed(),
        };

        let e = self.envelope;
        let voice = source.amplify(EnvNode::adsr(e.attack, e.decay, e.sustain, e.release));

        match self.filter {
            Some(f) => voice
                .through(FilterNode::new(f.filter_type, f.cutoff_hz).with_resonance(f.resonance))
                .boxed(),
            None => voice.boxed(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::node::RenderCtx;

    #[test]
    fn every_patch_sounds_and_then_frees() {
        let ctx = RenderCtx::new(8_000.0, 220.0, 1.0);
        let mut buffer = vec![0.0f32; 1024];

        for genre in [Genre::Ambient, Genre::Electronic, Genre::Orchestral] {
            for instrument in InstrumentClass::ALL {
                let mut voice = Patch::for_instrument(instrument, genre).build();
                voice.note_on(&ctx);
                for _ in 0..4 {
                    voice.render_block(&mut buffer, &ctx);
                }
                assert!(
                    buffer.iter().all(|s| s.is_finite()),
                    "{instrument:?}/{genre:?} produced non-finite samples"
                );

                voice.note_off(&ctx);
                // Longest release is 2.4s; 24 blocks at 8kHz is ~3s
                for _ in 0..24 {
                    voice.render_block(&mut buffer, &ctx);
                }
                assert!(!voice.is_active(), "{instrument:?}/{genre:?} never went idle");
            }
        }
    }

    #[test]
    fn pluck_makes_sound_right_after_note_on() {
        let ctx = RenderCtx::new(8_000.0, 220.0, 1.0);
        let mut voice = Patch::for_instrument(InstrumentClass::Pluck, Genre::Electronic).build();
        voice.note_on(&ctx);
        let mut buffer = vec![0.0f32; 256];
        voice.render_block(&mut buffer, &ctx);
        assert!(buffer.iter().any(|s| s.abs() > 0.05));
    }

    #[test]
    fn genre_shapes_envelope_and_filter() {
        let ambient = Patch::for_instrument(InstrumentClass::Lead, Genre::Ambient);
        let electronic = Patch::for_instrument(InstrumentClass::Lead, Genre::Electronic);
        assert!(ambient.envelope.attack > electronic.envelope.attack);
        assert!(
            ambient.filter.map(|f| f.cutoff_hz) < electronic.filter.map(|f| f.cutoff_hz)
        );

        let orchestral = Patch::for_instrument(InstrumentClass::Bass, Genre::Orchestral);
        assert_eq!(orchestral.primary.waveform, Waveform::Triangle);
    }
}
