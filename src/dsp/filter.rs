use std::f32::consts::PI;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::graph::node::RenderCtx;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterType {
    LowPass,
    HighPass,
    BandPass,
}

/// Topology-preserving-transform state-variable filter (two integrators).
pub struct SvFilter {
    ic1eq: f32,
    ic2eq: f32,
    cutoff_hz: f32,
    resonance: f32,
    filter_type: FilterType,
}

impl SvFilter {
    pub fn new(filter_type: FilterType, cutoff_hz: f32) -> Self {
        Self {
            ic1eq: 0.0,
            ic2eq: 0.0,
            cutoff_hz,
            resonance: 0.0,
            filter_type,
        }
    }

    pub fn with_resonance(mut self, resonance: f32) -> Self {
        self.resonance = resonance.clamp(0.0, 0.99);
        self
    }

    pub fn cutoff(&self) -> f32 {
        self.cutoff_hz
    }

    pub fn reset(&mut self) {
        self.ic1eq = 0.0;
        self.ic2eq = 0.0;
    }

    pub fn render(&mut self, buffer: &mut [f32], ctx: &RenderCtx) {
        // Keep the cutoff below Nyquist or tan() blows up
        let cutoff = self.cutoff_hz.clamp(10.0, ctx.sample_rate * 0.49);
        let g = (PI * cutoff / ctx.sample_rate).tan();
        let k = 2.0 - 2.0 * self.resonance;
        let h = 1.0 / (1.0 + g * (g + k));

        for sample in buffer.iter_mut() {
            let v3 = *sample - self.ic2eq;
            let v1 = h * (self.ic1eq + g * v3);
            let v2 = self.ic2eq + g * v1;
            self.ic1eq = 2.0 * v1 - self.ic1eq;
            self.ic2eq = 2.0 * v2 - self.ic2eq;

            *sample = match self.filter_type {
                FilterType::LowPass => v2,
                FilterType::HighPass => *sample - k * v1 - v2,
                FilterType::BandPass => v1,
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> RenderCtx {
        RenderCtx::new(48_000.0, 440.0, 1.0)
    }

    #[test]
    fn lowpass_passes_dc() {
        let mut filter = SvFilter::new(FilterType::LowPass, 500.0);
        let mut buffer = vec![1.0; 512];
        filter.render(&mut buffer, &ctx());
        assert!(buffer[511] > 0.99);
    }

    #[test]
    fn highpass_blocks_dc() {
        let mut filter = SvFilter::new(FilterType::HighPass, 500.0);
        let mut buffer = vec![1.0; 512];
        filter.render(&mut buffer, &ctx());
        assert!(buffer[511].abs() < 0.01);
    }

    #[test]
    fn cutoff_above_nyquist_stays_finite() {
        let mut filter = SvFilter::new(FilterType::LowPass, 40_000.0).with_resonance(0.9);
        let mut buffer: Vec<f32> = (0..256).map(|i| if i % 2 == 0 { 1.0 } else { -1.0 }).collect();
        filter.render(&mut buffer, &ctx());
        assert!(buffer.iter().all(|s| s.is_finite()));
    }
}
