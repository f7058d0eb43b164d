use crate::{
    dsp::filter::{FilterType, SvFilter},
    graph::node::{GraphNode, RenderCtx},
};

/// Filter node: processes its input buffer in place, so it sits on the right of `.through()`.
pub struct FilterNode {
    filter: SvFilter,
}

impl FilterNode {
    pub fn new(filter_type: FilterType, cutoff_hz: f32) -> Self {
        Self {
            filter: SvFilter::new(filter_type, cutoff_hz),
        }
    }

    pub fn lowpass(cutoff_hz: f32) -> Self {
        Self::new(FilterType::LowPass, cutoff_hz)
    }

    pub fn with_resonance(mut self, resonance: f32) -> Self {
        self.filter = self.filter.with_resonance(resonance);
        self
    }
}

impl GraphNode for FilterNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        self.filter.render(out, ctx);
    }

    fn kill(&mut self) {
        self.filter.reset();
    }

    // A filter makes no sound of its own
    fn is_active(&self) -> bool {
        false
    }
}
