use crate::{
    graph::node::{GraphNode, RenderCtx},
    MAX_BLOCK_SIZE,
};

/// Linear crossfade of two sources: `a × (1 - balance) + b × balance`.
///
/// Both sources receive every note event, which is how layered oscillators
/// stay in step.
pub struct Mix<A, B> {
    a: A,
    b: B,
    balance: f32,
    scratch: Vec<f32>,
}

impl<A, B> Mix<A, B> {
    pub fn new(a: A, b: B, balance: f32) -> Self {
        Self {
            a,
            b,
            balance: balance.clamp(0.0, 1.0),
            scratch: vec![0.0; MAX_BLOCK_SIZE],
        }
    }
}

impl<A: GraphNode, B: GraphNode> GraphNode for Mix<A, B> {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        self.a.render_block(out, ctx);

        let other = &mut self.scratch[..out.len()];
        other.fill(0.0);
        self.b.render_block(other, ctx);

        let (wa, wb) = (1.0 - self.balance, self.balance);
        for (o, s) in out.iter_mut().zip(other.iter()) {
            *o = *o * wa + *s * wb;
        }
    }

    fn note_on(&mut self, ctx: &RenderCtx) {
        self.a.note_on(ctx);
        self.b.note_on(ctx);
    }

    fn note_off(&mut self, ctx: &RenderCtx) {
        self.a.note_off(ctx);
        self.b.note_off(ctx);
    }

    fn kill(&mut self) {
        self.a.kill();
        self.b.kill();
    }

    fn get_envelope_level(&self) -> Option<f32> {
        self.a.get_envelope_level().or_else(|| self.b.get_envelope_level())
    }

    fn is_active(&self) -> bool {
        self.a.is_active() || self.b.is_active()
    }
}
