use crate::graph::node::{GraphNode, RenderCtx};

/// One monophonic voice playing a patched node graph.
///
/// A new attack retriggers the voice; a release only applies to the note
/// that is currently sounding.
pub struct Voice {
    node: Box<dyn GraphNode>,
    note_id: Option<u32>,
    frequency: f32,
    velocity: f32,
}

impl Voice {
    pub fn new(node: Box<dyn GraphNode>) -> Self {
        Self {
            node,
            note_id: None,
            frequency: 0.0,
            velocity: 0.0,
        }
    }

    fn ctx(&self, sample_rate: f32) -> RenderCtx {
        RenderCtx::new(sample_rate, self.frequency, self.velocity)
    }

    pub fn note_on(&mut self, note_id: u32, frequency: f32, velocity: f32, sample_rate: f32) {
        self.note_id = Some(note_id);
        self.frequency = frequency;
        self.velocity = velocity;
        let ctx = self.ctx(sample_rate);
        self.node.note_on(&ctx);
    }

    pub fn note_off(&mut self, note_id: u32, sample_rate: f32) {
        if self.note_id == Some(note_id) {
            let ctx = self.ctx(sample_rate);
            self.node.note_off(&ctx);
        }
    }

    pub fn kill(&mut self) {
        self.node.kill();
        self.note_id = None;
    }

    /// Render into `out` (overwrites). Idle voices render silence.
    pub fn render(&mut self, out: &mut [f32], sample_rate: f32) {
        if self.note_id.is_none() {
            out.fill(0.0);
            return;
        }

        let ctx = self.ctx(sample_rate);
        self.node.render_block(out, &ctx);
        for sample in out.iter_mut() {
            *sample *= self.velocity;
        }

        if !self.node.is_active() {
            self.note_id = None;
        }
    }

    pub fn is_active(&self) -> bool {
        self.note_id.is_some() && self.node.is_active()
    }

    pub fn current_note(&self) -> Option<u32> {
        self.note_id
    }
}
