/// What a node is asked to render.
///
/// - sample_rate: output rate in Hz
/// - frequency: pitch of the current note in Hz
/// - velocity: note loudness in [0, 1]
#[derive(Debug, Clone, Copy)]
pub struct RenderCtx {
    pub sample_rate: f32,
    pub frequency: f32,
    pub velocity: f32,
}

impl RenderCtx {
    pub fn new(sample_rate: f32, frequency: f32, velocity: f32) -> Self {
        Self {
            sample_rate,
            frequency,
            velocity,
        }
    }
}

/// Core trait for audio processing graph nodes.
pub trait GraphNode: Send {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx);

    /// Triggered when a note starts. Passthrough nodes ignore it.
    fn note_on(&mut self, _ctx: &RenderCtx) {}

    /// Triggered when a note is released.
    fn note_off(&mut self, _ctx: &RenderCtx) {}

    /// Cut all sound immediately, skipping any release tail.
    fn kill(&mut self) {}

    fn get_envelope_level(&self) -> Option<f32> {
        None
    }

    /// Whether the node still produces sound; voices go idle once this is false.
    fn is_active(&self) -> bool {
        true
    }
}

impl GraphNode for Box<dyn GraphNode> {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        (**self).render_block(out, ctx)
    }

    fn note_on(&mut self, ctx: &RenderCtx) {
        (**self).note_on(ctx)
    }

    fn note_off(&mut self, ctx: &RenderCtx) {
        (**self).note_off(ctx)
    }

    fn kill(&mut self) {
        (**self).kill()
    }

    fn get_envelope_level(&self) -> Option<f32> {
        (**self).get_envelope_level()
    }

    fn is_active(&self) -> bool {
        (**self).is_active()
    }
}
