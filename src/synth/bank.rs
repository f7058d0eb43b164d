use std::sync::Arc;

use rtrb::Consumer;

use crate::{
    patch::Patch,
    sequencing::{Genre, InstrumentClass},
    synth::{
        message::{SharedControls, SynthMessage},
        voice::Voice,
    },
    MAX_BLOCK_SIZE,
};

/// The voice pool of one playback session: one voice per instrument class.
pub struct VoiceBank {
    voices: Vec<Voice>,
    scratch: Vec<f32>,
}

impl VoiceBank {
    /// One voice per class, in the given order, patched for `genre`.
    pub fn new(instruments: &[InstrumentClass], genre: Genre) -> Self {
        let voices = instruments
            .iter()
            .map(|&instrument| Voice::new(Patch::for_instrument(instrument, genre).build()))
            .collect();

        Self {
            voices,
            scratch: vec![0.0; MAX_BLOCK_SIZE],
        }
    }

    pub fn len(&self) -> usize {
        self.voices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voices.is_empty()
    }

    pub fn voice(&self, index: usize) -> Option<&Voice> {
        self.voices.get(index)
    }

    pub fn active_voices(&self) -> usize {
        self.voices.iter().filter(|v| v.is_active()).count()
    }

    fn handle(&mut self, msg: SynthMessage, sample_rate: f32) {
        match msg {
            SynthMessage::NoteOn {
                voice,
                note_id,
                frequency,
                velocity,
            } => {
                if let Some(v) = self.voices.get_mut(voice) {
                    v.note_on(note_id, frequency, velocity, sample_rate);
                }
            }
            SynthMessage::NoteOff { voice, note_id } => {
                if let Some(v) = self.voices.get_mut(voice) {
                    v.note_off(note_id, sample_rate);
                }
            }
        }
    }

    /// Hard-cut every voice, no release tails.
    fn silence(&mut self) {
        for v in &mut self.voices {
            v.kill();
        }
    }

    /// Sum every voice into `out`, any length.
    pub fn render_block(&mut self, out: &mut [f32], sample_rate: f32) {
        for chunk in out.chunks_mut(MAX_BLOCK_SIZE) {
            chunk.fill(0.0);
            for voice in &mut self.voices {
                let buf = &mut self.scratch[..chunk.len()];
                voice.render(buf, sample_rate);
                for (o, s) in chunk.iter_mut().zip(buf.iter()) {
                    *o += s;
                }
            }
        }
    }
}

/// Everything the audio thread needs to play a session.
///
/// Owned outright by the output callback. Notes arrive through the message
/// queue; silences and gain through the shared controls.
pub struct SessionRenderer {
    bank: VoiceBank,
    rx: Consumer<SynthMessage>,
    controls: Arc<SharedControls>,
    headroom: f32,
    consumed: u64,
    silenced_at: u64,
    mono: Vec<f32>,
}

impl SessionRenderer {
    pub fn new(
        bank: VoiceBank,
        rx: Consumer<SynthMessage>,
        controls: Arc<SharedControls>,
        headroom: f32,
    ) -> Self {
        Self {
            bank,
            rx,
            controls,
            headroom,
            consumed: 0,
            silenced_at: 0,
            mono: vec![0.0; MAX_BLOCK_SIZE],
        }
    }

    pub fn gain(&self) -> f32 {
        self.controls.gain()
    }

    pub fn bank(&self) -> &VoiceBank {
        &self.bank
    }

    fn drain_messages(&mut self, sample_rate: f32) {
        let mark = self.controls.silence_mark();
        if mark > self.silenced_at {
            // Sent before the silence: stale
            while self.consumed < mark && self.rx.pop().is_ok() {
                self.consumed += 1;
            }
            self.consumed = self.consumed.max(mark);
            self.bank.silence();
            self.silenced_at = mark;
        }

        while let Ok(msg) = self.rx.pop() {
            self.consumed += 1;
            self.bank.handle(msg, sample_rate);
        }
    }

    /// Render a mono block of any length.
    pub fn render_block(&mut self, out: &mut [f32], sample_rate: f32) {
        self.drain_messages(sample_rate);
        self.bank.render_block(out, sample_rate);

        let scale = self.controls.gain() * self.headroom;
        for sample in out.iter_mut() {
            *sample = (*sample * scale).clamp(-1.0, 1.0);
        }
    }

    /// Fill an interleaved device buffer, copying mono to every channel.
    pub fn render_interleaved(&mut self, data: &mut [f32], channels: usize, sample_rate: f32) {
        let channels = channels.max(1);
        let total_frames = data.len() / channels;
        let mut written = 0;
        let mut mono = std::mem::take(&mut self.mono);

        while written < total_frames {
            let frames = (total_frames - written).min(MAX_BLOCK_SIZE);
            let block = &mut mono[..frames];
            self.render_block(block, sample_rate);

            let offset = written * channels;
            for (i, &sample) in block.iter().enumerate() {
                let frame = &mut data[offset + i * channels..offset + (i + 1) * channels];
                frame.fill(sample);
            }
            written += frames;
        }

        self.mono = mono;
    }
}
