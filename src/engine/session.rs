use std::sync::Arc;

use log::warn;
use rtrb::Producer;

use super::{event::TransportState, schedule::Schedule};
use crate::{
    sequencing::Timeline,
    synth::{SharedControls, SynthMessage},
};

/// Transport state for one accepted timeline.
///
/// The play-head is the stored `position`; while playing, the time elapsed
/// since `resumed_at` is added on top, so it never reads below the position
/// it resumed from.
pub struct PlaybackSession {
    timeline: Timeline,
    schedule: Schedule,
    state: TransportState,
    position: f64,
    resumed_at: f64,
    last_update: Option<f64>,
    tx: Producer<SynthMessage>,
    controls: Arc<SharedControls>,
    sent: u64,
}

impl PlaybackSession {
    pub(crate) fn new(
        timeline: Timeline,
        schedule: Schedule,
        tx: Producer<SynthMessage>,
        controls: Arc<SharedControls>,
    ) -> Self {
        Self {
            timeline,
            schedule,
            state: TransportState::Stopped,
            position: 0.0,
            resumed_at: 0.0,
            last_update: None,
            tx,
            controls,
            sent: 0,
        }
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    pub fn state(&self) -> TransportState {
        self.state
    }

    pub fn duration(&self) -> f64 {
        self.timeline.duration()
    }

    pub fn position(&self, now: f64) -> f64 {
        match self.state {
            TransportState::Playing => {
                (self.position + (now - self.resumed_at).max(0.0)).min(self.duration())
            }
            _ => self.position,
        }
    }

    pub(crate) fn set_gain(&self, gain: f32) {
        self.controls.set_gain(gain);
    }

    /// Cut every voice, including notes still waiting in the queue.
    fn silence(&self) {
        self.controls.silence_after(self.sent);
    }

    /// Start or resume from the stored position.
    pub(crate) fn start(&mut self, now: f64) {
        self.resumed_at = now;
        self.last_update = None;
        self.state = TransportState::Playing;
    }

    pub(crate) fn pause(&mut self, now: f64) {
        self.position = self.position(now);
        self.state = TransportState::Paused;
        self.silence();
    }

    pub(crate) fn stop(&mut self) {
        self.position = 0.0;
        self.state = TransportState::Stopped;
        self.schedule.rewind();
        self.silence();
    }

    /// Auto-stop at the end. Delivered releases let tails ring out; if any
    /// action is still undelivered the voices are cut instead.
    pub(crate) fn finish(&mut self) {
        if self.schedule.remaining() > 0 {
            warn!(
                "{} actions undelivered at the end, silencing",
                self.schedule.remaining()
            );
            self.silence();
        }
        self.position = 0.0;
        self.state = TransportState::Stopped;
        self.schedule.rewind();
    }

    pub(crate) fn seek(&mut self, position: f64, now: f64) -> f64 {
        let position = position.clamp(0.0, self.duration());
        self.silence();
        self.schedule.seek(position);
        self.position = position;
        self.resumed_at = now;
        position
    }

    /// Send every action due at `position`. Stops early if the queue fills;
    /// the rest go out on the next call.
    pub(crate) fn fire_due(&mut self, position: f64) -> usize {
        let mut fired = 0;
        while let Some(action) = self.schedule.next_due(position) {
            let msg = action.message();
            if self.tx.push(msg).is_err() {
                warn!("control queue full, deferring {} actions", self.schedule.remaining());
                break;
            }
            self.sent += 1;
            self.schedule.advance();
            fired += 1;
        }
        fired
    }

    pub(crate) fn update_due(&mut self, now: f64, interval: f64) -> bool {
        let due = self.last_update.map_or(true, |last| now - last >= interval);
        if due {
            self.last_update = Some(now);
        }
        due
    }
}
