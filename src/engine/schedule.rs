use std::cmp::Ordering;

use crate::{
    sequencing::{InstrumentClass, Timeline},
    synth::SynthMessage,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Attack,
    Release,
}

/// One attack or release with its fire time relative to session start.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduledAction {
    pub time: f64,
    pub kind: ActionKind,
    pub voice: usize,
    pub note_id: u32,
    pub frequency: f32,
    pub velocity: f32,
}

impl ScheduledAction {
    pub fn message(&self) -> SynthMessage {
        match self.kind {
            ActionKind::Attack => SynthMessage::NoteOn {
                voice: self.voice,
                note_id: self.note_id,
                frequency: self.frequency,
                velocity: self.velocity,
            },
            ActionKind::Release => SynthMessage::NoteOff {
                voice: self.voice,
                note_id: self.note_id,
            },
        }
    }
}

/// Fire-time ordered actions for one timeline, with a cursor at the next
/// unfired action.
#[derive(Debug, Clone, Default)]
pub struct Schedule {
    actions: Vec<ScheduledAction>,
    cursor: usize,
}

impl Schedule {
    /// `voices` maps each instrument class to its voice index; events whose
    /// class has no voice are dropped.
    pub fn build(timeline: &Timeline, voices: &[InstrumentClass]) -> Self {
        let mut actions = Vec::with_capacity(timeline.len() * 2);

        for (index, event) in timeline.events().iter().enumerate() {
            let Some(voice) = voices.iter().position(|&class| class == event.instrument) else {
                continue;
            };
            let action = ScheduledAction {
                time: event.start,
                kind: ActionKind::Attack,
                voice,
                note_id: index as u32,
                frequency: event.pitch_hz as f32,
                velocity: event.velocity as f32,
            };
            actions.push(action);
            actions.push(ScheduledAction {
                time: event.end(),
                kind: ActionKind::Release,
                ..action
            });
        }

        // Stable: ties keep generation order, releases go before attacks
        actions.sort_by(|a, b| {
            a.time.total_cmp(&b.time).then_with(|| match (a.kind, b.kind) {
                (ActionKind::Release, ActionKind::Attack) => Ordering::Less,
                (ActionKind::Attack, ActionKind::Release) => Ordering::Greater,
                _ => Ordering::Equal,
            })
        });

        Self { actions, cursor: 0 }
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn actions(&self) -> &[ScheduledAction] {
        &self.actions
    }

    /// Actions not yet fired.
    pub fn pending(&self) -> &[ScheduledAction] {
        &self.actions[self.cursor..]
    }

    /// Next unfired action if it is due at `position`.
    pub fn next_due(&self, position: f64) -> Option<&ScheduledAction> {
        self.actions.get(self.cursor).filter(|action| action.time <= position)
    }

    pub fn advance(&mut self) {
        self.cursor = (self.cursor + 1).min(self.actions.len());
    }

    /// Move the cursor to the first action at or after `position`.
    pub fn seek(&mut self, position: f64) {
        self.cursor = self.actions.partition_point(|action| action.time < position);
    }

    pub fn rewind(&mut self) {
        self.cursor = 0;
    }

    pub fn remaining(&self) -> usize {
        self.actions.len() - self.cursor
    }
}
