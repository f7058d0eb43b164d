use std::sync::Arc;

use log::{debug, error, info, warn};
use rtrb::RingBuffer;

use super::{
    clock::{Clock, SystemClock},
    config::EngineConfig,
    event::{DeviceState, Observers, PlaybackEvent, SubscriptionId, TransportState},
    schedule::Schedule,
    session::PlaybackSession,
    sink::{AudioSink, CpalSink},
};
use crate::{
    error::PlaybackError,
    sequencing::Timeline,
    synth::{SessionRenderer, SharedControls, VoiceBank},
};

/// Plays timelines through an [`AudioSink`].
///
/// ```text
///            play()             pause()
///   Stopped ───────→ Playing ───────────→ Paused
///      ↑               │  ↑                 │
///      │   stop() /    │  └──── play() ─────┘
///      └── completion ─┘        resume()
/// ```
///
/// Every transport call without a session is a no-op. Nothing happens
/// between calls: the host drives playback by calling [`tick`](Self::tick).
pub struct PlaybackEngine<S: AudioSink = CpalSink, C: Clock = SystemClock> {
    sink: S,
    clock: C,
    config: EngineConfig,
    device: DeviceState,
    session: Option<PlaybackSession>,
    volume: f32,
    observers: Observers,
}

impl PlaybackEngine {
    /// Engine on the default output device and the wall clock.
    pub fn default_output() -> Self {
        Self::new(CpalSink::new(), SystemClock::new())
    }
}

impl<S: AudioSink, C: Clock> PlaybackEngine<S, C> {
    pub fn new(sink: S, clock: C) -> Self {
        Self::with_config(sink, clock, EngineConfig::default())
    }

    pub fn with_config(sink: S, clock: C, config: EngineConfig) -> Self {
        Self {
            sink,
            clock,
            volume: config.initial_volume,
            config,
            device: DeviceState::Uninitialized,
            session: None,
            observers: Observers::default(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn device_state(&self) -> DeviceState {
        self.device
    }

    pub fn session(&self) -> Option<&PlaybackSession> {
        self.session.as_ref()
    }

    // ---- Observers ----

    pub fn subscribe(&mut self, listener: impl FnMut(&PlaybackEvent) + 'static) -> SubscriptionId {
        self.observers.subscribe(Box::new(listener))
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    /// `(position, duration)` callback; replaces the previous one.
    pub fn on_time_update(&mut self, callback: impl FnMut(f64, f64) + 'static) {
        self.observers.set_time_update(Box::new(callback));
    }

    /// Error callback; replaces the previous one.
    pub fn on_error(&mut self, callback: impl FnMut(&PlaybackError) + 'static) {
        self.observers.set_error(Box::new(callback));
    }

    fn fail(&mut self, error: impl Into<PlaybackError>) -> PlaybackError {
        let error = error.into();
        self.observers.emit(PlaybackEvent::Error(error.clone()));
        error
    }

    fn set_state(&mut self, state: TransportState) {
        self.observers.emit(PlaybackEvent::StateChanged(state));
    }

    // ---- Device ----

    /// Activate the output device now instead of on the first `play()`.
    pub fn initialize(&mut self) -> Result<(), PlaybackError> {
        self.ensure_ready().map(|_| ())
    }

    fn ensure_ready(&mut self) -> Result<f32, PlaybackError> {
        if let DeviceState::Ready { sample_rate } = self.device {
            return Ok(sample_rate);
        }
        match self.sink.activate() {
            Ok(sample_rate) => {
                info!("audio output activated at {sample_rate} Hz");
                self.device = DeviceState::Ready { sample_rate };
                Ok(sample_rate)
            }
            Err(e) => {
                error!("audio output unavailable: {e}");
                Err(self.fail(e))
            }
        }
    }

    // ---- Transport ----

    /// Start playing `timeline` from the beginning.
    ///
    /// If `timeline` is the paused session's timeline this resumes instead.
    /// Invalid events are rejected before anything is scheduled; an empty
    /// timeline completes at once without touching the device.
    pub fn play(&mut self, timeline: &Timeline) -> Result<(), PlaybackError> {
        let resumes = self
            .session
            .as_ref()
            .is_some_and(|s| s.state() == TransportState::Paused && s.timeline() == timeline);
        if resumes {
            self.resume();
            return Ok(());
        }

        if let Err(e) = timeline.validate() {
            warn!("rejected timeline: {e}");
            return Err(self.fail(e));
        }

        self.dispose_session();

        if timeline.is_empty() {
            info!("empty timeline, nothing to play");
            self.observers.emit(PlaybackEvent::Completed);
            return Ok(());
        }

        let sample_rate = self.ensure_ready()?;

        let instruments = timeline.instruments();
        let bank = VoiceBank::new(&instruments, timeline.genre());
        let (tx, rx) = RingBuffer::new(self.config.message_capacity);
        let controls = Arc::new(SharedControls::new(self.volume));
        let renderer = SessionRenderer::new(bank, rx, Arc::clone(&controls), self.config.headroom);

        if let Err(e) = self.sink.connect(renderer) {
            error!("failed to connect session: {e}");
            // Force a fresh activation on the next attempt
            self.device = DeviceState::Uninitialized;
            return Err(self.fail(e));
        }

        let schedule = Schedule::build(timeline, &instruments);
        info!(
            "playing {} events on {} voices ({:.2}s, {}, {sample_rate} Hz)",
            timeline.len(),
            instruments.len(),
            timeline.duration(),
            timeline.genre()
        );

        let mut session = PlaybackSession::new(timeline.clone(), schedule, tx, controls);
        session.start(self.clock.now());
        self.session = Some(session);
        self.set_state(TransportState::Playing);
        self.tick();
        Ok(())
    }

    /// Continue a paused session from its stored position.
    pub fn resume(&mut self) {
        let now = self.clock.now();
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if session.state() != TransportState::Paused {
            return;
        }
        session.start(now);
        debug!("resumed at {:.2}s", session.position(now));
        self.set_state(TransportState::Playing);
        self.tick();
    }

    pub fn pause(&mut self) {
        let now = self.clock.now();
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if session.state() != TransportState::Playing {
            return;
        }
        session.pause(now);
        debug!("paused at {:.2}s", session.position(now));
        self.set_state(TransportState::Paused);
    }

    pub fn stop(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if session.state() == TransportState::Stopped {
            return;
        }
        session.stop();
        debug!("stopped");
        self.set_state(TransportState::Stopped);
    }

    /// Move the play-head of a playing or paused session.
    ///
    /// Sounding notes are cut; notes whose attack lies before the new
    /// position are not replayed.
    pub fn seek(&mut self, seconds: f64) {
        if !seconds.is_finite() {
            return;
        }
        let now = self.clock.now();
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if session.state() == TransportState::Stopped {
            return;
        }
        let position = session.seek(seconds, now);
        let duration = session.duration();
        debug!("seek to {position:.2}s");
        self.observers
            .emit(PlaybackEvent::TimeUpdate { position, duration });
        self.tick();
    }

    fn dispose_session(&mut self) {
        if self.session.is_some() {
            self.stop();
            self.session = None;
            self.sink.disconnect();
        }
    }

    // ---- Volume ----

    /// Clamp to [0, 1] and apply now. Kept for later sessions.
    pub fn set_volume(&mut self, volume: f32) {
        if volume.is_nan() {
            return;
        }
        self.volume = volume.clamp(0.0, 1.0);
        if let Some(session) = self.session.as_ref() {
            session.set_gain(self.volume);
        }
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    // ---- Status ----

    pub fn current_time(&self) -> f64 {
        self.session
            .as_ref()
            .map_or(0.0, |s| s.position(self.clock.now()))
    }

    pub fn duration(&self) -> f64 {
        self.session.as_ref().map_or(0.0, PlaybackSession::duration)
    }

    pub fn state(&self) -> TransportState {
        self.session
            .as_ref()
            .map_or(TransportState::Stopped, PlaybackSession::state)
    }

    pub fn is_playing(&self) -> bool {
        self.state() == TransportState::Playing
    }

    // ---- Clock ----

    /// Fire due attacks and releases, emit time updates and detect the end
    /// of the timeline. Also drains device errors.
    pub fn tick(&mut self) {
        self.poll_device_errors();

        let now = self.clock.now();
        let interval = self.config.update_interval;
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if session.state() != TransportState::Playing {
            return;
        }

        let position = session.position(now);
        let duration = session.duration();
        session.fire_due(position);

        if position >= duration {
            session.finish();
            info!("playback complete ({duration:.2}s)");
            self.observers.emit(PlaybackEvent::TimeUpdate {
                position: duration,
                duration,
            });
            self.set_state(TransportState::Stopped);
            self.observers.emit(PlaybackEvent::Completed);
        } else if session.update_due(now, interval) {
            self.observers
                .emit(PlaybackEvent::TimeUpdate { position, duration });
        }
    }

    fn poll_device_errors(&mut self) {
        let mut failed = false;
        while let Some(e) = self.sink.poll_error() {
            error!("audio stream failed: {e}");
            self.fail(e);
            failed = true;
        }
        if failed {
            self.stop();
            self.sink.disconnect();
            self.device = DeviceState::Uninitialized;
        }
    }

    /// Drop the session and release the device.
    pub fn shutdown(&mut self) {
        self.dispose_session();
        self.device = DeviceState::Uninitialized;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        engine::{clock::ManualClock, sink::OfflineSink},
        error::{DeviceError, InputError},
        sequencing::{Genre, InstrumentClass, NoteEvent},
    };
    use std::{cell::RefCell, rc::Rc};

    type TestEngine = PlaybackEngine<OfflineSink, ManualClock>;

    fn engine() -> (TestEngine, ManualClock) {
        let clock = ManualClock::new();
        (PlaybackEngine::new(OfflineSink::new(8_000.0), clock.clone()), clock)
    }

    fn note(start: f64, duration: f64, instrument: InstrumentClass) -> NoteEvent {
        NoteEvent {
            pitch_hz: 220.0,
            start,
            duration,
            velocity: 0.8,
            instrument,
        }
    }

    fn timeline() -> Timeline {
        Timeline::new(
            vec![
                note(0.0, 1.0, InstrumentClass::Lead),
                note(1.0, 1.0, InstrumentClass::Pad),
                note(2.0, 2.0, InstrumentClass::Lead),
            ],
            Genre::Ambient,
        )
    }

    fn record(engine: &mut TestEngine) -> Rc<RefCell<Vec<PlaybackEvent>>> {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        engine.subscribe(move |e| sink.borrow_mut().push(e.clone()));
        events
    }

    #[test]
    fn play_allocates_one_voice_per_instrument() {
        let (mut engine, _clock) = engine();
        engine.play(&timeline()).unwrap();

        assert!(engine.is_playing());
        assert_eq!(engine.duration(), 4.0);
        assert_eq!(engine.sink().renderer().map(|r| r.bank().len()), Some(2));
        assert_eq!(engine.session().map(|s| s.schedule().len()), Some(6));
    }

    #[test]
    fn tick_fires_due_actions_only() {
        let (mut engine, clock) = engine();
        engine.play(&timeline()).unwrap();
        assert_eq!(engine.session().map(|s| s.schedule().remaining()), Some(5));

        clock.set(1.5);
        engine.tick();
        assert_eq!(engine.session().map(|s| s.schedule().remaining()), Some(3));
    }

    #[test]
    fn reaching_the_end_stops_and_completes() {
        let (mut engine, clock) = engine();
        let events = record(&mut engine);
        engine.play(&timeline()).unwrap();

        clock.set(4.0);
        engine.tick();

        assert_eq!(engine.state(), TransportState::Stopped);
        assert_eq!(engine.current_time(), 0.0);
        let events = events.borrow();
        assert_eq!(events.last(), Some(&PlaybackEvent::Completed));
        assert!(events.contains(&PlaybackEvent::TimeUpdate {
            position: 4.0,
            duration: 4.0
        }));
    }

    #[test]
    fn pause_keeps_position_and_stop_discards_it() {
        let (mut engine, clock) = engine();
        let t = timeline();
        engine.play(&t).unwrap();

        clock.set(1.25);
        engine.pause();
        assert_eq!(engine.state(), TransportState::Paused);
        clock.set(10.0);
        assert_eq!(engine.current_time(), 1.25);

        engine.play(&t).unwrap();
        assert!(engine.is_playing());
        clock.set(10.5);
        assert_eq!(engine.current_time(), 1.75);

        engine.stop();
        assert_eq!(engine.current_time(), 0.0);
        assert_eq!(engine.state(), TransportState::Stopped);
    }

    #[test]
    fn transport_without_session_is_a_no_op() {
        let (mut engine, _clock) = engine();
        let events = record(&mut engine);
        engine.pause();
        engine.resume();
        engine.stop();
        engine.seek(3.0);
        engine.tick();

        assert!(events.borrow().is_empty());
        assert_eq!(engine.current_time(), 0.0);
        assert_eq!(engine.duration(), 0.0);
    }

    #[test]
    fn invalid_timeline_is_rejected_before_scheduling() {
        let (mut engine, _clock) = engine();
        let errors = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&errors);
        engine.on_error(move |e| sink.borrow_mut().push(e.clone()));

        let bad = Timeline::new(vec![note(0.0, 0.0, InstrumentClass::Bell)], Genre::Ambient);
        let result = engine.play(&bad);

        assert!(matches!(
            result,
            Err(PlaybackError::Input(InputError::InvalidDuration { index: 0, .. }))
        ));
        assert_eq!(errors.borrow().len(), 1);
        assert!(engine.session().is_none());
        assert_eq!(engine.device_state(), DeviceState::Uninitialized);
    }

    #[test]
    fn play_while_playing_replaces_the_session() {
        let (mut engine, clock) = engine();
        let events = record(&mut engine);
        engine.play(&timeline()).unwrap();
        clock.set(1.0);

        let other = Timeline::new(vec![note(0.0, 0.5, InstrumentClass::Bell)], Genre::Electronic);
        engine.play(&other).unwrap();

        assert_eq!(engine.duration(), 0.5);
        assert_eq!(engine.current_time(), 0.0);
        assert_eq!(engine.sink().activations(), 1);
        assert!(events
            .borrow()
            .contains(&PlaybackEvent::StateChanged(TransportState::Stopped)));
    }

    #[test]
    fn seek_clamps_and_skips_earlier_attacks() {
        let (mut engine, _clock) = engine();
        engine.play(&timeline()).unwrap();

        engine.seek(2.5);
        assert_eq!(engine.current_time(), 2.5);
        let pending: Vec<_> = engine
            .session()
            .map(|s| s.schedule().pending().iter().map(|a| a.time).collect())
            .unwrap_or_default();
        assert_eq!(pending, vec![4.0]);

        // Past the end clamps to the duration, which completes on the spot
        engine.seek(100.0);
        assert_eq!(engine.state(), TransportState::Stopped);
        assert_eq!(engine.current_time(), 0.0);
    }

    #[test]
    fn volume_is_clamped_and_survives_sessions() {
        let (mut engine, _clock) = engine();
        engine.set_volume(-0.5);
        assert_eq!(engine.volume(), 0.0);
        engine.set_volume(2.0);
        assert_eq!(engine.volume(), 1.0);
        engine.set_volume(f32::NAN);
        assert_eq!(engine.volume(), 1.0);

        engine.set_volume(0.3);
        engine.play(&timeline()).unwrap();
        assert_eq!(engine.sink().renderer().map(|r| r.gain()), Some(0.3));
    }

    #[test]
    fn time_updates_follow_the_interval() {
        let clock = ManualClock::new();
        let config = EngineConfig::new().update_interval(0.5);
        let mut engine = PlaybackEngine::with_config(OfflineSink::new(8_000.0), clock.clone(), config);
        let updates = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&updates);
        engine.on_time_update(move |position, _| sink.borrow_mut().push(position));

        engine.play(&timeline()).unwrap();
        for step in 1..=6 {
            clock.set(f64::from(step) * 0.25);
            engine.tick();
        }

        assert_eq!(*updates.borrow(), vec![0.0, 0.5, 1.0, 1.5]);
    }

    #[test]
    fn stream_error_stops_playback_and_resets_device() {
        let (mut engine, _clock) = engine();
        let events = record(&mut engine);
        engine.play(&timeline()).unwrap();

        engine
            .sink_mut()
            .inject_error(DeviceError::Runtime("device unplugged".into()));
        engine.tick();

        assert_eq!(engine.state(), TransportState::Stopped);
        assert_eq!(engine.device_state(), DeviceState::Uninitialized);
        assert!(events.borrow().contains(&PlaybackEvent::Error(
            DeviceError::Runtime("device unplugged".into()).into()
        )));

        engine.play(&timeline()).unwrap();
        assert_eq!(engine.sink().activations(), 2);
    }
}
