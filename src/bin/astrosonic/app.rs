//! Astrosonic - application builder and runner

use std::{cell::RefCell, rc::Rc, time::Duration};

use color_eyre::eyre::Result as EyreResult;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::DefaultTerminal;

use astrosonic::{
    engine::DeviceState, CompatibilityScore, PlaybackEngine, Timeline, TransportState,
};

use super::{logger::StatusLog, ui};

const VOLUME_STEP: f32 = 0.05;
const SEEK_STEP: f64 = 5.0;
const STATUS_LINES: usize = 4;

/// Main application builder
pub struct Astrosonic {
    title: String,
    timeline: Timeline,
    status: StatusLog,
    volume: f32,
    compatibility: Option<CompatibilityScore>,
}

impl Astrosonic {
    pub fn new(title: String, timeline: Timeline, status: StatusLog) -> Self {
        Self {
            title,
            timeline,
            status,
            volume: 0.7,
            compatibility: None,
        }
    }

    pub fn volume(mut self, volume: f32) -> Self {
        self.volume = volume;
        self
    }

    pub fn compatibility(mut self, score: Option<CompatibilityScore>) -> Self {
        self.compatibility = score;
        self
    }

    /// Run the application (takes over the terminal, plays audio)
    pub fn run(self) -> EyreResult<()> {
        let mut engine = PlaybackEngine::default_output();
        engine.set_volume(self.volume);

        let last_error = Rc::new(RefCell::new(None));
        {
            let last_error = Rc::clone(&last_error);
            engine.on_error(move |e| *last_error.borrow_mut() = Some(e.to_string()));
        }

        // Failures land in last_error; space retries
        let _ = engine.play(&self.timeline);

        let mut terminal = ratatui::init();
        let result = self.event_loop(&mut terminal, &mut engine, &last_error);
        ratatui::restore();
        engine.shutdown();
        result
    }

    fn event_loop(
        &self,
        terminal: &mut DefaultTerminal,
        engine: &mut PlaybackEngine,
        last_error: &RefCell<Option<String>>,
    ) -> EyreResult<()> {
        loop {
            engine.tick();

            let view = ui::View {
                title: &self.title,
                timeline: &self.timeline,
                state: engine.state(),
                position: engine.current_time(),
                duration: self.timeline.duration(),
                volume: engine.volume(),
                device_ready: matches!(engine.device_state(), DeviceState::Ready { .. }),
                error: last_error.borrow().clone(),
                compatibility: self.compatibility,
                log: self.status.recent(STATUS_LINES),
            };
            terminal.draw(|frame| ui::render(frame, &view))?;

            // ~60fps; the engine is ticked once per frame
            if !event::poll(Duration::from_millis(16))? {
                continue;
            }
            let Event::Key(key) = event::read()? else {
                continue;
            };
            if key.kind != KeyEventKind::Press {
                continue;
            }

            match key.code {
                KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return Ok(()),
                KeyCode::Char(' ') => {
                    if engine.state() == TransportState::Playing {
                        engine.pause();
                    } else {
                        last_error.borrow_mut().take();
                        let _ = engine.play(&self.timeline);
                    }
                }
                KeyCode::Char('s') => engine.stop(),
                KeyCode::Char('+') | KeyCode::Char('=') => {
                    engine.set_volume(engine.volume() + VOLUME_STEP)
                }
                KeyCode::Char('-') => engine.set_volume(engine.volume() - VOLUME_STEP),
                KeyCode::Left => engine.seek(engine.current_time() - SEEK_STEP),
                KeyCode::Right => engine.seek(engine.current_time() + SEEK_STEP),
                _ => {}
            }
        }
    }
}
