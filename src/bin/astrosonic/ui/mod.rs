//! TUI for astrosonic
//!
//! Transport bar, per-instrument timeline, compatibility summary and the
//! most recent log lines.

mod timeline;
mod transport;

use log::Level;
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use astrosonic::{CompatibilityScore, Timeline, TransportState};

use timeline::render_timeline;
use transport::render_transport;

/// Everything one frame shows.
pub struct View<'a> {
    pub title: &'a str,
    pub timeline: &'a Timeline,
    pub state: TransportState,
    pub position: f64,
    pub duration: f64,
    pub volume: f32,
    pub device_ready: bool,
    pub error: Option<String>,
    pub compatibility: Option<CompatibilityScore>,
    pub log: Vec<(Level, String)>,
}

pub fn render(frame: &mut Frame, view: &View) {
    let compat_height = if view.compatibility.is_some() { 3 } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),             // Transport bar
            Constraint::Min(6),                // Timeline
            Constraint::Length(compat_height), // Compatibility
            Constraint::Length(6),             // Log
            Constraint::Length(1),             // Help bar
        ])
        .split(frame.area());

    render_transport(frame, chunks[0], view);

    let timeline_block = Block::default()
        .title(format!(" {} ({}) ", view.title, view.timeline.genre()))
        .borders(Borders::ALL);
    let timeline_inner = timeline_block.inner(chunks[1]);
    frame.render_widget(timeline_block, chunks[1]);
    render_timeline(frame, timeline_inner, view);

    if let Some(score) = view.compatibility {
        render_compatibility(frame, chunks[2], &score);
    }

    render_log(frame, chunks[3], &view.log);

    let help = Paragraph::new(" [Space] Play/Pause  [S] Stop  [←/→] Seek  [+/-] Volume  [Q] Quit")
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, chunks[4]);
}

fn render_compatibility(frame: &mut Frame, area: ratatui::layout::Rect, score: &CompatibilityScore) {
    let line = Line::from(vec![
        Span::styled(
            format!(" Composite {:.2}  ", score.composite),
            Style::default().fg(Color::Magenta),
        ),
        Span::raw(format!(
            "harmony {:.2}  element {:.2}  house {:.2}",
            score.harmony_score, score.element_score, score.house_score
        )),
    ]);
    let block = Block::default().title(" Compatibility ").borders(Borders::ALL);
    frame.render_widget(Paragraph::new(line).block(block), area);
}

fn render_log(frame: &mut Frame, area: ratatui::layout::Rect, log: &[(Level, String)]) {
    let lines: Vec<Line> = log
        .iter()
        .map(|(level, text)| {
            let color = match level {
                Level::Error => Color::Red,
                Level::Warn => Color::Yellow,
                Level::Info => Color::White,
                Level::Debug | Level::Trace => Color::DarkGray,
            };
            Line::from(Span::styled(format!(" {text}"), Style::default().fg(color)))
        })
        .collect();
    let block = Block::default().title(" Log ").borders(Borders::ALL);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}
