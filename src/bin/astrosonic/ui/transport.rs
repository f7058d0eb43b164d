//! Transport bar - play state, position, volume and device status

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use astrosonic::TransportState;

use super::View;

fn clock(seconds: f64) -> String {
    let whole = seconds.max(0.0) as u64;
    format!("{}:{:02}.{}", whole / 60, whole % 60, ((seconds.fract() * 10.0) as u64).min(9))
}

pub fn render_transport(frame: &mut Frame, area: Rect, view: &View) {
    let block = Block::default().title(" astrosonic ").borders(Borders::ALL);

    let (symbol, label, color) = match view.state {
        TransportState::Playing => ("▶", "Playing", Color::Green),
        TransportState::Paused => ("⏸", "Paused", Color::Yellow),
        TransportState::Stopped => ("■", "Stopped", Color::DarkGray),
    };

    let mut spans = vec![
        Span::styled(format!(" {symbol} {label}  "), Style::default().fg(color)),
        Span::styled(
            format!("{} / {}  ", clock(view.position), clock(view.duration)),
            Style::default().fg(Color::White),
        ),
        Span::styled(
            format!("{} events  ", view.timeline.len()),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(
            format!("Vol {:>3.0}%  ", view.volume * 100.0),
            Style::default().fg(Color::Cyan),
        ),
    ];

    match &view.error {
        Some(error) => spans.push(Span::styled(
            format!("⚠ {error} (space to retry)"),
            Style::default().fg(Color::Red),
        )),
        None if !view.device_ready => spans.push(Span::styled(
            "device idle",
            Style::default().fg(Color::DarkGray),
        )),
        None => {}
    }

    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}
