//! Timeline widget - one row per instrument class with a playhead

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use super::View;

const LABEL_WIDTH: u16 = 12;

pub fn render_timeline(frame: &mut Frame, area: Rect, view: &View) {
    if area.height < 2 || area.width < LABEL_WIDTH + 8 {
        return;
    }
    if view.timeline.is_empty() {
        frame.render_widget(
            Paragraph::new(" (empty chart, nothing to play)").style(Style::default().fg(Color::DarkGray)),
            area,
        );
        return;
    }

    let width = area.width.saturating_sub(LABEL_WIDTH + 1) as usize;
    let seconds_per_cell = view.duration.max(f64::EPSILON) / width as f64;
    let playhead = ((view.position / seconds_per_cell) as usize).min(width.saturating_sub(1));

    let mut lines = Vec::new();

    for instrument in view.timeline.instruments() {
        let events: Vec<_> = view
            .timeline
            .events()
            .iter()
            .filter(|e| e.instrument == instrument)
            .collect();
        let sounding = events
            .iter()
            .any(|e| e.start <= view.position && view.position < e.end());

        let row: String = (0..width)
            .map(|cell| {
                let t = cell as f64 * seconds_per_cell;
                let covered = events.iter().any(|e| t >= e.start && t < e.end());
                match (covered, cell == playhead) {
                    (_, true) => '│',
                    (true, false) => '▓',
                    (false, false) => '░',
                }
            })
            .collect();

        let (label_color, row_color) = if sounding {
            (Color::White, Color::Cyan)
        } else {
            (Color::DarkGray, Color::Blue)
        };
        lines.push(Line::from(vec![
            Span::styled(
                format!(" {:<width$}", instrument.name(), width = LABEL_WIDTH as usize - 1),
                Style::default().fg(label_color),
            ),
            Span::styled(row, Style::default().fg(row_color)),
        ]));
    }

    let mut marker = " ".repeat(LABEL_WIDTH as usize + playhead);
    marker.push('▲');
    lines.push(Line::from(Span::styled(marker, Style::default().fg(Color::Yellow))));

    frame.render_widget(Paragraph::new(lines), area);
}
