//! Top header: connection status, host uptime and process count.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::app::UiState;
use crate::ui::theme::Palette;
use crate::ws::ConnState;

pub fn draw_header(f: &mut ratatui::Frame<'_>, area: Rect, ui: &UiState, pal: &Palette) {
    let (dot, status, color) = match ui.status {
        ConnState::Connected => ("●", "Connected", pal.ok),
        ConnState::Connecting => ("◌", "Connecting…", pal.dim),
        ConnState::Disconnected => ("●", "Disconnected", pal.bad),
    };
    let uptime = ui
        .system
        .as_ref()
        .map(|s| s.uptime.as_str())
        .filter(|s| !s.is_empty())
        .unwrap_or("N/A");

    let line = Line::from(vec![
        Span::styled(
            "syspulse ",
            Style::default().fg(pal.header).add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("{dot} {status}"), Style::default().fg(color)),
        Span::styled(
            format!(
                " | uptime: {uptime} | processes: {}  (q quit, / filter, 1-6 sort, t theme)",
                ui.process_count
            ),
            Style::default().fg(pal.dim),
        ),
    ]);
    f.render_widget(Paragraph::new(line), area);
}
