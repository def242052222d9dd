//! Memory gauge.

use ratatui::{
    layout::Rect,
    style::Style,
    widgets::{Block, Borders, Gauge},
};

use crate::types::SystemSample;
use crate::ui::theme::Palette;

pub fn draw_mem(f: &mut ratatui::Frame<'_>, area: Rect, s: Option<&SystemSample>, pal: &Palette) {
    let (pct, label) = match s {
        Some(s) => (
            s.memory_percent.clamp(0.0, 100.0).round() as u16,
            format!(
                "{:.1}% | {} GB / {} GB",
                s.memory_percent, s.memory_used_gb, s.memory_total_gb
            ),
        ),
        None => (0, "N/A".into()),
    };

    let g = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title("Memory"))
        .gauge_style(Style::default().fg(pal.mem))
        .percent(pct)
        .label(label);
    f.render_widget(g, area);
}
