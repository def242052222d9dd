//! Current disk and network throughput.

use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::rates::IoRates;
use crate::ui::theme::Palette;
use crate::ui::util::format_rate;

pub fn draw_io(f: &mut ratatui::Frame<'_>, area: Rect, rates: &IoRates, pal: &Palette) {
    let row = |name: &'static str, v: Option<f64>| {
        Line::from(vec![
            Span::styled(format!("{name:<11}"), Style::default().fg(pal.dim)),
            Span::styled(format_rate(v), Style::default().fg(pal.fg)),
        ])
    };
    let lines = vec![
        row("Disk read", rates.disk_read),
        row("Disk write", rates.disk_write),
        row("Net sent", rates.upload),
        row("Net recv", rates.download),
    ];
    f.render_widget(
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("I/O")),
        area,
    );
}
