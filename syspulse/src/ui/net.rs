//! Upload/download sparklines over the rolling window (KB/s).

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Borders, Sparkline},
};

use crate::history::{MetricsWindow, Series};

pub fn draw_net_spark(
    f: &mut ratatui::Frame<'_>,
    area: Rect,
    name: &str,
    window: &MetricsWindow,
    which: Series,
    color: Color,
) {
    let title = format!(
        "{name} (KB/s) - now: {:.1} | peak: {:.1}",
        window.latest(which).unwrap_or(0.0),
        window.peak(which)
    );

    // Only the newest values that fit between the borders.
    let series = window.series(which);
    let visible = area.width.saturating_sub(2) as usize;
    let data: Vec<u64> = series
        .iter()
        .skip(series.len().saturating_sub(visible))
        .map(|kbps| kbps.max(0.0).ceil() as u64)
        .collect();

    f.render_widget(
        Sparkline::default()
            .block(Block::default().borders(Borders::ALL).title(title))
            .style(Style::default().fg(color))
            .data(&data),
        area,
    );
}
