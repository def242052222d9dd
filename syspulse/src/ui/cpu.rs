//! CPU and memory usage chart over the rolling window.

use ratatui::{
    layout::Rect,
    style::Style,
    symbols,
    text::Span,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
};

use crate::history::{MetricsWindow, Series, DEFAULT_MAX_DATA_POINTS};
use crate::ui::theme::Palette;

fn points(values: &[f64]) -> Vec<(f64, f64)> {
    values
        .iter()
        .enumerate()
        .map(|(i, v)| (i as f64, v.clamp(0.0, 100.0)))
        .collect()
}

pub fn draw_usage_chart(f: &mut ratatui::Frame<'_>, area: Rect, window: &MetricsWindow, pal: &Palette) {
    let (labels, series) = window.chart_data();
    let cpu = series.first().map(|v| points(v)).unwrap_or_default();
    let mem = series.get(1).map(|v| points(v)).unwrap_or_default();
    let title = match (window.latest(Series::Cpu), window.latest(Series::Memory)) {
        (Some(c), Some(m)) => format!("CPU {c:>5.1}% | Memory {m:>5.1}%"),
        _ => "CPU / Memory".into(),
    };

    let x_labels: Vec<Span> = match labels.as_slice() {
        [] => Vec::new(),
        [only] => vec![Span::raw(only.clone())],
        [first, .., last] => vec![Span::raw(first.clone()), Span::raw(last.clone())],
    };
    // Fill left to right up to the window size; very large windows scale with the data.
    let span = window
        .capacity()
        .min(labels.len().max(DEFAULT_MAX_DATA_POINTS))
        .max(2);
    let x_max = (span - 1) as f64;

    let datasets = vec![
        Dataset::default()
            .name("CPU")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(pal.cpu))
            .data(&cpu),
        Dataset::default()
            .name("Memory")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(pal.mem))
            .data(&mem),
    ];

    let chart = Chart::new(datasets)
        .block(Block::default().borders(Borders::ALL).title(title))
        .x_axis(
            Axis::default()
                .bounds([0.0, x_max])
                .labels(x_labels)
                .style(Style::default().fg(pal.dim)),
        )
        .y_axis(
            Axis::default()
                .bounds([0.0, 100.0])
                .labels(vec![Span::raw("0%"), Span::raw("50%"), Span::raw("100%")])
                .style(Style::default().fg(pal.dim)),
        );
    f.render_widget(chart, area);
}
