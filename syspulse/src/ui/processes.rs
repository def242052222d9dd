//! Process table with filter line, sort indicator, highlight thresholds and a scrollbar.

use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
};

use crate::procs::{ProcessView, SortColumn, SortDirection};
use crate::ui::theme::Palette;
use crate::ui::util::truncate_end;

pub const HIGH_CPU_PCT: f64 = 50.0;
pub const HIGH_MEM_PCT: f64 = 50.0;

// Shared by drawing and hit-testing so header clicks land on the right column.
const COLS: [Constraint; 6] = [
    Constraint::Length(8),      // PID
    Constraint::Percentage(35), // Name
    Constraint::Length(7),      // CPU %
    Constraint::Length(7),      // Mem %
    Constraint::Length(10),     // Status
    Constraint::Min(6),         // User
];

/// Areas inside the outer block: filter line, table content, scrollbar column.
struct Regions {
    filter: Rect,
    content: Rect,
    scrollbar: Rect,
}

fn regions(area: Rect) -> Option<Regions> {
    let inner = Rect {
        x: area.x + 1,
        y: area.y + 1,
        width: area.width.saturating_sub(2),
        height: area.height.saturating_sub(2),
    };
    if inner.height < 3 || inner.width < 4 {
        return None;
    }
    Some(Regions {
        filter: Rect { height: 1, ..inner },
        content: Rect {
            x: inner.x,
            y: inner.y + 1,
            width: inner.width.saturating_sub(2),
            height: inner.height - 1,
        },
        scrollbar: Rect {
            x: inner.x + inner.width - 1,
            y: inner.y + 1,
            width: 1,
            height: inner.height - 1,
        },
    })
}

/// Rows of the table body visible in `area` (excludes borders, filter line and header).
pub fn viewport_rows(area: Rect) -> usize {
    regions(area)
        .map(|r| r.content.height.saturating_sub(1) as usize)
        .unwrap_or(0)
}

pub fn clamp_scroll(scroll: &mut usize, total_rows: usize, viewport: usize) {
    let max_off = total_rows.saturating_sub(viewport.max(1));
    if *scroll > max_off {
        *scroll = max_off;
    }
}

pub fn draw_processes(
    f: &mut ratatui::Frame<'_>,
    area: Rect,
    view: &ProcessView,
    process_count: usize,
    scroll_offset: usize,
    filter_editing: bool,
    pal: &Palette,
) {
    let rows = view.project();
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(
            "Processes ({} shown / {process_count} total)",
            rows.len()
        ));
    f.render_widget(block, area);
    let Some(reg) = regions(area) else { return };

    // Filter line
    let filter_text = if filter_editing {
        format!("Filter: {}▏", view.filter())
    } else if view.filter().is_empty() {
        "Filter: (press / to search)".to_string()
    } else {
        format!("Filter: {}", view.filter())
    };
    let filter_style = if filter_editing {
        Style::default().fg(pal.header)
    } else {
        Style::default().fg(pal.dim)
    };
    f.render_widget(
        Paragraph::new(Line::from(Span::styled(filter_text, filter_style))),
        reg.filter,
    );

    let (sort_col, sort_dir) = view.sort();
    let header_cells: Vec<Cell> = SortColumn::ALL
        .iter()
        .map(|&c| {
            if c == sort_col {
                let arrow = match sort_dir {
                    SortDirection::Asc => "↑",
                    SortDirection::Desc => "↓",
                };
                Cell::from(format!("{} {arrow}", c.title()))
                    .style(Style::default().add_modifier(Modifier::UNDERLINED))
            } else {
                Cell::from(c.title())
            }
        })
        .collect();
    let header = Row::new(header_cells).style(
        Style::default()
            .fg(pal.header)
            .add_modifier(Modifier::BOLD),
    );

    if rows.is_empty() {
        let msg = if view.filter().is_empty() {
            "No data available."
        } else {
            "No processes found matching query."
        };
        let table = Table::new(Vec::<Row>::new(), COLS.to_vec())
            .header(header)
            .column_spacing(1);
        f.render_widget(table, reg.content);
        let msg_area = Rect {
            y: reg.content.y + 2,
            height: 1,
            ..reg.content
        };
        if msg_area.y < reg.content.y + reg.content.height {
            f.render_widget(
                Paragraph::new(Span::styled(msg, Style::default().fg(pal.dim))).centered(),
                msg_area,
            );
        }
        return;
    }

    // Scrolling
    let total_rows = rows.len();
    let viewport = reg.content.height.saturating_sub(1) as usize;
    let max_off = total_rows.saturating_sub(viewport);
    let offset = scroll_offset.min(max_off);
    let name_width = (reg.content.width as usize * 35 / 100).max(4);

    let body = rows.iter().skip(offset).take(viewport).map(|p| {
        let cpu_style = if p.cpu_percent > HIGH_CPU_PCT {
            Style::default().fg(pal.hot_cpu).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(pal.fg)
        };
        let mem_style = if p.memory_percent > HIGH_MEM_PCT {
            Style::default().fg(pal.hot_mem).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(pal.fg)
        };
        let status_style = if p.status.is_running() {
            Style::default().fg(pal.ok)
        } else {
            Style::default().fg(pal.dim)
        };
        Row::new(vec![
            Cell::from(p.pid.to_string()).style(Style::default().fg(pal.dim)),
            Cell::from(truncate_end(p.name.as_deref().unwrap_or("N/A"), name_width))
                .style(Style::default().fg(pal.fg)),
            Cell::from(format!("{:>5.1}", p.cpu_percent)).style(cpu_style),
            Cell::from(format!("{:>5.1}", p.memory_percent)).style(mem_style),
            Cell::from(p.status.as_str().to_string()).style(status_style),
            Cell::from(p.username.clone().unwrap_or_else(|| "N/A".into()))
                .style(Style::default().fg(pal.dim)),
        ])
    });

    let table = Table::new(body, COLS.to_vec())
        .header(header)
        .column_spacing(1);
    f.render_widget(table, reg.content);

    draw_scrollbar(f, reg.scrollbar, total_rows, viewport, offset, pal);
}

fn draw_scrollbar(
    f: &mut ratatui::Frame<'_>,
    area: Rect,
    total_rows: usize,
    viewport: usize,
    offset: usize,
    pal: &Palette,
) {
    if area.height < 3 {
        return;
    }
    let track = (area.height - 2) as usize;
    let total = total_rows.max(1);
    let view = viewport.clamp(1, total);
    let max_off = total.saturating_sub(view);

    let thumb_len = (track * view).div_ceil(total).clamp(1, track);
    let thumb_top = if max_off == 0 {
        0
    } else {
        ((track - thumb_len) * offset + max_off / 2) / max_off
    };

    let style = Style::default().fg(pal.scrollbar);
    let mut lines: Vec<Line> = Vec::with_capacity(area.height as usize);
    lines.push(Line::from(Span::styled("▲", style)));
    for i in 0..track {
        let glyph = if i >= thumb_top && i < thumb_top + thumb_len {
            "█"
        } else {
            "│"
        };
        lines.push(Line::from(Span::styled(glyph, style)));
    }
    lines.push(Line::from(Span::styled("▼", style)));
    f.render_widget(Paragraph::new(lines), area);
}

/// Keyboard scrolling (Up/Down/PageUp/PageDown/Home/End).
pub fn processes_handle_key(scroll_offset: &mut usize, key: KeyEvent, page_size: usize) {
    let page = page_size.max(1);
    match key.code {
        KeyCode::Up => *scroll_offset = scroll_offset.saturating_sub(1),
        KeyCode::Down => *scroll_offset = scroll_offset.saturating_add(1),
        KeyCode::PageUp => *scroll_offset = scroll_offset.saturating_sub(page),
        KeyCode::PageDown => *scroll_offset = scroll_offset.saturating_add(page),
        KeyCode::Home => *scroll_offset = 0,
        KeyCode::End => *scroll_offset = usize::MAX,
        _ => {}
    }
}

/// Wheel scrolling inside the table. Returns the column whose header was clicked.
pub fn processes_handle_mouse(
    scroll_offset: &mut usize,
    mouse: MouseEvent,
    area: Rect,
) -> Option<SortColumn> {
    let reg = regions(area)?;
    let inside = |r: Rect| {
        mouse.column >= r.x
            && mouse.column < r.x + r.width
            && mouse.row >= r.y
            && mouse.row < r.y + r.height
    };
    match mouse.kind {
        MouseEventKind::ScrollUp if inside(reg.content) => {
            *scroll_offset = scroll_offset.saturating_sub(1);
            None
        }
        MouseEventKind::ScrollDown if inside(reg.content) => {
            *scroll_offset = scroll_offset.saturating_add(1);
            None
        }
        MouseEventKind::Down(MouseButton::Left) => {
            let header = Rect {
                height: 1,
                ..reg.content
            };
            if !inside(header) {
                return None;
            }
            let cols = Layout::default()
                .direction(Direction::Horizontal)
                .constraints(COLS.to_vec())
                .spacing(1)
                .split(header);
            cols.iter()
                .position(|c| mouse.column >= c.x && mouse.column < c.x + c.width)
                .map(|i| SortColumn::ALL[i])
        }
        _ => None,
    }
}
