//! App state and main loop: one dispatch point for stream events and terminal input,
//! feeding the rate engine, rolling window and process view, then drawing.

use std::{io, path::PathBuf, time::Instant};

use anyhow::Result;
use crossterm::{
    event::{
        DisableMouseCapture, EnableMouseCapture, Event, EventStream, KeyCode, KeyEvent,
        KeyEventKind, KeyModifiers, MouseEvent,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures_util::StreamExt;
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    widgets::Block,
    Terminal,
};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::history::{MetricsWindow, Series, WindowSample};
use crate::prefs::{save_prefs, Prefs, ThemeMode};
use crate::procs::{ProcessView, SortColumn, SortDirection};
use crate::rates::{IoRates, RateEngine};
use crate::types::{MetricsSnapshot, SystemSample};
use crate::ui::{
    cpu::draw_usage_chart,
    header::draw_header,
    io::draw_io,
    mem::draw_mem,
    net::draw_net_spark,
    processes::{
        clamp_scroll, draw_processes, processes_handle_key, processes_handle_mouse, viewport_rows,
    },
    theme::palette,
};
use crate::ws::{run_stream, ConnState, ConnectionManager, StreamEvent};

/// Everything the dispatch loop reacts to.
#[derive(Debug)]
pub enum AppEvent {
    Stream(StreamEvent),
    Input(Event),
}

/// Presentation state. The core components never read it.
#[derive(Debug, Default)]
pub struct UiState {
    pub status: ConnState,
    pub theme: ThemeMode,
    pub system: Option<SystemSample>,
    pub process_count: usize,
    pub rates: IoRates,
    pub procs_scroll: usize,
    pub filter_editing: bool,
    last_procs_area: Option<Rect>,
}

pub struct App {
    config: Config,
    engine: RateEngine,
    window: MetricsWindow,
    procs: ProcessView,
    pub ui: UiState,
    prefs_path: PathBuf,
    should_quit: bool,
}

pub fn time_label() -> String {
    chrono::Local::now().format("%H:%M:%S").to_string()
}

impl App {
    pub fn new(config: Config, prefs: Prefs, prefs_path: PathBuf) -> Self {
        let window = MetricsWindow::new(config.max_data_points);
        Self {
            config,
            engine: RateEngine::new(),
            window,
            procs: ProcessView::new(),
            ui: UiState {
                theme: prefs.theme,
                ..Default::default()
            },
            prefs_path,
            should_quit: false,
        }
    }

    /// Sort the process table by `column`, descending.
    pub fn sort_by(&mut self, column: SortColumn) {
        self.procs.set_sort(column, SortDirection::Desc);
    }

    pub fn window(&self) -> &MetricsWindow {
        &self.window
    }

    pub fn procs(&self) -> &ProcessView {
        &self.procs
    }

    pub fn engine(&self) -> &RateEngine {
        &self.engine
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub async fn run(&mut self) -> Result<()> {
        let (tx, rx) = mpsc::channel(64);
        let mgr = ConnectionManager::new(self.config.ws_url.clone(), self.config.reconnect_delay);
        let stream_task = tokio::spawn(run_stream(mgr, tx));

        // Terminal setup
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        terminal.clear()?;

        let res = self.event_loop(&mut terminal, rx).await;

        // Teardown
        stream_task.abort();
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), DisableMouseCapture, LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        res
    }

    async fn event_loop<B: ratatui::backend::Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
        mut rx: mpsc::Receiver<StreamEvent>,
    ) -> Result<()> {
        let mut input = EventStream::new();
        loop {
            terminal.draw(|f| self.draw(f))?;

            let ev = tokio::select! {
                ev = rx.recv() => match ev {
                    Some(ev) => AppEvent::Stream(ev),
                    None => break,
                },
                ev = input.next() => match ev {
                    Some(Ok(ev)) => AppEvent::Input(ev),
                    Some(Err(e)) => return Err(e.into()),
                    None => break,
                },
            };
            self.dispatch(ev);
            if self.should_quit {
                break;
            }
        }
        Ok(())
    }

    pub fn dispatch(&mut self, ev: AppEvent) {
        match ev {
            AppEvent::Stream(ev) => self.handle_stream_event(ev, Instant::now(), time_label()),
            AppEvent::Input(Event::Key(k)) if k.kind == KeyEventKind::Press => self.handle_key(k),
            AppEvent::Input(Event::Mouse(m)) => self.handle_mouse(m),
            AppEvent::Input(_) => {}
        }
    }

    /// Apply one stream event. `now` and `label` stamp a snapshot's window entry.
    pub fn handle_stream_event(&mut self, ev: StreamEvent, now: Instant, label: String) {
        match ev {
            StreamEvent::Connecting => self.ui.status = ConnState::Connecting,
            StreamEvent::Connected => {
                // Counters start a new epoch on every connection.
                self.engine.reset();
                self.ui.status = ConnState::Connected;
            }
            StreamEvent::Disconnected => self.ui.status = ConnState::Disconnected,
            StreamEvent::Snapshot(snap) => self.ingest(snap, now, label),
        }
    }

    fn ingest(&mut self, snap: MetricsSnapshot, now: Instant, label: String) {
        let MetricsSnapshot {
            system,
            process_count,
            processes,
        } = snap;

        let rates = self.engine.observe(&system, now);
        self.window.push(WindowSample {
            label,
            cpu_percent: system.cpu_percent,
            memory_percent: system.memory_percent,
            upload_kbps: rates.upload_or_zero() / 1024.0,
            download_kbps: rates.download_or_zero() / 1024.0,
        });
        self.procs.set_processes(processes);

        self.ui.rates = rates;
        self.ui.system = Some(system);
        self.ui.process_count = process_count;
        self.clamp_procs_scroll();
    }

    fn clamp_procs_scroll(&mut self) {
        let viewport = self.ui.last_procs_area.map(viewport_rows).unwrap_or(usize::MAX);
        let total = self.procs.project().len();
        clamp_scroll(&mut self.ui.procs_scroll, total, viewport);
    }

    pub fn handle_key(&mut self, k: KeyEvent) {
        if k.code == KeyCode::Char('c') && k.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }
        if self.ui.filter_editing {
            self.edit_filter(k);
            return;
        }
        match k.code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('/') => self.ui.filter_editing = true,
            KeyCode::Char('t') | KeyCode::Char('T') => self.toggle_theme(),
            KeyCode::Char(c @ '1'..='6') => {
                let idx = c as usize - '1' as usize;
                self.select_sort(SortColumn::ALL[idx]);
            }
            _ => {
                let page = self.ui.last_procs_area.map(viewport_rows).unwrap_or(1);
                processes_handle_key(&mut self.ui.procs_scroll, k, page);
                self.clamp_procs_scroll();
            }
        }
    }

    fn edit_filter(&mut self, k: KeyEvent) {
        let mut term = self.procs.filter().to_string();
        match k.code {
            KeyCode::Enter | KeyCode::Esc => {
                self.ui.filter_editing = false;
                return;
            }
            KeyCode::Char('u') if k.modifiers.contains(KeyModifiers::CONTROL) => term.clear(),
            KeyCode::Backspace => {
                term.pop();
            }
            KeyCode::Char(c) => term.push(c),
            _ => return,
        }
        self.procs.set_filter(&term);
        self.ui.procs_scroll = 0;
    }

    fn select_sort(&mut self, column: SortColumn) {
        self.procs.select_sort(column);
        let (column, direction) = self.procs.sort();
        debug!(%column, ?direction, "process sort changed");
        self.ui.procs_scroll = 0;
    }

    fn toggle_theme(&mut self) {
        self.ui.theme = self.ui.theme.toggled();
        let prefs = Prefs {
            theme: self.ui.theme,
        };
        match save_prefs(&self.prefs_path, &prefs) {
            Ok(()) => info!(theme = ?self.ui.theme, "theme saved"),
            Err(e) => warn!(error = %e, path = %self.prefs_path.display(), "failed to save theme"),
        }
    }

    pub fn handle_mouse(&mut self, m: MouseEvent) {
        let Some(area) = self.ui.last_procs_area else {
            return;
        };
        if let Some(col) = processes_handle_mouse(&mut self.ui.procs_scroll, m, area) {
            self.select_sort(col);
        }
        self.clamp_procs_scroll();
    }

    pub fn draw(&mut self, f: &mut ratatui::Frame<'_>) {
        let area = f.area();
        let pal = palette(self.ui.theme);
        f.render_widget(Block::default().style(Style::default().bg(pal.bg).fg(pal.fg)), area);

        // Root rows: header, charts, network sparklines, processes
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Ratio(1, 3),
                Constraint::Length(5),
                Constraint::Min(8),
            ])
            .split(area);

        draw_header(f, rows[0], &self.ui, pal);

        let top = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(66), Constraint::Percentage(34)])
            .split(rows[1]);
        draw_usage_chart(f, top[0], &self.window, pal);

        let side = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(4)])
            .split(top[1]);
        draw_mem(f, side[0], self.ui.system.as_ref(), pal);
        draw_io(f, side[1], &self.ui.rates, pal);

        let net = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(rows[2]);
        draw_net_spark(f, net[0], "Download", &self.window, Series::Download, pal.download);
        draw_net_spark(f, net[1], "Upload", &self.window, Series::Upload, pal.upload);

        // Cache for input handlers
        self.ui.last_procs_area = Some(rows[3]);
        draw_processes(
            f,
            rows[3],
            &self.procs,
            self.ui.process_count,
            self.ui.procs_scroll,
            self.ui.filter_editing,
            pal,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{NetworkCounters, ProcessSample, ProcessStatus};
    use std::time::Duration;

    fn app() -> (App, tempfile::TempDir) {
        let td = tempfile::tempdir().unwrap();
        let cfg = Config {
            max_data_points: 3,
            ..Config::default()
        };
        let app = App::new(cfg, Prefs::default(), td.path().join("prefs.json"));
        (app, td)
    }

    fn snap(cpu: f64, sent: u64, recv: u64, procs: &[(u32, &str, f64)]) -> StreamEvent {
        StreamEvent::Snapshot(MetricsSnapshot {
            system: SystemSample {
                cpu_percent: cpu,
                memory_percent: 30.0,
                memory_used_gb: 2.4,
                memory_total_gb: 8.0,
                uptime: "2h 1m 0s".into(),
                disk: None,
                network: Some(NetworkCounters {
                    bytes_sent: sent,
                    bytes_recv: recv,
                }),
            },
            process_count: procs.len(),
            processes: procs
                .iter()
                .map(|&(pid, name, cpu)| ProcessSample {
                    pid,
                    name: Some(name.into()),
                    cpu_percent: cpu,
                    memory_percent: 1.0,
                    status: ProcessStatus::Running,
                    username: Some("me".into()),
                })
                .collect(),
        })
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn snapshot_updates_window_processes_and_rates_together() {
        let (mut app, _td) = app();
        let t0 = Instant::now();
        app.handle_stream_event(StreamEvent::Connected, t0, String::new());
        app.handle_stream_event(snap(10.0, 1000, 0, &[(1, "bash", 10.0)]), t0, "A".into());
        app.handle_stream_event(
            snap(20.0, 1000 + 2048 * 2, 0, &[(1, "bash", 10.0), (2, "chrome", 80.0)]),
            t0 + Duration::from_secs(2),
            "B".into(),
        );

        assert_eq!(app.window().len(), 2);
        assert_eq!(app.window().latest(Series::Upload), Some(2.0));
        assert_eq!(app.window().series(Series::Upload)[0], 0.0);
        assert_eq!(app.ui.rates.upload, Some(2048.0));
        assert_eq!(app.ui.process_count, 2);
        let top: Vec<u32> = app.procs().project().iter().map(|p| p.pid).collect();
        assert_eq!(top, [2, 1]);
    }

    #[test]
    fn reconnect_resets_baseline_so_smaller_counters_do_not_spike() {
        let (mut app, _td) = app();
        let t0 = Instant::now();
        app.handle_stream_event(StreamEvent::Connected, t0, String::new());
        app.handle_stream_event(snap(1.0, 5_000_000, 5_000_000, &[]), t0, "a".into());
        app.handle_stream_event(
            snap(1.0, 5_001_024, 5_000_000, &[]),
            t0 + Duration::from_secs(1),
            "b".into(),
        );
        assert_eq!(app.ui.rates.upload, Some(1024.0));

        app.handle_stream_event(StreamEvent::Disconnected, t0, String::new());
        assert_eq!(app.ui.status, ConnState::Disconnected);
        app.handle_stream_event(StreamEvent::Connected, t0, String::new());
        assert!(app.engine().baseline().is_none());

        app.handle_stream_event(snap(1.0, 100, 100, &[]), t0 + Duration::from_secs(5), "c".into());
        assert_eq!(app.ui.rates.upload, None);
        assert_eq!(app.window().latest(Series::Upload), Some(0.0));
        assert_eq!(app.window().latest(Series::Download), Some(0.0));
    }

    #[test]
    fn duplicate_timestamp_repeats_retained_rates_in_window() {
        let (mut app, _td) = app();
        let t0 = Instant::now();
        let t1 = t0 + Duration::from_secs(1);
        app.handle_stream_event(StreamEvent::Connected, t0, String::new());
        app.handle_stream_event(snap(1.0, 0, 0, &[]), t0, "A".into());
        app.handle_stream_event(snap(2.0, 4096, 1024, &[]), t1, "B".into());
        assert_eq!(app.window().latest(Series::Upload), Some(4.0));

        // Same instant again: no new rate, but the window still advances.
        app.handle_stream_event(snap(3.0, 999_999, 999_999, &[]), t1, "C".into());
        assert_eq!(app.window().len(), 3);
        assert_eq!(app.window().latest(Series::Cpu), Some(3.0));
        let up: Vec<f64> = app.window().series(Series::Upload).iter().copied().collect();
        let down: Vec<f64> = app.window().series(Series::Download).iter().copied().collect();
        assert_eq!(up, [0.0, 4.0, 4.0]);
        assert_eq!(down, [0.0, 1.0, 1.0]);
        assert_eq!(app.ui.rates.upload, Some(4096.0));
    }

    #[test]
    fn huge_window_capacity_is_usable() {
        let td = tempfile::tempdir().unwrap();
        let layer = crate::config::ConfigLayer {
            max_data_points: Some(1 << 40),
            ..Default::default()
        };
        let cfg = Config::resolve([&layer]).unwrap();
        let mut app = App::new(cfg, Prefs::default(), td.path().join("prefs.json"));
        let t0 = Instant::now();
        app.handle_stream_event(StreamEvent::Connected, t0, String::new());
        app.handle_stream_event(snap(5.0, 0, 0, &[(1, "init", 0.1)]), t0, "A".into());
        assert_eq!(app.window().len(), 1);
        let mut term = Terminal::new(ratatui::backend::TestBackend::new(100, 30)).unwrap();
        term.draw(|f| app.draw(f)).unwrap();
    }

    #[test]
    fn window_respects_configured_capacity() {
        let (mut app, _td) = app();
        let t0 = Instant::now();
        app.handle_stream_event(StreamEvent::Connected, t0, String::new());
        for (i, l) in ["A", "B", "C", "D"].iter().enumerate() {
            app.handle_stream_event(
                snap(i as f64, 0, 0, &[]),
                t0 + Duration::from_secs(i as u64),
                l.to_string(),
            );
        }
        let labels: Vec<&str> = app.window().labels().iter().map(String::as_str).collect();
        assert_eq!(labels, ["B", "C", "D"]);
    }

    #[test]
    fn filter_editing_and_sort_keys() {
        let (mut app, _td) = app();
        let t0 = Instant::now();
        app.handle_stream_event(StreamEvent::Connected, t0, String::new());
        app.handle_stream_event(
            snap(1.0, 0, 0, &[(1, "bash", 10.0), (2, "chrome", 80.0)]),
            t0,
            "A".into(),
        );

        app.handle_key(key(KeyCode::Char('/')));
        assert!(app.ui.filter_editing);
        for c in "CH".chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
        // 'q' while editing is text, not quit
        app.handle_key(key(KeyCode::Char('q')));
        assert!(!app.should_quit());
        app.handle_key(key(KeyCode::Backspace));
        app.handle_key(key(KeyCode::Enter));
        assert!(!app.ui.filter_editing);
        assert_eq!(app.procs().filter(), "CH");
        assert_eq!(app.procs().project().len(), 1);

        // '3' is the cpu column, already active => flips to ascending
        app.handle_key(key(KeyCode::Char('3')));
        assert_eq!(
            app.procs().sort(),
            (SortColumn::Cpu, crate::procs::SortDirection::Asc)
        );
        app.handle_key(key(KeyCode::Char('2')));
        assert_eq!(
            app.procs().sort(),
            (SortColumn::Name, crate::procs::SortDirection::Desc)
        );
        app.sort_by(SortColumn::Pid);
        assert_eq!(
            app.procs().sort(),
            (SortColumn::Pid, crate::procs::SortDirection::Desc)
        );

        app.handle_key(key(KeyCode::Char('q')));
        assert!(app.should_quit());
    }

    #[test]
    fn theme_toggle_is_persisted() {
        let (mut app, td) = app();
        assert_eq!(app.ui.theme, ThemeMode::Dark);
        app.handle_key(key(KeyCode::Char('t')));
        assert_eq!(app.ui.theme, ThemeMode::Light);
        let saved = crate::prefs::load_prefs(&td.path().join("prefs.json"));
        assert_eq!(saved.theme, ThemeMode::Light);
    }

    #[test]
    fn status_follows_connection_events() {
        let (mut app, _td) = app();
        let t0 = Instant::now();
        assert_eq!(app.ui.status, ConnState::Disconnected);
        app.dispatch(AppEvent::Stream(StreamEvent::Connecting));
        assert_eq!(app.ui.status, ConnState::Connecting);
        app.handle_stream_event(StreamEvent::Connected, t0, String::new());
        assert_eq!(app.ui.status, ConnState::Connected);
    }

    #[test]
    fn draws_without_panicking_on_small_and_empty_terminals() {
        use ratatui::backend::TestBackend;
        let (mut app, _td) = app();
        for (w, h) in [(120, 40), (40, 12)] {
            let mut term = Terminal::new(TestBackend::new(w, h)).unwrap();
            term.draw(|f| app.draw(f)).unwrap();
        }
        let t0 = Instant::now();
        app.handle_stream_event(StreamEvent::Connected, t0, String::new());
        app.handle_stream_event(snap(99.0, 0, 0, &[(1, "x", 99.0)]), t0, "A".into());
        let mut term = Terminal::new(TestBackend::new(100, 30)).unwrap();
        term.draw(|f| app.draw(f)).unwrap();
    }
}
