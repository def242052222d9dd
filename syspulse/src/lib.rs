//! syspulse: turns a live stream of host metrics snapshots into charts, I/O rates
//! and a process table.

pub mod app;
pub mod config;
pub mod error;
pub mod history;
pub mod logging;
pub mod prefs;
pub mod procs;
pub mod rates;
pub mod types;
pub mod ui;
pub mod ws;
