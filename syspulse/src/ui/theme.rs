//! Dark and light palettes.

use ratatui::style::Color;

use crate::prefs::ThemeMode;

#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub bg: Color,
    pub fg: Color,
    pub dim: Color,
    pub header: Color,
    pub cpu: Color,
    pub mem: Color,
    pub upload: Color,
    pub download: Color,
    pub ok: Color,
    pub bad: Color,
    pub hot_cpu: Color,
    pub hot_mem: Color,
    pub scrollbar: Color,
}

pub const DARK: Palette = Palette {
    bg: Color::Reset,
    fg: Color::Rgb(226, 232, 240),
    dim: Color::Rgb(148, 163, 184),
    header: Color::Cyan,
    cpu: Color::Rgb(14, 165, 233),
    mem: Color::Rgb(16, 185, 129),
    upload: Color::Rgb(99, 102, 241),
    download: Color::Rgb(236, 72, 153),
    ok: Color::Rgb(16, 185, 129),
    bad: Color::Rgb(239, 68, 68),
    hot_cpu: Color::Rgb(248, 113, 113),
    hot_mem: Color::Rgb(251, 146, 60),
    scrollbar: Color::Rgb(170, 170, 180),
};

pub const LIGHT: Palette = Palette {
    bg: Color::Rgb(248, 250, 252),
    fg: Color::Rgb(15, 23, 42),
    dim: Color::Rgb(100, 116, 139),
    header: Color::Rgb(2, 132, 199),
    cpu: Color::Rgb(2, 132, 199),
    mem: Color::Rgb(5, 150, 105),
    upload: Color::Rgb(79, 70, 229),
    download: Color::Rgb(219, 39, 119),
    ok: Color::Rgb(5, 150, 105),
    bad: Color::Rgb(220, 38, 38),
    hot_cpu: Color::Rgb(239, 68, 68),
    hot_mem: Color::Rgb(249, 115, 22),
    scrollbar: Color::Rgb(100, 116, 139),
};

pub fn palette(mode: ThemeMode) -> &'static Palette {
    match mode {
        ThemeMode::Dark => &DARK,
        ThemeMode::Light => &LIGHT,
    }
}
