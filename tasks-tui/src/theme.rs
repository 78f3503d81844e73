use ratatui::style::Color;

use crate::session_store::{SharedStore, THEME_KEY};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeMode {
    Light,
    Dark,
}

impl ThemeMode {
    pub fn storage_value(self) -> &'static str {
        match self {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
        }
    }

    pub fn from_storage(value: &str) -> Option<Self> {
        match value.trim() {
            "light" => Some(ThemeMode::Light),
            "dark" => Some(ThemeMode::Dark),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        }
    }
}

/// Whether the terminal advertises a dark background through `COLORFGBG`.
pub fn system_prefers_dark() -> bool {
    std::env::var("COLORFGBG")
        .ok()
        .is_some_and(|value| colorfgbg_is_dark(&value))
}

// "fg;bg" or "fg;default;bg". Background indices 0-6 and 8 are the dark ANSI colors.
fn colorfgbg_is_dark(value: &str) -> bool {
    value
        .rsplit(';')
        .next()
        .and_then(|bg| bg.trim().parse::<u8>().ok())
        .is_some_and(|bg| matches!(bg, 0..=6 | 8))
}

/// Light/dark preference, persisted per device.
pub struct ThemeState {
    mode: ThemeMode,
    store: SharedStore,
}

impl ThemeState {
    /// Stored preference first, then the system preference, then light.
    pub fn load(store: SharedStore, system_prefers_dark: bool) -> Self {
        let stored = match store.get_item(THEME_KEY) {
            Ok(value) => value.as_deref().and_then(ThemeMode::from_storage),
            Err(e) => {
                tracing::warn!(error = %e, "failed to read stored theme");
                None
            }
        };

        let mode = stored.unwrap_or(if system_prefers_dark {
            ThemeMode::Dark
        } else {
            ThemeMode::Light
        });

        Self { mode, store }
    }

    pub fn mode(&self) -> ThemeMode {
        self.mode
    }

    /// Flip the mode and persist it. A failed write keeps the new mode for this run.
    pub fn toggle(&mut self) -> ThemeMode {
        self.mode = self.mode.toggled();
        if let Err(e) = self.store.set_item(THEME_KEY, self.mode.storage_value()) {
            tracing::warn!(error = %e, "failed to persist theme");
        }
        self.mode
    }

    pub fn palette(&self) -> Palette {
        Palette::for_mode(self.mode)
    }
}

/// Colors every view draws with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Color,
    pub foreground: Color,
    pub muted: Color,
    pub accent: Color,
    pub border: Color,
    pub highlight_fg: Color,
    pub highlight_bg: Color,
    pub pending: Color,
    pub completed: Color,
    pub error: Color,
}

impl Palette {
    pub fn for_mode(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Dark => Self {
                background: Color::Black,
                foreground: Color::White,
                muted: Color::DarkGray,
                accent: Color::Cyan,
                border: Color::Gray,
                highlight_fg: Color::Black,
                highlight_bg: Color::White,
                pending: Color::Yellow,
                completed: Color::Green,
                error: Color::Red,
            },
            ThemeMode::Light => Self {
                background: Color::White,
                foreground: Color::Black,
                muted: Color::Gray,
                accent: Color::Blue,
                border: Color::DarkGray,
                highlight_fg: Color::White,
                highlight_bg: Color::Blue,
                pending: Color::Magenta,
                completed: Color::Green,
                error: Color::Red,
            },
        }
    }
}
