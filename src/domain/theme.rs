//! Theme Setting
//!
//! `System` follows the host color-scheme preference, re-resolved whenever
//! the host reports a change.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    System,
}

/// Concrete scheme applied to the widget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorScheme {
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
            Theme::System => "system",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "light" => Theme::Light,
            "dark" => Theme::Dark,
            _ => Theme::System,
        }
    }

    /// Resolve against the host preference (only consulted for `System`)
    pub fn resolve(&self, prefers_dark: bool) -> ColorScheme {
        match self {
            Theme::Light => ColorScheme::Light,
            Theme::Dark => ColorScheme::Dark,
            Theme::System if prefers_dark => ColorScheme::Dark,
            Theme::System => ColorScheme::Light,
        }
    }
}

impl ColorScheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColorScheme::Light => "light",
            ColorScheme::Dark => "dark",
        }
    }
}

/// Tracks the applied scheme for a theme setting and the host preference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeTracker {
    theme: Theme,
    prefers_dark: bool,
    applied: ColorScheme,
}

impl ThemeTracker {
    pub fn new(theme: Theme, prefers_dark: bool) -> Self {
        Self {
            theme,
            prefers_dark,
            applied: theme.resolve(prefers_dark),
        }
    }

    pub fn applied(&self) -> ColorScheme {
        self.applied
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Change the setting; returns the new scheme if it differs
    pub fn set_theme(&mut self, theme: Theme) -> Option<ColorScheme> {
        self.theme = theme;
        self.reapply()
    }

    /// Host color-scheme change notification; returns the new scheme if it differs
    pub fn on_system_change(&mut self, prefers_dark: bool) -> Option<ColorScheme> {
        self.prefers_dark = prefers_dark;
        self.reapply()
    }

    fn reapply(&mut self) -> Option<ColorScheme> {
        let next = self.theme.resolve(self.prefers_dark);
        if next == self.applied {
            return None;
        }
        self.applied = next;
        Some(next)
    }
}
