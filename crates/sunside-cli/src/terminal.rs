//! Terminal styling and color utilities.
//!
//! ANSI escape code definitions and capability detection for the styled
//! output formats. Colors follow the map palette used for route segments:
//! orange for sun on the left, red for sun on the right, gray for darkness.

use sunside_lib::SunSide;

/// ANSI escape codes for text styling and colors.
pub mod colors {
    /// Reset all styling.
    pub const RESET: &str = "\x1b[0m";

    // Tag colors (bold reverse video badges)
    /// Bold reverse green for STRT tags.
    pub const TAG_START: &str = "\x1b[1;7;32m";
    /// Bold reverse magenta for GOAL tags.
    pub const TAG_GOAL: &str = "\x1b[1;7;35m";
    /// Bold reverse orange for runs with the sun on the left.
    pub const TAG_LEFT: &str = "\x1b[1;7;38;5;214m";
    /// Bold reverse red for runs with the sun on the right.
    pub const TAG_RIGHT: &str = "\x1b[1;7;31m";
    /// Bold reverse gray for runs in darkness.
    pub const TAG_DARK: &str = "\x1b[1;7;90m";

    // Text colors
    /// Bright bold white for emphasis (coordinates, totals).
    pub const WHITE_BOLD: &str = "\x1b[1;97m";
    /// Gray for secondary elements and no-sun values.
    pub const GRAY: &str = "\x1b[90m";
    /// Cyan for headings and sun angles.
    pub const CYAN: &str = "\x1b[36m";
    /// Yellow for the sun glyph.
    pub const YELLOW: &str = "\x1b[33m";
    /// Orange (256-color), matches `#ff9f1c`.
    pub const ORANGE: &str = "\x1b[38;5;214m";
    /// Red, matches `#e71d36`.
    pub const RED: &str = "\x1b[31m";
}

/// Resolved color codes, either ANSI sequences or empty strings when color
/// is disabled.
#[derive(Debug, Clone, Copy)]
pub struct ColorPalette {
    pub reset: &'static str,
    pub tag_start: &'static str,
    pub tag_goal: &'static str,
    pub tag_left: &'static str,
    pub tag_right: &'static str,
    pub tag_dark: &'static str,
    pub white_bold: &'static str,
    pub gray: &'static str,
    pub cyan: &'static str,
    pub yellow: &'static str,
    pub orange: &'static str,
    pub red: &'static str,
}

impl ColorPalette {
    /// Create a palette with actual ANSI color codes.
    #[must_use]
    pub const fn colored() -> Self {
        Self {
            reset: colors::RESET,
            tag_start: colors::TAG_START,
            tag_goal: colors::TAG_GOAL,
            tag_left: colors::TAG_LEFT,
            tag_right: colors::TAG_RIGHT,
            tag_dark: colors::TAG_DARK,
            white_bold: colors::WHITE_BOLD,
            gray: colors::GRAY,
            cyan: colors::CYAN,
            yellow: colors::YELLOW,
            orange: colors::ORANGE,
            red: colors::RED,
        }
    }

    /// Create a palette with no colors (empty strings).
    #[must_use]
    pub const fn plain() -> Self {
        Self {
            reset: "",
            tag_start: "",
            tag_goal: "",
            tag_left: "",
            tag_right: "",
            tag_dark: "",
            white_bold: "",
            gray: "",
            cyan: "",
            yellow: "",
            orange: "",
            red: "",
        }
    }

    /// `colored()` when the terminal supports ANSI colors, otherwise `plain()`.
    #[must_use]
    pub fn detect() -> Self {
        if supports_color() {
            Self::colored()
        } else {
            Self::plain()
        }
    }

    /// Text color for a side.
    #[must_use]
    pub const fn side(&self, side: SunSide) -> &'static str {
        match side {
            SunSide::Left => self.orange,
            SunSide::Right => self.red,
            SunSide::NoSun => self.gray,
        }
    }

    /// Badge color for a side.
    #[must_use]
    pub const fn side_tag(&self, side: SunSide) -> &'static str {
        match side {
            SunSide::Left => self.tag_left,
            SunSide::Right => self.tag_right,
            SunSide::NoSun => self.tag_dark,
        }
    }
}

impl Default for ColorPalette {
    fn default() -> Self {
        Self::detect()
    }
}

/// Check if the terminal supports ANSI color codes.
///
/// Respects the `NO_COLOR` environment variable (https://no-color.org/) and
/// the `TERM=dumb` convention.
#[must_use]
pub fn supports_color() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if let Ok(term) = std::env::var("TERM") {
        if term.eq_ignore_ascii_case("dumb") {
            return false;
        }
    }
    true
}

/// Check if the terminal supports Unicode characters.
///
/// Looks for a UTF hint in `LANG` or `LC_ALL`.
#[must_use]
pub fn supports_unicode() -> bool {
    if let Ok(lang) = std::env::var("LANG") {
        if lang.to_uppercase().contains("UTF") {
            return true;
        }
    }
    if let Ok(lc_all) = std::env::var("LC_ALL") {
        if lc_all.to_uppercase().contains("UTF") {
            return true;
        }
    }
    #[cfg(windows)]
    {
        if let Ok(term) = std::env::var("TERM") {
            return !term.eq_ignore_ascii_case("dumb");
        }
        return true;
    }
    #[cfg(not(windows))]
    {
        false
    }
}
