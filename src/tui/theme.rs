//! Centralized theme module for TUI color constants and styles.
//!
//! The base palette follows the terminal background (dark or light); the
//! config may lay group colors over it as HSL triples, the same format the
//! hosted site's theme config uses.

use ratatui::prelude::*;

use crate::config::ThemeSection;

/// Complete color palette for the TUI
#[derive(Debug, Clone)]
pub struct ThemeColors {
    // Identity colors, overridable from config
    pub primary: Color,
    pub accent: Color,

    // Table colors
    pub row_alt_bg: Color,
    pub rank_color: Color,
    pub muted: Color,

    // Styles
    pub title_style: Style,
    pub header_style: Style,
    pub row_selected: Style,
    pub tab_active_style: Style,
    pub tab_inactive_style: Style,

    // Status bar colors
    pub status_bar_bg: Color,
    pub status_key_color: Color,
    pub flash_success: Color,
    pub flash_error: Color,

    // Popup overlay colors
    pub popup_border: Color,
    pub popup_title: Style,
    pub popup_bg: Color,

    // Top-three highlight (ranking and game results)
    pub medal_gold: Color,
    pub medal_silver: Color,
    pub medal_bronze: Color,

    // Calendar marker cycle, assigned to activity types in config order
    pub marker_colors: [Color; 6],
    pub calendar_selected: Style,
    pub calendar_muted: Color,
}

impl ThemeColors {
    /// Dark terminal palette
    pub fn dark() -> Self {
        Self {
            primary: Color::Cyan,
            accent: Color::Yellow,
            row_alt_bg: Color::Indexed(235),
            rank_color: Color::DarkGray,
            muted: Color::Gray,
            title_style: Style::new().fg(Color::Cyan).bold(),
            header_style: Style::new().bold(),
            row_selected: Style::new().reversed(),
            tab_active_style: Style::new().fg(Color::Cyan).bold(),
            tab_inactive_style: Style::new().fg(Color::DarkGray),
            status_bar_bg: Color::Indexed(236),
            status_key_color: Color::Cyan,
            flash_success: Color::Green,
            flash_error: Color::Red,
            popup_border: Color::Cyan,
            popup_title: Style::new().fg(Color::Cyan).bold(),
            popup_bg: Color::Indexed(234),
            medal_gold: Color::Yellow,
            medal_silver: Color::Gray,
            medal_bronze: Color::Rgb(205, 127, 50),
            marker_colors: [
                Color::Yellow,
                Color::Blue,
                Color::Green,
                Color::Magenta,
                Color::Cyan,
                Color::Red,
            ],
            calendar_selected: Style::new().reversed(),
            calendar_muted: Color::DarkGray,
        }
    }

    /// Light terminal palette
    pub fn light() -> Self {
        Self {
            primary: Color::Blue,
            accent: Color::Rgb(180, 120, 0),
            row_alt_bg: Color::Indexed(254),
            rank_color: Color::Indexed(245),
            muted: Color::Indexed(242),
            title_style: Style::new().fg(Color::Blue).bold(),
            header_style: Style::new().bold(),
            row_selected: Style::new().reversed(),
            tab_active_style: Style::new().fg(Color::Blue).bold(),
            tab_inactive_style: Style::new().fg(Color::Indexed(248)),
            status_bar_bg: Color::Indexed(253),
            status_key_color: Color::Blue,
            flash_success: Color::Green,
            flash_error: Color::Red,
            popup_border: Color::Blue,
            popup_title: Style::new().fg(Color::Blue).bold(),
            popup_bg: Color::Indexed(255),
            medal_gold: Color::Rgb(180, 120, 0),
            medal_silver: Color::Indexed(245),
            medal_bronze: Color::Rgb(150, 90, 30),
            marker_colors: [
                Color::Rgb(180, 120, 0),
                Color::Blue,
                Color::Green,
                Color::Magenta,
                Color::Cyan,
                Color::Red,
            ],
            calendar_selected: Style::new().reversed(),
            calendar_muted: Color::Indexed(250),
        }
    }

    /// Marker color for an activity type by its position in the configured
    /// list. Unlisted types render muted.
    pub fn activity_color(&self, index: Option<usize>) -> Color {
        match index {
            Some(i) => self.marker_colors[i % self.marker_colors.len()],
            None => self.muted,
        }
    }

    /// Highlight color for a rank position (1-based), top three only.
    pub fn medal_color(&self, position: usize) -> Option<Color> {
        match position {
            1 => Some(self.medal_gold),
            2 => Some(self.medal_silver),
            3 => Some(self.medal_bronze),
            _ => None,
        }
    }
}

/// Pick the dark or light palette from the terminal background, then lay
/// any configured HSL colors over it.
pub fn resolve_theme(theme: Option<&ThemeSection>) -> ThemeColors {
    let mut colors = match terminal_light::luma() {
        Ok(luma) if luma > 0.6 => ThemeColors::light(),
        _ => ThemeColors::dark(),
    };

    if let Some(theme) = theme {
        if let Some(primary) = theme.primary.as_deref().and_then(hsl_color) {
            colors.primary = primary;
            colors.title_style = Style::new().fg(primary).bold();
            colors.tab_active_style = Style::new().fg(primary).bold();
            colors.popup_border = primary;
            colors.popup_title = Style::new().fg(primary).bold();
            colors.status_key_color = primary;
        }
        if let Some(accent) = theme.accent.as_deref().and_then(hsl_color) {
            colors.accent = accent;
            colors.medal_gold = accent;
            colors.marker_colors[0] = accent;
        }
    }

    colors
}

/// Parse an HSL triple in the site theme format: "220 82% 24%".
/// Returns (hue in degrees, saturation 0..1, lightness 0..1).
pub fn parse_hsl(s: &str) -> Option<(f32, f32, f32)> {
    let mut parts = s.split_whitespace();
    let hue: f32 = parts.next()?.parse().ok()?;
    let saturation: f32 = parts.next()?.strip_suffix('%')?.parse().ok()?;
    let lightness: f32 = parts.next()?.strip_suffix('%')?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    if !(0.0..=360.0).contains(&hue)
        || !(0.0..=100.0).contains(&saturation)
        || !(0.0..=100.0).contains(&lightness)
    {
        return None;
    }
    Some((hue, saturation / 100.0, lightness / 100.0))
}

fn hsl_color(s: &str) -> Option<Color> {
    let (h, s, l) = parse_hsl(s)?;
    let (r, g, b) = hsl_to_rgb(h, s, l);
    Some(Color::Rgb(r, g, b))
}

fn hsl_to_rgb(h: f32, s: f32, l: f32) -> (u8, u8, u8) {
    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = l - c / 2.0;

    let (r, g, b) = match h {
        h if h < 60.0 => (c, x, 0.0),
        h if h < 120.0 => (x, c, 0.0),
        h if h < 180.0 => (0.0, c, x),
        h if h < 240.0 => (0.0, x, c),
        h if h < 300.0 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    (
        ((r + m) * 255.0).round() as u8,
        ((g + m) * 255.0).round() as u8,
        ((b + m) * 255.0).round() as u8,
    )
}
