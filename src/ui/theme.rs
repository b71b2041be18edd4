//! Theme management and ANSI escape sequence generation.
//!
//! A [`Theme`] starts from the built-in palette and is then layered with the
//! stylesheets of the current scene, in scene order. Stylesheets are partial
//! themes ([`ThemeOverlay`]): every key is optional and only the keys present
//! replace the current value.
//!
//! # TOML Format
//!
//! ```toml
//! name = "my-overlay"
//!
//! [colors]
//! accent = "#ebbcba"
//! selection_bg = "#9ccfd8"
//! ```
//!
//! # Example
//!
//! ```rust
//! use shelfdesk::ui::theme::{Theme, ThemeOverlay};
//!
//! let mut theme = Theme::default();
//! theme.apply(&ThemeOverlay::parse("[colors]\naccent = \"#ff0000\"")?);
//! assert_eq!(theme.colors.accent, "#ff0000");
//! print!("{}accent{}", Theme::fg(&theme.colors.accent), Theme::reset());
//! # Ok::<(), shelfdesk::ShelfdeskError>(())
//! ```

use crate::domain::error::{Result, ShelfdeskError};
use crate::navigation::StylesheetResolver;
use serde::{Deserialize, Serialize};

const BUILTIN_THEME: &str = include_str!("../../themes/default.toml");

/// Resolved palette used by every component.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Theme {
    /// Name of the last overlay that set one, else the built-in name.
    pub name: String,
    /// Every color is a `#rrggbb` hex string.
    pub colors: ThemeColors,
}

/// Color definitions for all UI elements, as hex strings (e.g. `"#e0def4"`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ThemeColors {
    /// Header text color.
    pub header_fg: String,
    /// Optional header background color.
    #[serde(default)]
    pub header_bg: Option<String>,
    /// Active tab and pager affordances.
    pub accent: String,

    /// Selected row foreground color.
    pub selection_fg: String,
    /// Selected row background color.
    pub selection_bg: String,

    /// Normal text color.
    pub text_normal: String,
    /// Dimmed text color (footer, disabled affordances).
    pub text_dim: String,

    /// Border and separator line color.
    pub border: String,

    /// Search bar border color.
    pub search_bar_border: String,
    /// Query match highlight foreground.
    pub match_highlight_fg: String,
    /// Query match highlight background.
    pub match_highlight_bg: String,

    /// Empty state message color.
    pub empty_state_fg: String,
    /// Status line color while a load is running.
    pub loading_fg: String,
    /// Status line color for failures.
    pub error_fg: String,
}

/// A partial theme read from a stylesheet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ThemeOverlay {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub colors: ColorOverlay,
}

/// Optional replacements for [`ThemeColors`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ColorOverlay {
    pub header_fg: Option<String>,
    pub header_bg: Option<String>,
    pub accent: Option<String>,
    pub selection_fg: Option<String>,
    pub selection_bg: Option<String>,
    pub text_normal: Option<String>,
    pub text_dim: Option<String>,
    pub border: Option<String>,
    pub search_bar_border: Option<String>,
    pub match_highlight_fg: Option<String>,
    pub match_highlight_bg: Option<String>,
    pub empty_state_fg: Option<String>,
    pub loading_fg: Option<String>,
    pub error_fg: Option<String>,
}

impl ThemeOverlay {
    /// Parses a stylesheet.
    ///
    /// # Errors
    ///
    /// Returns [`ShelfdeskError::Theme`] if `toml_str` is not valid TOML or
    /// a known key has the wrong type.
    pub fn parse(toml_str: &str) -> Result<Self> {
        toml::from_str(toml_str)
            .map_err(|e| ShelfdeskError::Theme(format!("failed to parse stylesheet: {e}")))
    }
}

fn replace(slot: &mut String, value: Option<&String>) {
    if let Some(value) = value {
        slot.clone_from(value);
    }
}

impl Theme {
    /// The palette compiled into the binary.
    ///
    /// # Errors
    ///
    /// Returns [`ShelfdeskError::Theme`] if the bundled theme does not parse.
    pub fn builtin() -> Result<Self> {
        toml::from_str(BUILTIN_THEME)
            .map_err(|e| ShelfdeskError::Theme(format!("failed to parse built-in theme: {e}")))
    }

    /// Applies every key present in `overlay`.
    pub fn apply(&mut self, overlay: &ThemeOverlay) {
        let o = &overlay.colors;
        let c = &mut self.colors;
        replace(&mut c.header_fg, o.header_fg.as_ref());
        if o.header_bg.is_some() {
            c.header_bg.clone_from(&o.header_bg);
        }
        replace(&mut c.accent, o.accent.as_ref());
        replace(&mut c.selection_fg, o.selection_fg.as_ref());
        replace(&mut c.selection_bg, o.selection_bg.as_ref());
        replace(&mut c.text_normal, o.text_normal.as_ref());
        replace(&mut c.text_dim, o.text_dim.as_ref());
        replace(&mut c.border, o.border.as_ref());
        replace(&mut c.search_bar_border, o.search_bar_border.as_ref());
        replace(&mut c.match_highlight_fg, o.match_highlight_fg.as_ref());
        replace(&mut c.match_highlight_bg, o.match_highlight_bg.as_ref());
        replace(&mut c.empty_state_fg, o.empty_state_fg.as_ref());
        replace(&mut c.loading_fg, o.loading_fg.as_ref());
        replace(&mut c.error_fg, o.error_fg.as_ref());
        if let Some(name) = &overlay.name {
            self.name.clone_from(name);
        }
    }

    /// Builds the theme for a scene from its stylesheet URLs, in order.
    ///
    /// A stylesheet that cannot be read or parsed is skipped with a warning;
    /// the remaining ones still apply.
    #[must_use]
    pub fn from_stylesheets(resolver: &dyn StylesheetResolver, urls: &[String]) -> Self {
        let mut theme = Self::default();
        for url in urls {
            let overlay = resolver
                .read(url)
                .map_err(ShelfdeskError::from)
                .and_then(|content| ThemeOverlay::parse(&content));
            match overlay {
                Ok(overlay) => theme.apply(&overlay),
                Err(err) => tracing::warn!(url = %url, error = %err, "skipping stylesheet"),
            }
        }
        theme
    }

    /// Converts a hex color to an RGB tuple.
    ///
    /// Malformed colors render as white.
    fn hex_to_rgb(hex: &str) -> (u8, u8, u8) {
        let hex = hex.trim().trim_start_matches('#');

        if hex.len() != 6 || !hex.is_ascii() {
            return (255, 255, 255);
        }

        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).unwrap_or(255);
        (channel(0..2), channel(2..4), channel(4..6))
    }

    /// ANSI 24-bit foreground color escape sequence (`\x1b[38;2;r;g;bm`).
    #[must_use]
    pub fn fg(hex: &str) -> String {
        let (r, g, b) = Self::hex_to_rgb(hex);
        format!("\u{001b}[38;2;{r};{g};{b}m")
    }

    /// ANSI 24-bit background color escape sequence (`\x1b[48;2;r;g;bm`).
    #[must_use]
    pub fn bg(hex: &str) -> String {
        let (r, g, b) = Self::hex_to_rgb(hex);
        format!("\u{001b}[48;2;{r};{g};{b}m")
    }

    #[must_use]
    pub const fn bold() -> &'static str {
        "\u{001b}[1m"
    }

    #[must_use]
    pub const fn dim() -> &'static str {
        "\u{001b}[2m"
    }

    /// Clears all styling (colors, bold, dim).
    #[must_use]
    pub const fn reset() -> &'static str {
        "\u{001b}[0m"
    }
}

impl Default for Theme {
    /// Returns the built-in theme.
    ///
    /// # Panics
    ///
    /// Panics only if the bundled `themes/default.toml` is malformed.
    fn default() -> Self {
        Self::builtin().expect("built-in theme should always parse")
    }
}
