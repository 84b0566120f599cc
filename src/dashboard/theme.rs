//! dashboard::theme
//!
//! Colour themes for chart output.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A fill and border colour, as CSS `rgba(..)` strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorPair {
    pub fill: &'static str,
    pub border: &'static str,
}

const fn pair(fill: &'static str, border: &'static str) -> ColorPair {
    ColorPair { fill, border }
}

const DARK: [ColorPair; 8] = [
    pair("rgba(54, 162, 235, 0.7)", "rgba(54, 162, 235, 1)"),
    pair("rgba(255, 99, 132, 0.7)", "rgba(255, 99, 132, 1)"),
    pair("rgba(75, 192, 192, 0.7)", "rgba(75, 192, 192, 1)"),
    pair("rgba(255, 206, 86, 0.7)", "rgba(255, 206, 86, 1)"),
    pair("rgba(153, 102, 255, 0.7)", "rgba(153, 102, 255, 1)"),
    pair("rgba(255, 159, 64, 0.7)", "rgba(255, 159, 64, 1)"),
    pair("rgba(199, 199, 199, 0.7)", "rgba(199, 199, 199, 1)"),
    pair("rgba(83, 223, 83, 0.7)", "rgba(83, 223, 83, 1)"),
];

const LIGHT: [ColorPair; 8] = [
    pair("rgba(54, 162, 235, 0.5)", "rgba(54, 162, 235, 0.8)"),
    pair("rgba(255, 99, 132, 0.5)", "rgba(255, 99, 132, 0.8)"),
    pair("rgba(75, 192, 192, 0.5)", "rgba(75, 192, 192, 0.8)"),
    pair("rgba(255, 206, 86, 0.5)", "rgba(255, 206, 86, 0.8)"),
    pair("rgba(153, 102, 255, 0.5)", "rgba(153, 102, 255, 0.8)"),
    pair("rgba(255, 159, 64, 0.5)", "rgba(255, 159, 64, 0.8)"),
    pair("rgba(119, 119, 119, 0.5)", "rgba(119, 119, 119, 0.8)"),
    pair("rgba(83, 223, 83, 0.5)", "rgba(83, 223, 83, 0.8)"),
];

const NEON: [ColorPair; 8] = [
    pair("rgba(0, 255, 255, 0.7)", "rgba(0, 255, 255, 1)"),
    pair("rgba(255, 0, 255, 0.7)", "rgba(255, 0, 255, 1)"),
    pair("rgba(0, 255, 0, 0.7)", "rgba(0, 255, 0, 1)"),
    pair("rgba(255, 255, 0, 0.7)", "rgba(255, 255, 0, 1)"),
    pair("rgba(0, 128, 255, 0.7)", "rgba(0, 128, 255, 1)"),
    pair("rgba(255, 128, 0, 0.7)", "rgba(255, 128, 0, 1)"),
    pair("rgba(255, 255, 255, 0.7)", "rgba(255, 255, 255, 1)"),
    pair("rgba(0, 255, 128, 0.7)", "rgba(0, 255, 128, 1)"),
];

/// Chart colour theme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Theme {
    #[default]
    Dark,
    Light,
    Neon,
}

/// Error for an unrecognised theme name.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown theme '{0}' (expected dark, light, or neon)")]
pub struct UnknownTheme(pub String);

impl Theme {
    pub const ALL: [Theme; 3] = [Theme::Dark, Theme::Light, Theme::Neon];

    pub fn name(self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
            Theme::Neon => "neon",
        }
    }

    /// The eight colour pairs, in dataset order.
    pub fn palette(self) -> &'static [ColorPair; 8] {
        match self {
            Theme::Dark => &DARK,
            Theme::Light => &LIGHT,
            Theme::Neon => &NEON,
        }
    }

    /// Colour pair at `index`, wrapping around the palette.
    pub fn color(self, index: usize) -> ColorPair {
        let palette = self.palette();
        palette[index % palette.len()]
    }

    /// Legend, tick and title colour. Only the dark theme uses white text.
    pub fn text_color(self) -> &'static str {
        match self {
            Theme::Dark => "white",
            Theme::Light | Theme::Neon => "black",
        }
    }

    pub fn grid_color(self) -> &'static str {
        match self {
            Theme::Dark => "rgba(255, 255, 255, 0.1)",
            Theme::Light | Theme::Neon => "rgba(0, 0, 0, 0.1)",
        }
    }

    pub fn tooltip_background(self) -> &'static str {
        match self {
            Theme::Dark => "rgba(0, 0, 0, 0.8)",
            Theme::Light | Theme::Neon => "rgba(255, 255, 255, 0.8)",
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Theme {
    type Err = UnknownTheme;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Theme::ALL
            .into_iter()
            .find(|theme| theme.name() == wanted)
            .ok_or_else(|| UnknownTheme(s.to_string()))
    }
}
