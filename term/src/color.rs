//! Colors for attributes.

use lazy_static::lazy_static;
#[cfg(feature = "use_serde")]
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[repr(u8)]
/// These correspond to the classic ANSI color indices and are
/// used for convenience/readability here in the code.
pub enum AnsiColor {
    Black = 0,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
}

#[cfg_attr(feature = "use_serde", derive(Deserialize, Serialize))]
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct RgbColor {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl RgbColor {
    pub const fn new(red: u8, green: u8, blue: u8) -> RgbColor {
        RgbColor { red, green, blue }
    }
}

fn base_colors() -> [RgbColor; 256] {
    let mut colors = [RgbColor::default(); 256];

    // The XTerm ansi color set; the second 8 are the bright variants
    static ANSI: [RgbColor; 16] = [
        RgbColor::new(0x00, 0x00, 0x00), // Black
        RgbColor::new(0xcc, 0x55, 0x55), // Red
        RgbColor::new(0x55, 0xcc, 0x55), // Green
        RgbColor::new(0xcd, 0xcd, 0x55), // Yellow
        RgbColor::new(0x54, 0x55, 0xcb), // Blue
        RgbColor::new(0xcc, 0x55, 0xcc), // Magenta
        RgbColor::new(0x7a, 0xca, 0xca), // Cyan
        RgbColor::new(0xcc, 0xcc, 0xcc), // White
        RgbColor::new(0x55, 0x55, 0x55), // Bright Black
        RgbColor::new(0xff, 0x55, 0x55), // Bright Red
        RgbColor::new(0x55, 0xff, 0x55), // Bright Green
        RgbColor::new(0xff, 0xff, 0x55), // Bright Yellow
        RgbColor::new(0x55, 0x55, 0xff), // Bright Blue
        RgbColor::new(0xff, 0x55, 0xff), // Bright Magenta
        RgbColor::new(0x55, 0xff, 0xff), // Bright Cyan
        RgbColor::new(0xff, 0xff, 0xff), // Bright White
    ];

    colors[0..16].copy_from_slice(&ANSI);

    // 216 color cube
    static RAMP6: [u8; 6] = [0x00, 0x33, 0x66, 0x99, 0xCC, 0xFF];
    for idx in 0..216 {
        let blue = RAMP6[idx % 6];
        let green = RAMP6[idx / 6 % 6];
        let red = RAMP6[idx / 6 / 6 % 6];
        colors[16 + idx] = RgbColor::new(red, green, blue);
    }

    // 24 grey scales
    for idx in 0..24 {
        let grey = 0x08 + (idx as u8) * 0x0a;
        colors[232 + idx] = RgbColor::new(grey, grey, grey);
    }

    colors
}

lazy_static! {
    static ref BASE_COLORS: [RgbColor; 256] = base_colors();
}

/// The 256-entry palette plus the default foreground/background pair.
/// The palette is shared state: every cursor resolves its default pen
/// colors through it, and changing the defaults is broadcast so that
/// cursors and the presentation layer can react.
#[derive(Clone)]
pub struct ColorPalette {
    colors: [RgbColor; 256],
    foreground: RgbColor,
    background: RgbColor,
}

impl ColorPalette {
    /// Look up one of the 16 named colors, selecting the bright
    /// variant when the bold attribute is in effect.
    pub fn color(&self, color: AnsiColor, bold: bool) -> RgbColor {
        let idx = color as usize + if bold { 8 } else { 0 };
        self.colors[idx]
    }

    pub fn color_index(&self, idx: u8) -> RgbColor {
        self.colors[idx as usize]
    }

    pub fn default_foreground(&self) -> RgbColor {
        self.foreground
    }

    pub fn default_background(&self) -> RgbColor {
        self.background
    }

    /// Returns true when the value actually changed.
    pub fn set_default_foreground(&mut self, color: RgbColor) -> bool {
        let changed = self.foreground != color;
        self.foreground = color;
        changed
    }

    /// Returns true when the value actually changed.
    pub fn set_default_background(&mut self, color: RgbColor) -> bool {
        let changed = self.background != color;
        self.background = color;
        changed
    }
}

impl Default for ColorPalette {
    fn default() -> ColorPalette {
        let colors = *BASE_COLORS;
        let foreground = colors[AnsiColor::White as usize];
        let background = colors[AnsiColor::Black as usize];
        ColorPalette {
            colors,
            foreground,
            background,
        }
    }
}
