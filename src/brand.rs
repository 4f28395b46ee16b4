//! Visual identity: canvas dimensions, theme palettes, the brand accent.

use crate::config::Theme;

pub const MAIN_WIDTH: u32 = 1280;
pub const MAIN_HEIGHT: u32 = 720;
pub const SMALL_WIDTH: u32 = 640;
pub const SMALL_HEIGHT: u32 = 360;

/// Hard byte ceiling for the main rendition (2 MiB).
pub const DEFAULT_CEILING_BYTES: usize = 2 * 1024 * 1024;

/// Spring-green accent, identical in both themes.
pub const ACCENT: [u8; 4] = [0x00, 0xED, 0x64, 0xFF];

/// Families offered to the SVG text layers. The resolver falls back to
/// any installed face when none of these are present.
pub const FONT_STACK: &str = "Inter, Helvetica, Arial, sans-serif";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThemePalette {
    pub gradient_top: [u8; 4],
    pub gradient_bottom: [u8; 4],
    pub foreground: [u8; 4],
    /// Stroke/fill for background motifs, before per-template opacity.
    pub motif: [u8; 4],
    pub badge_fill: [u8; 4],
    pub shadow_opacity: f32,
}

pub fn palette(theme: Theme) -> ThemePalette {
    match theme {
        Theme::Dark => ThemePalette {
            gradient_top: [0x0c, 0x2d, 0x25, 0xff],
            gradient_bottom: [0x1c, 0x2b, 0x33, 0xff],
            foreground: [0xff, 0xff, 0xff, 0xff],
            motif: [0xff, 0xff, 0xff, 0xff],
            badge_fill: [0x05, 0x16, 0x12, 0xff],
            shadow_opacity: 0.45,
        },
        Theme::Light => ThemePalette {
            gradient_top: [0xfa, 0xfa, 0xf7, 0xff],
            gradient_bottom: [0xe4, 0xea, 0xe8, 0xff],
            foreground: [0x0c, 0x2d, 0x25, 0xff],
            motif: [0x0c, 0x2d, 0x25, 0xff],
            badge_fill: [0x0c, 0x2d, 0x25, 0xff],
            shadow_opacity: 0.18,
        },
    }
}

/// `#rrggbb` form for SVG attributes; alpha is carried separately as an
/// opacity attribute where needed.
pub fn hex(rgba: [u8; 4]) -> String {
    format!("#{:02x}{:02x}{:02x}", rgba[0], rgba[1], rgba[2])
}
