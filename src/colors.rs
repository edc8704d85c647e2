use crossterm::style::Color;

pub type Rgb = (u8, u8, u8);

/// Highlight yellow used for markers, grid and lived-in borders.
pub const ACCENT: Rgb = (0xFF, 0xE5, 0x00);
/// Globe body.
pub const SPHERE: Rgb = (0x0A, 0x0A, 0x0B);
pub const CARD_BORDER: Rgb = (0xFF, 0xE5, 0x00);
pub const CARD_TEXT: Rgb = (0xDD, 0xDD, 0xDD);
pub const CARD_LABEL: Rgb = (0x88, 0x88, 0x88);

/// Anything at or below this opacity is not drawn.
pub const MIN_OPACITY: f32 = 0.01;

/// Helper to create RGB colors
pub fn rgb(r: u8, g: u8, b: u8) -> Color {
    Color::Rgb { r, g, b }
}

/// Blend a colour toward the (black) background by `opacity`.
///
/// Returns `None` for colours too faint to draw, so callers can skip them.
pub fn fade(color: Rgb, opacity: f32) -> Option<Color> {
    if opacity <= MIN_OPACITY {
        return None;
    }
    let a = opacity.min(1.0);
    let scale = |c: u8| (c as f32 * a).round() as u8;
    Some(rgb(scale(color.0), scale(color.1), scale(color.2)))
}
