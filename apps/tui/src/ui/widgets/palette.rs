use ratatui::style::Color;
use tariff_core::color::Rgb;
use tariff_core::Rgba;

pub const fn to_color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.r, rgb.g, rgb.b)
}

/// Terminal cells are opaque, so the intensity is blended onto the background.
pub fn fill_color(fill: Rgba, background: Rgb) -> Color {
    to_color(fill.over(background))
}
