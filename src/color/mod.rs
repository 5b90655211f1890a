mod fade;

pub use fade::{blend_colors, fade, fade_linear};
use smart_leds::{RGBW, White};

/// Pixel color with independent red, green, blue and white channels
pub type Color = RGBW<u8>;

pub const BLACK: Color = rgbw(0, 0, 0, 0);
pub const WHITE: Color = rgbw(255, 255, 255, 255);

/// Create a color from its four channels
#[inline]
pub const fn rgbw(r: u8, g: u8, b: u8, w: u8) -> Color {
    Color {
        r,
        g,
        b,
        a: White(w),
    }
}

/// Create a color from a u32 value (0xRRGGBBWW format)
pub const fn rgbw_from_u32(color: u32) -> Color {
    rgbw(
        ((color >> 24) & 0xFF) as u8,
        ((color >> 16) & 0xFF) as u8,
        ((color >> 8) & 0xFF) as u8,
        (color & 0xFF) as u8,
    )
}

/// White channel of a color
#[inline]
pub const fn white(color: Color) -> u8 {
    color.a.0
}

/// Combine two colors channel by channel
#[inline]
pub(crate) fn zip_channels(a: Color, b: Color, mut f: impl FnMut(u8, u8) -> u8) -> Color {
    rgbw(f(a.r, b.r), f(a.g, b.g), f(a.b, b.b), f(white(a), white(b)))
}
