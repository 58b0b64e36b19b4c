//! CRT screen content.
//!
//! Text is rasterized on the CPU into an RGBA8 canvas every frame, then
//! reduced into a full mip chain so the screen shader can sample blurred
//! levels for its glow.
//!
//! # Invariants
//! - The canvas is cleared before every draw; nothing carries over.
//! - Pixels are premultiplied by glyph coverage, so box-filtered mip levels
//!   never darken toward a fringe color.
//! - Every mip level halves the previous one (rounding down, minimum 1).

mod canvas;
mod mipmap;
mod provider;

pub use canvas::{
    FONT_PX, FontError, LINE_HEIGHT, TEXT_COLOR, TEXT_LEFT, TEXT_TOP, TextCanvas,
    default_font_candidates,
};
pub use mipmap::{MipLevel, build_mip_chain, mip_level_count};
pub use provider::{StaticText, TerminalText};

pub fn crate_info() -> &'static str {
    "retroscene-screen v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("screen"));
    }
}
