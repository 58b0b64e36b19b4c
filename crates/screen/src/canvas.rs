use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Glyph size in pixels.
pub const FONT_PX: f32 = 32.0;
/// Distance between consecutive baselines.
pub const LINE_HEIGHT: f32 = 32.0;
/// Left edge of every line.
pub const TEXT_LEFT: f32 = 32.0;
/// Baseline of the first line.
pub const TEXT_TOP: f32 = 64.0;
/// Phosphor orange.
pub const TEXT_COLOR: [u8; 3] = [255, 150, 50];

// Block glyphs drawn when no font could be loaded.
const BLOCK_ADVANCE: f32 = 19.0;
const BLOCK_WIDTH: i32 = 15;
const BLOCK_HEIGHT: i32 = 22;

#[derive(Debug, thiserror::Error)]
pub enum FontError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("font parse error: {0}")]
    Parse(String),
}

/// Monospace fonts commonly installed on desktop systems, tried in order.
pub fn default_font_candidates() -> Vec<PathBuf> {
    [
        "/usr/share/fonts/truetype/dejavu/DejaVuSansMono.ttf",
        "/usr/share/fonts/TTF/DejaVuSansMono.ttf",
        "/usr/share/fonts/dejavu/DejaVuSansMono.ttf",
        "/usr/share/fonts/truetype/liberation/LiberationMono-Regular.ttf",
        "/usr/share/fonts/liberation-mono/LiberationMono-Regular.ttf",
        "/System/Library/Fonts/Menlo.ttc",
        "/Library/Fonts/Courier New.ttf",
        "C:\\Windows\\Fonts\\consola.ttf",
        "C:\\Windows\\Fonts\\cour.ttf",
    ]
    .into_iter()
    .map(PathBuf::from)
    .collect()
}

struct Glyph {
    metrics: fontdue::Metrics,
    coverage: Vec<u8>,
}

/// Square RGBA8 canvas that text lines are rasterized into.
///
/// Pixels are premultiplied: a glyph edge with 50% coverage stores half of
/// [`TEXT_COLOR`] and alpha 128. Cleared pixels are transparent black.
pub struct TextCanvas {
    size: u32,
    pixels: Vec<u8>,
    font: Option<fontdue::Font>,
    glyphs: HashMap<char, Glyph>,
}

impl std::fmt::Debug for TextCanvas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextCanvas")
            .field("size", &self.size)
            .field("has_font", &self.font.is_some())
            .field("cached_glyphs", &self.glyphs.len())
            .finish()
    }
}

impl TextCanvas {
    pub fn new(size: u32, font: Option<fontdue::Font>) -> Self {
        Self {
            size,
            pixels: vec![0; (size as usize) * (size as usize) * 4],
            font,
            glyphs: HashMap::new(),
        }
    }

    /// Canvas that draws solid blocks in place of glyphs.
    pub fn without_font(size: u32) -> Self {
        Self::new(size, None)
    }

    pub fn from_font_bytes(size: u32, bytes: &[u8]) -> Result<Self, FontError> {
        let font = fontdue::Font::from_bytes(bytes, fontdue::FontSettings::default())
            .map_err(|e| FontError::Parse(e.to_string()))?;
        Ok(Self::new(size, Some(font)))
    }

    pub fn from_font_file(size: u32, path: impl AsRef<Path>) -> Result<Self, FontError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let canvas = Self::from_font_bytes(size, &bytes)?;
        info!("text font loaded from {}", path.display());
        Ok(canvas)
    }

    /// Use the configured font if given, otherwise the first loadable system
    /// font, otherwise block glyphs.
    pub fn with_font_search(size: u32, configured: Option<&Path>) -> Self {
        let candidates = configured
            .map(|p| vec![p.to_path_buf()])
            .unwrap_or_else(default_font_candidates);
        for path in &candidates {
            match Self::from_font_file(size, path) {
                Ok(canvas) => return canvas,
                Err(e) => debug!("font {} unusable: {e}", path.display()),
            }
        }
        warn!("no usable monospace font found, drawing block glyphs");
        Self::without_font(size)
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    pub fn clear(&mut self) {
        self.pixels.fill(0);
    }

    /// Clear the canvas and draw `text`, one line per `\n`.
    pub fn draw_text(&mut self, text: &str) {
        self.clear();
        for (i, line) in text.split('\n').enumerate() {
            let baseline = TEXT_TOP + LINE_HEIGHT * i as f32;
            if baseline - FONT_PX > self.size as f32 {
                break;
            }
            self.draw_line(line, baseline);
        }
    }

    fn draw_line(&mut self, line: &str, baseline: f32) {
        let Self {
            size,
            pixels,
            font,
            glyphs,
        } = self;
        let mut pen = TEXT_LEFT;

        for ch in line.chars() {
            if pen > *size as f32 {
                break;
            }
            match font {
                Some(font) => {
                    let glyph = glyphs.entry(ch).or_insert_with(|| {
                        let (metrics, coverage) = font.rasterize(ch, FONT_PX);
                        Glyph { metrics, coverage }
                    });
                    let m = &glyph.metrics;
                    let left = (pen + m.xmin as f32).round() as i32;
                    let top = (baseline - m.ymin as f32).round() as i32 - m.height as i32;
                    for row in 0..m.height {
                        for col in 0..m.width {
                            let coverage = glyph.coverage[row * m.width + col];
                            plot(pixels, *size, left + col as i32, top + row as i32, coverage);
                        }
                    }
                    pen += m.advance_width;
                }
                None => {
                    if !ch.is_whitespace() {
                        let left = pen.round() as i32 + 2;
                        let top = baseline.round() as i32 - BLOCK_HEIGHT;
                        for y in top..top + BLOCK_HEIGHT {
                            for x in left..left + BLOCK_WIDTH {
                                plot(pixels, *size, x, y, u8::MAX);
                            }
                        }
                    }
                    pen += BLOCK_ADVANCE;
                }
            }
        }
    }
}

fn plot(pixels: &mut [u8], size: u32, x: i32, y: i32, coverage: u8) {
    if coverage == 0 || x < 0 || y < 0 || x >= size as i32 || y >= size as i32 {
        return;
    }
    let i = (y as usize * size as usize + x as usize) * 4;
    let alpha = pixels[i + 3].max(coverage);
    for (channel, &color) in pixels[i..i + 3].iter_mut().zip(&TEXT_COLOR) {
        *channel = ((color as u16 * alpha as u16 + 127) / 255) as u8;
    }
    pixels[i + 3] = alpha;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pixel(canvas: &TextCanvas, x: u32, y: u32) -> [u8; 4] {
        let i = ((y * canvas.size() + x) * 4) as usize;
        let p = &canvas.pixels()[i..i + 4];
        [p[0], p[1], p[2], p[3]]
    }

    fn row_is_blank(canvas: &TextCanvas, y: u32) -> bool {
        (0..canvas.size()).all(|x| pixel(canvas, x, y)[3] == 0)
    }

    #[test]
    fn new_canvas_is_transparent() {
        let canvas = TextCanvas::without_font(64);
        assert_eq!(canvas.pixels().len(), 64 * 64 * 4);
        assert!(canvas.pixels().iter().all(|&b| b == 0));
    }

    #[test]
    fn block_glyphs_sit_on_the_baseline() {
        let mut canvas = TextCanvas::without_font(256);
        canvas.draw_text("A");
        let inside = pixel(&canvas, TEXT_LEFT as u32 + 5, TEXT_TOP as u32 - 5);
        assert_eq!(inside, [255, 150, 50, 255]);
        assert!(row_is_blank(&canvas, TEXT_TOP as u32 + 1));
        assert!(row_is_blank(&canvas, 10));
    }

    #[test]
    fn lines_advance_by_line_height() {
        let mut canvas = TextCanvas::without_font(256);
        canvas.draw_text("\nB");
        let second = (TEXT_TOP + LINE_HEIGHT) as u32 - 5;
        assert_eq!(pixel(&canvas, TEXT_LEFT as u32 + 5, second)[3], 255);
        assert!(row_is_blank(&canvas, TEXT_TOP as u32 - 5));
    }

    #[test]
    fn whitespace_advances_without_drawing() {
        let mut canvas = TextCanvas::without_font(256);
        canvas.draw_text(" X");
        let y = TEXT_TOP as u32 - 5;
        assert_eq!(pixel(&canvas, TEXT_LEFT as u32 + 5, y)[3], 0);
        assert_eq!(pixel(&canvas, (TEXT_LEFT + BLOCK_ADVANCE) as u32 + 5, y)[3], 255);
    }

    #[test]
    fn redraw_clears_previous_text() {
        let mut canvas = TextCanvas::without_font(256);
        canvas.draw_text("HELLO");
        canvas.draw_text("");
        assert!(canvas.pixels().iter().all(|&b| b == 0));
    }

    #[test]
    fn text_past_the_edge_is_clipped() {
        let mut canvas = TextCanvas::without_font(64);
        canvas.draw_text(&"W".repeat(100));
        canvas.draw_text(&"line\n".repeat(100));
    }

    #[test]
    fn partial_coverage_is_premultiplied() {
        let mut pixels = vec![0u8; 4];
        plot(&mut pixels, 1, 0, 0, 128);
        assert_eq!(pixels, vec![128, 75, 25, 128]);
    }

    #[test]
    fn invalid_font_bytes_are_rejected() {
        let err = TextCanvas::from_font_bytes(64, b"not a font").unwrap_err();
        assert!(matches!(err, FontError::Parse(_)));
    }

    #[test]
    fn missing_font_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = TextCanvas::from_font_file(64, dir.path().join("none.ttf")).unwrap_err();
        assert!(matches!(err, FontError::Io(_)));
    }

    #[test]
    fn unusable_configured_font_falls_back_to_blocks() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.ttf");
        std::fs::write(&path, b"garbage").unwrap();
        let canvas = TextCanvas::with_font_search(64, Some(&path));
        assert!(!canvas.has_font());
    }
}
