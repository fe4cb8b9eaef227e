// src/export/font.rs
//! Bundled DejaVu Sans faces: text metrics for layout and glyph outlines
//! for painting.

use tiny_skia::{Path, PathBuilder};
use ttf_parser::{Face, GlyphId, OutlineBuilder};

use crate::error::ExportError;

static REGULAR: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans.ttf");
static BOLD: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans-Bold.ttf");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Weight {
    Regular,
    Bold,
}

pub struct Fonts {
    regular: Face<'static>,
    bold: Face<'static>,
}

impl Fonts {
    pub fn load() -> Result<Self, ExportError> {
        let parse = |data: &'static [u8], label: &str| {
            Face::parse(data, 0)
                .map_err(|e| ExportError::Rasterize(format!("{} font: {}", label, e)))
        };
        Ok(Self {
            regular: parse(REGULAR, "regular")?,
            bold: parse(BOLD, "bold")?,
        })
    }

    fn face(&self, weight: Weight) -> &Face<'static> {
        match weight {
            Weight::Regular => &self.regular,
            Weight::Bold => &self.bold,
        }
    }

    /// Width of `text` set at `size` px.
    pub fn measure(&self, text: &str, size: f32, weight: Weight) -> f32 {
        let face = self.face(weight);
        let units: f32 = text.chars().map(|c| advance(face, glyph_for(face, c))).sum();
        units * size / face.units_per_em() as f32
    }

    /// Outlines of `text` with its baseline starting at (`x`, `baseline`).
    /// `None` when nothing in `text` has ink, e.g. only spaces.
    pub fn outline(
        &self,
        text: &str,
        x: f32,
        baseline: f32,
        size: f32,
        weight: Weight,
    ) -> Option<Path> {
        let face = self.face(weight);
        let mut sink = GlyphPath {
            path: PathBuilder::new(),
            scale: size / face.units_per_em() as f32,
            x,
            y: baseline,
        };
        for c in text.chars() {
            let glyph = glyph_for(face, c);
            face.outline_glyph(glyph, &mut sink);
            sink.x += advance(face, glyph) * sink.scale;
        }
        sink.path.finish()
    }
}

/// Missing characters fall back to '?', then to the .notdef box.
fn glyph_for(face: &Face<'_>, c: char) -> GlyphId {
    face.glyph_index(c)
        .or_else(|| face.glyph_index('?'))
        .unwrap_or(GlyphId(0))
}

fn advance(face: &Face<'_>, glyph: GlyphId) -> f32 {
    face.glyph_hor_advance(glyph).unwrap_or(0) as f32
}

/// Font units are y-up, the surface is y-down.
struct GlyphPath {
    path: PathBuilder,
    scale: f32,
    x: f32,
    y: f32,
}

impl GlyphPath {
    fn point(&self, x: f32, y: f32) -> (f32, f32) {
        (self.x + x * self.scale, self.y - y * self.scale)
    }
}

impl OutlineBuilder for GlyphPath {
    fn move_to(&mut self, x: f32, y: f32) {
        let (x, y) = self.point(x, y);
        self.path.move_to(x, y);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let (x, y) = self.point(x, y);
        self.path.line_to(x, y);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        let (x1, y1) = self.point(x1, y1);
        let (x, y) = self.point(x, y);
        self.path.quad_to(x1, y1, x, y);
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        let (x1, y1) = self.point(x1, y1);
        let (x2, y2) = self.point(x2, y2);
        let (x, y) = self.point(x, y);
        self.path.cubic_to(x1, y1, x2, y2, x, y);
    }

    fn close(&mut self) {
        self.path.close();
    }
}
