// src/export/raster.rs
//! Rasterizes a preview layout into an RGB bitmap.
//!
//! Layout happens in logical pixels (an A4 sheet at 96 dpi is 794 px wide)
//! and painting multiplies everything by the supersampling factor. Text is
//! set in the bundled DejaVu Sans and filled as anti-aliased glyph outlines.

use image::{Rgb, RgbImage};
use tiny_skia::{FillRule, Mask, Path, Transform};

use crate::error::ExportError;
use crate::export::font::{Fonts, Weight};
use crate::preview::{PreviewBlock, PreviewLayout};

pub const SUPERSAMPLE: u32 = 2;
pub const SURFACE_WIDTH: u32 = 794;
/// A4 height at 96 dpi, the minimum surface height so exports stay portrait
pub const SURFACE_MIN_HEIGHT: u32 = 1123;
const MAX_BITMAP_SIDE: u32 = 16_384;

const MARGIN: f32 = 48.0;
const LINE_HEIGHT: f32 = 1.4;
/// Baseline offset from the top of a line, as a fraction of the font size
const ASCENT: f32 = 0.95;

const WHITE: Rgb<u8> = Rgb([0xFF, 0xFF, 0xFF]);
const INK: Rgb<u8> = Rgb([0x1F, 0x29, 0x37]);
const MUTED: Rgb<u8> = Rgb([0x6B, 0x72, 0x80]);
const TRACK: Rgb<u8> = Rgb([0xE5, 0xE7, 0xEB]);

#[derive(Debug, Clone, PartialEq)]
enum DrawOp {
    Rect {
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        color: Rgb<u8>,
    },
    Text {
        x: f32,
        y: f32,
        size: f32,
        color: Rgb<u8>,
        weight: Weight,
        text: String,
    },
}

#[derive(Debug, Clone, Copy)]
pub struct Rasterizer {
    pub scale: u32,
    pub surface_width: u32,
}

impl Default for Rasterizer {
    fn default() -> Self {
        Self {
            scale: SUPERSAMPLE,
            surface_width: SURFACE_WIDTH,
        }
    }
}

/// Greedy word wrap to `max_width` as reported by `measure`.
/// A word wider than a whole line is split between characters.
fn wrap<F>(text: &str, max_width: f32, measure: F) -> Vec<String>
where
    F: Fn(&str) -> f32,
{
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let mut line = String::new();
        for word in paragraph.split_whitespace() {
            let candidate = if line.is_empty() {
                word.to_string()
            } else {
                format!("{} {}", line, word)
            };
            if measure(&candidate) <= max_width {
                line = candidate;
                continue;
            }
            if !line.is_empty() {
                lines.push(std::mem::take(&mut line));
            }
            for c in word.chars() {
                line.push(c);
                if line.chars().count() > 1 && measure(&line) > max_width {
                    line.pop();
                    lines.push(std::mem::replace(&mut line, c.to_string()));
                }
            }
        }
        if !line.is_empty() || paragraph.trim().is_empty() {
            lines.push(line);
        }
    }
    lines
}

struct Layouter<'a> {
    fonts: &'a Fonts,
    ops: Vec<DrawOp>,
    cursor: f32,
    width: f32,
    accent: Rgb<u8>,
}

/// Font size, color and weight of one run of text.
#[derive(Clone, Copy)]
struct Style {
    size: f32,
    color: Rgb<u8>,
    weight: Weight,
}

impl Style {
    fn regular(size: f32, color: Rgb<u8>) -> Self {
        Self {
            size,
            color,
            weight: Weight::Regular,
        }
    }

    fn bold(size: f32, color: Rgb<u8>) -> Self {
        Self {
            size,
            color,
            weight: Weight::Bold,
        }
    }
}

impl Layouter<'_> {
    fn content_width(&self) -> f32 {
        self.width - 2.0 * MARGIN
    }

    fn text_block(&mut self, text: &str, x: f32, width: f32, style: Style) {
        let fonts = self.fonts;
        let measure = |line: &str| fonts.measure(line, style.size, style.weight);
        for line in wrap(text, width, measure) {
            self.ops.push(DrawOp::Text {
                x,
                y: self.cursor,
                size: style.size,
                color: style.color,
                weight: style.weight,
                text: line,
            });
            self.cursor += style.size * LINE_HEIGHT;
        }
    }

    fn header(&mut self, name: &str, title: &str, band: bool) {
        let (name_color, title_color) = if band { (WHITE, WHITE) } else { (self.accent, INK) };
        let band_top = self.cursor - MARGIN;
        let insert_at = self.ops.len();
        let width = self.content_width();

        self.text_block(name, MARGIN, width, Style::bold(28.0, name_color));
        if !title.is_empty() {
            self.text_block(title, MARGIN, width, Style::regular(16.0, title_color));
        }

        if band {
            let band_height = self.cursor - band_top + MARGIN / 2.0;
            self.ops.insert(
                insert_at,
                DrawOp::Rect {
                    x: 0.0,
                    y: band_top.max(0.0),
                    w: self.width,
                    h: band_height,
                    color: self.accent,
                },
            );
            self.cursor += MARGIN;
        } else {
            self.rule(2.0, self.accent);
        }
    }

    fn rule(&mut self, thickness: f32, color: Rgb<u8>) {
        self.cursor += 4.0;
        self.ops.push(DrawOp::Rect {
            x: MARGIN,
            y: self.cursor,
            w: self.content_width(),
            h: thickness,
            color,
        });
        self.cursor += thickness + 8.0;
    }

    fn block(&mut self, block: &PreviewBlock, band: bool) {
        let width = self.content_width();
        match block {
            PreviewBlock::Header { name, title } => self.header(name, title, band),
            PreviewBlock::Contact(items) => {
                self.text_block(&items.join("  |  "), MARGIN, width, Style::regular(10.0, MUTED));
                self.cursor += 6.0;
            }
            PreviewBlock::Summary(text) => {
                self.text_block(text, MARGIN, width, Style::regular(11.0, INK));
                self.cursor += 6.0;
            }
            PreviewBlock::SectionHeading(heading) => {
                self.cursor += 10.0;
                let style = Style::bold(14.0, self.accent);
                self.text_block(&heading.to_uppercase(), MARGIN, width, style);
                self.rule(1.0, self.accent);
            }
            PreviewBlock::Entry {
                heading,
                subheading,
                location,
                dates,
                description,
            } => {
                let title_line = match (heading.is_empty(), subheading.is_empty()) {
                    (false, false) => format!("{} - {}", heading, subheading),
                    (false, true) => heading.clone(),
                    _ => subheading.clone(),
                };
                if !title_line.is_empty() {
                    self.text_block(&title_line, MARGIN, width, Style::bold(12.0, INK));
                }
                let meta: Vec<&str> = [location.as_str(), dates.as_str()]
                    .into_iter()
                    .filter(|v| !v.is_empty())
                    .collect();
                if !meta.is_empty() {
                    let style = Style::regular(10.0, MUTED);
                    self.text_block(&meta.join("  ·  "), MARGIN, width, style);
                }
                if !description.is_empty() {
                    self.text_block(description, MARGIN, width, Style::regular(10.5, INK));
                }
                self.cursor += 8.0;
            }
            PreviewBlock::Skill { name, level } => {
                let label_width = 180.0;
                let line_top = self.cursor;
                self.text_block(name, MARGIN, label_width, Style::regular(11.0, INK));
                let bar_x = MARGIN + label_width + 12.0;
                let bar_w = width - label_width - 12.0;
                let bar_y = line_top + 5.0;
                self.ops.push(DrawOp::Rect {
                    x: bar_x,
                    y: bar_y,
                    w: bar_w,
                    h: 6.0,
                    color: TRACK,
                });
                self.ops.push(DrawOp::Rect {
                    x: bar_x,
                    y: bar_y,
                    w: bar_w * ((*level).min(100) as f32) / 100.0,
                    h: 6.0,
                    color: self.accent,
                });
                self.cursor = self.cursor.max(line_top + 16.0) + 4.0;
            }
        }
    }
}

fn fill_rect(img: &mut RgbImage, x: f32, y: f32, w: f32, h: f32, color: Rgb<u8>) {
    if w <= 0.0 || h <= 0.0 {
        return;
    }
    let x0 = x.max(0.0).round() as u32;
    let y0 = y.max(0.0).round() as u32;
    let x1 = ((x + w).round().max(0.0) as u32).min(img.width());
    let y1 = ((y + h).round().max(0.0) as u32).min(img.height());
    for py in y0..y1 {
        for px in x0..x1 {
            img.put_pixel(px, py, color);
        }
    }
}

/// Fill `path` (logical px) in `color`, blending its anti-aliased coverage
/// over what is already painted.
fn fill_glyphs(img: &mut RgbImage, path: &Path, color: Rgb<u8>, scale: f32) {
    let bounds = path.bounds();
    let left = (bounds.left() * scale).floor() - 1.0;
    let top = (bounds.top() * scale).floor() - 1.0;
    let width = ((bounds.right() * scale).ceil() + 1.0 - left) as u32;
    let height = ((bounds.bottom() * scale).ceil() + 1.0 - top) as u32;
    let Some(mut mask) = Mask::new(width, height) else {
        return;
    };
    let transform = Transform::from_row(scale, 0.0, 0.0, scale, -left, -top);
    mask.fill_path(path, FillRule::Winding, true, transform);

    let (left, top) = (left as i64, top as i64);
    for (i, &coverage) in mask.data().iter().enumerate() {
        if coverage == 0 {
            continue;
        }
        let px = left + (i as u32 % width) as i64;
        let py = top + (i as u32 / width) as i64;
        if px < 0 || py < 0 || px >= img.width() as i64 || py >= img.height() as i64 {
            continue;
        }
        let alpha = coverage as u32;
        let pixel = img.get_pixel_mut(px as u32, py as u32);
        for (dst, src) in pixel.0.iter_mut().zip(color.0) {
            *dst = ((src as u32 * alpha + *dst as u32 * (255 - alpha)) / 255) as u8;
        }
    }
}

impl Rasterizer {
    fn layout(&self, layout: &PreviewLayout, fonts: &Fonts) -> (Vec<DrawOp>, u32) {
        let manifest = layout.template.manifest();
        let mut layouter = Layouter {
            fonts,
            ops: Vec::new(),
            cursor: MARGIN,
            width: self.surface_width as f32,
            accent: Rgb(manifest.accent),
        };

        for block in &layout.blocks {
            layouter.block(block, manifest.header_band);
        }

        let height = ((layouter.cursor + MARGIN).ceil() as u32).max(SURFACE_MIN_HEIGHT);
        (layouter.ops, height)
    }

    /// Paint `layout` on an opaque white bitmap at `scale` times the logical size.
    pub fn rasterize(&self, layout: &PreviewLayout) -> Result<RgbImage, ExportError> {
        if self.scale == 0 || self.surface_width == 0 {
            return Err(ExportError::Rasterize("surface has zero size".to_string()));
        }

        let fonts = Fonts::load()?;
        let (ops, logical_height) = self.layout(layout, &fonts);
        let width = self.surface_width * self.scale;
        let height = logical_height * self.scale;
        if width > MAX_BITMAP_SIDE || height > MAX_BITMAP_SIDE {
            return Err(ExportError::Rasterize(format!(
                "bitmap {}x{} exceeds {} px",
                width, height, MAX_BITMAP_SIDE
            )));
        }

        let scale = self.scale as f32;
        let mut img = RgbImage::from_pixel(width, height, WHITE);
        for op in &ops {
            match op {
                DrawOp::Rect { x, y, w, h, color } => {
                    fill_rect(&mut img, x * scale, y * scale, w * scale, h * scale, *color)
                }
                DrawOp::Text {
                    x,
                    y,
                    size,
                    color,
                    weight,
                    text,
                } => {
                    let baseline = y + size * ASCENT;
                    if let Some(path) = fonts.outline(text, *x, baseline, *size, *weight) {
                        fill_glyphs(&mut img, &path, *color, scale);
                    }
                }
            }
        }
        Ok(img)
    }
}
