// src/export/pdf.rs
//! Single-page PDF wrapping one raster image.
//!
//! The page is 210 mm wide (A4 width) and as tall as the image's aspect ratio
//! requires. The image is stored as 8-bit DeviceRGB, Flate compressed.
//!
//! Objects are built and serialized with pdf_oxide's writer parts.
//! `PdfWriter::finish` writes font resources only and never the XObjects that
//! `ContentElement::Image` queues, so the page tree and xref are laid out here.

use bytes::Bytes;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use image::RgbImage;
use pdf_oxide::object::Object;
use pdf_oxide::writer::{ColorSpace, ContentStreamBuilder, ImageData, ObjectSerializer};
use std::collections::HashMap;
use std::io::Write;

use crate::error::ExportError;

pub const PAGE_WIDTH_MM: f64 = 210.0;
const PDF_VERSION: &str = "1.7";
const CREATOR: &str = "resume-builder";
const IMAGE_RESOURCE: &str = "Im1";

const CATALOG_ID: u32 = 1;
const PAGES_ID: u32 = 2;
const PAGE_ID: u32 = 3;
const CONTENT_ID: u32 = 4;
const IMAGE_ID: u32 = 5;
const INFO_ID: u32 = 6;

pub fn mm_to_pt(mm: f64) -> f64 {
    mm / 25.4 * 72.0
}

/// Page size in points for an image of `width` x `height` pixels.
pub fn page_size_for(width: u32, height: u32) -> (f64, f64) {
    let page_width = mm_to_pt(PAGE_WIDTH_MM);
    (page_width, page_width * height as f64 / width as f64)
}

#[derive(Debug, Clone)]
pub struct PdfOutput {
    pub bytes: Vec<u8>,
    pub width_pt: f64,
    pub height_pt: f64,
}

fn compress(data: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    encoder.finish()
}

/// PDF text string bytes: ASCII as is, anything else as UTF-16BE with a BOM.
fn text_string(value: &str) -> Object {
    let clean: String = value.chars().filter(|c| !c.is_control()).collect();
    if clean.is_ascii() {
        Object::String(clean.into_bytes())
    } else {
        let mut bytes = vec![0xFE, 0xFF];
        bytes.extend(clean.encode_utf16().flat_map(u16::to_be_bytes));
        Object::String(bytes)
    }
}

fn embed_error(e: impl std::fmt::Display) -> ExportError {
    ExportError::Embed(e.to_string())
}

/// The serializer fills in `/Length` when `dict` lacks it.
fn stream(dict: HashMap<String, Object>, data: Vec<u8>) -> Object {
    Object::Stream {
        dict,
        data: Bytes::from(data),
    }
}

/// Build a one-page PDF showing `image` across the full page width.
pub fn build_image_pdf(image: &RgbImage, title: &str) -> Result<PdfOutput, ExportError> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(ExportError::Embed("image has zero size".to_string()));
    }
    let (page_w, page_h) = page_size_for(width, height);

    let pixels = compress(image.as_raw()).map_err(embed_error)?;
    let image_data = ImageData::new(width, height, ColorSpace::DeviceRGB, pixels);
    let mut image_dict = image_data.build_xobject_dict();
    image_dict.insert("Filter".to_string(), ObjectSerializer::name("FlateDecode"));

    let mut content = ContentStreamBuilder::new();
    content.draw_image(IMAGE_RESOURCE, 0.0, 0.0, page_w as f32, page_h as f32);
    let content = content.build().map_err(embed_error)?;

    let page = ObjectSerializer::dict(vec![
        ("Type", ObjectSerializer::name("Page")),
        ("Parent", ObjectSerializer::reference(PAGES_ID, 0)),
        ("MediaBox", ObjectSerializer::rect(0.0, 0.0, page_w, page_h)),
        ("Contents", ObjectSerializer::reference(CONTENT_ID, 0)),
        (
            "Resources",
            ObjectSerializer::dict(vec![(
                "XObject",
                ObjectSerializer::dict(vec![(
                    IMAGE_RESOURCE,
                    ObjectSerializer::reference(IMAGE_ID, 0),
                )]),
            )]),
        ),
    ]);

    let objects = [
        (
            CATALOG_ID,
            ObjectSerializer::dict(vec![
                ("Type", ObjectSerializer::name("Catalog")),
                ("Pages", ObjectSerializer::reference(PAGES_ID, 0)),
            ]),
        ),
        (
            PAGES_ID,
            ObjectSerializer::dict(vec![
                ("Type", ObjectSerializer::name("Pages")),
                (
                    "Kids",
                    ObjectSerializer::array(vec![ObjectSerializer::reference(PAGE_ID, 0)]),
                ),
                ("Count", ObjectSerializer::integer(1)),
            ]),
        ),
        (PAGE_ID, page),
        (CONTENT_ID, stream(HashMap::new(), content)),
        (IMAGE_ID, stream(image_dict, image_data.data)),
        (
            INFO_ID,
            ObjectSerializer::dict(vec![
                ("Title", text_string(title)),
                ("Creator", text_string(CREATOR)),
            ]),
        ),
    ];

    let serializer = ObjectSerializer::compact();
    let mut output = Vec::new();
    writeln!(output, "%PDF-{}", PDF_VERSION).map_err(embed_error)?;
    output.extend_from_slice(b"%\xE2\xE3\xCF\xD3\n");

    let mut offsets = Vec::with_capacity(objects.len());
    for (id, object) in &objects {
        offsets.push(output.len());
        output.extend_from_slice(&serializer.serialize_indirect(*id, 0, object));
    }

    let xref_start = output.len();
    let size = objects.len() as i64 + 1;
    writeln!(output, "xref\n0 {}\n0000000000 65535 f ", size).map_err(embed_error)?;
    for offset in &offsets {
        writeln!(output, "{:010} 00000 n ", offset).map_err(embed_error)?;
    }
    let trailer = ObjectSerializer::dict(vec![
        ("Size", ObjectSerializer::integer(size)),
        ("Root", ObjectSerializer::reference(CATALOG_ID, 0)),
        ("Info", ObjectSerializer::reference(INFO_ID, 0)),
    ]);
    writeln!(output, "trailer").map_err(embed_error)?;
    output.extend_from_slice(&serializer.serialize(&trailer));
    write!(output, "\nstartxref\n{}\n%%EOF", xref_start).map_err(embed_error)?;

    Ok(PdfOutput {
        bytes: output,
        width_pt: page_w,
        height_pt: page_h,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_page_width_is_a4() {
        assert!((mm_to_pt(210.0) - 595.2756).abs() < 1e-3);
        let (w, h) = page_size_for(1588, 2246);
        assert!((w - 595.2756).abs() < 1e-3);
        assert!((h / w - 2246.0 / 1588.0).abs() < 1e-9);
    }

    #[test]
    fn test_pdf_structure() {
        let img = RgbImage::from_pixel(40, 80, Rgb([255, 255, 255]));
        let pdf = build_image_pdf(&img, "Jane (Doe)").unwrap();
        let content = String::from_utf8_lossy(&pdf.bytes);

        assert!(content.starts_with("%PDF-1.7"));
        assert!(content.contains("/Count 1"));
        assert!(content.contains("/MediaBox [0 0 595.27559 1190.55118]"));
        assert!(content.contains("/Subtype /Image"));
        assert!(content.contains("/Width 40"));
        assert!(content.contains("/Height 80"));
        assert!(content.contains("/ColorSpace /DeviceRGB"));
        assert!(content.contains("/Filter /FlateDecode"));
        assert!(content.contains("/Im1 Do"));
        assert!(content.contains("/Title (Jane \\(Doe\\))"));
        assert!(content.ends_with("%%EOF"));
        assert!((pdf.height_pt - 2.0 * pdf.width_pt).abs() < 1e-9);
    }

    #[test]
    fn test_xref_offsets_point_at_objects() {
        let img = RgbImage::from_pixel(4, 4, Rgb([0, 0, 0]));
        let pdf = build_image_pdf(&img, "x").unwrap();
        let content = String::from_utf8_lossy(&pdf.bytes).to_string();

        let xref_at = content.find("xref\n").unwrap();
        let entries: Vec<usize> = content[xref_at..]
            .lines()
            .skip(3)
            .take(6)
            .map(|l| l[..10].parse().unwrap())
            .collect();
        for (i, offset) in entries.iter().enumerate() {
            let expected = format!("{} 0 obj", i + 1);
            assert!(pdf.bytes[*offset..].starts_with(expected.as_bytes()));
        }
        let tail = content.rsplit("startxref\n").next().unwrap();
        let startxref: usize = tail.trim_end_matches("%%EOF").trim().parse().unwrap();
        assert_eq!(startxref, xref_at);
    }

    #[test]
    fn test_non_ascii_title() {
        assert!(matches!(
            text_string("Zoë"),
            Object::String(b) if b == [0xFE, 0xFF, 0x00, 0x5A, 0x00, 0x6F, 0x00, 0xEB]
        ));
        assert!(matches!(text_string("a\tb"), Object::String(b) if b == b"ab"));
    }

    #[test]
    fn test_zero_sized_image_is_rejected() {
        let img = RgbImage::new(0, 10);
        assert!(matches!(build_image_pdf(&img, "x"), Err(ExportError::Embed(_))));
    }
}
