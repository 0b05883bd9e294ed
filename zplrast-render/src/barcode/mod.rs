mod code39;

use log::warn;
use rxing::common::BitMatrix;
use rxing::{BarcodeFormat, EncodeHintValue, EncodeHints, MultiFormatWriter, Writer};

use zplrast_analyzer::{BarcodeField, Element, ElementKind, RasterImage};
use zplrast_parser::BarcodeKind;

use crate::fonts::ensure_fonts;

/// Rasterize the symbology and attach bitmap and render size.
///
/// Code 39 is generated natively; everything else goes through the barcode
/// engine. Engine failure keeps placeholder dimensions so layout stays
/// stable while drawing becomes a no-op.
pub(crate) fn prepare(el: &mut Element) {
    let ElementKind::Barcode(field) = &el.kind else {
        return;
    };

    let prepared = match field.kind {
        BarcodeKind::Code39 => Some(code39::generate(field)),
        _ => delegate(field),
    };

    match prepared {
        Some((raster, w, h)) => {
            el.render_size = Some((w, h));
            el.raster = Some(raster);
        }
        None => {
            let w = field.text.chars().count() as f32 * field.module_width.max(1) as f32 * 10.0;
            let h = if field.height > 0 {
                field.height as f32
            } else {
                50.0
            };
            el.render_size = Some((w, h));
            el.raster = None;
        }
    }
}

fn delegate(field: &BarcodeField) -> Option<(RasterImage, f32, f32)> {
    let format = match field.kind {
        BarcodeKind::Code128 => BarcodeFormat::CODE_128,
        BarcodeKind::Ean13 => BarcodeFormat::EAN_13,
        BarcodeKind::Code93 => BarcodeFormat::CODE_93,
        BarcodeKind::Interleaved2of5 => BarcodeFormat::ITF,
        BarcodeKind::QrCode => BarcodeFormat::QR_CODE,
        BarcodeKind::DataMatrix => BarcodeFormat::DATA_MATRIX,
        BarcodeKind::Pdf417 => BarcodeFormat::PDF_417,
        BarcodeKind::Code39 => return None,
    };
    let contents = normalize_contents(field);
    if contents.is_empty() {
        warn!("empty barcode payload for {:?}", field.kind);
        return None;
    }

    let mut hints = EncodeHints::default().with(EncodeHintValue::Margin("0".to_string()));
    if field.kind == BarcodeKind::QrCode {
        let ecc = field.options.ecc_level.unwrap_or('M');
        hints = hints.with(EncodeHintValue::ErrorCorrection(ecc.to_string()));
    }

    // Matrix symbologies come back at their native module grid and get
    // magnified afterwards; everything else is requested at module-width
    // scale. PDF417's own module-width parameter overrides the `^BY`
    // default, and its height request follows the width because the engine
    // floors its magnification from whichever axis is tighter.
    let (req_w, req_h) = if field.kind.is_matrix() {
        (1u32, 1u32)
    } else {
        let module_width = match field.kind {
            BarcodeKind::Pdf417 => field
                .options
                .module_width
                .unwrap_or(field.module_width)
                .max(1),
            _ => field.module_width.max(1),
        };
        let width = estimate_modules(field.kind, &contents) * module_width;
        let height = if field.kind == BarcodeKind::Pdf417 {
            width
        } else {
            field.height.max(1)
        };
        (width, height)
    };

    let writer = MultiFormatWriter::default();
    let matrix = match writer.encode_with_hints(
        &contents,
        &format,
        req_w as i32,
        req_h as i32,
        &hints,
    ) {
        Ok(matrix) => matrix,
        Err(err) => {
            warn!("barcode engine failed for {:?}: {err}", field.kind);
            return None;
        }
    };
    let mut img = raster_from_matrix(&matrix);

    if field.kind.is_matrix() {
        let scale = field.options.scale.unwrap_or(field.module_width).max(1) as f32;
        let w = img.width as f32 * scale;
        let h = img.height as f32 * scale;
        return Some((img, w, h));
    }

    if field.print_interpretation {
        img = with_caption(img, &contents, field.print_above);
    }

    // Uniform scale so the vertical ink span lands on the requested height.
    let (w, h) = if field.height > 0 {
        match ink_row_span(&img) {
            Some((top, bottom)) => {
                let scale = field.height as f32 / (bottom - top + 1) as f32;
                (
                    (img.width as f32 * scale).round(),
                    (img.height as f32 * scale).round(),
                )
            }
            None => (img.width as f32, img.height as f32),
        }
    } else {
        (img.width as f32, img.height as f32)
    };
    Some((img, w, h))
}

/// Engine-side content fixing the symbology requires.
fn normalize_contents(field: &BarcodeField) -> String {
    match field.kind {
        BarcodeKind::Ean13 => normalize_ean13(&field.text),
        BarcodeKind::Interleaved2of5 => {
            let mut digits: String = field.text.chars().filter(|c| c.is_ascii_digit()).collect();
            if digits.len() % 2 != 0 {
                digits.insert(0, '0');
            }
            digits
        }
        // The engine's Code 93 alphabet has no lowercase shifts.
        BarcodeKind::Code93 => field.text.to_ascii_uppercase(),
        _ => field.text.clone(),
    }
}

/// Force digits, pad or cut to twelve, append the check digit.
fn normalize_ean13(input: &str) -> String {
    let mut content: String = input
        .chars()
        .map(|c| if c.is_ascii_digit() { c } else { '0' })
        .collect();
    if content.len() == 13 {
        return content;
    }
    if content.len() < 12 {
        content = "0".repeat(12 - content.len()) + &content;
    } else {
        content.truncate(12);
    }
    let check = ean13_check_digit(&content);
    content.push(char::from_digit(check, 10).unwrap_or('0'));
    content
}

fn ean13_check_digit(ean12: &str) -> u32 {
    let sum: u32 = ean12
        .chars()
        .rev()
        .enumerate()
        .map(|(i, c)| {
            let digit = c.to_digit(10).unwrap_or(0);
            if i % 2 == 0 { digit * 3 } else { digit }
        })
        .sum();
    (10 - (sum % 10)) % 10
}

/// Rough symbol width in modules, quiet zones included. The engine pads
/// whatever is left over, so this only has to be in the right ballpark.
fn estimate_modules(kind: BarcodeKind, contents: &str) -> u32 {
    let len = contents.chars().count() as u32;
    match kind {
        // start + data + checksum + stop, plus quiet zones
        BarcodeKind::Code128 => 11 + len * 11 + 11 + 13 + 20,
        // guards + 12 × 7-module digits, plus quiet zones
        BarcodeKind::Ean13 => 95 + 22,
        // start/stop + two checks at 9 modules each, terminator bar
        BarcodeKind::Code93 => (len + 4) * 9 + 1 + 18,
        // digit pairs at ~9 modules a digit plus start/stop
        BarcodeKind::Interleaved2of5 => len * 9 + 9 + 20,
        // 17-module codewords, a codeword per character as upper bound,
        // start/stop and row indicators
        BarcodeKind::Pdf417 => (len + 8) * 17 + 70,
        _ => len * 11 + 24,
    }
}

fn raster_from_matrix(matrix: &BitMatrix) -> RasterImage {
    let width = matrix.width();
    let height = matrix.height();
    let mut img = RasterImage::filled(width, height, [255, 255, 255, 255]);
    for y in 0..height {
        for x in 0..width {
            if matrix.get(x, y) {
                img.set(x, y, [0, 0, 0, 255]);
            }
        }
    }
    img
}

/// Append an interpretation band and center the payload text in it.
fn with_caption(img: RasterImage, text: &str, above: bool) -> RasterImage {
    let px = (img.height as f32 * 0.2).floor().max(8.0);
    let band = px as u32 + 4;
    let mut out = RasterImage::filled(img.width, img.height + band, [255, 255, 255, 255]);

    let bars_top = if above { band } else { 0 };
    for y in 0..img.height {
        for x in 0..img.width {
            out.set(x, y + bars_top, img.get(x, y));
        }
    }

    let registry = ensure_fonts();
    let text_w = registry.measure('A', text, px);
    let text_x = (img.width as f32 - text_w) / 2.0;
    let baseline = if above {
        px + 2.0
    } else {
        img.height as f32 + px + 2.0
    };
    registry.raster_text(&mut out, 'A', text, px, text_x, baseline);
    out
}

/// Vertical ink extent: rows holding any dark, non-transparent pixel.
fn ink_row_span(img: &RasterImage) -> Option<(u32, u32)> {
    let mut top = None;
    let mut bottom = None;
    for y in 0..img.height {
        let has_ink = (0..img.width).any(|x| {
            let [r, g, b, a] = img.get(x, y);
            a > 0 && (r < 200 || g < 200 || b < 200)
        });
        if has_ink {
            if top.is_none() {
                top = Some(y);
            }
            bottom = Some(y);
        }
    }
    Some((top?, bottom?))
}
