use zplrast_analyzer::{BarcodeField, RasterImage};

use crate::fonts::ensure_fonts;

/// Quiet zone on each side, in narrow modules.
const QUIET_MODULES: f32 = 10.0;

/// Nine-element Code 39 patterns over `{n, w}`: bars at even indices,
/// spaces at odd. Characters outside the alphabet borrow the `-` pattern.
fn pattern_for(ch: char) -> &'static str {
    match ch {
        '0' => "nnnwwnwnn",
        '1' => "wnnwnnnnw",
        '2' => "nnwwnnnnw",
        '3' => "wnwwnnnnn",
        '4' => "nnnwwnnnw",
        '5' => "wnnwwnnnn",
        '6' => "nnwwwnnnn",
        '7' => "nnnwnnwnw",
        '8' => "wnnwnnwnn",
        '9' => "nnwwnnwnn",
        'A' => "wnnnnwnnw",
        'B' => "nnwnnwnnw",
        'C' => "wnwnnwnnn",
        'D' => "nnnnwwnnw",
        'E' => "wnnnwwnnn",
        'F' => "nnwnwwnnn",
        'G' => "nnnnnwwnw",
        'H' => "wnnnnwwnn",
        'I' => "nnwnnwwnn",
        'J' => "nnnnwwwnn",
        'K' => "wnnnnnnww",
        'L' => "nnwnnnnww",
        'M' => "wnwnnnnwn",
        'N' => "nnnnwnnww",
        'O' => "wnnnwnnwn",
        'P' => "nnwnwnnwn",
        'Q' => "nnnnnnwww",
        'R' => "wnnnnnwwn",
        'S' => "nnwnnnwwn",
        'T' => "nnnnwnwwn",
        'U' => "wwnnnnnnw",
        'V' => "nwwnnnnnw",
        'W' => "wwwnnnnnn",
        'X' => "nwnnwnnnw",
        'Y' => "wwnnwnnnn",
        'Z' => "nwwnwnnnn",
        '.' => "wwnnnnwnn",
        ' ' => "nwwnnnwnn",
        '$' => "nwnwnwnnn",
        '/' => "nwnwnnnwn",
        '+' => "nwnnnwnwn",
        '%' => "nnnwnwnwn",
        '*' => "nwnnwnwnn",
        _ => "nwnnnnwnw", // '-'
    }
}

/// Native Code 39 raster: uppercased data wrapped in `*`, ratio-weighted
/// modules, single-module gaps between characters, ten-module quiet zones.
/// An interpretation line reserves `floor(h × 0.2) + 4` dots of the height.
pub(crate) fn generate(field: &BarcodeField) -> (RasterImage, f32, f32) {
    let narrow = if field.module_width == 0 {
        2
    } else {
        field.module_width
    };
    let ratio = if field.ratio < 1.0 { 2.0 } else { field.ratio };
    let height = field.height.max(1);
    let wrapped = format!("*{}*", field.text.to_ascii_uppercase());

    let char_modules: f32 = wrapped
        .chars()
        .map(|c| {
            pattern_for(c)
                .chars()
                .map(|m| if m == 'w' { ratio } else { 1.0 })
                .sum::<f32>()
        })
        .sum();
    let gaps = wrapped.chars().count().saturating_sub(1) as f32;
    let total_modules = 2.0 * QUIET_MODULES + char_modules + gaps;
    let img_w = (total_modules * narrow as f32).ceil() as u32;

    let reserve = if field.print_interpretation {
        (height as f32 * 0.2).floor() as u32 + 4
    } else {
        0
    };
    let bar_height = height.saturating_sub(reserve).max(1);
    let bar_top = if field.print_above { reserve } else { 0 };

    let mut img = RasterImage::filled(img_w, height, [255, 255, 255, 255]);
    let mut x = QUIET_MODULES * narrow as f32;
    for (char_idx, ch) in wrapped.chars().enumerate() {
        if char_idx > 0 {
            x += narrow as f32; // inter-character gap
        }
        for (module_idx, module) in pattern_for(ch).chars().enumerate() {
            let module_w = if module == 'w' {
                ratio * narrow as f32
            } else {
                narrow as f32
            };
            if module_idx % 2 == 0 {
                let x0 = x.round() as i32;
                let x1 = (x + module_w).round() as i32;
                img.fill_rect(
                    x0,
                    bar_top as i32,
                    (x1 - x0).max(1) as u32,
                    bar_height,
                    [0, 0, 0, 255],
                );
            }
            x += module_w;
        }
    }

    if field.print_interpretation {
        let px = (height as f32 * 0.2).floor().max(4.0);
        let registry = ensure_fonts();
        let text_w = registry.measure('A', &wrapped, px);
        let text_x = (img_w as f32 - text_w) / 2.0;
        let baseline = if field.print_above {
            px + 2.0
        } else {
            (bar_top + bar_height) as f32 + px + 2.0
        };
        registry.raster_text(&mut img, 'A', &wrapped, px, text_x, baseline);
    }

    let (w, h) = (img_w as f32, height as f32);
    (img, w, h)
}
