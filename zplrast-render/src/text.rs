use tiny_skia::{IntSize, Pixmap, PixmapPaint, Transform};

use zplrast_analyzer::{Element, ElementKind, OriginType, TextField};
use zplrast_parser::BlockAlign;

use crate::fonts::ensure_fonts;
use crate::orientation_angle;

/// Measure the field and attach its render size.
pub(crate) fn prepare(el: &mut Element) {
    let ElementKind::Text(field) = &el.kind else {
        return;
    };
    let px = field.height as f32;
    let measured = ensure_fonts().measure(field.font_name, &field.text, px);
    let size = (measured * field.scale_x(), px);
    el.render_size = Some(size);
}

/// Paint the field: baseline resolution, block alignment shift, rotation
/// about the anchor, then a horizontally pre-scaled glyph walk. Font `'0'`
/// is drawn three times at dot offsets to thicken the strokes.
pub(crate) fn draw(target: &mut Pixmap, el: &Element, field: &TextField) {
    let registry = ensure_fonts();
    let Some(font) = registry.face_for(field.font_name) else {
        return;
    };

    let px = field.height as f32;
    let scale_x = field.scale_x();
    let actual = el
        .render_size
        .map(|(w, _)| w)
        .unwrap_or_else(|| registry.measure(field.font_name, &field.text, px) * scale_x);

    let base_y = match field.origin {
        OriginType::TopLeft => el.y as f32 + px,
        OriginType::Baseline => el.y as f32,
    };
    let mut base_x = el.x as f32;
    if let (Some(block_width), Some(align)) = (field.block_width, field.block_align) {
        base_x += match align {
            BlockAlign::Center => (block_width as f32 - actual) / 2.0,
            BlockAlign::Right => block_width as f32 - actual,
            BlockAlign::Left | BlockAlign::Justified => 0.0,
        };
    }

    let place = Transform::from_translate(base_x, base_y)
        .pre_concat(Transform::from_rotate(orientation_angle(el.orientation)))
        .pre_scale(scale_x, 1.0);

    let shade = if el.reverse { 255 } else { 0 };
    let offsets: &[(f32, f32)] = if field.font_name == '0' {
        &[(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)]
    } else {
        &[(0.0, 0.0)]
    };

    for (dx, dy) in offsets {
        let mut pen_x = 0.0f32;
        for ch in field.text.chars() {
            let (metrics, coverage) = font.rasterize(ch, px);
            if metrics.width == 0 || metrics.height == 0 {
                pen_x += metrics.advance_width;
                continue;
            }

            let w = metrics.width as u32;
            let h = metrics.height as u32;
            let mut buf = Vec::with_capacity((w * h * 4) as usize);
            for &alpha in &coverage {
                // Premultiplied RGBA: the glyph color is pure black or
                // pure white, so every channel carries the alpha ramp.
                let channel = if shade == 0 { 0 } else { alpha };
                buf.push(channel);
                buf.push(channel);
                buf.push(channel);
                buf.push(alpha);
            }
            let Some(size) = IntSize::from_wh(w, h) else {
                pen_x += metrics.advance_width;
                continue;
            };
            let Some(glyph_pixmap) = Pixmap::from_vec(buf, size) else {
                pen_x += metrics.advance_width;
                continue;
            };

            let glyph_x = pen_x + metrics.xmin as f32 + dx;
            let glyph_y = -(metrics.height as f32 + metrics.ymin as f32) + dy;
            let transform = place.pre_translate(glyph_x, glyph_y);
            target.draw_pixmap(
                0,
                0,
                glyph_pixmap.as_ref(),
                &PixmapPaint::default(),
                transform,
                None,
            );
            pen_x += metrics.advance_width;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zplrast_analyzer::Element;
    use zplrast_parser::Orientation;

    fn text_element(text: &str, font_name: char, height: u32, width: u32) -> Element {
        Element::new(
            0,
            0,
            Orientation::Normal,
            false,
            ElementKind::Text(TextField {
                text: text.to_string(),
                font_name,
                height,
                width,
                origin: OriginType::TopLeft,
                block_width: None,
                block_align: None,
            }),
        )
    }

    #[test]
    fn prepare_sets_render_height_to_font_height() {
        let mut el = text_element("HI", '0', 30, 0);
        prepare(&mut el);
        let (_, h) = el.render_size.unwrap();
        assert_eq!(h, 30.0);
    }

    #[test]
    fn condensed_font_measures_narrower() {
        let mut condensed = text_element("WIDE TEXT", '0', 30, 0);
        let mut square = text_element("WIDE TEXT", '0', 30, 30);
        prepare(&mut condensed);
        prepare(&mut square);
        let (cw, _) = condensed.render_size.unwrap();
        let (sw, _) = square.render_size.unwrap();
        // 0.65 compression against an explicit 1:1 aspect.
        assert!(cw < sw);
    }

    #[test]
    fn empty_text_measures_zero() {
        let mut el = text_element("", 'A', 20, 0);
        prepare(&mut el);
        assert_eq!(el.render_size.unwrap().0, 0.0);
    }
}
