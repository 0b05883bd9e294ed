mod barcode;
mod bitmap;
mod fonts;
mod shapes;
mod text;

use thiserror::Error;
use tiny_skia::{Color, Pixmap};

use zplrast_analyzer::{Element, ElementKind};
use zplrast_parser::Orientation;

pub use fonts::{ensure_fonts, FontRegistry};

#[derive(Debug, Error)]
pub enum DrawError {
    #[error("canvas allocation failed ({0}×{1})")]
    Canvas(u32, u32),
    #[error("png encoding failed: {0}")]
    Encode(String),
}

/// Rotation in degrees about the element anchor, y-axis pointing down.
pub(crate) fn orientation_angle(orientation: Orientation) -> f32 {
    match orientation {
        Orientation::Normal => 0.0,
        Orientation::Rotate => -90.0,
        Orientation::Invert => 180.0,
        Orientation::BackRotate => 90.0,
    }
}

fn prepare(el: &mut Element) {
    match el.kind {
        ElementKind::Text(_) => text::prepare(el),
        ElementKind::Barcode(_) => barcode::prepare(el),
        ElementKind::Image(_) => bitmap::prepare(el),
        // Shapes carry their dimensions; nothing to compute up front.
        ElementKind::Box(_) | ElementKind::Circle(_) | ElementKind::Diagonal(_) => {}
    }
}

fn draw(target: &mut Pixmap, el: &Element) {
    match &el.kind {
        ElementKind::Text(field) => text::draw(target, el, field),
        ElementKind::Barcode(_) | ElementKind::Image(_) => bitmap::draw_raster(target, el),
        ElementKind::Box(field) => shapes::draw_box(target, el, field),
        ElementKind::Circle(field) => shapes::draw_circle(target, el, field),
        ElementKind::Diagonal(field) => shapes::draw_diagonal(target, el, field),
    }
}

/// Footprint used for canvas sizing: prepared dimensions first, intrinsic
/// shape dimensions second, zero otherwise.
fn footprint(el: &Element) -> (f32, f32) {
    let (w, h) = el.render_size.unwrap_or_else(|| match &el.kind {
        ElementKind::Box(b) => (b.width as f32, b.height as f32),
        ElementKind::Diagonal(d) => (d.width as f32, d.height as f32),
        ElementKind::Circle(c) => (c.diameter as f32, c.diameter as f32),
        _ => (0.0, 0.0),
    });
    match el.orientation {
        Orientation::Rotate | Orientation::BackRotate => (h, w),
        Orientation::Normal | Orientation::Invert => (w, h),
    }
}

/// Canvas covering every element footprint, with a four-dot margin and a
/// one-dot minimum content extent.
fn canvas_size(elements: &[Element]) -> (u32, u32) {
    let mut max_x = 0.0f32;
    let mut max_y = 0.0f32;
    for el in elements {
        let (w, h) = footprint(el);
        max_x = max_x.max(el.x as f32 + w);
        max_y = max_y.max(el.y as f32 + h);
    }
    (
        (max_x.max(1.0) + 4.0).ceil() as u32,
        (max_y.max(1.0) + 4.0).ceil() as u32,
    )
}

/// Prepare, lay out, paint and PNG-encode one label's elements.
///
/// Prepare and draw both run in emission order; later elements overlay
/// earlier ones.
pub fn draw_elements(elements: &mut [Element]) -> Result<Vec<u8>, DrawError> {
    for el in elements.iter_mut() {
        prepare(el);
    }

    let (width, height) = canvas_size(elements);
    let mut pixmap = Pixmap::new(width, height).ok_or(DrawError::Canvas(width, height))?;
    pixmap.fill(Color::WHITE);

    for el in elements.iter() {
        draw(&mut pixmap, el);
    }

    pixmap
        .encode_png()
        .map_err(|err| DrawError::Encode(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use zplrast_analyzer::{BoxField, CircleField, TextField};
    use zplrast_parser::Color as ZplColor;

    fn box_element(x: i32, y: i32, w: u32, h: u32) -> Element {
        Element::new(
            x,
            y,
            Orientation::Normal,
            false,
            ElementKind::Box(BoxField {
                width: w,
                height: h,
                thickness: 1,
                color: ZplColor::Black,
            }),
        )
    }

    #[test]
    fn canvas_covers_the_union_of_footprints() {
        let elements = vec![box_element(5, 5, 100, 50), box_element(30, 80, 10, 10)];
        assert_eq!(canvas_size(&elements), (109, 94));
    }

    #[test]
    fn empty_layout_collapses_to_margin() {
        assert_eq!(canvas_size(&[]), (5, 5));
    }

    #[test]
    fn rotated_footprints_swap_axes() {
        let mut el = box_element(0, 0, 100, 10);
        el.orientation = Orientation::Rotate;
        assert_eq!(canvas_size(&[el]), (14, 104));
    }

    #[test]
    fn inverted_footprints_do_not_swap() {
        let mut el = box_element(0, 0, 100, 10);
        el.orientation = Orientation::Invert;
        assert_eq!(canvas_size(&[el]), (104, 14));
    }

    #[test]
    fn circle_footprint_is_square() {
        let el = Element::new(
            0,
            0,
            Orientation::Normal,
            false,
            ElementKind::Circle(CircleField {
                diameter: 40,
                thickness: 2,
                color: ZplColor::Black,
            }),
        );
        assert_eq!(canvas_size(&[el]), (44, 44));
    }

    #[test]
    fn prepared_size_wins_over_intrinsic() {
        let mut el = box_element(0, 0, 10, 10);
        el.render_size = Some((30.0, 20.0));
        assert_eq!(canvas_size(&[el]), (34, 24));
    }

    #[test]
    fn draw_elements_produces_png_bytes() {
        let mut elements = vec![box_element(0, 0, 10, 10)];
        let png = draw_elements(&mut elements).unwrap();
        assert_eq!(&png[..8], &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]);
    }

    #[test]
    fn text_prepare_attaches_render_size() {
        let mut elements = vec![Element::new(
            0,
            0,
            Orientation::Normal,
            false,
            ElementKind::Text(TextField {
                text: "HI".to_string(),
                font_name: '0',
                height: 30,
                width: 0,
                origin: zplrast_analyzer::OriginType::TopLeft,
                block_width: None,
                block_align: None,
            }),
        )];
        draw_elements(&mut elements).unwrap();
        assert!(elements[0].render_size.is_some());
    }
}
