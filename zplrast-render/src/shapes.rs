use tiny_skia::{FillRule, Paint, PathBuilder, Pixmap, Rect, Stroke, Transform};

use zplrast_analyzer::{BoxField, CircleField, DiagonalField, Element};
use zplrast_parser::Color;

fn paint(reverse: bool, color: Color) -> Paint<'static> {
    let mut paint = Paint::default();
    if reverse || color == Color::White {
        paint.set_color_rgba8(255, 255, 255, 255);
    } else {
        paint.set_color_rgba8(0, 0, 0, 255);
    }
    paint
}

/// `^GB`: solid when asked for (`F`) or when the border swallows the whole
/// box (thickness covering both dimensions); outlined otherwise, with the
/// stroke inset so it stays inside the stated bounds.
pub(crate) fn draw_box(target: &mut Pixmap, el: &Element, field: &BoxField) {
    let w = field.width as f32;
    let h = field.height as f32;
    let thickness = if field.thickness == 0 {
        1.0
    } else {
        field.thickness as f32
    };
    let paint = paint(el.reverse, field.color);

    let filled = field.color == Color::Filled || (thickness >= w && thickness >= h);
    if filled {
        if let Some(rect) = Rect::from_xywh(el.x as f32, el.y as f32, w, h) {
            target.fill_rect(rect, &paint, Transform::identity(), None);
        }
        return;
    }

    let Some(rect) = Rect::from_xywh(el.x as f32, el.y as f32, w, h) else {
        return;
    };
    // Stroke centered on a half-thickness inset keeps the outer edge on the
    // stated bounds; clamp per axis so thin boxes stay constructible.
    let inset_x = (thickness / 2.0).min(w / 2.0 - 0.05).max(0.0);
    let inset_y = (thickness / 2.0).min(h / 2.0 - 0.05).max(0.0);
    let Some(rect) = Rect::from_ltrb(
        rect.left() + inset_x,
        rect.top() + inset_y,
        rect.right() - inset_x,
        rect.bottom() - inset_y,
    ) else {
        return;
    };

    let mut pb = PathBuilder::new();
    pb.push_rect(rect);
    let Some(path) = pb.finish() else { return };

    let stroke = Stroke {
        width: thickness,
        ..Stroke::default()
    };
    target.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
}

/// `^GC`: centered at `(x + d/2, y + d/2)`; zero thickness means solid.
pub(crate) fn draw_circle(target: &mut Pixmap, el: &Element, field: &CircleField) {
    let radius = field.diameter as f32 / 2.0;
    if radius <= 0.0 {
        return;
    }
    let cx = el.x as f32 + radius;
    let cy = el.y as f32 + radius;
    let paint = paint(el.reverse, field.color);

    if field.thickness == 0 || field.color == Color::Filled {
        let mut pb = PathBuilder::new();
        pb.push_circle(cx, cy, radius);
        if let Some(path) = pb.finish() {
            target.fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
        }
        return;
    }

    let thickness = field.thickness as f32;
    let stroke_radius = (radius - thickness / 2.0).max(0.5);
    let mut pb = PathBuilder::new();
    pb.push_circle(cx, cy, stroke_radius);
    let Some(path) = pb.finish() else { return };
    let stroke = Stroke {
        width: thickness,
        ..Stroke::default()
    };
    target.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
}

/// `^GD`: a stroke from the anchor to the opposite corner.
pub(crate) fn draw_diagonal(target: &mut Pixmap, el: &Element, field: &DiagonalField) {
    let mut pb = PathBuilder::new();
    pb.move_to(el.x as f32, el.y as f32);
    pb.line_to(
        el.x as f32 + field.width as f32,
        el.y as f32 + field.height as f32,
    );
    let Some(path) = pb.finish() else { return };

    let stroke = Stroke {
        width: if field.thickness == 0 {
            1.0
        } else {
            field.thickness as f32
        },
        ..Stroke::default()
    };
    let paint = paint(el.reverse, field.color);
    target.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
}
