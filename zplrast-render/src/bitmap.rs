use log::warn;
use tiny_skia::{IntSize, Pixmap, PixmapPaint, Transform};

use zplrast_analyzer::{Element, ElementKind, RasterImage, StoredGraphic};

use crate::orientation_angle;

/// Decode the recalled graphic and attach the scaled render size.
///
/// `~DY` payloads are tried as PNG (also when untyped); `~DG` graphics
/// expand their packed monochrome rows. Anything undecodable leaves the
/// element without a raster, and drawing it becomes a no-op.
pub(crate) fn prepare(el: &mut Element) {
    let ElementKind::Image(field) = &el.kind else {
        return;
    };

    let raster = match field.graphic.as_deref() {
        Some(StoredGraphic::Encoded { data }) => match Pixmap::decode_png(data) {
            Ok(pixmap) => Some(raster_from_pixmap(&pixmap)),
            Err(err) => {
                warn!("stored graphic is not decodable PNG: {err}");
                None
            }
        },
        Some(graphic @ StoredGraphic::Raw { .. }) => graphic.expand(),
        Some(StoredGraphic::Text { .. }) | None => None,
    };

    match raster {
        Some(raster) => {
            el.render_size = Some((
                raster.width as f32 * field.scale_x as f32,
                raster.height as f32 * field.scale_y as f32,
            ));
            el.raster = Some(raster);
        }
        None => {
            el.render_size = None;
            el.raster = None;
        }
    }
}

/// Blit a prepared raster, scaled to the render size and rotated about the
/// element anchor.
pub(crate) fn draw_raster(target: &mut Pixmap, el: &Element) {
    let Some(raster) = &el.raster else { return };
    let Some((render_w, render_h)) = el.render_size else {
        return;
    };
    if raster.width == 0 || raster.height == 0 {
        return;
    }
    let Some(pixmap) = pixmap_from_raster(raster) else {
        return;
    };

    let scale_x = render_w / raster.width as f32;
    let scale_y = render_h / raster.height as f32;
    let transform = Transform::from_rotate_at(
        orientation_angle(el.orientation),
        el.x as f32,
        el.y as f32,
    )
    .pre_translate(el.x as f32, el.y as f32)
    .pre_scale(scale_x, scale_y);

    target.draw_pixmap(0, 0, pixmap.as_ref(), &PixmapPaint::default(), transform, None);
}

pub(crate) fn raster_from_pixmap(pixmap: &Pixmap) -> RasterImage {
    let mut pixels = Vec::with_capacity(pixmap.pixels().len() * 4);
    for px in pixmap.pixels() {
        let c = px.demultiply();
        pixels.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
    }
    RasterImage {
        width: pixmap.width(),
        height: pixmap.height(),
        pixels,
    }
}

pub(crate) fn pixmap_from_raster(raster: &RasterImage) -> Option<Pixmap> {
    let mut data = Vec::with_capacity(raster.pixels.len());
    for rgba in raster.pixels.chunks_exact(4) {
        let a = rgba[3] as u16;
        data.push((rgba[0] as u16 * a / 255) as u8);
        data.push((rgba[1] as u16 * a / 255) as u8);
        data.push((rgba[2] as u16 * a / 255) as u8);
        data.push(rgba[3]);
    }
    Pixmap::from_vec(data, IntSize::from_wh(raster.width, raster.height)?)
}
