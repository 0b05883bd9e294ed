use std::sync::Arc;

use zplrast_parser::{BarcodeKind, BarcodeOptions, BlockAlign, Color, Orientation};

use crate::graphics::StoredGraphic;

/// One `^XA…^XZ` section: the unit of rendering.
#[derive(Debug, Clone, Default)]
pub struct Label {
    pub elements: Vec<Element>,
}

/// Whether a field position names the glyph top or the text baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OriginType {
    #[default]
    TopLeft, // ^FO
    Baseline, // ^FT
}

/// A positioned drawable primitive.
///
/// Coordinates are integer dots from the canvas origin (top-left, y down),
/// label home already applied. `render_size` and `raster` stay empty until
/// the rasterizer's prepare pass fills them in; nothing else is mutated
/// after emission.
#[derive(Debug, Clone)]
pub struct Element {
    pub x: i32,
    pub y: i32,
    pub orientation: Orientation,
    pub reverse: bool,
    pub render_size: Option<(f32, f32)>,
    pub raster: Option<RasterImage>,
    pub kind: ElementKind,
}

impl Element {
    pub fn new(x: i32, y: i32, orientation: Orientation, reverse: bool, kind: ElementKind) -> Self {
        Self {
            x,
            y,
            orientation,
            reverse,
            render_size: None,
            raster: None,
            kind,
        }
    }
}

#[derive(Debug, Clone)]
pub enum ElementKind {
    Text(TextField),
    Barcode(BarcodeField),
    Box(BoxField),
    Circle(CircleField),
    Diagonal(DiagonalField),
    Image(ImageField),
}

#[derive(Debug, Clone)]
pub struct TextField {
    pub text: String,
    pub font_name: char,
    pub height: u32,
    pub width: u32,
    pub origin: OriginType,
    pub block_width: Option<u32>,
    pub block_align: Option<BlockAlign>,
}

impl TextField {
    /// Horizontal compression applied on top of the measured advance.
    pub fn scale_x(&self) -> f32 {
        horizontal_scale(self.font_name, self.height, self.width)
    }
}

/// Font `'0'` with no explicit width prints visibly condensed; other fonts
/// stretch by the width/height aspect when both are given.
pub fn horizontal_scale(font_name: char, height: u32, width: u32) -> f32 {
    if font_name == '0' && width == 0 {
        0.65
    } else if width > 0 && height > 0 {
        width as f32 / height as f32
    } else {
        1.0
    }
}

#[derive(Debug, Clone)]
pub struct BarcodeField {
    pub kind: BarcodeKind,
    pub text: String,
    pub height: u32,
    pub module_width: u32,
    pub ratio: f32,
    pub options: BarcodeOptions,
    pub print_interpretation: bool,
    pub print_above: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct BoxField {
    pub width: u32,
    pub height: u32,
    pub thickness: u32,
    pub color: Color,
}

#[derive(Debug, Clone, Copy)]
pub struct CircleField {
    pub diameter: u32,
    pub thickness: u32,
    pub color: Color,
}

#[derive(Debug, Clone, Copy)]
pub struct DiagonalField {
    pub width: u32,
    pub height: u32,
    pub thickness: u32,
    pub color: Color,
}

#[derive(Debug, Clone)]
pub struct ImageField {
    pub scale_x: u32,
    pub scale_y: u32,
    pub graphic: Option<Arc<StoredGraphic>>,
}

/// Straight-alpha RGBA bitmap attached to barcode and image elements by the
/// prepare pass.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl RasterImage {
    /// Canvas of the given size, filled with one RGBA color.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let mut pixels = Vec::with_capacity(width as usize * height as usize * 4);
        for _ in 0..width as usize * height as usize {
            pixels.extend_from_slice(&rgba);
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn get(&self, x: u32, y: u32) -> [u8; 4] {
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        self.pixels[idx..idx + 4].try_into().unwrap()
    }

    pub fn set(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        if x >= self.width || y >= self.height {
            return;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        self.pixels[idx..idx + 4].copy_from_slice(&rgba);
    }

    /// Fill an axis-aligned rectangle, clipped to the canvas.
    pub fn fill_rect(&mut self, x0: i32, y0: i32, w: u32, h: u32, rgba: [u8; 4]) {
        for y in y0.max(0)..(y0 + h as i32).min(self.height as i32) {
            for x in x0.max(0)..(x0 + w as i32).min(self.width as i32) {
                self.set(x as u32, y as u32, rgba);
            }
        }
    }
}
