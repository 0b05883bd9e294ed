use std::collections::HashMap;
use std::sync::Arc;

use zplrast_parser::{BarcodeSpec, BlockAlign, Orientation};

use crate::element::OriginType;
use crate::graphics::StoredGraphic;

/// An armed `^FO`/`^FT` position, label home already added.
#[derive(Debug, Clone, Copy)]
pub struct FieldPosition {
    pub x: i32,
    pub y: i32,
    /// `^FT` bottom flag; accepted but rendered like `bottom = false`.
    pub bottom: bool,
    pub origin: OriginType,
}

#[derive(Debug, Clone, Copy)]
pub struct FontState {
    pub name: char,
    pub orientation: Orientation,
    pub height: u32,
    pub width: u32,
}

impl Default for FontState {
    fn default() -> Self {
        Self {
            name: '0',
            orientation: Orientation::Normal,
            height: 10,
            width: 0,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct BarcodeDefaults {
    pub module_width: u32,
    pub ratio: f32,
    pub height: u32,
}

impl Default for BarcodeDefaults {
    fn default() -> Self {
        Self {
            module_width: 2,
            ratio: 3.0,
            height: 50,
        }
    }
}

/// An armed `^FB`, consumed by the next `^FD` text field.
#[derive(Debug, Clone, Copy)]
pub struct FieldBlockState {
    pub width: u32,
    pub lines: u32,
    pub line_spacing: i32,
    pub align: BlockAlign,
    pub indent: u32,
}

/// The mutable state that disambiguates sequential commands.
///
/// One instance per document; `reset` runs on every `^XA`. The graphic
/// store survives resets so downloads ahead of `^XA` stay recallable.
#[derive(Debug, Default)]
pub struct VirtualPrinter {
    pub next_position: Option<FieldPosition>,
    pub label_home: (i32, i32),
    pub font: FontState,
    pub field_orientation: Option<Orientation>,
    pub barcode_defaults: BarcodeDefaults,
    pub pending_barcode: Option<BarcodeSpec>,
    pub field_block: Option<FieldBlockState>,
    pub reverse_next: bool,
    pub graphics: HashMap<String, Arc<StoredGraphic>>,
}

impl VirtualPrinter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        let graphics = std::mem::take(&mut self.graphics);
        *self = Self {
            graphics,
            ..Self::default()
        };
    }

    pub fn take_position(&mut self) -> Option<FieldPosition> {
        self.next_position.take()
    }

    pub fn take_reverse(&mut self) -> bool {
        std::mem::take(&mut self.reverse_next)
    }

    pub fn take_pending_barcode(&mut self) -> Option<BarcodeSpec> {
        self.pending_barcode.take()
    }

    pub fn take_field_block(&mut self) -> Option<FieldBlockState> {
        self.field_block.take()
    }
}
