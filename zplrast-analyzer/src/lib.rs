mod element;
mod graphics;
mod printer;
mod wrap;

use std::sync::Arc;

use log::debug;
use zplrast_parser::{parse_token, strip_vertical_whitespace, tokenize, Orientation, ZplCommand};

pub use element::*;
pub use graphics::{decode_ascii_hex, StoredGraphic};
pub use printer::{BarcodeDefaults, FieldBlockState, FieldPosition, FontState, VirtualPrinter};

/// Evaluate a ZPL document into rendered-element lists, one per label.
///
/// Unknown commands never abort a label; they are skipped. Elements left in
/// the buffer after the last `^XZ` form a trailing label of their own.
pub fn analyze(input: &str) -> Vec<Label> {
    let cleaned = strip_vertical_whitespace(input);
    let tokens = tokenize(&cleaned);

    let mut printer = VirtualPrinter::new();
    let mut labels = Vec::new();
    let mut elements: Vec<Element> = Vec::new();

    for token in tokens {
        let Some(cmd) = parse_token(token) else {
            debug!("ignoring unsupported command: {token}");
            continue;
        };
        eval(cmd, &mut printer, &mut labels, &mut elements);
    }

    if !elements.is_empty() {
        labels.push(Label { elements });
    }
    labels
}

fn eval(
    cmd: ZplCommand,
    printer: &mut VirtualPrinter,
    labels: &mut Vec<Label>,
    elements: &mut Vec<Element>,
) {
    match cmd {
        ZplCommand::StartLabel => {
            printer.reset();
            elements.clear();
        }
        ZplCommand::EndLabel => {
            labels.push(Label {
                elements: std::mem::take(elements),
            });
            printer.next_position = None;
            printer.pending_barcode = None;
            printer.field_block = None;
        }
        ZplCommand::FieldOrigin { x, y, bottom } => {
            printer.next_position = Some(FieldPosition {
                x: printer.label_home.0 + x,
                y: printer.label_home.1 + y,
                bottom,
                origin: OriginType::TopLeft,
            });
        }
        ZplCommand::FieldTypeset { x, y, bottom } => {
            printer.next_position = Some(FieldPosition {
                x: printer.label_home.0 + x,
                y: printer.label_home.1 + y,
                bottom,
                origin: OriginType::Baseline,
            });
        }
        ZplCommand::LabelHome { x, y } => printer.label_home = (x, y),
        ZplCommand::ChangeFont {
            name,
            height,
            width,
        } => {
            if let Some(name) = name {
                printer.font.name = name;
            }
            if let Some(height) = height {
                printer.font.height = height;
            }
            if let Some(width) = width {
                printer.font.width = width;
            }
        }
        ZplCommand::Font {
            name,
            orientation,
            height,
            width,
        } => {
            printer.font.name = name;
            if let Some(orientation) = printer.field_orientation.or(orientation) {
                printer.font.orientation = orientation;
            }
            if let Some(height) = height {
                printer.font.height = height;
            }
            if let Some(width) = width {
                printer.font.width = width;
            }
        }
        ZplCommand::FieldOrientation(orientation) => {
            printer.field_orientation = Some(orientation);
        }
        ZplCommand::FieldBlock {
            width,
            lines,
            line_spacing,
            align,
            indent,
        } => {
            printer.field_block = Some(FieldBlockState {
                width,
                lines,
                line_spacing,
                align,
                indent,
            });
        }
        ZplCommand::FieldReverse => printer.reverse_next = true,
        ZplCommand::GraphicBox {
            width,
            height,
            thickness,
            color,
        } => {
            emit_shape(
                printer,
                elements,
                ElementKind::Box(BoxField {
                    width,
                    height,
                    thickness,
                    color,
                }),
            );
        }
        ZplCommand::GraphicCircle {
            diameter,
            thickness,
            color,
        } => {
            emit_shape(
                printer,
                elements,
                ElementKind::Circle(CircleField {
                    diameter,
                    thickness,
                    color,
                }),
            );
        }
        ZplCommand::GraphicDiagonal {
            width,
            height,
            thickness,
            color,
        } => {
            emit_shape(
                printer,
                elements,
                ElementKind::Diagonal(DiagonalField {
                    width,
                    height,
                    thickness,
                    color,
                }),
            );
        }
        ZplCommand::BarcodeDefaults {
            module_width,
            ratio,
            height,
        } => {
            if let Some(module_width) = module_width {
                printer.barcode_defaults.module_width = module_width;
            }
            if let Some(ratio) = ratio {
                printer.barcode_defaults.ratio = ratio;
            }
            if let Some(height) = height {
                printer.barcode_defaults.height = height;
            }
        }
        ZplCommand::BarcodeField(spec) => printer.pending_barcode = Some(spec),
        ZplCommand::FieldData(data) => emit_field_data(printer, data, elements),
        ZplCommand::FieldSeparator => {
            printer.next_position = None;
            printer.pending_barcode = None;
        }
        ZplCommand::DownloadGraphic {
            name,
            total_bytes,
            bytes_per_row,
            data,
        } => {
            printer.graphics.insert(
                name,
                Arc::new(StoredGraphic::Raw {
                    total_bytes,
                    bytes_per_row,
                    data,
                }),
            );
        }
        ZplCommand::DownloadObject { name, data } => {
            let graphic = StoredGraphic::from_hex(&name, &data);
            printer.graphics.insert(name, Arc::new(graphic));
        }
        ZplCommand::ImageMove {
            name,
            scale_x,
            scale_y,
        }
        | ZplCommand::RecallGraphic {
            name,
            scale_x,
            scale_y,
        } => emit_image(printer, elements, &name, scale_x, scale_y),
    }
}

/// Shapes anchor at the armed position, falling back to the canvas origin.
fn emit_shape(printer: &mut VirtualPrinter, elements: &mut Vec<Element>, kind: ElementKind) {
    let (x, y) = printer
        .take_position()
        .map(|p| (p.x, p.y))
        .unwrap_or((0, 0));
    let reverse = printer.take_reverse();
    elements.push(Element::new(x, y, Orientation::Normal, reverse, kind));
}

/// Image recall falls back to label home and consumes any armed field block.
fn emit_image(
    printer: &mut VirtualPrinter,
    elements: &mut Vec<Element>,
    name: &str,
    scale_x: u32,
    scale_y: u32,
) {
    let (x, y) = printer
        .take_position()
        .map(|p| (p.x, p.y))
        .unwrap_or(printer.label_home);
    let reverse = printer.take_reverse();
    printer.field_block = None;
    let orientation = printer.field_orientation.unwrap_or_default();
    let graphic = printer.graphics.get(name).cloned();
    elements.push(Element::new(
        x,
        y,
        orientation,
        reverse,
        ElementKind::Image(ImageField {
            scale_x,
            scale_y,
            graphic,
        }),
    ));
}

/// `^FD` dispatch: a pending barcode wins, then an armed field block, then
/// a plain text field. The armed position is consumed either way.
fn emit_field_data(printer: &mut VirtualPrinter, data: String, elements: &mut Vec<Element>) {
    let pos = printer.take_position();
    let reverse = printer.take_reverse();

    if let Some(spec) = printer.take_pending_barcode() {
        let defaults = printer.barcode_defaults;
        let (x, y) = pos.map(|p| (p.x, p.y)).unwrap_or((0, 0));
        elements.push(Element::new(
            x,
            y,
            spec.orientation,
            reverse,
            ElementKind::Barcode(BarcodeField {
                kind: spec.kind,
                text: data,
                height: spec.height.unwrap_or(defaults.height),
                module_width: defaults.module_width,
                ratio: defaults.ratio,
                options: spec.options,
                print_interpretation: spec.print_interpretation,
                print_above: spec.print_above,
            }),
        ));
        return;
    }

    if let Some(block) = printer.take_field_block() {
        wrap::emit_block_lines(&printer.font, pos, reverse, &block, &data, elements);
        return;
    }

    let (x, y) = pos.map(|p| (p.x, p.y)).unwrap_or((0, 0));
    elements.push(Element::new(
        x,
        y,
        printer.font.orientation,
        reverse,
        ElementKind::Text(TextField {
            text: data,
            font_name: printer.font.name,
            height: printer.font.height,
            width: printer.font.width,
            origin: pos.map(|p| p.origin).unwrap_or_default(),
            block_width: None,
            block_align: None,
        }),
    ));
}
