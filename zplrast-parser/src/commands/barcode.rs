use crate::commands::split_orientation;
use crate::params::Params;
use crate::Orientation;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarcodeKind {
    Code39,
    Code93,
    Code128,
    Ean13,
    Interleaved2of5,
    QrCode,
    DataMatrix,
    Pdf417,
}

impl BarcodeKind {
    /// 2D symbologies size by magnification scale instead of module width
    /// and bar height.
    pub fn is_matrix(self) -> bool {
        matches!(self, BarcodeKind::QrCode | BarcodeKind::DataMatrix)
    }
}

/// Code-specific parameters that only some symbologies carry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BarcodeOptions {
    pub scale: Option<u32>,
    pub ecc_level: Option<char>,
    pub module_width: Option<u32>,
    pub security_level: Option<u32>,
    pub columns: Option<u32>,
    pub rows: Option<u32>,
    pub row_height: Option<u32>,
    pub truncated: bool,
    pub mode: Option<char>,
}

/// A `^B*` command, armed until the next `^FD` supplies the data.
///
/// Height, module width and ratio left unset here inherit from the `^BY`
/// defaults when the element is emitted.
#[derive(Debug, Clone, PartialEq)]
pub struct BarcodeSpec {
    pub kind: BarcodeKind,
    pub orientation: Orientation,
    pub height: Option<u32>,
    pub print_interpretation: bool,
    pub print_above: bool,
    pub options: BarcodeOptions,
}

pub(crate) fn parse_barcode(designator: char, tail: &str) -> Option<BarcodeSpec> {
    let kind = match designator.to_ascii_uppercase() {
        'C' | 'D' => BarcodeKind::Code128,
        '3' => BarcodeKind::Code39,
        'E' | '8' => BarcodeKind::Ean13,
        '9' | 'A' => BarcodeKind::Code93,
        '2' => BarcodeKind::Interleaved2of5,
        'Q' => BarcodeKind::QrCode,
        'X' => BarcodeKind::DataMatrix,
        '7' => BarcodeKind::Pdf417,
        _ => return None,
    };

    let (orientation, rest) = split_orientation(tail);
    let mut p = Params::new(rest);
    let mut spec = BarcodeSpec {
        kind,
        orientation: orientation.unwrap_or_default(),
        height: None,
        print_interpretation: false,
        print_above: false,
        options: BarcodeOptions::default(),
    };

    match kind {
        BarcodeKind::Code39 => {
            let _check_digit = p.next_flag(false); // accepted, not rendered
            spec.height = p.next_opt_u32();
            spec.print_interpretation = p.next_flag(true);
            spec.print_above = p.next_flag(false);
        }
        BarcodeKind::Code128 => {
            spec.height = p.next_opt_u32();
            spec.print_interpretation = p.next_flag(true);
            spec.print_above = p.next_flag(false);
            spec.options.mode = p.next_char().map(|c| c.to_ascii_uppercase());
        }
        BarcodeKind::Ean13 | BarcodeKind::Code93 | BarcodeKind::Interleaved2of5 => {
            spec.height = p.next_opt_u32();
            spec.print_interpretation = p.next_flag(true);
            spec.print_above = p.next_flag(false);
        }
        BarcodeKind::QrCode => {
            spec.options.scale = p.next_opt_u32();
            spec.options.ecc_level = p
                .next_char()
                .map(|c| c.to_ascii_uppercase())
                .filter(|c| matches!(c, 'L' | 'M' | 'Q' | 'H'));
        }
        BarcodeKind::DataMatrix => {
            spec.options.scale = p.next_opt_u32();
        }
        BarcodeKind::Pdf417 => {
            spec.options.module_width = p.next_opt_u32();
            spec.options.security_level = p.next_opt_u32();
            spec.options.columns = p.next_opt_u32();
            spec.options.rows = p.next_opt_u32();
            spec.options.row_height = p.next_opt_u32();
            spec.options.truncated = p.next_flag(false);
        }
    }

    Some(spec)
}
