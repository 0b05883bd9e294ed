mod barcode;

pub use barcode::{BarcodeKind, BarcodeOptions, BarcodeSpec};

use crate::params::Params;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    #[default]
    Normal, // 0°
    Rotate,     // 90°
    Invert,     // 180°
    BackRotate, // 270°
}

impl Orientation {
    pub fn from_letter(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'N' => Some(Orientation::Normal),
            'R' => Some(Orientation::Rotate),
            'I' => Some(Orientation::Invert),
            'B' => Some(Orientation::BackRotate),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Color {
    #[default]
    Black,
    White,
    /// `F` asks for a solid fill regardless of outline thickness.
    Filled,
}

impl Color {
    pub fn from_letter(c: char) -> Self {
        match c.to_ascii_uppercase() {
            'W' => Color::White,
            'F' => Color::Filled,
            _ => Color::Black,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlockAlign {
    #[default]
    Left,
    Center,
    Right,
    Justified,
}

impl BlockAlign {
    pub fn from_letter(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'L' => Some(BlockAlign::Left),
            'C' => Some(BlockAlign::Center),
            'R' => Some(BlockAlign::Right),
            'J' => Some(BlockAlign::Justified),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ZplCommand {
    StartLabel, // ^XA
    EndLabel,   // ^XZ
    FieldOrigin {
        x: i32,
        y: i32,
        bottom: bool,
    }, // ^FO
    FieldTypeset {
        x: i32,
        y: i32,
        bottom: bool,
    }, // ^FT
    LabelHome {
        x: i32,
        y: i32,
    }, // ^LH
    ChangeFont {
        name: Option<char>,
        height: Option<u32>,
        width: Option<u32>,
    }, // ^CF
    Font {
        name: char,
        orientation: Option<Orientation>,
        height: Option<u32>,
        width: Option<u32>,
    }, // ^A
    FieldOrientation(Orientation), // ^FW
    FieldBlock {
        width: u32,
        lines: u32,
        line_spacing: i32,
        align: BlockAlign,
        indent: u32,
    }, // ^FB
    FieldReverse, // ^FR
    GraphicBox {
        width: u32,
        height: u32,
        thickness: u32,
        color: Color,
    }, // ^GB
    GraphicCircle {
        diameter: u32,
        thickness: u32,
        color: Color,
    }, // ^GC
    GraphicDiagonal {
        width: u32,
        height: u32,
        thickness: u32,
        color: Color,
    }, // ^GD
    BarcodeDefaults {
        module_width: Option<u32>,
        ratio: Option<f32>,
        height: Option<u32>,
    }, // ^BY
    BarcodeField(BarcodeSpec), // ^B*
    FieldData(String),         // ^FD
    FieldSeparator,            // ^FS
    DownloadGraphic {
        name: String,
        total_bytes: usize,
        bytes_per_row: usize,
        data: String,
    }, // ~DG
    DownloadObject {
        name: String,
        data: String,
    }, // ~DY
    ImageMove {
        name: String,
        scale_x: u32,
        scale_y: u32,
    }, // ^IM
    RecallGraphic {
        name: String,
        scale_x: u32,
        scale_y: u32,
    }, // ^XG
}

/// Leading orientation letter of a barcode or font parameter tail.
///
/// The letter belongs to the command, not the comma list: `^A0N,30,20`
/// carries it glued to the designator. A following comma is consumed so the
/// remainder lines up with the positional parameters either way.
pub(crate) fn split_orientation(tail: &str) -> (Option<Orientation>, &str) {
    let mut chars = tail.chars();
    match chars.next().and_then(Orientation::from_letter) {
        Some(o) => {
            let rest = chars.as_str();
            (Some(o), rest.strip_prefix(',').unwrap_or(rest))
        }
        None => (None, tail.strip_prefix(',').unwrap_or(tail)),
    }
}

fn next_bottom_flag(p: &mut Params) -> bool {
    matches!(
        p.next_char().map(|c| c.to_ascii_uppercase()),
        Some('Y') | Some('1')
    )
}

fn next_graphic_color(p: &mut Params) -> Color {
    p.next_char().map(Color::from_letter).unwrap_or_default()
}

/// Type a single command token. `None` means the designator is not part of
/// the recognized subset and the command is to be ignored.
pub fn parse_token(token: &str) -> Option<ZplCommand> {
    let body = token.strip_prefix(['^', '~'])?;
    let mut iter = body.char_indices();
    let (_, c1) = iter.next()?;
    let (_, c2) = iter.next()?;
    let tail = iter.as_str();

    match (c1.to_ascii_uppercase(), c2.to_ascii_uppercase()) {
        ('X', 'A') => Some(ZplCommand::StartLabel),
        ('X', 'Z') => Some(ZplCommand::EndLabel),
        ('F', 'O') => {
            let mut p = Params::new(tail);
            Some(ZplCommand::FieldOrigin {
                x: p.next_i32(0),
                y: p.next_i32(0),
                bottom: next_bottom_flag(&mut p),
            })
        }
        ('F', 'T') => {
            let mut p = Params::new(tail);
            Some(ZplCommand::FieldTypeset {
                x: p.next_i32(0),
                y: p.next_i32(0),
                bottom: next_bottom_flag(&mut p),
            })
        }
        ('L', 'H') => {
            let mut p = Params::new(tail);
            Some(ZplCommand::LabelHome {
                x: p.next_i32(0),
                y: p.next_i32(0),
            })
        }
        ('C', 'F') => {
            let mut p = Params::new(tail);
            let name = p.next_field().and_then(|f| f.trim().chars().next());
            Some(ZplCommand::ChangeFont {
                name,
                height: p.next_opt_u32(),
                width: p.next_opt_u32(),
            })
        }
        ('F', 'W') => Orientation::from_letter(tail.chars().next()?)
            .map(ZplCommand::FieldOrientation),
        ('F', 'B') => {
            let mut p = Params::new(tail);
            Some(ZplCommand::FieldBlock {
                width: p.next_u32(0),
                lines: p.next_u32(0),
                line_spacing: p.next_i32(0),
                align: p
                    .next_char()
                    .and_then(BlockAlign::from_letter)
                    .unwrap_or_default(),
                indent: p.next_u32(0),
            })
        }
        ('F', 'R') => Some(ZplCommand::FieldReverse),
        ('G', 'B') => {
            let mut p = Params::new(tail);
            Some(ZplCommand::GraphicBox {
                width: p.next_u32(0),
                height: p.next_u32(0),
                thickness: p.next_u32(1),
                color: next_graphic_color(&mut p),
            })
        }
        ('G', 'C') => {
            let mut p = Params::new(tail);
            Some(ZplCommand::GraphicCircle {
                diameter: p.next_u32(0),
                thickness: p.next_u32(0),
                color: next_graphic_color(&mut p),
            })
        }
        ('G', 'D') => {
            let mut p = Params::new(tail);
            Some(ZplCommand::GraphicDiagonal {
                width: p.next_u32(0),
                height: p.next_u32(0),
                thickness: p.next_u32(1),
                color: next_graphic_color(&mut p),
            })
        }
        ('B', 'Y') => {
            let mut p = Params::new(tail);
            Some(ZplCommand::BarcodeDefaults {
                module_width: p.next_opt_u32(),
                ratio: p.next_opt_f32(),
                height: p.next_opt_u32(),
            })
        }
        ('B', code) => barcode::parse_barcode(code, tail).map(ZplCommand::BarcodeField),
        ('F', 'D') => Some(ZplCommand::FieldData(tail.to_string())),
        ('F', 'S') => Some(ZplCommand::FieldSeparator),
        ('D', 'G') => {
            let mut p = Params::new(tail);
            let name = p.next_field()?.trim().to_string();
            Some(ZplCommand::DownloadGraphic {
                name,
                total_bytes: p.next_u32(0) as usize,
                bytes_per_row: p.next_u32(0) as usize,
                data: p.rest().to_string(),
            })
        }
        ('D', 'Y') => {
            let mut p = Params::new(tail);
            let name = p.next_field()?.trim().to_string();
            // format, extension, extent and row fields are not needed for
            // rendering; the payload interpretation is decided by its bytes.
            for _ in 0..5 {
                p.next_field();
            }
            Some(ZplCommand::DownloadObject {
                name,
                data: p.rest().to_string(),
            })
        }
        ('I', 'M') => {
            let mut p = Params::new(tail);
            let name = p.next_field()?.trim().to_string();
            Some(ZplCommand::ImageMove {
                name,
                scale_x: p.next_u32(1),
                scale_y: p.next_u32(1),
            })
        }
        ('X', 'G') => {
            let mut p = Params::new(tail);
            let name = p.next_field()?.trim().to_string();
            Some(ZplCommand::RecallGraphic {
                name,
                scale_x: p.next_u32(1),
                scale_y: p.next_u32(1),
            })
        }
        ('A', _) => {
            let (orientation, rest) = split_orientation(tail);
            let mut p = Params::new(rest);
            Some(ZplCommand::Font {
                name: c2.to_ascii_uppercase(),
                orientation,
                height: p.next_opt_u32(),
                width: p.next_opt_u32(),
            })
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_fo_test() {
        let cmd = parse_token("^FO349,327").unwrap();
        assert_eq!(
            cmd,
            ZplCommand::FieldOrigin {
                x: 349,
                y: 327,
                bottom: false
            }
        );
    }

    #[test]
    fn parse_ft_keeps_bottom_flag() {
        let cmd = parse_token("^FT10,20,1").unwrap();
        assert_eq!(
            cmd,
            ZplCommand::FieldTypeset {
                x: 10,
                y: 20,
                bottom: true
            }
        );
    }

    #[test]
    fn parse_a_test() {
        let cmd = parse_token("^A0N,21,20").unwrap();
        assert_eq!(
            cmd,
            ZplCommand::Font {
                name: '0',
                orientation: Some(Orientation::Normal),
                height: Some(21),
                width: Some(20),
            }
        );
    }

    #[test]
    fn parse_a_without_orientation() {
        let cmd = parse_token("^AB,30").unwrap();
        assert_eq!(
            cmd,
            ZplCommand::Font {
                name: 'B',
                orientation: None,
                height: Some(30),
                width: None,
            }
        );
    }

    #[test]
    fn parse_cf_test() {
        let cmd = parse_token("^CF0,60").unwrap();
        assert_eq!(
            cmd,
            ZplCommand::ChangeFont {
                name: Some('0'),
                height: Some(60),
                width: None,
            }
        );

        let cmd = parse_token("^CF,45").unwrap();
        assert_eq!(
            cmd,
            ZplCommand::ChangeFont {
                name: None,
                height: Some(45),
                width: None,
            }
        );
    }

    #[test]
    fn parse_gb_defaults() {
        let cmd = parse_token("^GB100,50").unwrap();
        assert_eq!(
            cmd,
            ZplCommand::GraphicBox {
                width: 100,
                height: 50,
                thickness: 1,
                color: Color::Black,
            }
        );
    }

    #[test]
    fn parse_gc_test() {
        let cmd = parse_token("^GC80,4,W").unwrap();
        assert_eq!(
            cmd,
            ZplCommand::GraphicCircle {
                diameter: 80,
                thickness: 4,
                color: Color::White,
            }
        );
    }

    #[test]
    fn parse_by_preserves_missing_fields() {
        let cmd = parse_token("^BY3").unwrap();
        assert_eq!(
            cmd,
            ZplCommand::BarcodeDefaults {
                module_width: Some(3),
                ratio: None,
                height: None,
            }
        );
    }

    #[test]
    fn parse_fd_keeps_payload_verbatim() {
        let cmd = parse_token("^FDHello, world,1,2").unwrap();
        assert_eq!(cmd, ZplCommand::FieldData("Hello, world,1,2".to_string()));
    }

    #[test]
    fn parse_dg_keeps_data_with_commas() {
        let cmd = parse_token("~DGR:X.GRF,8,1,FF00,FF00").unwrap();
        assert_eq!(
            cmd,
            ZplCommand::DownloadGraphic {
                name: "R:X.GRF".to_string(),
                total_bytes: 8,
                bytes_per_row: 1,
                data: "FF00,FF00".to_string(),
            }
        );
    }

    #[test]
    fn parse_dy_skips_format_fields() {
        let cmd = parse_token("~DYR:L.PNG,P,P,4,,,89504E47").unwrap();
        assert_eq!(
            cmd,
            ZplCommand::DownloadObject {
                name: "R:L.PNG".to_string(),
                data: "89504E47".to_string(),
            }
        );
    }

    #[test]
    fn parse_xg_defaults_scale() {
        let cmd = parse_token("^XGR:L.PNG").unwrap();
        assert_eq!(
            cmd,
            ZplCommand::RecallGraphic {
                name: "R:L.PNG".to_string(),
                scale_x: 1,
                scale_y: 1,
            }
        );
    }

    #[test]
    fn unknown_designators_are_rejected() {
        assert_eq!(parse_token("^MMT"), None);
        assert_eq!(parse_token("^PR4"), None);
        assert_eq!(parse_token("~JA"), None);
        assert_eq!(parse_token("^"), None);
    }
}
