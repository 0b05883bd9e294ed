use std::io::Read;

use base64::{engine::general_purpose, Engine};
use flate2::read::ZlibDecoder;
use log::warn;

use crate::element::RasterImage;

/// A graphic held by the virtual printer under its device-qualified name
/// (e.g. `"R:LOGO.PNG"`).
#[derive(Debug, Clone, PartialEq)]
pub enum StoredGraphic {
    /// `~DG` payload: packed monochrome rows, ASCII hex or `:Z64:`.
    Raw {
        total_bytes: usize,
        bytes_per_row: usize,
        data: String,
    },
    /// `~DY` payload whose hex decoded cleanly; assumed to be PNG bytes.
    Encoded { data: Vec<u8> },
    /// `~DY` payload that failed to decode; kept verbatim, never drawable.
    Text { data: String },
}

impl StoredGraphic {
    /// Build the `~DY` variant, falling back to the raw string when the hex
    /// payload is malformed.
    pub fn from_hex(name: &str, hex: &str) -> Self {
        match decode_ascii_hex(hex) {
            Ok(data) => StoredGraphic::Encoded { data },
            Err(err) => {
                warn!("graphic {name}: {err}, storing raw payload");
                StoredGraphic::Text {
                    data: hex.to_string(),
                }
            }
        }
    }

    /// Expand a `Raw` graphic into an RGBA bitmap; `None` for the other
    /// variants and on any decode failure.
    pub fn expand(&self) -> Option<RasterImage> {
        let StoredGraphic::Raw {
            total_bytes,
            bytes_per_row,
            data,
        } = self
        else {
            return None;
        };
        if *bytes_per_row == 0 {
            return None;
        }
        let packed = match data.split_once(":Z64:") {
            Some((_, z64)) => decode_z64(z64),
            None => decode_ascii_hex(data),
        };
        let packed = match packed {
            Ok(bytes) => bytes,
            Err(err) => {
                warn!("graphic expansion failed: {err}");
                return None;
            }
        };
        let height = total_bytes / bytes_per_row;
        expand_monochrome(&packed, *bytes_per_row, height)
    }
}

/// Decode case-insensitive ASCII hex, ignoring whitespace and the `,`/`:`
/// row markers ZPL tools emit.
pub fn decode_ascii_hex(s: &str) -> Result<Vec<u8>, String> {
    let cleaned: String = s
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ',' && *c != ':')
        .collect();

    if cleaned.len() % 2 != 0 {
        return Err("odd ASCII hex length".into());
    }

    let mut out = Vec::with_capacity(cleaned.len() / 2);
    for chunk in cleaned.as_bytes().chunks(2) {
        let hex = std::str::from_utf8(chunk).map_err(|_| "non-ASCII hex digit".to_string())?;
        let byte =
            u8::from_str_radix(hex, 16).map_err(|_| format!("invalid hex byte: {hex}"))?;
        out.push(byte);
    }
    Ok(out)
}

/// `:Z64:` payload: base64 wrapping a zlib stream, with a trailing `:CRC`
/// marker that the decoder must not see.
fn decode_z64(s: &str) -> Result<Vec<u8>, String> {
    let body = match s.rfind(':') {
        Some(idx) => &s[..idx],
        None => s,
    };
    let cleaned: String = body.chars().filter(|c| !c.is_whitespace()).collect();
    let compressed = general_purpose::STANDARD
        .decode(&cleaned)
        .map_err(|e| format!("invalid base64: {e}"))?;

    let mut decoder = ZlibDecoder::new(compressed.as_slice());
    let mut out = Vec::new();
    decoder
        .read_to_end(&mut out)
        .map_err(|e| format!("zlib decompress error: {e}"))?;
    Ok(out)
}

/// Unpack MSB-first monochrome rows into RGBA: set bits are opaque black,
/// clear bits transparent.
fn expand_monochrome(packed: &[u8], bytes_per_row: usize, height: usize) -> Option<RasterImage> {
    if packed.len() < bytes_per_row * height {
        warn!(
            "bitmap too small: expected {} bytes, got {}",
            bytes_per_row * height,
            packed.len()
        );
        return None;
    }

    let width = bytes_per_row * 8;
    let mut img = RasterImage::filled(width as u32, height as u32, [0, 0, 0, 0]);
    for row in 0..height {
        let row_start = row * bytes_per_row;
        for (byte_idx, byte) in packed[row_start..row_start + bytes_per_row].iter().enumerate() {
            for bit in 0..8u32 {
                if (byte >> (7 - bit)) & 1 == 1 {
                    img.set((byte_idx as u32 * 8) + bit, row as u32, [0, 0, 0, 255]);
                }
            }
        }
    }
    Some(img)
}
