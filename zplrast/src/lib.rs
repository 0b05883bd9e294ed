//! ZPL II label renderer: a textual ZPL program in, a PNG preview out.
//!
//! The pipeline has three stages, each its own crate: tokenizing and typing
//! commands, evaluating them against a virtual printer into positioned
//! elements, and rasterizing those elements onto a white canvas sized to
//! their union.

mod error;

pub use error::RenderError;
pub use zplrast_analyzer::{analyze, Element, ElementKind, Label};
pub use zplrast_parser::{BarcodeKind, BlockAlign, Color, Orientation};
pub use zplrast_render::{draw_elements, ensure_fonts};

/// Render the first label of a ZPL document to PNG bytes.
///
/// Documents with several labels render only the first here; callers that
/// need all of them run [`analyze`] and [`draw_elements`] per label.
pub fn render(zpl: &str) -> Result<Vec<u8>, RenderError> {
    let labels = analyze(zpl);
    let mut label = labels
        .into_iter()
        .next()
        .ok_or(RenderError::EmptyDocument)?;
    Ok(draw_elements(&mut label.elements)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_a_minimal_label() {
        let png = render("^XA^FO5,5^GB100,50,3,B^FS^XZ").unwrap();
        assert_eq!(&png[..4], &[0x89, b'P', b'N', b'G']);
    }

    #[test]
    fn empty_document_is_an_error() {
        assert!(matches!(render(""), Err(RenderError::EmptyDocument)));
        assert!(matches!(
            render("not zpl"),
            Err(RenderError::EmptyDocument)
        ));
    }

    #[test]
    fn multi_label_documents_render_the_first() {
        let zpl = "^XA^FO0,0^GB10,10,10^FS^XZ^XA^FO0,0^GB300,300,1^FS^XZ";
        let png = render(zpl).unwrap();
        // 10×10 content + margin, nowhere near the second label's 300 dots.
        let (w, h) = png_dimensions(&png);
        assert_eq!((w, h), (14, 14));
    }

    pub(crate) fn png_dimensions(png: &[u8]) -> (u32, u32) {
        let w = u32::from_be_bytes(png[16..20].try_into().unwrap());
        let h = u32::from_be_bytes(png[20..24].try_into().unwrap());
        (w, h)
    }
}
