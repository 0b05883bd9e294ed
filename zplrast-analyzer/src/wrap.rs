use crate::element::{Element, ElementKind, OriginType, TextField};
use crate::printer::{FieldBlockState, FieldPosition, FontState};

/// Break a `^FD` payload into field-block lines.
///
/// `\&` splits paragraphs; words pack greedily against a per-character
/// width estimate of `0.6 × font height`, condensed by 0.65 for font `'0'`
/// without an explicit width. A word that would overflow starts a new line
/// unless the line is still empty, in which case it stands alone.
pub(crate) fn wrap_text(data: &str, font: &FontState, block: &FieldBlockState) -> Vec<String> {
    let scale_x = if font.name == '0' && font.width == 0 {
        0.65
    } else {
        1.0
    };
    let char_width = font.height as f32 * 0.6 * scale_x;
    let max_chars = if block.width > 0 && char_width > 0.0 {
        (block.width as f32 / char_width).floor() as usize
    } else {
        usize::MAX
    };

    let mut lines = Vec::new();
    for paragraph in data.split("\\&") {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            if current.is_empty() {
                current.push_str(word);
            } else if current.chars().count() + 1 + word.chars().count() <= max_chars {
                current.push(' ');
                current.push_str(word);
            } else {
                lines.push(std::mem::take(&mut current));
                current.push_str(word);
            }
        }
        lines.push(current);
    }

    if block.lines > 0 {
        lines.truncate(block.lines as usize);
    }
    lines
}

/// Emit one text element per wrapped line, vertically centered when the
/// block allows more lines than were produced.
pub(crate) fn emit_block_lines(
    font: &FontState,
    pos: Option<FieldPosition>,
    reverse: bool,
    block: &FieldBlockState,
    data: &str,
    out: &mut Vec<Element>,
) {
    let lines = wrap_text(data, font, block);

    let step = font.height as i32 + block.line_spacing;
    let produced = lines.len() as i32;
    let allowed = block.lines as i32;
    let offset_y = if allowed > produced {
        let span = |n: i32| n * step - block.line_spacing;
        (span(allowed) - span(produced)).div_euclid(2)
    } else {
        0
    };

    let (base_x, base_y) = pos.map(|p| (p.x, p.y)).unwrap_or((0, 0));
    let origin = pos.map(|p| p.origin).unwrap_or(OriginType::TopLeft);

    for (i, line) in lines.into_iter().enumerate() {
        let indent = if i == 0 { 0 } else { block.indent as i32 };
        out.push(Element::new(
            base_x + indent,
            base_y + offset_y + i as i32 * step,
            font.orientation,
            reverse,
            ElementKind::Text(TextField {
                text: line,
                font_name: font.name,
                height: font.height,
                width: font.width,
                origin,
                block_width: Some(block.width),
                block_align: Some(block.align),
            }),
        ));
    }
}
