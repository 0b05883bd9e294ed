//! End-to-end scenarios over the public pipeline: literal documents in,
//! element lists and PNG dimensions out.

use zplrast::{analyze, render, ElementKind, RenderError};

fn png_dimensions(png: &[u8]) -> (u32, u32) {
    assert_eq!(&png[..8], &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]);
    let w = u32::from_be_bytes(png[16..20].try_into().unwrap());
    let h = u32::from_be_bytes(png[20..24].try_into().unwrap());
    (w, h)
}

#[test]
fn text_field_scenario() {
    let labels = analyze("^XA^FO10,20^A0N,30,20^FDHI^FS^XZ");
    assert_eq!(labels.len(), 1);
    assert_eq!(labels[0].elements.len(), 1);
    let el = &labels[0].elements[0];
    assert_eq!((el.x, el.y), (10, 20));
    let ElementKind::Text(text) = &el.kind else {
        panic!("expected a text element");
    };
    assert_eq!(text.text, "HI");
    assert_eq!(text.font_name, '0');
    assert_eq!((text.height, text.width), (30, 20));
}

#[test]
fn box_scenario_canvas_dimensions() {
    let png = render("^XA^FO5,5^GB100,50,3,B^FS^XZ").unwrap();
    let (w, h) = png_dimensions(&png);
    assert_eq!((w, h), (109, 59));
}

#[test]
fn filled_box_scenario() {
    // thickness ≥ both dimensions: a solid 10×10 black square.
    let png = render("^XA^FO0,0^GB10,10,10,B^FS^XZ").unwrap();
    let (w, h) = png_dimensions(&png);
    assert_eq!((w, h), (14, 14));
}

#[test]
fn code39_scenario_element_fields() {
    let labels = analyze("^XA^BY2,2,50^FO0,0^B3N,N,50,N,N^FD123^FS^XZ");
    let el = &labels[0].elements[0];
    let ElementKind::Barcode(code) = &el.kind else {
        panic!("expected a barcode element");
    };
    assert_eq!(code.text, "123");
    assert_eq!(code.height, 50);
    assert_eq!(code.module_width, 2);
    assert_eq!(code.ratio, 2.0);
    assert!(!code.print_interpretation);
    assert!(!code.print_above);

    // The native generator pads ten 2-dot modules of quiet zone per side;
    // the canvas must be comfortably wider than the payload bars alone.
    let png = render("^XA^BY2,2,50^FO0,0^B3N,N,50,N,N^FD123^FS^XZ").unwrap();
    let (w, h) = png_dimensions(&png);
    assert!(w > 40);
    assert_eq!(h, 54);
}

#[test]
fn field_block_scenario_wraps_into_three_lines() {
    let labels = analyze("^XA^FO0,0^FB60,0,0,C,0^A0N,20,10^FDHello world here^FS^XZ");
    let texts: Vec<&str> = labels[0]
        .elements
        .iter()
        .map(|el| match &el.kind {
            ElementKind::Text(t) => t.text.as_str(),
            other => panic!("expected text elements, got {other:?}"),
        })
        .collect();
    assert_eq!(texts, vec!["Hello", "world", "here"]);
}

#[test]
fn undecodable_graphic_scenario() {
    // Eight bytes of PNG header stored under R:L.PNG; decode fails cleanly
    // and the image draws nothing, leaving the minimal canvas plus margin.
    let zpl = "^XA~DYR:L.PNG,P,P,4,,,89504E470D0A1A0A^FO0,0^XGR:L.PNG,1,1^FS^XZ";
    let labels = analyze(zpl);
    assert_eq!(labels[0].elements.len(), 1);
    assert!(matches!(labels[0].elements[0].kind, ElementKind::Image(_)));

    let png = render(zpl).unwrap();
    assert_eq!(png_dimensions(&png), (5, 5));
}

#[test]
fn label_count_matches_end_label_tokens() {
    let labels = analyze("^XA^FDa^FS^XZ^XA^FDb^FS^XZ");
    assert_eq!(labels.len(), 2);

    let labels = analyze("^XA^FDa^FS^XZ^FDtrailing^FS");
    assert_eq!(labels.len(), 2);
}

#[test]
fn field_payload_round_trips_verbatim() {
    let payload = "A-1,2/3.4 $5+6%";
    let labels = analyze(&format!("^XA^FO0,0^FD{payload}^FS^XZ"));
    let ElementKind::Text(text) = &labels[0].elements[0].kind else {
        panic!("expected a text element");
    };
    assert_eq!(text.text, payload);
}

#[test]
fn reverse_marks_at_most_one_element() {
    let labels = analyze("^XA^FR^GB5,5,5^FS^GB5,5,5^FS^XZ");
    let reversed: Vec<bool> = labels[0].elements.iter().map(|el| el.reverse).collect();
    assert_eq!(reversed, vec![true, false]);
}

#[test]
fn empty_document_fails() {
    assert!(matches!(render(""), Err(RenderError::EmptyDocument)));
}

#[test]
fn unsupported_commands_never_abort_a_label() {
    let png = render("^XA^MMT^PW400^LL200^PR4^FO5,5^GB20,20,2^FS^PQ2^XZ").unwrap();
    let (w, h) = png_dimensions(&png);
    assert_eq!((w, h), (29, 29));
}

#[test]
fn rotated_barcode_swaps_canvas_axes() {
    let tall = render("^XA^BY2,2,50^FO0,0^B3R,N,50,N,N^FD1^FS^XZ").unwrap();
    let wide = render("^XA^BY2,2,50^FO0,0^B3N,N,50,N,N^FD1^FS^XZ").unwrap();
    let (tw, th) = png_dimensions(&tall);
    let (ww, wh) = png_dimensions(&wide);
    assert_eq!((tw, th), (wh, ww));
}
