use zplrast::render;

fn main() {
    // White text knocked out of a filled box.
    let zpl = "^XA\
        ^FO10,10^GB220,60,60^FS\
        ^FO30,25^FR^A0N,30,30^FDREVERSED^FS\
        ^XZ";
    let png = render(zpl).expect("render label");
    std::fs::write("reverse.png", png).expect("write png");
    println!("Wrote reverse.png");
}
