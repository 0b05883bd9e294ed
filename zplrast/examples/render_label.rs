use zplrast::render;

fn main() {
    let zpl = "^XA\
        ^FO30,20^A0N,40,30^FDHELLO ZPL^FS\
        ^FO30,70^GB300,3,3^FS\
        ^BY2,3,80^FO30,90^B3N,N,80,Y,N^FDSN-1047^FS\
        ^XZ";
    let png = render(zpl).expect("render label");
    std::fs::write("label.png", png).expect("write png");
    println!("Wrote label.png");
}
