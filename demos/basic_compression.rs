use std::io::Cursor;

use huff_codec::{HeaderFormat, HuffError, HuffmanCodec};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let text = b"It was the best of times, it was the worst of times, \
                 it was the age of wisdom, it was the age of foolishness."
        .repeat(4);

    println!("{} bytes of text ({} bits)", text.len(), text.len() * 8);
    println!("{:>6} {:>12} {:>12} {:>12}", "header", "header bits", "total bits", "saved bits");

    // The count header is a fixed 256 x 32 bits; the tree header grows with
    // the alphabet actually used.
    for format in [HeaderFormat::Count, HeaderFormat::Tree] {
        let mut codec = HuffmanCodec::new();
        let saved = codec.preprocess(Cursor::new(&text), format)?;
        let plan = codec.prepared().ok_or("preprocess left no plan")?;
        println!(
            "{:>6} {:>12} {:>12} {:>12}",
            format,
            plan.header.bit_len(),
            plan.sizes.compressed_bits,
            saved
        );

        let mut packed = Vec::new();
        match codec.encode(Cursor::new(&text), &mut packed, false) {
            Ok(_) => {
                let mut restored = Vec::new();
                codec.decode(Cursor::new(&packed), &mut restored)?;
                assert_eq!(restored, text);
            }
            Err(HuffError::WouldGrow { .. }) => println!("       (refused: output would not be smaller)"),
            Err(e) => return Err(e.into()),
        }
    }

    // Every byte value once: no skew for Huffman codes to exploit.
    let flat: Vec<u8> = (0..=255u8).collect();
    let mut codec = HuffmanCodec::new();
    codec.set_viewer(|message: &str| println!("  {}", message));

    codec.preprocess(Cursor::new(&flat), HeaderFormat::Tree)?;
    if let Err(e) = codec.encode(Cursor::new(&flat), Vec::new(), false) {
        println!("flat data: {}", e);
    }

    codec.preprocess(Cursor::new(&flat), HeaderFormat::Tree)?;
    let mut packed = Vec::new();
    let bits = codec.encode(Cursor::new(&flat), &mut packed, true)?;
    println!("flat data forced: {} bits for {} input bits", bits, flat.len() * 8);

    let mut restored = Vec::new();
    codec.decode(Cursor::new(&packed), &mut restored)?;
    assert_eq!(restored, flat);

    Ok(())
}
