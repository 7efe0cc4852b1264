//! WinAnsi text for the standard fonts
//!
//! The code table is lopdf's; this only adds the `?` substitution for
//! characters the table cannot express.

use lopdf::{dictionary, Document, Encoding};

const UNMAPPED: u8 = b'?';

fn encode_with(encoding: &Encoding, text: &str) -> Vec<u8> {
    let mut buf = [0u8; 4];
    text.chars()
        .map(|c| match Document::encode_text(encoding, c.encode_utf8(&mut buf)).as_slice() {
            [byte] => *byte,
            _ => UNMAPPED,
        })
        .collect()
}

/// Encode text for a standard font; unmappable characters become `?`
pub fn winansi_encode(text: &str) -> Vec<u8> {
    let font = dictionary! {
        "Type" => "Font",
        "Encoding" => "WinAnsiEncoding",
    };
    match font.get_font_encoding(&Document::new()) {
        Ok(encoding) => encode_with(&encoding, text),
        Err(err) => {
            tracing::warn!("WinAnsi table unavailable: {}", err);
            text.chars()
                .map(|c| if c == ' ' || c.is_ascii_graphic() { c as u8 } else { UNMAPPED })
                .collect()
        }
    }
}
