//! WinAnsi text encoding.
//!
//! Embedded check fonts use WinAnsiEncoding, which is Latin-1 plus the
//! cp1252 assignments in the 0x80..0x9F control block. The draw path
//! encodes lossily (unmappable characters become `?`); width lookups go
//! the other way to find the glyph behind each byte code.

/// cp1252 assignments in the 0x80..=0x9F range: (code, character).
/// The five codes missing from the list (0x81, 0x8D, 0x8F, 0x90, 0x9D)
/// are undefined in WinAnsi.
const HIGH_CONTROL: &[(u8, char)] = &[
    (0x80, '\u{20AC}'), // Euro
    (0x82, '\u{201A}'), // quotesinglbase
    (0x83, '\u{0192}'), // florin
    (0x84, '\u{201E}'), // quotedblbase
    (0x85, '\u{2026}'), // ellipsis
    (0x86, '\u{2020}'), // dagger
    (0x87, '\u{2021}'), // daggerdbl
    (0x88, '\u{02C6}'), // circumflex
    (0x89, '\u{2030}'), // perthousand
    (0x8A, '\u{0160}'), // Scaron
    (0x8B, '\u{2039}'), // guilsinglleft
    (0x8C, '\u{0152}'), // OE
    (0x8E, '\u{017D}'), // Zcaron
    (0x91, '\u{2018}'), // quoteleft
    (0x92, '\u{2019}'), // quoteright
    (0x93, '\u{201C}'), // quotedblleft
    (0x94, '\u{201D}'), // quotedblright
    (0x95, '\u{2022}'), // bullet
    (0x96, '\u{2013}'), // endash
    (0x97, '\u{2014}'), // emdash
    (0x98, '\u{02DC}'), // tilde
    (0x99, '\u{2122}'), // trademark
    (0x9A, '\u{0161}'), // scaron
    (0x9B, '\u{203A}'), // guilsinglright
    (0x9C, '\u{0153}'), // oe
    (0x9E, '\u{017E}'), // zcaron
    (0x9F, '\u{0178}'), // Ydieresis
];

/// WinAnsi byte for a character, if the encoding defines one.
pub fn to_winansi(c: char) -> Option<u8> {
    let code = c as u32;
    match code {
        0x20..=0x7E => Some(code as u8),
        0xA0..=0xFF => Some(code as u8),
        _ => HIGH_CONTROL
            .iter()
            .find(|(_, ch)| *ch == c)
            .map(|(byte, _)| *byte),
    }
}

/// Character behind a WinAnsi byte code, if the code is defined.
pub fn from_winansi(code: u8) -> Option<char> {
    match code {
        0x20..=0x7E => Some(code as char),
        0xA0..=0xFF => Some(code as char),
        _ => HIGH_CONTROL
            .iter()
            .find(|(byte, _)| *byte == code)
            .map(|(_, ch)| *ch),
    }
}

/// Encode a string to WinAnsi bytes, substituting `?` for characters the
/// encoding cannot represent.
pub fn encode_lossy(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| to_winansi(c).unwrap_or(b'?'))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_maps_identically() {
        assert_eq!(to_winansi('A'), Some(0x41));
        assert_eq!(to_winansi(' '), Some(0x20));
        assert_eq!(from_winansi(0x7E), Some('~'));
    }

    #[test]
    fn cp1252_block_round_trips() {
        assert_eq!(to_winansi('\u{20AC}'), Some(0x80));
        assert_eq!(from_winansi(0x80), Some('\u{20AC}'));
        assert_eq!(to_winansi('\u{2014}'), Some(0x97));
        assert_eq!(from_winansi(0x9D), None);
    }

    #[test]
    fn lossy_encoding_substitutes() {
        assert_eq!(encode_lossy("a\u{4E16}b"), vec![b'a', b'?', b'b']);
    }
}
