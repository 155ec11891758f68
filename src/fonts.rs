//! The two standard PDF fonts used for stamping, with their WinAnsi encoding
//! and AFM metrics: advance widths and kern pairs (thousandths of an em).

use lopdf::{dictionary, Dictionary};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StandardFont {
    Helvetica,
    HelveticaBold,
}

/// Printable ASCII, 0x20..=0x7E.
const HELVETICA_ASCII: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

const HELVETICA_BOLD_ASCII: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

/// Latin-1 upper half, 0xA0..=0xFF.
const HELVETICA_LATIN1: [u16; 96] = [
    278, 333, 556, 556, 556, 556, 260, 556, 333, 737, 370, 556, 584, 333, 737, 333,
    400, 584, 333, 333, 333, 556, 537, 278, 333, 333, 365, 556, 834, 834, 834, 611,
    667, 667, 667, 667, 667, 667, 1000, 722, 667, 667, 667, 667, 278, 278, 278, 278,
    722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611,
    556, 556, 556, 556, 556, 556, 889, 500, 556, 556, 556, 556, 278, 278, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 584, 611, 556, 556, 556, 556, 500, 556, 500,
];

const HELVETICA_BOLD_LATIN1: [u16; 96] = [
    278, 333, 556, 556, 556, 556, 280, 556, 333, 737, 370, 556, 584, 333, 737, 333,
    400, 584, 333, 333, 333, 611, 556, 278, 333, 333, 365, 556, 834, 834, 834, 611,
    722, 722, 722, 722, 722, 722, 1000, 722, 667, 667, 667, 667, 278, 278, 278, 278,
    722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611,
    556, 556, 556, 556, 556, 556, 889, 556, 556, 556, 556, 556, 278, 278, 278, 278,
    611, 611, 611, 611, 611, 611, 611, 584, 611, 611, 611, 611, 611, 556, 611, 556,
];

/// WinAnsi 0x80..=0x9F: (character, code, regular width, bold width).
const WINANSI_EXTRAS: [(char, u8, u16, u16); 27] = [
    ('€', 0x80, 556, 556),
    ('‚', 0x82, 222, 278),
    ('ƒ', 0x83, 556, 556),
    ('„', 0x84, 333, 500),
    ('…', 0x85, 1000, 1000),
    ('†', 0x86, 556, 556),
    ('‡', 0x87, 556, 556),
    ('ˆ', 0x88, 333, 333),
    ('‰', 0x89, 1000, 1000),
    ('Š', 0x8A, 667, 667),
    ('‹', 0x8B, 333, 333),
    ('Œ', 0x8C, 1000, 1000),
    ('Ž', 0x8E, 611, 611),
    ('‘', 0x91, 222, 278),
    ('’', 0x92, 222, 278),
    ('“', 0x93, 333, 500),
    ('”', 0x94, 333, 500),
    ('•', 0x95, 350, 350),
    ('–', 0x96, 556, 556),
    ('—', 0x97, 1000, 1000),
    ('˜', 0x98, 333, 333),
    ('™', 0x99, 1000, 1000),
    ('š', 0x9A, 500, 556),
    ('›', 0x9B, 333, 333),
    ('œ', 0x9C, 944, 944),
    ('ž', 0x9E, 500, 500),
    ('Ÿ', 0x9F, 667, 667),
];

/// AFM kern pairs in thousandths of an em.
const HELVETICA_KERNING: [(char, char, i16); 212] = [
    ('A', 'C', -30), ('A', 'G', -30), ('A', 'O', -30), ('A', 'Q', -30), ('A', 'T', -120),
    ('A', 'U', -50), ('A', 'V', -70), ('A', 'W', -50), ('A', 'Y', -100), ('A', 'u', -30),
    ('A', 'v', -40), ('A', 'w', -40), ('A', 'y', -40), ('B', 'U', -10), ('B', ',', -20),
    ('B', '.', -20), ('C', ',', -30), ('C', '.', -30), ('D', 'A', -40), ('D', 'V', -70),
    ('D', 'W', -40), ('D', 'Y', -90), ('D', ',', -70), ('D', '.', -70), ('F', 'A', -80),
    ('F', 'a', -50), ('F', ',', -150), ('F', 'e', -30), ('F', 'o', -30), ('F', '.', -150),
    ('F', 'r', -45), ('J', 'A', -20), ('J', 'a', -20), ('J', ',', -30), ('J', '.', -30),
    ('J', 'u', -20), ('K', 'O', -50), ('K', 'e', -40), ('K', 'o', -40), ('K', 'u', -30),
    ('K', 'y', -50), ('L', 'T', -110), ('L', 'V', -110), ('L', 'W', -70), ('L', 'Y', -140),
    ('L', '\u{201D}', -140), ('L', '\u{2019}', -160), ('L', 'y', -30), ('O', 'A', -20),
    ('O', 'T', -40), ('O', 'V', -50), ('O', 'W', -30), ('O', 'X', -60), ('O', 'Y', -70),
    ('O', ',', -40), ('O', '.', -40), ('P', 'A', -120), ('P', 'a', -40), ('P', ',', -180),
    ('P', 'e', -50), ('P', 'o', -50), ('P', '.', -180), ('Q', 'U', -10), ('R', 'O', -20),
    ('R', 'T', -30), ('R', 'U', -40), ('R', 'V', -50), ('R', 'W', -30), ('R', 'Y', -50),
    ('S', ',', -20), ('S', '.', -20), ('T', 'A', -120), ('T', 'O', -40), ('T', 'a', -120),
    ('T', ':', -20), ('T', ',', -120), ('T', 'e', -120), ('T', '-', -140), ('T', 'o', -120),
    ('T', '.', -120), ('T', 'r', -120), ('T', ';', -20), ('T', 'u', -120), ('T', 'w', -120),
    ('T', 'y', -120), ('U', 'A', -40), ('U', ',', -40), ('U', '.', -40), ('V', 'A', -80),
    ('V', 'G', -40), ('V', 'O', -40), ('V', 'a', -70), ('V', ':', -40), ('V', ',', -125),
    ('V', 'e', -80), ('V', '-', -80), ('V', 'o', -80), ('V', '.', -125), ('V', ';', -40),
    ('V', 'u', -70), ('W', 'A', -50), ('W', 'O', -20), ('W', 'a', -40), ('W', ',', -80),
    ('W', 'e', -30), ('W', '-', -40), ('W', 'o', -30), ('W', '.', -80), ('W', 'u', -30),
    ('W', 'y', -20), ('Y', 'A', -110), ('Y', 'O', -85), ('Y', 'a', -140), ('Y', ':', -60),
    ('Y', ',', -140), ('Y', 'e', -140), ('Y', '-', -140), ('Y', 'o', -140), ('Y', '.', -140),
    ('Y', ';', -60), ('Y', 'u', -110), ('Y', 'v', -110), ('a', 'v', -20), ('a', 'w', -20),
    ('a', 'y', -30), ('b', 'b', -10), ('b', ',', -40), ('b', 'l', -20), ('b', '.', -40),
    ('b', 'u', -20), ('b', 'v', -20), ('b', 'y', -20), ('c', ',', -15), ('c', 'k', -20),
    (':', ' ', -50), (',', '\u{201D}', -100), (',', '\u{2019}', -100), ('e', ',', -15),
    ('e', '.', -15), ('e', 'v', -30), ('e', 'w', -20), ('e', 'x', -30), ('e', 'y', -20),
    ('f', 'a', -30), ('f', ',', -30), ('f', 'e', -30), ('f', 'o', -30), ('f', '.', -30),
    ('f', '\u{201D}', 60), ('f', '\u{2019}', 50), ('g', 'r', -10), ('h', 'y', -30), ('k', 'e', -20),
    ('k', 'o', -20), ('m', 'u', -10), ('m', 'y', -15), ('n', 'u', -10), ('n', 'v', -20),
    ('n', 'y', -15), ('o', ',', -40), ('o', '.', -40), ('o', 'v', -15), ('o', 'w', -15),
    ('o', 'x', -30), ('o', 'y', -30), ('p', ',', -35), ('p', '.', -35), ('p', 'y', -30),
    ('.', '\u{201D}', -100), ('.', '\u{2019}', -100), ('.', ' ', -60), ('\u{201D}', ' ', -40),
    ('\u{2018}', '\u{2018}', -57), ('\u{2019}', 'd', -50), ('\u{2019}', '\u{2019}', -57),
    ('\u{2019}', 'r', -50), ('\u{2019}', 's', -50), ('\u{2019}', ' ', -70), ('r', 'a', -10),
    ('r', ':', 30), ('r', ',', -50), ('r', '-', -20), ('r', '.', -50), ('r', ';', 30),
    ('s', ',', -15), ('s', '.', -15), ('s', 'w', -30), (';', ' ', -50), (' ', 'T', -50),
    (' ', 'V', -50), (' ', 'W', -40), (' ', 'Y', -90), (' ', '\u{201C}', -30),
    (' ', '\u{2018}', -60), ('v', 'a', -25), ('v', ',', -80), ('v', 'e', -25), ('v', 'o', -25),
    ('v', '.', -80), ('w', 'a', -15), ('w', ',', -60), ('w', 'e', -10), ('w', 'o', -10),
    ('w', '.', -60), ('x', 'e', -30), ('y', 'a', -20), ('y', ',', -100), ('y', 'e', -20),
    ('y', 'o', -20), ('y', '.', -100), ('z', 'e', -15), ('z', 'o', -15),
];

const HELVETICA_BOLD_KERNING: [(char, char, i16); 210] = [
    ('A', 'C', -40), ('A', 'G', -50), ('A', 'O', -40), ('A', 'Q', -40), ('A', 'T', -90),
    ('A', 'U', -50), ('A', 'V', -80), ('A', 'W', -60), ('A', 'Y', -110), ('A', 'u', -30),
    ('A', 'v', -40), ('A', 'w', -30), ('A', 'y', -30), ('B', 'A', -30), ('B', 'U', -10),
    ('D', 'A', -40), ('D', 'V', -40), ('D', 'W', -40), ('D', 'Y', -70), ('D', ',', -30),
    ('D', '.', -30), ('F', 'A', -80), ('F', 'a', -20), ('F', ',', -100), ('F', '.', -100),
    ('J', 'A', -20), ('J', ',', -20), ('J', '.', -20), ('J', 'u', -20), ('K', 'O', -30),
    ('K', 'e', -15), ('K', 'o', -35), ('K', 'u', -30), ('K', 'y', -40), ('L', 'T', -90),
    ('L', 'V', -110), ('L', 'W', -80), ('L', 'Y', -120), ('L', '\u{201D}', -140),
    ('L', '\u{2019}', -140), ('L', 'y', -30), ('O', 'A', -50), ('O', 'T', -40), ('O', 'V', -50),
    ('O', 'W', -50), ('O', 'X', -50), ('O', 'Y', -70), ('O', ',', -40), ('O', '.', -40),
    ('P', 'A', -100), ('P', 'a', -30), ('P', ',', -120), ('P', 'e', -30), ('P', 'o', -40),
    ('P', '.', -120), ('Q', 'U', -10), ('Q', ',', 20), ('Q', '.', 20), ('R', 'O', -20),
    ('R', 'T', -20), ('R', 'U', -20), ('R', 'V', -50), ('R', 'W', -40), ('R', 'Y', -50),
    ('T', 'A', -90), ('T', 'O', -40), ('T', 'a', -80), ('T', ':', -40), ('T', ',', -80),
    ('T', 'e', -60), ('T', '-', -120), ('T', 'o', -80), ('T', '.', -80), ('T', 'r', -80),
    ('T', ';', -40), ('T', 'u', -90), ('T', 'w', -60), ('T', 'y', -60), ('U', 'A', -50),
    ('U', ',', -30), ('U', '.', -30), ('V', 'A', -80), ('V', 'G', -50), ('V', 'O', -50),
    ('V', 'a', -60), ('V', ':', -40), ('V', ',', -120), ('V', 'e', -50), ('V', '-', -80),
    ('V', 'o', -90), ('V', '.', -120), ('V', ';', -40), ('V', 'u', -60), ('W', 'A', -60),
    ('W', 'O', -20), ('W', 'a', -40), ('W', ':', -10), ('W', ',', -80), ('W', 'e', -35),
    ('W', '-', -40), ('W', 'o', -60), ('W', '.', -80), ('W', ';', -10), ('W', 'u', -45),
    ('W', 'y', -20), ('Y', 'A', -110), ('Y', 'O', -70), ('Y', 'a', -90), ('Y', ':', -50),
    ('Y', ',', -100), ('Y', 'e', -80), ('Y', 'o', -100), ('Y', '.', -100), ('Y', ';', -50),
    ('Y', 'u', -100), ('a', 'g', -10), ('a', 'v', -15), ('a', 'w', -15), ('a', 'y', -20),
    ('b', 'b', -10), ('b', 'l', -10), ('b', 'u', -20), ('b', 'v', -20), ('b', 'y', -20),
    ('c', 'h', -10), ('c', 'k', -20), ('c', 'l', -20), ('c', 'y', -10), (':', ' ', -40),
    (',', '\u{201D}', -120), (',', '\u{2019}', -120), (',', ' ', -40), ('d', 'd', -10),
    ('d', 'v', -15), ('d', 'w', -15), ('d', 'y', -15), ('e', ',', 10), ('e', '.', 20),
    ('e', 'v', -15), ('e', 'w', -15), ('e', 'x', -15), ('e', 'y', -15), ('f', ',', -10),
    ('f', 'e', -10), ('f', 'o', -20), ('f', '.', -10), ('f', '\u{201D}', 30), ('f', '\u{2019}', 30),
    ('g', 'e', 10), ('g', 'g', -10), ('h', 'y', -20), ('k', 'o', -15), ('l', 'w', -15),
    ('l', 'y', -15), ('m', 'u', -20), ('m', 'y', -30), ('n', 'u', -10), ('n', 'v', -40),
    ('n', 'y', -20), ('o', 'v', -20), ('o', 'w', -15), ('o', 'x', -30), ('o', 'y', -20),
    ('p', 'y', -15), ('.', '\u{201D}', -120), ('.', '\u{2019}', -120), ('.', ' ', -40),
    ('\u{201D}', ' ', -80), ('\u{2018}', '\u{2018}', -46), ('\u{2019}', 'd', -80),
    ('\u{2019}', 'l', -20), ('\u{2019}', '\u{2019}', -46), ('\u{2019}', 'r', -40),
    ('\u{2019}', 's', -60), ('\u{2019}', ' ', -80), ('\u{2019}', 'v', -20), ('r', 'c', -20),
    ('r', ',', -60), ('r', 'd', -20), ('r', 'g', -15), ('r', '-', -20), ('r', 'o', -20),
    ('r', '.', -60), ('r', 'q', -20), ('r', 's', -15), ('r', 't', 20), ('r', 'v', 10),
    ('r', 'y', 10), ('s', 'w', -15), (';', ' ', -40), (' ', 'T', -100), (' ', 'V', -80),
    (' ', 'W', -80), (' ', 'Y', -120), (' ', '\u{201C}', -80), (' ', '\u{2018}', -60),
    ('v', 'a', -20), ('v', ',', -80), ('v', 'o', -30), ('v', '.', -80), ('w', ',', -40),
    ('w', 'o', -20), ('w', '.', -40), ('x', 'e', -10), ('y', 'a', -30), ('y', ',', -80),
    ('y', 'e', -10), ('y', 'o', -25), ('y', '.', -80), ('z', 'e', 10),
];

impl StandardFont {
    pub fn base_font(self) -> &'static str {
        match self {
            StandardFont::Helvetica => "Helvetica",
            StandardFont::HelveticaBold => "Helvetica-Bold",
        }
    }

    /// Type1 font dictionary referencing the built-in font program.
    pub fn dictionary(self) -> Dictionary {
        dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => self.base_font(),
            "Encoding" => "WinAnsiEncoding",
        }
    }

    /// WinAnsi code of `ch`, or `None` when this font cannot show it.
    pub fn encode_char(ch: char) -> Option<u8> {
        match ch as u32 {
            0x20..=0x7E | 0xA0..=0xFF => Some(ch as u32 as u8),
            _ => WINANSI_EXTRAS.iter().find(|(c, ..)| *c == ch).map(|(_, code, ..)| *code),
        }
    }

    /// Encodes a whole string, reporting the first character that has no code.
    pub fn encode(text: &str) -> Result<Vec<u8>, char> {
        text.chars().map(|ch| Self::encode_char(ch).ok_or(ch)).collect()
    }

    fn glyph_width(self, code: u8) -> u16 {
        let (ascii, latin1) = match self {
            StandardFont::Helvetica => (&HELVETICA_ASCII, &HELVETICA_LATIN1),
            StandardFont::HelveticaBold => (&HELVETICA_BOLD_ASCII, &HELVETICA_BOLD_LATIN1),
        };
        match code {
            0x20..=0x7E => ascii[(code - 0x20) as usize],
            0xA0..=0xFF => latin1[(code - 0xA0) as usize],
            _ => WINANSI_EXTRAS
                .iter()
                .find(|(_, c, ..)| *c == code)
                .map(|&(_, _, regular, bold)| if self == StandardFont::Helvetica { regular } else { bold })
                .unwrap_or(0),
        }
    }

    /// Kerning adjustment between two adjacent codes. Accented letters kern
    /// like the letter they are built on.
    pub fn kerning(self, left: u8, right: u8) -> i16 {
        let (Some(left), Some(right)) = (decode(left), decode(right)) else { return 0 };
        let (left, right) = (kerning_base(left), kerning_base(right));
        let pairs: &[(char, char, i16)] = match self {
            StandardFont::Helvetica => &HELVETICA_KERNING,
            StandardFont::HelveticaBold => &HELVETICA_BOLD_KERNING,
        };
        pairs
            .iter()
            .find(|&&(l, r, _)| l == left && r == right)
            .map_or(0, |&(_, _, adjust)| adjust)
    }

    /// Advance width of already-encoded text at `size` points, kerned.
    pub fn width_of_encoded(self, encoded: &[u8], size: f32) -> f32 {
        let advance: i32 = encoded.iter().map(|&code| self.glyph_width(code) as i32).sum();
        let kerning: i32 = encoded.windows(2).map(|pair| self.kerning(pair[0], pair[1]) as i32).sum();
        (advance + kerning) as f32 * size / 1000.0
    }
}

fn decode(code: u8) -> Option<char> {
    match code {
        0x20..=0x7E | 0xA0..=0xFF => Some(code as char),
        _ => WINANSI_EXTRAS.iter().find(|(_, c, ..)| *c == code).map(|(ch, ..)| *ch),
    }
}

fn kerning_base(ch: char) -> char {
    match ch {
        'À'..='Å' => 'A',
        'Ç' => 'C',
        'È'..='Ë' => 'E',
        'Ì'..='Ï' => 'I',
        'Ñ' => 'N',
        'Ò'..='Ö' | 'Ø' => 'O',
        'Ù'..='Ü' => 'U',
        'Ý' | 'Ÿ' => 'Y',
        'Š' => 'S',
        'Ž' => 'Z',
        'à'..='å' => 'a',
        'ç' => 'c',
        'è'..='ë' => 'e',
        'ì'..='ï' => 'i',
        'ñ' => 'n',
        'ò'..='ö' | 'ø' => 'o',
        'ù'..='ü' => 'u',
        'ý' | 'ÿ' => 'y',
        'š' => 's',
        'ž' => 'z',
        _ => ch,
    }
}
