//! Single-byte text encodings for simple fonts.

use std::collections::HashMap;

/// Code points 0x80..=0x9F of WinAnsiEncoding. `None` marks undefined codes.
const WIN_ANSI_HIGH: [Option<char>; 32] = [
    Some('\u{20AC}'),
    None,
    Some('\u{201A}'),
    Some('\u{0192}'),
    Some('\u{201E}'),
    Some('\u{2026}'),
    Some('\u{2020}'),
    Some('\u{2021}'),
    Some('\u{02C6}'),
    Some('\u{2030}'),
    Some('\u{0160}'),
    Some('\u{2039}'),
    Some('\u{0152}'),
    None,
    Some('\u{017D}'),
    None,
    None,
    Some('\u{2018}'),
    Some('\u{2019}'),
    Some('\u{201C}'),
    Some('\u{201D}'),
    Some('\u{2022}'),
    Some('\u{2013}'),
    Some('\u{2014}'),
    Some('\u{02DC}'),
    Some('\u{2122}'),
    Some('\u{0161}'),
    Some('\u{203A}'),
    Some('\u{0153}'),
    None,
    Some('\u{017E}'),
    Some('\u{0178}'),
];

/// Decode one byte with WinAnsiEncoding; bytes outside 0x80..=0x9F follow Latin-1.
pub fn win_ansi_char(code: u8) -> Option<char> {
    match code {
        0x80..=0x9F => WIN_ANSI_HIGH[(code - 0x80) as usize],
        _ => Some(char::from(code)),
    }
}

/// WinAnsiEncoding with `/Differences` overrides applied.
#[derive(Debug, Clone, Default)]
pub struct SimpleEncoding {
    overrides: HashMap<u8, String>,
}

impl SimpleEncoding {
    /// Override one code with the text named by a glyph name. Unknown names
    /// leave the base mapping in place and return false.
    pub fn set_glyph(&mut self, code: u8, glyph_name: &str) -> bool {
        match glyph_text(glyph_name) {
            Some(text) => {
                self.overrides.insert(code, text);
                true
            }
            None => false,
        }
    }

    pub fn decode(&self, code: u8) -> Option<String> {
        match self.overrides.get(&code) {
            Some(text) => Some(text.clone()),
            None => win_ansi_char(code).map(String::from),
        }
    }
}

/// Text for an Adobe glyph name: `uniXXXX`, `uXXXX[XX]`, ligatures, single
/// characters and the common Latin names.
pub fn glyph_text(name: &str) -> Option<String> {
    let base = name.split('.').next().unwrap_or(name);
    if let Some(hex) = base.strip_prefix("uni") {
        if hex.len() >= 4 && hex.len() % 4 == 0 {
            let units = hex
                .as_bytes()
                .chunks(4)
                .map(|c| std::str::from_utf8(c).ok().and_then(|s| u16::from_str_radix(s, 16).ok()))
                .collect::<Option<Vec<u16>>>()?;
            return Some(String::from_utf16_lossy(&units));
        }
    }
    if let Some(hex) = base.strip_prefix('u') {
        if (4..=6).contains(&hex.len()) {
            if let Some(ch) = u32::from_str_radix(hex, 16).ok().and_then(char::from_u32) {
                return Some(ch.to_string());
            }
        }
    }
    let mut chars = base.chars();
    if let (Some(ch), None) = (chars.next(), chars.next()) {
        return Some(ch.to_string());
    }
    let text = match base {
        "ff" => "ff",
        "fi" => "fi",
        "fl" => "fl",
        "ffi" => "ffi",
        "ffl" => "ffl",
        _ => return named_char(base).map(String::from),
    };
    Some(text.to_string())
}

fn named_char(name: &str) -> Option<char> {
    let ch = match name {
        "space" | "nbspace" => ' ',
        "exclam" => '!',
        "quotedbl" => '"',
        "numbersign" => '#',
        "dollar" => '$',
        "percent" => '%',
        "ampersand" => '&',
        "quotesingle" => '\'',
        "parenleft" => '(',
        "parenright" => ')',
        "asterisk" => '*',
        "plus" => '+',
        "comma" => ',',
        "hyphen" | "minus" => '-',
        "period" => '.',
        "slash" => '/',
        "zero" => '0',
        "one" => '1',
        "two" => '2',
        "three" => '3',
        "four" => '4',
        "five" => '5',
        "six" => '6',
        "seven" => '7',
        "eight" => '8',
        "nine" => '9',
        "colon" => ':',
        "semicolon" => ';',
        "less" => '<',
        "equal" => '=',
        "greater" => '>',
        "question" => '?',
        "at" => '@',
        "bracketleft" => '[',
        "backslash" => '\\',
        "bracketright" => ']',
        "asciicircum" => '^',
        "underscore" => '_',
        "grave" => '`',
        "braceleft" => '{',
        "bar" => '|',
        "braceright" => '}',
        "asciitilde" => '~',
        "bullet" => '\u{2022}',
        "endash" => '\u{2013}',
        "emdash" => '\u{2014}',
        "quoteleft" => '\u{2018}',
        "quoteright" => '\u{2019}',
        "quotedblleft" => '\u{201C}',
        "quotedblright" => '\u{201D}',
        "quotesinglbase" => '\u{201A}',
        "quotedblbase" => '\u{201E}',
        "ellipsis" => '\u{2026}',
        "dagger" => '\u{2020}',
        "daggerdbl" => '\u{2021}',
        "trademark" => '\u{2122}',
        "copyright" => '\u{00A9}',
        "registered" => '\u{00AE}',
        "degree" => '\u{00B0}',
        "section" => '\u{00A7}',
        "paragraph" => '\u{00B6}',
        "periodcentered" => '\u{00B7}',
        "Euro" => '\u{20AC}',
        "sterling" => '\u{00A3}',
        "yen" => '\u{00A5}',
        "cent" => '\u{00A2}',
        "multiply" => '\u{00D7}',
        "divide" => '\u{00F7}',
        "AE" => '\u{00C6}',
        "ae" => '\u{00E6}',
        "OE" => '\u{0152}',
        "oe" => '\u{0153}',
        "germandbls" => '\u{00DF}',
        "dotlessi" => '\u{0131}',
        "oslash" => '\u{00F8}',
        _ => return accented(name),
    };
    Some(ch)
}

/// Latin letters with a diacritic suffix, e.g. `eacute` or `Udieresis`.
fn accented(name: &str) -> Option<char> {
    const MARKS: [(&str, char); 9] = [
        ("acute", '\u{0301}'),
        ("grave", '\u{0300}'),
        ("circumflex", '\u{0302}'),
        ("dieresis", '\u{0308}'),
        ("tilde", '\u{0303}'),
        ("cedilla", '\u{0327}'),
        ("ring", '\u{030A}'),
        ("caron", '\u{030C}'),
        ("slash", '\u{0338}'),
    ];
    let mut chars = name.chars();
    let letter = chars.next().filter(char::is_ascii_alphabetic)?;
    let suffix = chars.as_str();
    let (_, mark) = MARKS.iter().find(|(m, _)| *m == suffix)?;
    compose(letter, *mark)
}

/// Precomposed forms of the accented letters the standard encodings use.
/// `PRECOMPOSED` and `DECOMPOSED` are index-aligned.
fn compose(letter: char, mark: char) -> Option<char> {
    const PRECOMPOSED: &str = "ÀÁÂÃÄÅÇÈÉÊËÌÍÎÏÑÒÓÔÕÖÙÚÛÜÝàáâãäåçèéêëìíîïñòóôõöùúûüýÿŸŠšŽžØ";
    const DECOMPOSED: [(char, char); 59] = [
        ('A', '\u{0300}'), ('A', '\u{0301}'), ('A', '\u{0302}'), ('A', '\u{0303}'),
        ('A', '\u{0308}'), ('A', '\u{030A}'), ('C', '\u{0327}'), ('E', '\u{0300}'),
        ('E', '\u{0301}'), ('E', '\u{0302}'), ('E', '\u{0308}'), ('I', '\u{0300}'),
        ('I', '\u{0301}'), ('I', '\u{0302}'), ('I', '\u{0308}'), ('N', '\u{0303}'),
        ('O', '\u{0300}'), ('O', '\u{0301}'), ('O', '\u{0302}'), ('O', '\u{0303}'),
        ('O', '\u{0308}'), ('U', '\u{0300}'), ('U', '\u{0301}'), ('U', '\u{0302}'),
        ('U', '\u{0308}'), ('Y', '\u{0301}'), ('a', '\u{0300}'), ('a', '\u{0301}'),
        ('a', '\u{0302}'), ('a', '\u{0303}'), ('a', '\u{0308}'), ('a', '\u{030A}'),
        ('c', '\u{0327}'), ('e', '\u{0300}'), ('e', '\u{0301}'), ('e', '\u{0302}'),
        ('e', '\u{0308}'), ('i', '\u{0300}'), ('i', '\u{0301}'), ('i', '\u{0302}'),
        ('i', '\u{0308}'), ('n', '\u{0303}'), ('o', '\u{0300}'), ('o', '\u{0301}'),
        ('o', '\u{0302}'), ('o', '\u{0303}'), ('o', '\u{0308}'), ('u', '\u{0300}'),
        ('u', '\u{0301}'), ('u', '\u{0302}'), ('u', '\u{0308}'), ('y', '\u{0301}'),
        ('y', '\u{0308}'), ('Y', '\u{0308}'), ('S', '\u{030C}'), ('s', '\u{030C}'),
        ('Z', '\u{030C}'), ('z', '\u{030C}'), ('O', '\u{0338}'),
    ];
    let index = DECOMPOSED.iter().position(|&(l, m)| l == letter && m == mark)?;
    PRECOMPOSED.chars().nth(index)
}
