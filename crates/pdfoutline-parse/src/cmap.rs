//! `/ToUnicode` CMap parsing.
//!
//! Only the `bfchar` and `bfrange` sections matter for text extraction;
//! codespace ranges are inferred from the width of the source hex codes.

use std::collections::HashMap;

use crate::error::BackendError;

/// Most codes a single incrementing `bfrange` entry may expand to.
const MAX_RANGE_SPAN: u32 = 0xFFFF;

/// Character code to Unicode mapping read from a `/ToUnicode` stream.
#[derive(Debug, Clone, Default)]
pub struct ToUnicodeMap {
    mappings: HashMap<u32, String>,
    code_bytes: usize,
}

impl ToUnicodeMap {
    pub fn parse(data: &[u8]) -> Result<Self, BackendError> {
        let text = String::from_utf8_lossy(data);
        let mut map = ToUnicodeMap::default();

        for section in sections(&text, "beginbfchar", "endbfchar") {
            map.parse_bfchar(section)?;
        }
        for section in sections(&text, "beginbfrange", "endbfrange") {
            map.parse_bfrange(section)?;
        }
        Ok(map)
    }

    pub fn lookup(&self, code: u32) -> Option<&str> {
        self.mappings.get(&code).map(String::as_str)
    }

    /// Width in bytes of the source codes seen in the map (1 when unknown).
    pub fn code_bytes(&self) -> usize {
        self.code_bytes.max(1)
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    fn note_code_width(&mut self, hex: &str) {
        self.code_bytes = self.code_bytes.max(hex.len().div_ceil(2));
    }

    /// `<src> <dst>` pairs.
    fn parse_bfchar(&mut self, section: &str) -> Result<(), BackendError> {
        let tokens = hex_tokens(section);
        for pair in tokens.chunks_exact(2) {
            self.note_code_width(pair[0]);
            let code = parse_hex_code(pair[0])?;
            self.mappings.insert(code, decode_utf16be_hex(pair[1])?);
        }
        Ok(())
    }

    /// `<lo> <hi> <dst>` or `<lo> <hi> [<dst0> <dst1> ...]` entries.
    fn parse_bfrange(&mut self, section: &str) -> Result<(), BackendError> {
        let mut rest = section;
        loop {
            let Some((lo, after)) = next_hex(rest) else {
                break;
            };
            let Some((hi, after)) = next_hex(after) else {
                break;
            };
            self.note_code_width(lo);
            let lo_code = parse_hex_code(lo)?;
            let hi_code = parse_hex_code(hi)?.min(max_code(lo));

            let after = after.trim_start();
            if let Some(array_body) = after.strip_prefix('[') {
                let end = array_body.find(']').ok_or_else(|| {
                    BackendError::Font("unterminated array in bfrange".to_string())
                })?;
                for (offset, dst) in hex_tokens(&array_body[..end]).into_iter().enumerate() {
                    let code = u32::try_from(offset)
                        .ok()
                        .and_then(|offset| lo_code.checked_add(offset));
                    let Some(code) = code.filter(|&code| code <= hi_code) else {
                        break;
                    };
                    self.mappings.insert(code, decode_utf16be_hex(dst)?);
                }
                rest = &array_body[end + 1..];
            } else {
                let Some((dst, after)) = next_hex(after) else {
                    break;
                };
                let base = decode_utf16be_hex(dst)?;
                let mut span = hi_code.saturating_sub(lo_code);
                if span > MAX_RANGE_SPAN {
                    tracing::warn!(
                        lo = %lo,
                        hi = %hi,
                        "bfrange too wide, keeping the first {} codes",
                        MAX_RANGE_SPAN + 1
                    );
                    span = MAX_RANGE_SPAN;
                }
                for offset in 0..=span {
                    self.mappings
                        .insert(lo_code + offset, increment_last_char(&base, offset));
                }
                rest = after;
            }
        }
        Ok(())
    }
}

fn sections<'a>(text: &'a str, begin: &str, end: &str) -> Vec<&'a str> {
    let mut out = Vec::new();
    let mut search_from = 0;
    while let Some(start) = text[search_from..].find(begin) {
        let body_start = search_from + start + begin.len();
        let Some(len) = text[body_start..].find(end) else {
            break;
        };
        out.push(&text[body_start..body_start + len]);
        search_from = body_start + len + end.len();
    }
    out
}

/// The next `<...>` token and the text after it.
fn next_hex(text: &str) -> Option<(&str, &str)> {
    let trimmed = text.trim_start();
    let body = trimmed.strip_prefix('<')?;
    let end = body.find('>')?;
    Some((body[..end].trim(), &body[end + 1..]))
}

fn hex_tokens(text: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut rest = text;
    while let Some(start) = rest.find('<') {
        let body = &rest[start + 1..];
        let Some(end) = body.find('>') else {
            break;
        };
        tokens.push(body[..end].trim());
        rest = &body[end + 1..];
    }
    tokens
}

fn parse_hex_code(hex: &str) -> Result<u32, BackendError> {
    u32::from_str_radix(hex, 16)
        .map_err(|e| BackendError::Font(format!("invalid CMap code <{hex}>: {e}")))
}

/// Largest code expressible in the width of `hex`.
fn max_code(hex: &str) -> u32 {
    match hex.len().div_ceil(2) {
        0 | 1 => 0xFF,
        2 => 0xFFFF,
        3 => 0xFF_FFFF,
        _ => u32::MAX,
    }
}

/// Decode a hex string holding UTF-16BE code units. Two-digit values are
/// single code units written without padding.
fn decode_utf16be_hex(hex: &str) -> Result<String, BackendError> {
    let hex: String = hex.chars().filter(|c| !c.is_whitespace()).collect();
    let padded = if hex.len() <= 2 {
        format!("{hex:0>4}")
    } else {
        hex
    };
    let units = padded
        .as_bytes()
        .chunks(4)
        .map(|chunk| {
            let s = std::str::from_utf8(chunk)
                .map_err(|_| BackendError::Font("non-ASCII CMap value".to_string()))?;
            u16::from_str_radix(s, 16)
                .map_err(|e| BackendError::Font(format!("invalid CMap value <{s}>: {e}")))
        })
        .collect::<Result<Vec<u16>, _>>()?;
    Ok(String::from_utf16_lossy(&units))
}

fn increment_last_char(base: &str, offset: u32) -> String {
    if offset == 0 {
        return base.to_string();
    }
    let mut chars: Vec<char> = base.chars().collect();
    if let Some(last) = chars.last_mut() {
        *last = (*last as u32)
            .checked_add(offset)
            .and_then(char::from_u32)
            .unwrap_or('\u{FFFD}');
    }
    chars.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &[u8] = b"/CIDInit /ProcSet findresource begin
12 dict begin
begincmap
1 begincodespacerange <0000> <FFFF> endcodespacerange
2 beginbfchar
<0003> <0020>
<0011> <0041>
endbfchar
2 beginbfrange
<0020> <0022> <0061>
<0030> <0031> [<0066006C> <00E9>]
endbfrange
endcmap";

    #[test]
    fn parses_bfchar_entries() {
        let map = ToUnicodeMap::parse(SAMPLE).unwrap();
        assert_eq!(map.lookup(0x03), Some(" "));
        assert_eq!(map.lookup(0x11), Some("A"));
        assert_eq!(map.code_bytes(), 2);
    }

    #[test]
    fn parses_incrementing_bfrange() {
        let map = ToUnicodeMap::parse(SAMPLE).unwrap();
        assert_eq!(map.lookup(0x20), Some("a"));
        assert_eq!(map.lookup(0x22), Some("c"));
        assert_eq!(map.lookup(0x23), None);
    }

    #[test]
    fn parses_array_bfrange_with_ligature() {
        let map = ToUnicodeMap::parse(SAMPLE).unwrap();
        assert_eq!(map.lookup(0x30), Some("fl"));
        assert_eq!(map.lookup(0x31), Some("é"));
        assert_eq!(map.len(), 7);
    }

    #[test]
    fn single_byte_codes_and_unpadded_values() {
        let map = ToUnicodeMap::parse(b"1 beginbfchar <41> <42> endbfchar").unwrap();
        assert_eq!(map.lookup(0x41), Some("B"));
        assert_eq!(map.code_bytes(), 1);
    }

    #[test]
    fn empty_stream_gives_empty_map() {
        let map = ToUnicodeMap::parse(b"").unwrap();
        assert!(map.is_empty());
        assert_eq!(map.code_bytes(), 1);
    }

    #[test]
    fn surrogate_pairs_decode() {
        let map = ToUnicodeMap::parse(b"beginbfchar <01> <D835DC00> endbfchar").unwrap();
        assert_eq!(map.lookup(1), Some("\u{1D400}"));
    }

    #[test]
    fn bad_hex_is_a_font_error() {
        let err = ToUnicodeMap::parse(b"beginbfchar <zz> <0041> endbfchar").unwrap_err();
        assert!(matches!(err, BackendError::Font(_)));
    }

    #[test]
    fn array_bfrange_at_top_of_code_space_stops_cleanly() {
        let map =
            ToUnicodeMap::parse(b"beginbfrange <FFFFFFFF> <FFFFFFFF> [<0041> <0042>] endbfrange")
                .unwrap();
        assert_eq!(map.lookup(u32::MAX), Some("A"));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn incrementing_past_last_char_gives_replacement() {
        assert_eq!(increment_last_char("\u{10FFFF}", 1), "\u{FFFD}");
        assert_eq!(increment_last_char("a", u32::MAX), "\u{FFFD}");
    }

    #[test]
    fn huge_bfrange_is_clamped() {
        let map = ToUnicodeMap::parse(b"beginbfrange <00000000> <FFFFFFFF> <0041> endbfrange").unwrap();
        assert_eq!(map.len(), MAX_RANGE_SPAN as usize + 1);
        assert_eq!(map.lookup(0), Some("A"));
        assert_eq!(map.lookup(MAX_RANGE_SPAN + 1), None);
    }

    #[test]
    fn bfrange_is_bounded_by_code_width() {
        let map = ToUnicodeMap::parse(b"beginbfrange <00> <FFFF> <0041> endbfrange").unwrap();
        assert_eq!(map.len(), 256);
        assert_eq!(map.lookup(0x100), None);
    }
}
