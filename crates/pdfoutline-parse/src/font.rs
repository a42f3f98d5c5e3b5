//! Font resources: text decoding, glyph advances and style flags.

use std::collections::HashMap;

use lopdf::{Dictionary, Document, Object};
use pdfoutline_core::SpanFlags;

use crate::cmap::ToUnicodeMap;
use crate::encoding::SimpleEncoding;
use crate::lopdf_backend::{number, resolve_ref};

/// Advance used for simple fonts without a `/Widths` entry.
const DEFAULT_SIMPLE_WIDTH: f64 = 500.0;
/// `/DW` default of CID fonts.
const DEFAULT_CID_WIDTH: f64 = 1000.0;

// Font descriptor /Flags bits.
const FIXED_PITCH: i64 = 1;
const SERIF: i64 = 1 << 1;
const ITALIC: i64 = 1 << 6;
const FORCE_BOLD: i64 = 1 << 18;

/// One decoded glyph of a shown string.
#[derive(Debug, Clone, PartialEq)]
pub struct Glyph {
    pub text: String,
    /// Horizontal advance in glyph space (thousandths of the font size).
    pub advance: f64,
    /// Single-byte code 32, the only code word spacing applies to.
    pub is_space: bool,
}

#[derive(Debug, Clone)]
enum Widths {
    Simple { first_char: u32, widths: Vec<f64>, missing: f64 },
    Cid { widths: HashMap<u32, f64>, default: f64 },
}

impl Widths {
    fn advance(&self, code: u32) -> f64 {
        match self {
            Widths::Simple { first_char, widths, missing } => code
                .checked_sub(*first_char)
                .and_then(|i| widths.get(i as usize))
                .copied()
                .unwrap_or(*missing),
            Widths::Cid { widths, default } => widths.get(&code).copied().unwrap_or(*default),
        }
    }
}

/// A font resource prepared for text extraction.
#[derive(Debug, Clone)]
pub struct FontInfo {
    /// `/BaseFont` without the subset prefix.
    pub base_name: String,
    pub flags: SpanFlags,
    two_byte: bool,
    to_unicode: Option<ToUnicodeMap>,
    encoding: SimpleEncoding,
    widths: Widths,
}

impl FontInfo {
    /// Used when a `Tf` names a font missing from the resources.
    pub fn fallback(resource_name: &str) -> Self {
        Self {
            base_name: resource_name.to_string(),
            flags: style_flags(resource_name, None),
            two_byte: false,
            to_unicode: None,
            encoding: SimpleEncoding::default(),
            widths: Widths::Simple {
                first_char: 0,
                widths: Vec::new(),
                missing: DEFAULT_SIMPLE_WIDTH,
            },
        }
    }

    pub fn load(doc: &Document, font: &Dictionary) -> Self {
        let raw_name = font
            .get(b"BaseFont")
            .ok()
            .and_then(|o| o.as_name().ok())
            .map(|n| String::from_utf8_lossy(n).into_owned())
            .unwrap_or_default();
        let base_name = strip_subset_prefix(&raw_name).to_string();

        let two_byte = font
            .get(b"Subtype")
            .ok()
            .and_then(|o| o.as_name().ok())
            .is_some_and(|n| n == b"Type0");

        let descendant = if two_byte {
            font.get(b"DescendantFonts")
                .ok()
                .map(|o| resolve_ref(doc, o))
                .and_then(|o| o.as_array().ok())
                .and_then(|arr| arr.first())
                .map(|o| resolve_ref(doc, o))
                .and_then(|o| o.as_dict().ok())
        } else {
            None
        };

        let descriptor = descendant
            .unwrap_or(font)
            .get(b"FontDescriptor")
            .ok()
            .map(|o| resolve_ref(doc, o))
            .and_then(|o| o.as_dict().ok());

        let to_unicode = load_to_unicode(doc, font);
        let encoding = if two_byte {
            SimpleEncoding::default()
        } else {
            load_encoding(doc, font)
        };
        let widths = match descendant {
            Some(cid_font) => cid_widths(doc, cid_font),
            None => simple_widths(doc, font, descriptor),
        };

        Self {
            flags: style_flags(&base_name, descriptor),
            base_name,
            two_byte,
            to_unicode,
            encoding,
            widths,
        }
    }

    pub fn is_two_byte(&self) -> bool {
        self.two_byte
    }

    /// Split a shown string into glyphs and decode each to text.
    pub fn decode(&self, bytes: &[u8]) -> Vec<Glyph> {
        let step = if self.two_byte { 2 } else { 1 };
        bytes
            .chunks(step)
            .map(|chunk| {
                let code = chunk.iter().fold(0u32, |acc, &b| (acc << 8) | u32::from(b));
                Glyph {
                    text: self.code_text(code),
                    advance: self.widths.advance(code),
                    is_space: !self.two_byte && code == 32,
                }
            })
            .collect()
    }

    fn code_text(&self, code: u32) -> String {
        if let Some(text) = self.to_unicode.as_ref().and_then(|m| m.lookup(code)) {
            return text.to_string();
        }
        if self.two_byte {
            // Identity encodings without a ToUnicode map often still carry
            // Unicode code points.
            return char::from_u32(code)
                .filter(|c| !c.is_control())
                .map(String::from)
                .unwrap_or_default();
        }
        u8::try_from(code)
            .ok()
            .and_then(|b| self.encoding.decode(b))
            .unwrap_or_default()
    }
}

/// Strip a `ABCDEF+` subset prefix from a font name.
pub fn strip_subset_prefix(name: &str) -> &str {
    match name.split_once('+') {
        Some((tag, rest)) if tag.len() == 6 && tag.bytes().all(|b| b.is_ascii_uppercase()) => rest,
        _ => name,
    }
}

/// Style flags from the font name and descriptor.
pub fn style_flags(base_name: &str, descriptor: Option<&Dictionary>) -> SpanFlags {
    let lower = base_name.to_ascii_lowercase();
    let mut flags = SpanFlags::empty();

    if ["bold", "black", "heavy", "semibold", "demi"]
        .iter()
        .any(|k| lower.contains(k))
    {
        flags |= SpanFlags::BOLD;
    }
    if lower.contains("italic") || lower.contains("oblique") {
        flags |= SpanFlags::ITALIC;
    }
    if ["courier", "mono", "consolas"].iter().any(|k| lower.contains(k)) {
        flags |= SpanFlags::MONOSPACE;
    }
    if !lower.contains("sans")
        && ["times", "serif", "georgia", "garamond", "cambria"]
            .iter()
            .any(|k| lower.contains(k))
    {
        flags |= SpanFlags::SERIF;
    }

    if let Some(desc) = descriptor {
        let bits = desc.get(b"Flags").ok().and_then(|o| o.as_i64().ok()).unwrap_or(0);
        if bits & FIXED_PITCH != 0 {
            flags |= SpanFlags::MONOSPACE;
        }
        if bits & SERIF != 0 {
            flags |= SpanFlags::SERIF;
        }
        if bits & ITALIC != 0 {
            flags |= SpanFlags::ITALIC;
        }
        if bits & FORCE_BOLD != 0 {
            flags |= SpanFlags::BOLD;
        }
        let weight = desc.get(b"FontWeight").ok().and_then(number).unwrap_or(0.0);
        if weight >= 600.0 {
            flags |= SpanFlags::BOLD;
        }
    }
    flags
}

fn load_to_unicode(doc: &Document, font: &Dictionary) -> Option<ToUnicodeMap> {
    let stream = font
        .get(b"ToUnicode")
        .ok()
        .map(|o| resolve_ref(doc, o))
        .and_then(|o| o.as_stream().ok())?;
    let data = stream
        .decompressed_content()
        .unwrap_or_else(|_| stream.content.clone());
    match ToUnicodeMap::parse(&data) {
        Ok(map) => Some(map),
        Err(e) => {
            tracing::warn!(error = %e, "ignoring unreadable ToUnicode map");
            None
        }
    }
}

/// WinAnsi base with `/Differences` applied. Other base encodings share
/// the ASCII range with WinAnsi, which is what headings need.
fn load_encoding(doc: &Document, font: &Dictionary) -> SimpleEncoding {
    let mut encoding = SimpleEncoding::default();
    let differences = font
        .get(b"Encoding")
        .ok()
        .map(|o| resolve_ref(doc, o))
        .and_then(|o| o.as_dict().ok())
        .and_then(|d| d.get(b"Differences").ok())
        .map(|o| resolve_ref(doc, o))
        .and_then(|o| o.as_array().ok());

    if let Some(items) = differences {
        let mut code: Option<u32> = None;
        for item in items {
            match item {
                Object::Integer(i) => code = u32::try_from(*i).ok(),
                Object::Name(name) => {
                    if let Some(c) = code {
                        if let Ok(byte) = u8::try_from(c) {
                            encoding.set_glyph(byte, &String::from_utf8_lossy(name));
                        }
                        code = Some(c + 1);
                    }
                }
                _ => {}
            }
        }
    }
    encoding
}

fn simple_widths(doc: &Document, font: &Dictionary, descriptor: Option<&Dictionary>) -> Widths {
    let first_char = font
        .get(b"FirstChar")
        .ok()
        .and_then(|o| o.as_i64().ok())
        .and_then(|v| u32::try_from(v).ok())
        .unwrap_or(0);
    let widths = font
        .get(b"Widths")
        .ok()
        .map(|o| resolve_ref(doc, o))
        .and_then(|o| o.as_array().ok())
        .map(|arr| {
            arr.iter()
                .map(|o| number(resolve_ref(doc, o)).unwrap_or(0.0))
                .collect()
        })
        .unwrap_or_default();
    let missing = descriptor
        .and_then(|d| d.get(b"MissingWidth").ok())
        .and_then(number)
        .filter(|w| *w > 0.0)
        .unwrap_or(DEFAULT_SIMPLE_WIDTH);
    Widths::Simple { first_char, widths, missing }
}

/// `/DW` and `/W` of a CID font. `/W` holds `c [w1 w2 ...]` and
/// `c_first c_last w` groups.
fn cid_widths(doc: &Document, cid_font: &Dictionary) -> Widths {
    let default = cid_font
        .get(b"DW")
        .ok()
        .and_then(|o| number(resolve_ref(doc, o)))
        .unwrap_or(DEFAULT_CID_WIDTH);
    let mut widths = HashMap::new();
    let items = cid_font
        .get(b"W")
        .ok()
        .map(|o| resolve_ref(doc, o))
        .and_then(|o| o.as_array().ok());

    if let Some(items) = items {
        let mut i = 0;
        while i + 1 < items.len() {
            let Some(first) = number(resolve_ref(doc, &items[i])).map(|v| v as u32) else {
                i += 1;
                continue;
            };
            match resolve_ref(doc, &items[i + 1]) {
                Object::Array(run) => {
                    for (offset, w) in run.iter().enumerate() {
                        if let Some(w) = number(resolve_ref(doc, w)) {
                            widths.insert(first + offset as u32, w);
                        }
                    }
                    i += 2;
                }
                other => {
                    let last = number(other).map(|v| v as u32);
                    let w = items.get(i + 2).and_then(|o| number(resolve_ref(doc, o)));
                    if let (Some(last), Some(w)) = (last, w) {
                        for cid in first..=last {
                            widths.insert(cid, w);
                        }
                    }
                    i += 3;
                }
            }
        }
    }
    Widths::Cid { widths, default }
}
