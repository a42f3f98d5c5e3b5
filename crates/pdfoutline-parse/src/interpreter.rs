//! Content stream interpreter for text extraction.
//!
//! Tracks the graphics state (`q`, `Q`, `cm`) and text state operators and
//! reports every shown string to a [`TextHandler`] as a positioned
//! [`TextRun`]. Path, image and colour operators are ignored; form XObjects
//! are interpreted recursively.

use std::collections::HashMap;

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object};

use crate::error::BackendError;
use crate::font::FontInfo;
use crate::handler::{TextHandler, TextRun};
use crate::lopdf_backend::{number, resolve_ref, stream_bytes};
use crate::options::ExtractOptions;

/// An affine transform `[a b c d e f]` in PDF row-vector convention.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Default for Matrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Matrix {
    pub const IDENTITY: Matrix = Matrix { a: 1.0, b: 0.0, c: 0.0, d: 1.0, e: 0.0, f: 0.0 };

    pub fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self { a, b, c, d, e, f }
    }

    pub fn translation(tx: f64, ty: f64) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, tx, ty)
    }

    /// `self × other`: apply `self` first, then `other`.
    pub fn then(&self, other: &Matrix) -> Matrix {
        Matrix {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            e: self.e * other.a + self.f * other.c + other.e,
            f: self.e * other.b + self.f * other.d + other.f,
        }
    }

    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        (self.a * x + self.c * y + self.e, self.b * x + self.d * y + self.f)
    }

    /// Length of the transformed unit y vector.
    pub fn vertical_scale(&self) -> f64 {
        self.c.hypot(self.d)
    }

    fn from_operands(operands: &[Object]) -> Option<Matrix> {
        let v: Vec<f64> = operands.iter().take(6).map(number).collect::<Option<_>>()?;
        (v.len() == 6).then(|| Matrix::new(v[0], v[1], v[2], v[3], v[4], v[5]))
    }
}

/// State saved by `q` and restored by `Q`.
#[derive(Debug, Clone)]
struct GraphicsState {
    ctm: Matrix,
    font: Option<String>,
    font_size: f64,
    char_spacing: f64,
    word_spacing: f64,
    h_scaling: f64,
    leading: f64,
    rise: f64,
}

impl Default for GraphicsState {
    fn default() -> Self {
        Self {
            ctm: Matrix::IDENTITY,
            font: None,
            font_size: 0.0,
            char_spacing: 0.0,
            word_spacing: 0.0,
            h_scaling: 1.0,
            leading: 0.0,
            rise: 0.0,
        }
    }
}

struct Interpreter<'a> {
    doc: &'a Document,
    options: &'a ExtractOptions,
    handler: &'a mut dyn TextHandler,
    state: GraphicsState,
    stack: Vec<GraphicsState>,
    text_matrix: Matrix,
    line_matrix: Matrix,
}

/// Interpret a page (or form) content stream and report its text runs.
pub fn interpret_content(
    doc: &Document,
    content: &[u8],
    resources: &Dictionary,
    options: &ExtractOptions,
    handler: &mut dyn TextHandler,
) -> Result<(), BackendError> {
    let mut interpreter = Interpreter {
        doc,
        options,
        handler,
        state: GraphicsState::default(),
        stack: Vec::new(),
        text_matrix: Matrix::IDENTITY,
        line_matrix: Matrix::IDENTITY,
    };
    interpreter.run(content, resources, 0)
}

impl Interpreter<'_> {
    fn run(&mut self, content: &[u8], resources: &Dictionary, depth: usize) -> Result<(), BackendError> {
        let operations = Content::decode(content)
            .map_err(|e| BackendError::Parse(format!("failed to decode content stream: {e}")))?
            .operations;
        let mut fonts: HashMap<String, FontInfo> = HashMap::new();

        for op in &operations {
            self.execute(op, resources, &mut fonts, depth)?;
        }
        Ok(())
    }

    fn execute(
        &mut self,
        op: &Operation,
        resources: &Dictionary,
        fonts: &mut HashMap<String, FontInfo>,
        depth: usize,
    ) -> Result<(), BackendError> {
        let operands = op.operands.as_slice();
        match op.operator.as_str() {
            "q" => self.stack.push(self.state.clone()),
            "Q" => {
                if let Some(saved) = self.stack.pop() {
                    self.state = saved;
                }
            }
            "cm" => {
                if let Some(m) = Matrix::from_operands(operands) {
                    self.state.ctm = m.then(&self.state.ctm);
                }
            }
            "BT" => {
                self.text_matrix = Matrix::IDENTITY;
                self.line_matrix = Matrix::IDENTITY;
            }
            "ET" => {}
            "Tf" => {
                if let (Some(Object::Name(name)), Some(size)) =
                    (operands.first(), operands.get(1).and_then(number))
                {
                    let name = String::from_utf8_lossy(name).into_owned();
                    if !fonts.contains_key(&name) {
                        let info = self.load_font(resources, &name);
                        fonts.insert(name.clone(), info);
                    }
                    self.state.font = Some(name);
                    self.state.font_size = size;
                }
            }
            "Tc" => set_number(operands, &mut self.state.char_spacing),
            "Tw" => set_number(operands, &mut self.state.word_spacing),
            "Tz" => {
                if let Some(v) = operands.first().and_then(number) {
                    self.state.h_scaling = v / 100.0;
                }
            }
            "TL" => set_number(operands, &mut self.state.leading),
            "Ts" => set_number(operands, &mut self.state.rise),
            "Td" => {
                if let (Some(tx), Some(ty)) = (operand(operands, 0), operand(operands, 1)) {
                    self.move_line(tx, ty);
                }
            }
            "TD" => {
                if let (Some(tx), Some(ty)) = (operand(operands, 0), operand(operands, 1)) {
                    self.state.leading = -ty;
                    self.move_line(tx, ty);
                }
            }
            "Tm" => {
                if let Some(m) = Matrix::from_operands(operands) {
                    self.text_matrix = m;
                    self.line_matrix = m;
                }
            }
            "T*" => self.next_line(),
            "Tj" => {
                if matches!(operands.first(), Some(Object::String(..))) {
                    self.show(&operands[..1], fonts);
                }
            }
            "TJ" => {
                if let Some(Object::Array(items)) = operands.first() {
                    self.show(items, fonts);
                }
            }
            "'" => {
                self.next_line();
                if matches!(operands.first(), Some(Object::String(..))) {
                    self.show(&operands[..1], fonts);
                }
            }
            "\"" => {
                if operands.len() >= 3 {
                    set_number(&operands[0..1], &mut self.state.word_spacing);
                    set_number(&operands[1..2], &mut self.state.char_spacing);
                    self.next_line();
                    self.show(&operands[2..3], fonts);
                }
            }
            "Do" => {
                if let Some(Object::Name(name)) = operands.first() {
                    self.draw_xobject(resources, name, depth)?;
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn move_line(&mut self, tx: f64, ty: f64) {
        self.line_matrix = Matrix::translation(tx, ty).then(&self.line_matrix);
        self.text_matrix = self.line_matrix;
    }

    fn next_line(&mut self) {
        let leading = self.state.leading;
        self.move_line(0.0, -leading);
    }

    fn load_font(&self, resources: &Dictionary, name: &str) -> FontInfo {
        let dict = resources
            .get(b"Font")
            .ok()
            .map(|o| resolve_ref(self.doc, o))
            .and_then(|o| o.as_dict().ok())
            .and_then(|fonts| fonts.get(name.as_bytes()).ok())
            .map(|o| resolve_ref(self.doc, o))
            .and_then(|o| o.as_dict().ok());
        match dict {
            Some(dict) => FontInfo::load(self.doc, dict),
            None => {
                tracing::warn!(font = name, "font resource not found, using defaults");
                FontInfo::fallback(name)
            }
        }
    }

    /// Show a `TJ`-style sequence of strings and numeric adjustments as one run.
    fn show(&mut self, items: &[Object], fonts: &HashMap<String, FontInfo>) {
        let fallback;
        let font = match self.state.font.as_ref().and_then(|name| fonts.get(name)) {
            Some(font) => font,
            None => {
                fallback = FontInfo::fallback("");
                &fallback
            }
        };
        let size = self.state.font_size;
        let h_scaling = self.state.h_scaling;

        let start = self.rendering_matrix();
        let mut text = String::new();

        for item in items {
            match item {
                Object::String(bytes, _) => {
                    for glyph in font.decode(bytes) {
                        text.push_str(&glyph.text);
                        let mut advance = glyph.advance / 1000.0 * size + self.state.char_spacing;
                        if glyph.is_space {
                            advance += self.state.word_spacing;
                        }
                        self.advance(advance * h_scaling);
                    }
                }
                other => {
                    if let Some(adjust) = number(other) {
                        if -adjust > self.options.word_gap_thousandths && !text.ends_with(' ') {
                            text.push(' ');
                        }
                        self.advance(-adjust / 1000.0 * size * h_scaling);
                    }
                }
            }
        }

        let end = self.rendering_matrix();
        let font_size = size.abs() * start.vertical_scale();
        if font_size <= 0.0 || text.trim().is_empty() {
            return;
        }
        let (x0, baseline) = start.apply(0.0, 0.0);
        let (x1, _) = end.apply(0.0, 0.0);
        self.handler.on_run(TextRun {
            text,
            x: x0.min(x1),
            baseline,
            width: (x1 - x0).abs(),
            font_size,
            flags: font.flags,
        });
    }

    fn advance(&mut self, tx: f64) {
        self.text_matrix = Matrix::translation(tx, 0.0).then(&self.text_matrix);
    }

    /// Text space to device space, without the font size scaling so that
    /// the origin maps to the current glyph origin.
    fn rendering_matrix(&self) -> Matrix {
        Matrix::new(self.state.h_scaling, 0.0, 0.0, 1.0, 0.0, self.state.rise)
            .then(&self.text_matrix)
            .then(&self.state.ctm)
    }

    fn draw_xobject(&mut self, resources: &Dictionary, name: &[u8], depth: usize) -> Result<(), BackendError> {
        if depth >= self.options.max_form_depth {
            tracing::warn!(depth, "form XObject nesting too deep, skipping");
            return Ok(());
        }
        let stream = resources
            .get(b"XObject")
            .ok()
            .map(|o| resolve_ref(self.doc, o))
            .and_then(|o| o.as_dict().ok())
            .and_then(|xobjects| xobjects.get(name).ok())
            .map(|o| resolve_ref(self.doc, o))
            .and_then(|o| o.as_stream().ok());
        let Some(stream) = stream else {
            return Ok(());
        };
        let is_form = stream
            .dict
            .get(b"Subtype")
            .ok()
            .and_then(|o| o.as_name().ok())
            .is_some_and(|n| n == b"Form");
        if !is_form {
            return Ok(());
        }

        let form_resources = stream
            .dict
            .get(b"Resources")
            .ok()
            .map(|o| resolve_ref(self.doc, o))
            .and_then(|o| o.as_dict().ok())
            .unwrap_or(resources);
        let content = stream_bytes(stream)?;

        self.stack.push(self.state.clone());
        let saved_text = (self.text_matrix, self.line_matrix);
        if let Some(m) = stream.dict.get(b"Matrix").ok().and_then(|o| o.as_array().ok()) {
            if let Some(m) = Matrix::from_operands(m) {
                self.state.ctm = m.then(&self.state.ctm);
            }
        }
        let result = self.run(&content, form_resources, depth + 1);
        if let Some(saved) = self.stack.pop() {
            self.state = saved;
        }
        (self.text_matrix, self.line_matrix) = saved_text;
        result
    }
}

fn operand(operands: &[Object], index: usize) -> Option<f64> {
    operands.get(index).and_then(number)
}

fn set_number(operands: &[Object], target: &mut f64) {
    if let Some(v) = operand(operands, 0) {
        *target = v;
    }
}
