//! lopdf-based PDF parsing backend.

use std::collections::HashSet;
use std::path::Path;
use std::sync::LazyLock;

use lopdf::{Dictionary, Document, Object, ObjectId, Stream};

use crate::backend::{MediaBox, PdfBackend};
use crate::error::BackendError;
use crate::handler::TextHandler;
use crate::interpreter::interpret_content;
use crate::options::ExtractOptions;

/// A parsed PDF document backed by lopdf.
pub struct LopdfDocument {
    inner: Document,
    /// Page object ids in page order.
    page_ids: Vec<ObjectId>,
}

impl LopdfDocument {
    pub fn inner(&self) -> &Document {
        &self.inner
    }
}

impl std::fmt::Debug for LopdfDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LopdfDocument")
            .field("page_count", &self.page_ids.len())
            .finish_non_exhaustive()
    }
}

/// A page of a [`LopdfDocument`].
#[derive(Debug, Clone, Copy)]
pub struct LopdfPage {
    pub object_id: ObjectId,
    /// 0-based page index.
    pub index: usize,
}

/// The lopdf-based PDF backend.
pub struct LopdfBackend;

impl LopdfBackend {
    /// Read and parse a PDF file.
    pub fn open_file(path: impl AsRef<Path>) -> Result<LopdfDocument, BackendError> {
        let bytes = std::fs::read(path)?;
        <Self as PdfBackend>::open(&bytes)
    }
}

impl PdfBackend for LopdfBackend {
    type Document = LopdfDocument;
    type Page = LopdfPage;
    type Error = BackendError;

    fn open(bytes: &[u8]) -> Result<LopdfDocument, BackendError> {
        let inner = Document::load_mem(bytes)
            .map_err(|e| BackendError::Parse(format!("failed to parse PDF: {e}")))?;
        if inner.is_encrypted() {
            return Err(BackendError::Encrypted);
        }
        let page_ids = inner.get_pages().into_values().collect();
        Ok(LopdfDocument { inner, page_ids })
    }

    fn page_count(doc: &LopdfDocument) -> usize {
        doc.page_ids.len()
    }

    fn get_page(doc: &LopdfDocument, index: usize) -> Result<LopdfPage, BackendError> {
        let object_id = doc.page_ids.get(index).copied().ok_or_else(|| {
            BackendError::Parse(format!(
                "page index {index} out of range (0..{})",
                doc.page_ids.len()
            ))
        })?;
        Ok(LopdfPage { object_id, index })
    }

    fn page_media_box(doc: &LopdfDocument, page: &LopdfPage) -> Result<MediaBox, BackendError> {
        let obj = resolve_inherited(&doc.inner, page.object_id, b"MediaBox")?
            .ok_or_else(|| BackendError::Parse("MediaBox not found on page or ancestors".into()))?;
        let array = resolve_ref(&doc.inner, obj)
            .as_array()
            .map_err(|e| BackendError::Parse(format!("MediaBox is not an array: {e}")))?;
        let values: Vec<f64> = array
            .iter()
            .map(|o| number(resolve_ref(&doc.inner, o)))
            .collect::<Option<_>>()
            .ok_or_else(|| BackendError::Parse("MediaBox holds a non-number".into()))?;
        match values.as_slice() {
            [x0, y0, x1, y1] => Ok(MediaBox::new(*x0, *y0, *x1, *y1)),
            _ => Err(BackendError::Parse(format!(
                "expected 4-element MediaBox, got {}",
                values.len()
            ))),
        }
    }

    fn interpret_page(
        doc: &LopdfDocument,
        page: &LopdfPage,
        handler: &mut dyn TextHandler,
        options: &ExtractOptions,
    ) -> Result<(), BackendError> {
        let page_dict = doc
            .inner
            .get_object(page.object_id)
            .and_then(Object::as_dict)
            .map_err(|e| BackendError::Parse(format!("failed to get page dictionary: {e}")))?;
        let content = page_content_bytes(&doc.inner, page_dict)?;
        if content.is_empty() {
            return Ok(());
        }
        let resources = page_resources(&doc.inner, page.object_id)?;
        interpret_content(&doc.inner, &content, resources, options, handler)
    }
}

/// Numeric value of an integer or real object.
pub(crate) fn number(obj: &Object) -> Option<f64> {
    match obj {
        Object::Integer(i) => Some(*i as f64),
        Object::Real(f) => Some(f64::from(*f)),
        _ => None,
    }
}

/// Follow one indirect reference; broken references resolve to themselves.
pub(crate) fn resolve_ref<'a>(doc: &'a Document, obj: &'a Object) -> &'a Object {
    match obj {
        Object::Reference(id) => doc.get_object(*id).unwrap_or(obj),
        _ => obj,
    }
}

/// Stream data, decompressed when the stream declares a filter.
pub(crate) fn stream_bytes(stream: &Stream) -> Result<Vec<u8>, BackendError> {
    if stream.dict.get(b"Filter").is_ok() {
        stream
            .decompressed_content()
            .map_err(|e| BackendError::Parse(format!("failed to decompress content stream: {e}")))
    } else {
        Ok(stream.content.clone())
    }
}

/// Look up a page attribute, walking up the page tree via `/Parent`.
fn resolve_inherited<'a>(
    doc: &'a Document,
    page_id: ObjectId,
    key: &[u8],
) -> Result<Option<&'a Object>, BackendError> {
    let mut current_id = page_id;
    let mut visited = HashSet::new();
    loop {
        if !visited.insert(current_id) {
            return Err(BackendError::Parse(format!(
                "cyclic /Parent chain at object {} {}",
                current_id.0, current_id.1
            )));
        }
        let dict = doc
            .get_object(current_id)
            .and_then(Object::as_dict)
            .map_err(|e| BackendError::Parse(format!("failed to get page dictionary: {e}")))?;
        if let Ok(value) = dict.get(key) {
            return Ok(Some(value));
        }
        match dict.get(b"Parent") {
            Ok(parent) => {
                current_id = parent
                    .as_reference()
                    .map_err(|e| BackendError::Parse(format!("invalid /Parent reference: {e}")))?;
            }
            Err(_) => return Ok(None),
        }
    }
}

/// Concatenated `/Contents` streams of a page.
fn page_content_bytes(doc: &Document, page_dict: &Dictionary) -> Result<Vec<u8>, BackendError> {
    let Ok(contents) = page_dict.get(b"Contents") else {
        return Ok(Vec::new());
    };
    match resolve_ref(doc, contents) {
        Object::Stream(stream) => stream_bytes(stream),
        Object::Array(items) => {
            let mut content = Vec::new();
            for item in items {
                let stream = resolve_ref(doc, item).as_stream().map_err(|e| {
                    BackendError::Parse(format!("/Contents array item is not a stream: {e}"))
                })?;
                if !content.is_empty() {
                    content.push(b'\n');
                }
                content.extend_from_slice(&stream_bytes(stream)?);
            }
            Ok(content)
        }
        _ => Err(BackendError::Parse(
            "/Contents is not a stream or array".to_string(),
        )),
    }
}

fn page_resources(doc: &Document, page_id: ObjectId) -> Result<&Dictionary, BackendError> {
    static EMPTY: LazyLock<Dictionary> = LazyLock::new(Dictionary::new);
    match resolve_inherited(doc, page_id, b"Resources")? {
        Some(obj) => resolve_ref(doc, obj)
            .as_dict()
            .map_err(|_| BackendError::Parse("/Resources is not a dictionary".to_string())),
        None => Ok(&EMPTY),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::TextRun;
    use lopdf::dictionary;

    fn build_pdf(pages: &[&[u8]], inherit_media_box: bool) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut kids: Vec<Object> = Vec::new();
        for content in pages {
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.to_vec()));
            let mut page = dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            };
            if !inherit_media_box {
                page.set("MediaBox", vec![0.into(), 0.into(), 612.into(), 792.into()]);
            }
            kids.push(doc.add_object(page).into());
        }

        let mut pages_dict = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => pages.len() as i64,
            "Resources" => resources_id,
        };
        if inherit_media_box {
            pages_dict.set("MediaBox", vec![0.into(), 0.into(), 595.into(), 842.into()]);
        }
        doc.objects.insert(pages_id, Object::Dictionary(pages_dict));
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut buf = Vec::new();
        doc.save_to(&mut buf).expect("failed to save test PDF");
        buf
    }

    #[test]
    fn opens_and_counts_pages() {
        let bytes = build_pdf(&[b"", b""], false);
        let doc = LopdfBackend::open(&bytes).unwrap();
        assert_eq!(LopdfBackend::page_count(&doc), 2);
        assert!(LopdfBackend::get_page(&doc, 2).is_err());
    }

    #[test]
    fn garbage_is_a_parse_error() {
        let err = LopdfBackend::open(b"not a pdf").unwrap_err();
        assert!(matches!(err, BackendError::Parse(_)));
    }

    #[test]
    fn media_box_is_inherited() {
        let bytes = build_pdf(&[b""], true);
        let doc = LopdfBackend::open(&bytes).unwrap();
        let page = LopdfBackend::get_page(&doc, 0).unwrap();
        let mb = LopdfBackend::page_media_box(&doc, &page).unwrap();
        assert_eq!((mb.width(), mb.height()), (595.0, 842.0));
    }

    #[test]
    fn interprets_page_with_inherited_resources() {
        let bytes = build_pdf(&[b"BT /F1 12 Tf 72 720 Td (Hello page) Tj ET"], false);
        let doc = LopdfBackend::open(&bytes).unwrap();
        let page = LopdfBackend::get_page(&doc, 0).unwrap();
        let mut runs: Vec<TextRun> = Vec::new();
        LopdfBackend::interpret_page(&doc, &page, &mut runs, &ExtractOptions::default()).unwrap();
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].text, "Hello page");
    }

    #[test]
    fn page_without_contents_yields_nothing() {
        let bytes = build_pdf(&[b""], false);
        let doc = LopdfBackend::open(&bytes).unwrap();
        let page = LopdfBackend::get_page(&doc, 0).unwrap();
        let mut runs: Vec<TextRun> = Vec::new();
        LopdfBackend::interpret_page(&doc, &page, &mut runs, &ExtractOptions::default()).unwrap();
        assert!(runs.is_empty());
    }

    #[test]
    fn open_file_reports_missing_file() {
        let err = LopdfBackend::open_file("/nonexistent/definitely/missing.pdf").unwrap_err();
        assert!(matches!(err, BackendError::Io(_)));
    }

    #[test]
    fn cyclic_parent_chain_is_a_parse_error() {
        let mut doc = Document::with_version("1.5");
        let page_id = doc.new_object_id();
        doc.objects.insert(
            page_id,
            Object::Dictionary(dictionary! { "Type" => "Page", "Parent" => page_id }),
        );
        let err = resolve_inherited(&doc, page_id, b"MediaBox").unwrap_err();
        assert!(matches!(&err, BackendError::Parse(msg) if msg.contains("cyclic /Parent chain")));
    }

    #[test]
    fn two_node_parent_loop_is_detected() {
        let mut doc = Document::with_version("1.5");
        let page_id = doc.new_object_id();
        let node_id = doc.new_object_id();
        doc.objects.insert(
            page_id,
            Object::Dictionary(dictionary! { "Type" => "Page", "Parent" => node_id }),
        );
        doc.objects.insert(
            node_id,
            Object::Dictionary(dictionary! { "Type" => "Pages", "Parent" => page_id }),
        );
        assert!(page_resources(&doc, page_id).is_err());
        assert!(resolve_inherited(&doc, page_id, b"MediaBox").is_err());
    }
}
