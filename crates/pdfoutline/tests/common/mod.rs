//! Shared helpers for building test PDFs in memory.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use lopdf::{Document, Object, Stream, dictionary};

/// Build a letter-size PDF with one page per content stream. `/F1` is
/// Helvetica, `/F2` Helvetica-Bold.
pub fn build_pdf(pages: &[&str]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let regular = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let bold = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
    });

    let mut kids: Vec<Object> = Vec::new();
    for content in pages {
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.as_bytes().to_vec()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            "Contents" => content_id,
            "Resources" => dictionary! {
                "Font" => dictionary! { "F1" => regular, "F2" => bold },
            },
        });
        kids.push(page_id.into());
    }
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => pages.len() as i64,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buf = Vec::new();
    doc.save_to(&mut buf).expect("failed to save test PDF");
    buf
}

/// Write a PDF built by [`build_pdf`] into `dir`.
pub fn write_pdf(dir: &Path, name: &str, pages: &[&str]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, build_pdf(pages)).expect("failed to write test PDF");
    path
}

/// One text line at `(x, y)` in baseline coordinates.
pub fn text(font: &str, size: u32, x: u32, y: u32, s: &str) -> String {
    format!("BT /{font} {size} Tf {x} {y} Td ({s}) Tj ET\n")
}

/// A three-page annual report: title page, then numbered chapters with a
/// running header on every later page.
pub fn annual_report() -> Vec<String> {
    let page_one = [
        text("F2", 24, 72, 700, "Annual Report"),
        text("F1", 10, 72, 660, "This report covers the fiscal year."),
        text("F1", 10, 72, 646, "It was prepared for shareholders."),
    ]
    .concat();
    let page_two = [
        text("F1", 8, 72, 770, "Annual Report 2025"),
        text("F2", 16, 72, 700, "1. Overview"),
        text("F1", 10, 72, 680, "Revenue grew in every region."),
        text("F1", 10, 72, 666, "Costs stayed flat."),
        text("F2", 12, 72, 630, "1.1 Revenue"),
        text("F1", 10, 72, 612, "Subscriptions led the growth."),
    ]
    .concat();
    let page_three = [
        text("F1", 8, 72, 770, "Annual Report 2025"),
        text("F2", 16, 72, 700, "2. Outlook"),
        text("F1", 10, 72, 680, "We expect steady demand next year."),
        text("F1", 8, 300, 20, "3"),
    ]
    .concat();
    vec![page_one, page_two, page_three]
}

/// A one-page PDF whose font carries a `/ToUnicode` map with a `bfrange`
/// at the very top of the 32-bit code space.
pub fn top_of_code_space_cmap_pdf() -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let cmap_id = doc.add_object(Stream::new(
        dictionary! {},
        b"beginbfrange <FFFFFFFF> <FFFFFFFF> [<0041> <0042>] endbfrange".to_vec(),
    ));
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
        "ToUnicode" => cmap_id,
    });
    let content_id = doc.add_object(Stream::new(
        dictionary! {},
        b"BT /F1 18 Tf 72 700 Td (Odd Encoding) Tj ET".to_vec(),
    ));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        "Contents" => content_id,
        "Resources" => dictionary! { "Font" => dictionary! { "F1" => font_id } },
    });
    finish_single_page(doc, pages_id, page_id)
}

/// A one-page PDF without a `/MediaBox` whose page lists itself as its
/// `/Parent`.
pub fn self_parented_page_pdf() -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let page_id = doc.new_object_id();
    let content_id = doc.add_object(Stream::new(
        dictionary! {},
        b"BT /F1 12 Tf 72 700 Td (Loop) Tj ET".to_vec(),
    ));
    doc.objects.insert(
        page_id,
        Object::Dictionary(dictionary! {
            "Type" => "Page",
            "Parent" => page_id,
            "Contents" => content_id,
        }),
    );
    finish_single_page(doc, pages_id, page_id)
}

fn finish_single_page(mut doc: Document, pages_id: lopdf::ObjectId, page_id: lopdf::ObjectId) -> Vec<u8> {
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![Object::from(page_id)],
            "Count" => 1,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buf = Vec::new();
    doc.save_to(&mut buf).expect("failed to save test PDF");
    buf
}
