//! Line assembly from positioned text runs.

use pdfoutline_core::TextLine;

use crate::backend::{MediaBox, PdfBackend};
use crate::handler::TextRun;
use crate::options::ExtractOptions;

/// The assembled lines of one page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageLines {
    /// 1-indexed page number.
    pub page: usize,
    pub media_box: MediaBox,
    pub lines: Vec<TextLine>,
}

impl PageLines {
    /// Plain text of the page, one entry per line.
    pub fn texts(&self) -> Vec<String> {
        self.lines.iter().map(|l| l.text.clone()).collect()
    }
}

/// Interpret every page of a document and assemble its lines. Running
/// header/footer suppression is left to the caller.
pub fn extract_pages<B: PdfBackend>(
    doc: &B::Document,
    options: &ExtractOptions,
) -> Result<Vec<PageLines>, B::Error> {
    let page_count = B::page_count(doc);
    let mut pages = Vec::with_capacity(page_count);
    for index in 0..page_count {
        let page = B::get_page(doc, index)?;
        let media_box = B::page_media_box(doc, &page)?;
        let mut runs: Vec<TextRun> = Vec::new();
        B::interpret_page(doc, &page, &mut runs, options)?;
        let lines = assemble_lines(&runs, index + 1, &media_box, options);
        tracing::debug!(page = index + 1, runs = runs.len(), lines = lines.len(), "assembled page");
        pages.push(PageLines { page: index + 1, media_box, lines });
    }
    Ok(pages)
}

/// Cluster one page's runs into lines.
///
/// Runs whose baselines are within `y_tolerance` of a line's first run join
/// that line. Lines come out top to bottom, runs inside a line left to
/// right, and coordinates are converted to a top-left origin.
pub fn assemble_lines(
    runs: &[TextRun],
    page: usize,
    media_box: &MediaBox,
    options: &ExtractOptions,
) -> Vec<TextLine> {
    let mut sorted: Vec<&TextRun> = runs.iter().collect();
    // Highest baseline first; stable so same-baseline runs keep stream order.
    sorted.sort_by(|a, b| b.baseline.total_cmp(&a.baseline));

    let mut groups: Vec<Vec<&TextRun>> = Vec::new();
    for run in sorted {
        match groups.last_mut() {
            Some(group) if (group[0].baseline - run.baseline).abs() <= options.y_tolerance => {
                group.push(run);
            }
            _ => groups.push(vec![run]),
        }
    }

    groups
        .into_iter()
        .filter_map(|mut group| {
            group.sort_by(|a, b| a.x.total_cmp(&b.x));
            build_line(&group, page, media_box, options)
        })
        .collect()
}

fn build_line(
    group: &[&TextRun],
    page: usize,
    media_box: &MediaBox,
    options: &ExtractOptions,
) -> Option<TextLine> {
    let mut text = String::new();
    let mut prev: Option<&TextRun> = None;
    for run in group {
        if let Some(p) = prev {
            let gap = run.x - p.right();
            let size = p.font_size.max(run.font_size);
            if gap > options.space_gap_ratio * size && !text.ends_with(' ') && !run.text.starts_with(' ') {
                text.push(' ');
            }
        }
        text.push_str(&run.text);
        prev = Some(run);
    }

    let font_size = group.iter().map(|r| r.font_size).sum::<f64>() / group.len() as f64;
    let left = group.iter().map(|r| r.x).fold(f64::INFINITY, f64::min) - media_box.x0;
    let top = group
        .iter()
        .map(|r| media_box.y1 - (r.baseline + r.font_size))
        .fold(f64::INFINITY, f64::min);
    let flags = group.iter().map(|r| r.flags).collect();

    TextLine::new(&text, page, font_size, left, top, flags)
}

/// Drop running headers and footers: on pages after the first, lines that
/// start within `margin` of the top edge or end within it of the bottom edge.
pub fn drop_running_margins(lines: Vec<TextLine>, page_height: f64, margin: Option<f64>) -> Vec<TextLine> {
    let Some(margin) = margin else {
        return lines;
    };
    lines
        .into_iter()
        .filter(|line| line.page == 1 || (line.top >= margin && page_height - line.top >= margin))
        .collect()
}
