use std::collections::HashSet;
use std::path::Path;

use pdfoutline::pdfoutline_core::{annotate_lines, score_line, select_candidates};

use crate::cli::OutputFormat;
use crate::shared::{load_config, open_pdf};

pub fn run(file: &Path, format: &OutputFormat, config: Option<&Path>) -> Result<(), i32> {
    let config = load_config(config)?;
    let pdf = open_pdf(file, &config)?;
    let lines = pdf.lines();
    let annotated = annotate_lines(&lines, &config.features);
    let candidates: HashSet<usize> = select_candidates(&annotated, &config.heading)
        .iter()
        .map(|c| c.line.index)
        .collect();

    if let OutputFormat::Text = format {
        println!("page\tsize\trank\tleft\ttop\tbold\tscore\tcandidate\ttext");
    }
    for line in &annotated {
        let score = score_line(line, &config.heading);
        let candidate = candidates.contains(&line.index);
        match format {
            OutputFormat::Text => println!(
                "{}\t{:.1}\t{}\t{:.1}\t{:.1}\t{}\t{}\t{}\t{}",
                line.page(),
                line.line.font_size,
                line.font_size_rank,
                line.line.left,
                line.line.top,
                line.is_bold,
                score,
                if candidate { "*" } else { "" },
                line.text(),
            ),
            OutputFormat::Json => {
                let obj = serde_json::json!({
                    "page": line.page(),
                    "text": line.text(),
                    "font_size": line.line.font_size,
                    "font_size_rank": line.font_size_rank,
                    "left": line.line.left,
                    "top": line.line.top,
                    "y_gap_above": line.y_gap_above,
                    "is_bold": line.is_bold,
                    "is_all_caps": line.is_all_caps,
                    "starts_with_numbering": line.starts_with_numbering,
                    "heading_score": score,
                    "candidate": candidate,
                });
                println!("{obj}");
            }
        }
    }
    Ok(())
}
