use std::path::Path;

use pdfoutline::{DocumentOutcome, PipelineError, run_outline_batch};

use crate::shared::{load_config, load_schema};

pub fn run(
    input_dir: &Path,
    output_dir: &Path,
    schema: Option<&Path>,
    config: Option<&Path>,
    jobs: Option<usize>,
) -> Result<(), i32> {
    let mut config = load_config(config)?;
    if let Some(jobs) = jobs {
        if jobs == 0 {
            eprintln!("Error: --jobs must be at least 1");
            return Err(1);
        }
        config.max_workers = jobs;
    }
    let schema = load_schema(schema)?;

    let report = match run_outline_batch(input_dir, output_dir, &config, &schema) {
        Ok(report) => report,
        Err(e @ PipelineError::EmptyInput(_)) => {
            println!("{e}");
            return Err(2);
        }
        Err(e) => {
            eprintln!("Error: {e}");
            return Err(1);
        }
    };

    for outcome in &report.outcomes {
        match outcome {
            DocumentOutcome::Written { .. } => println!("✓ {}", outcome.name()),
            DocumentOutcome::Failed { error, .. } => println!("✗ {}: {error}", outcome.name()),
        }
    }
    Ok(())
}
