mod cli;
mod lines_cmd;
mod outline_cmd;
mod rank_cmd;
mod shared;

use clap::Parser;
use cli::Cli;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        cli::Commands::Outline {
            ref input_dir,
            ref output_dir,
            ref schema,
            ref config,
            jobs,
        } => outline_cmd::run(input_dir, output_dir, schema.as_deref(), config.as_deref(), jobs),
        cli::Commands::Rank {
            ref input_json,
            ref pdf_dir,
            ref output_json,
            max_sentences,
            ref config,
        } => rank_cmd::run(input_json, pdf_dir, output_json, max_sentences, config.as_deref()),
        cli::Commands::Lines {
            ref file,
            ref format,
            ref config,
        } => lines_cmd::run(file, format, config.as_deref()),
    };

    if let Err(code) = result {
        std::process::exit(code);
    }
}
