//! ycheck2pdf - render a yCheck2 check-layout archive to a printable PDF.
//!
//! Produces a two-page letter document: the check view on page one and
//! the audit copy view on page two. Setting `YCHECK_DEBUG` in the
//! environment turns on per-command trace logging to stderr.

use std::path::PathBuf;

use clap::Parser;
use ycheck_core::high_level::{ConvertOptions, convert_archive};

/// Convert a yCheck2 check-layout archive into a two-page check/copy PDF.
#[derive(Parser, Debug)]
#[command(name = "ycheck2pdf")]
#[command(version, about, long_about = None)]
struct Args {
    /// Input yCheck2 file
    #[arg(short = 'i', long)]
    input: PathBuf,

    /// Output pdf file
    #[arg(short = 'o', long)]
    output: PathBuf,

    /// Directory containing the check font files
    #[arg(long, default_value = "fonts")]
    fonts: PathBuf,
}

fn init_logging() {
    let level = if std::env::var_os("YCHECK_DEBUG").is_some() {
        tracing::Level::DEBUG
    } else {
        tracing::Level::ERROR
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_logging();
    let args = Args::parse();

    let options = ConvertOptions {
        fonts_dir: args.fonts,
    };
    if let Err(e) = convert_archive(&args.input, &args.output, &options) {
        eprintln!("{e}");
        std::process::exit(1);
    }
}
