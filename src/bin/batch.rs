//! Reads `reference<TAB>raw` lines from stdin and writes one JSON object
//! per line to stdout. A line that fails to align is reported in place and
//! the batch goes on.
use clap::Parser;
use hangul_align::persistence::load_or_compile;
use hangul_align::{AlignConfig, Aligner};
use serde_json::json;
use std::io::{self, BufRead, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info, warn};

#[derive(Parser, Debug)]
#[command(name = "align_batch")]
#[command(about = "Align tab-separated reference/raw pairs read from stdin")]
#[command(version)]
struct Args {
    /// One jamo per step; disables stretched-vowel windows
    #[arg(long)]
    single: bool,

    /// JSON cost table document
    #[arg(long, value_name = "FILE")]
    tables: Option<PathBuf>,

    /// TOML configuration file
    #[arg(long, value_name = "FILE", env = "HANGUL_ALIGN_CONFIG")]
    config: Option<PathBuf>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> hangul_align::Result<()> {
    let config = AlignConfig::resolve(args.config.as_deref())?;
    let table_source = args.tables.as_deref().or(config.tables.as_deref());
    let tables = load_or_compile(table_source, config.cache.as_deref())?;
    let aligner = Aligner::new(Arc::new(tables))
        .with_thresholds(config.thresholds())
        .with_multi_unit(config.multi_unit && !args.single);

    let stdin = io::stdin();
    let mut out = BufWriter::new(io::stdout().lock());
    let (mut aligned, mut failed) = (0usize, 0usize);

    for (number, line) in stdin.lock().lines().enumerate() {
        let line = line?;
        let number = number + 1;
        if line.trim().is_empty() {
            continue;
        }
        let Some((reference, raw)) = line.split_once('\t') else {
            warn!(line = number, "no tab separator, skipping");
            writeln!(out, "{}", json!({ "line": number, "error": "expected reference<TAB>raw" }))?;
            failed += 1;
            continue;
        };

        let record = match aligner.align(reference, raw) {
            Ok(alignment) => {
                aligned += 1;
                let total = alignment.total_cost();
                json!({
                    "line": number,
                    "total_cost": total.is_finite().then_some(total),
                    "syllable_mapping": alignment.syllable_mapping,
                })
            }
            Err(e) => {
                failed += 1;
                warn!(line = number, error = %e, "alignment failed");
                json!({ "line": number, "error": e.to_string() })
            }
        };
        writeln!(out, "{record}")?;
    }
    out.flush()?;
    info!(aligned, failed, "batch finished");
    Ok(())
}
