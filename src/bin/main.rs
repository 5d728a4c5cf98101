use clap::Parser;
use crossterm::style::Stylize;
use hangul_align::persistence::load_or_compile;
use hangul_align::{AlignConfig, Aligner, Alignment};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::error;

#[derive(Parser, Debug)]
#[command(name = "hangul_align")]
#[command(about = "Align a reference Korean text with a raw variant, jamo by jamo")]
#[command(version)]
struct Args {
    /// Normative text
    reference: String,

    /// Variant text (misspelling, dialect, transcription)
    raw: String,

    /// One jamo per step; disables stretched-vowel windows
    #[arg(long)]
    single: bool,

    /// JSON cost table document
    #[arg(long, value_name = "FILE")]
    tables: Option<PathBuf>,

    /// TOML configuration file
    #[arg(long, value_name = "FILE", env = "HANGUL_ALIGN_CONFIG")]
    config: Option<PathBuf>,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            eprintln!("{} {e}", "error:".red().bold());
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
    let alignment = aligner.align(&args.reference, &args.raw)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&alignment.summary())?);
    } else {
        print_alignment(&alignment);
    }
    Ok(())
}

fn print_alignment(alignment: &Alignment) {
    println!("{} {}", "reference:".bold(), alignment.reference);
    println!("{} {}", "raw:      ".bold(), alignment.raw);

    let total = alignment.total_cost();
    if total.is_finite() {
        println!("{} {total:.3}", "cost:     ".bold());
    } else {
        println!("{} {}", "cost:     ".bold(), "unreachable".red());
    }
    if alignment.crosses_infinite_cost() {
        println!("{}", "path crosses an unreachable cell".yellow());
    }

    println!("\n{}", "jamo".underlined());
    for pair in &alignment.jamo_alignment {
        let line = format!(
            "  {:>3} {}  ->  {:>3} {}",
            pair.reference.index, pair.reference.jamo, pair.raw.index, pair.raw.jamo
        );
        if pair.reference.jamo == pair.raw.jamo {
            println!("{}", line.green());
        } else {
            println!("{}", line.yellow());
        }
    }

    println!("\n{}", "syllables".underlined());
    for (syllable, targets) in alignment.syllable_pairs() {
        let targets: Vec<String> = targets.iter().map(char::to_string).collect();
        println!("  {syllable}  ->  {}", targets.join(" ").cyan());
    }
}
