use clap::Parser;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use anyhow::{Context, Result, bail};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use card_coverage::Palette;
use card_coverage::batch::{BatchOptions, run_batch, write_report};
use card_coverage::config::{load_palette, palette_from_specs};

/// Measure how much of each image is covered by each palette color.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Directory containing the images
    #[arg(default_value = "./images/")]
    dir: PathBuf,

    /// CSV file to write
    #[arg(short, long, default_value = "color_analysis.csv")]
    output: PathBuf,

    /// Image file extension to pick up (case-insensitive)
    #[arg(short, long, default_value = "png")]
    extension: String,

    /// Palette color as name=#rrggbb; repeat in column order
    #[arg(short = 'c', long = "color", conflicts_with = "palette_file")]
    colors: Vec<String>,

    /// JSON palette file: [{"name": "...", "color": "#rrggbb"}, ...]
    #[arg(short, long)]
    palette_file: Option<PathBuf>,

    /// Stop at the first image that cannot be processed and exit with an error
    #[arg(long)]
    strict: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "card_coverage=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    let args = Args::parse();

    let palette = if let Some(path) = &args.palette_file {
        load_palette(path).with_context(|| format!("loading palette {}", path.display()))?
    } else if !args.colors.is_empty() {
        palette_from_specs(&args.colors).context("parsing --color")?
    } else {
        Palette::reference()
    };

    let options = BatchOptions {
        extension: args.extension.clone(),
        fail_fast: args.strict,
        ..BatchOptions::default()
    };
    let batch = run_batch(&args.dir, &palette, &options)
        .with_context(|| format!("processing {}", args.dir.display()))?;

    let file = File::create(&args.output)
        .with_context(|| format!("creating {}", args.output.display()))?;
    write_report(&batch, &palette, BufWriter::new(file)).context("writing report")?;

    for (name, err) in &batch.failures {
        eprintln!("Skipped {name}: {err}");
    }
    if batch.cancelled > 0 {
        eprintln!("Not started: {} image(s)", batch.cancelled);
    }
    println!("Analysis complete! Results saved to {}", args.output.display());

    if args.strict && !batch.failures.is_empty() {
        bail!("{} image(s) could not be processed", batch.failures.len());
    }
    Ok(())
}
