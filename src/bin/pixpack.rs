use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use pixpack::{BitDepth, HarnessConfig};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "pixpack", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check the packed operators against the golden per-pixel reference.
    Check(CheckArgs),
    /// Print bit-expansion table entries.
    Table(TableArgs),
}

#[derive(Parser, Debug)]
struct CheckArgs {
    /// Harness config JSON; missing fields keep their defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// PRNG seed.
    #[arg(long)]
    seed: Option<u64>,

    /// Randomized trials per bit depth.
    #[arg(long)]
    trials: Option<u32>,

    /// Canvas bit depth to exercise (repeatable: --depth 1 --depth 4).
    #[arg(long = "depth")]
    depths: Vec<BitDepth>,

    /// Print the run report as JSON on stdout.
    #[arg(long)]
    json: bool,
}

#[derive(Parser, Debug)]
struct TableArgs {
    /// Bit depth of the packed lanes.
    #[arg(long)]
    depth: BitDepth,

    /// Only print this byte's entry (decimal or 0x-prefixed hex).
    #[arg(long, value_parser = parse_byte)]
    byte: Option<u8>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Check(args) => cmd_check(args),
        Command::Table(args) => cmd_table(args),
    }
}

fn read_config_json(path: &Path) -> anyhow::Result<HarnessConfig> {
    let f = File::open(path).with_context(|| format!("open config '{}'", path.display()))?;
    let r = BufReader::new(f);
    let config: HarnessConfig =
        serde_json::from_reader(r).with_context(|| "parse harness config JSON")?;
    Ok(config)
}

fn cmd_check(args: CheckArgs) -> anyhow::Result<()> {
    let mut config = match &args.config {
        Some(path) => read_config_json(path)?,
        None => HarnessConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(trials) = args.trials {
        config.trials = trials;
    }
    if !args.depths.is_empty() {
        config.depths = args.depths;
    }

    let report = match pixpack::run(&config) {
        Ok(report) => report,
        Err(err) => {
            if let Some(d) = err.divergence() {
                eprintln!("{d}");
            }
            return Err(err).context("differential check failed");
        }
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for d in &report.depths {
            println!("OK bpp={}", d.depth);
        }
    }
    Ok(())
}

fn cmd_table(args: TableArgs) -> anyhow::Result<()> {
    let table = pixpack::expand_table(args.depth);
    let ppb = args.depth.pixels_per_byte();
    let bytes: Vec<u8> = match args.byte {
        Some(b) => vec![b],
        None => (0..=255).collect(),
    };
    for b in bytes {
        let lanes = table.lanes(b);
        let hex: Vec<String> = lanes[..ppb].iter().map(|v| format!("{v:02x}")).collect();
        println!("{b:02x}: {}", hex.join(" "));
    }
    Ok(())
}

fn parse_byte(s: &str) -> Result<u8, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u8::from_str_radix(hex, 16),
        None => s.parse(),
    };
    parsed.map_err(|e| format!("'{s}' is not a byte: {e}"))
}
