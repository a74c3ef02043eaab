//! Translate an ISCAS `.bench` circuit into BDDs and write the result files.
//!
//! ```bash
//! cargo run --release --example bench -- c17.bench
//! ```
//!
//! Results land in `results_<stem>/` unless `--output-dir` is given.

use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;
use color_eyre::eyre::eyre;

use vds_bdd::circuit::{bench, report, CircuitToBdd};
use vds_bdd::manager::{Manager, ManagerConfig};

#[derive(Debug, Parser)]
#[command(author, version)]
struct Cli {
    /// Path to the `.bench` file.
    #[arg(value_name = "FILE")]
    path: PathBuf,

    /// Output directory (default: `results_<stem>`).
    #[clap(long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Computed table size (in bits, so the actual size is `2^size` entries).
    #[clap(long, value_name = "INT", default_value = "16", value_parser = clap::value_parser!(u8).range(0..=31))]
    cache_bits: u8,

    /// Log level.
    #[clap(long, value_name = "LEVEL", default_value = "info")]
    log_level: simplelog::LevelFilter,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Cli::parse();

    simplelog::TermLogger::init(
        args.log_level,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    println!("args = {:?}", args);

    let output_dir = match &args.output_dir {
        Some(dir) => dir.clone(),
        None => {
            let stem = args
                .path
                .file_stem()
                .ok_or_else(|| eyre!("Not a file: {}", args.path.display()))?;
            PathBuf::from(format!("results_{}", stem.to_string_lossy()))
        }
    };

    let time_parse = Instant::now();
    let circuit = bench::parse_file(&args.path)?;
    println!(
        "Parsed {} inputs, {} outputs, {} gates in {:.3} s",
        circuit.inputs().len(),
        circuit.outputs().len(),
        circuit.gates().len(),
        time_parse.elapsed().as_secs_f64()
    );

    let bdd = Manager::with_config(ManagerConfig {
        cache_bits: args.cache_bits as usize,
        ..ManagerConfig::default()
    });

    let time_build = Instant::now();
    let synth = CircuitToBdd::build(&bdd, &circuit)?;
    let time_build = time_build.elapsed();
    println!("Generated BDDs in {:.3} s", time_build.as_secs_f64());
    println!("bdd = {:?}", bdd);

    report::write(&output_dir, &circuit, &synth)?;
    println!("Results written to {}", output_dir.display());

    for output in circuit.outputs() {
        if let Some(f) = synth.bdd_of(output) {
            println!("  {}: {} nodes, {} vars", output, bdd.size(f), bdd.function(f).find_vars().len());
        }
    }

    Ok(())
}
