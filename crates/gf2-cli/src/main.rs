//! Command-line interface for `gf2-matrix`.

#![forbid(unsafe_code)]

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use gf2_matrix::{
    GenerationStrategy, Generator, GeneratorConfig, Matrix, Row, DEFAULT_MAX_ATTEMPTS,
};
use rand::{CryptoRng, RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// GF(2) masking matrix CLI.
#[derive(Parser)]
#[command(
    name = "gf2",
    version,
    author,
    about = "Generate and inspect invertible GF(2) matrices"
)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Strategy {
    /// Grow the matrix one independent row at a time.
    Incremental,
    /// Redraw the whole matrix until it is invertible.
    Rejection,
}

impl From<Strategy> for GenerationStrategy {
    fn from(value: Strategy) -> Self {
        match value {
            Strategy::Incremental => GenerationStrategy::Incremental,
            Strategy::Rejection => GenerationStrategy::Rejection,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a random invertible matrix.
    Random {
        /// Dimension in bits (multiple of 8).
        #[arg(long, default_value_t = 32)]
        size: usize,
        /// Optional RNG seed for reproducible generation.
        #[arg(long)]
        seed: Option<u64>,
        /// Sampling strategy.
        #[arg(long, value_enum, default_value_t = Strategy::Incremental)]
        strategy: Strategy,
        /// Whole-matrix draws allowed with the rejection strategy.
        #[arg(long, default_value_t = DEFAULT_MAX_ATTEMPTS)]
        max_attempts: usize,
        /// Also print the inverse after a blank line.
        #[arg(long, default_value_t = false)]
        with_inverse: bool,
    },
    /// Invert a matrix stored as one hex row per line.
    Invert {
        /// Path to the matrix.
        #[arg(long, value_name = "FILE")]
        input: PathBuf,
    },
    /// Apply a matrix to a hex-encoded vector.
    Apply {
        /// Path to the matrix.
        #[arg(long, value_name = "FILE")]
        input: PathBuf,
        /// Input vector as hex.
        #[arg(long, value_name = "HEX")]
        vector: String,
    },
    /// Print the diagonal parity of a square matrix.
    Trace {
        /// Path to the matrix.
        #[arg(long, value_name = "FILE")]
        input: PathBuf,
    },
    /// Run a local demo: build a masking matrix, mask and unmask a vector.
    Demo {
        /// Dimension in bits (multiple of 8).
        #[arg(long, default_value_t = 128)]
        size: usize,
        /// Optional RNG seed for reproducibility.
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.command {
        Commands::Random {
            size,
            seed,
            strategy,
            max_attempts,
            with_inverse,
        } => cmd_random(size, seed, strategy, max_attempts, with_inverse),
        Commands::Invert { input } => cmd_invert(&input),
        Commands::Apply { input, vector } => cmd_apply(&input, &vector),
        Commands::Trace { input } => cmd_trace(&input),
        Commands::Demo { size, seed } => cmd_demo(size, seed),
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn cmd_random(
    size: usize,
    seed: Option<u64>,
    strategy: Strategy,
    max_attempts: usize,
    with_inverse: bool,
) -> Result<()> {
    let mut gen = Generator::with_config(
        seeded_rng(seed),
        GeneratorConfig {
            strategy: strategy.into(),
            max_attempts,
        },
    );
    let (matrix, inverse) = gen
        .random_invertible(size)
        .with_context(|| format!("generate {size}x{size} matrix"))?;
    println!("{matrix}");
    if with_inverse {
        println!();
        println!("{inverse}");
    }
    Ok(())
}

fn cmd_invert(input: &Path) -> Result<()> {
    let matrix = load_matrix(input)?;
    match matrix.invert().context("invert matrix")? {
        Some(inverse) => println!("{inverse}"),
        None => bail!("matrix is singular"),
    }
    Ok(())
}

fn cmd_apply(input: &Path, vector_hex: &str) -> Result<()> {
    let matrix = load_matrix(input)?;
    let vector = Row::from_hex(vector_hex).context("decode vector hex")?;
    let out = matrix.apply(&vector).context("apply matrix")?;
    println!("{out}");
    Ok(())
}

fn cmd_trace(input: &Path) -> Result<()> {
    let matrix = load_matrix(input)?;
    let trace = matrix.trace().context("compute trace")?;
    println!("{}", u8::from(trace));
    Ok(())
}

fn cmd_demo(size: usize, seed: Option<u64>) -> Result<()> {
    let mut rng = seeded_rng(seed);
    let gen_seed = derive_seed(&mut rng);
    let mut gen = Generator::new(ChaCha20Rng::from_seed(gen_seed));

    let (mask, unmask) = gen
        .random_invertible(size)
        .with_context(|| format!("generate {size}x{size} mask"))?;
    let identity = Matrix::identity(size)?;
    if mask.compose(&unmask)? != identity || unmask.compose(&mask)? != identity {
        bail!("mask and unmask are not inverse to each other");
    }
    info!(dimension = size, "mask verified against identity");

    let plaintext = gen.random_row(size)?;
    let masked = mask.apply(&plaintext)?;
    let unmasked = unmask.apply(&masked)?;

    println!("dimension: {size}");
    println!("mask trace: {}", u8::from(mask.trace()?));
    println!("plaintext: {}", hex::encode(plaintext.as_bytes()));
    println!("masked: {}", hex::encode(masked.as_bytes()));
    println!("unmasked: {}", hex::encode(unmasked.as_bytes()));
    if unmasked != plaintext {
        bail!("demo roundtrip failed");
    }
    Ok(())
}

fn load_matrix(path: &Path) -> Result<Matrix> {
    let text = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    Matrix::from_hex_lines(&text).with_context(|| format!("parse matrix from {}", path.display()))
}

fn seeded_rng(seed: Option<u64>) -> impl RngCore + CryptoRng {
    match seed {
        Some(value) => {
            let mut seed_bytes = [0u8; 32];
            seed_bytes[..8].copy_from_slice(&value.to_le_bytes());
            ChaCha20Rng::from_seed(seed_bytes)
        }
        None => {
            let mut seed_bytes = [0u8; 32];
            rand::rngs::OsRng.fill_bytes(&mut seed_bytes);
            ChaCha20Rng::from_seed(seed_bytes)
        }
    }
}

fn derive_seed(rng: &mut impl RngCore) -> [u8; 32] {
    let mut seed_bytes = [0u8; 32];
    rng.fill_bytes(&mut seed_bytes);
    seed_bytes
}
