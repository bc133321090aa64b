use std::error::Error;
use std::fs;
use std::path::PathBuf;

use clap::Args;
use readout_core::rng::RngHandle;
use readout_mag::{random_histogram, to_json};

use crate::stamp;

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Width of each bitstring key.
    #[arg(long, default_value_t = 16)]
    pub bits: u32,
    /// Number of distinct keys to draw, clamped to the full key space.
    #[arg(long, default_value_t = 1024)]
    pub keys: usize,
    /// Largest per-key count drawn by the generator.
    #[arg(long, default_value_t = 200)]
    pub max_count: u64,
    /// Master seed for the generated histogram.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
    /// Output file for the interchange JSON.
    #[arg(long)]
    pub out: PathBuf,
}

pub fn run(args: &GenerateArgs) -> Result<(), Box<dyn Error>> {
    let mut rng = RngHandle::from_seed(args.seed);
    let histogram = random_histogram(args.bits, args.keys, args.max_count, &mut rng)?;
    let json = to_json(&histogram)?;
    if let Some(parent) = args.out.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&args.out, json)?;
    stamp(format!(
        "wrote {} keys to {}",
        histogram.num_keys(),
        args.out.display()
    ));
    Ok(())
}
