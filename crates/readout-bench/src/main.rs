use std::error::Error;

use chrono::Utc;
use clap::{Parser, Subcommand};
use commands::{
    generate::{self, GenerateArgs},
    magnetization::{self, MagnetizationArgs},
    tensor::{self, TensorArgs},
};

mod commands;
mod reference;
mod report;

#[derive(Parser, Debug)]
#[command(name = "readout-bench", about = "Readout kernel benchmarking harness")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Time the axis-contraction kernel against the dense Kronecker reference.
    Tensor(TensorArgs),
    /// Time the typed magnetization kernel against the string-rescan reference.
    Magnetization(MagnetizationArgs),
    /// Write a random histogram as interchange JSON.
    Generate(GenerateArgs),
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    match cli.command {
        Command::Tensor(args) => tensor::run(&args),
        Command::Magnetization(args) => magnetization::run(&args),
        Command::Generate(args) => generate::run(&args),
    }
}

pub(crate) fn stamp(message: impl AsRef<str>) {
    eprintln!("[{}] {}", Utc::now().format("%H:%M:%S"), message.as_ref());
}
