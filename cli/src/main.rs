mod trace;

use std::ffi::OsString;
use std::fs::File;
use std::io::BufReader;

use clap::ArgAction::{Set, SetTrue};
use clap::Parser;
use tracing::{event, span, Level};
use tracing_subscriber::prelude::*;

use base::prelude::{ObjectImage, DEFAULT_MEMORY_SIZE};
use cpu::{ControlUnit, MemoryConfiguration, MemoryUnit, NullObserver, Observer};

use crate::trace::TraceWriter;

/// Simulator for the SARC machine
#[derive(Parser, Debug)]
#[clap(version, about, long_about = None)]
struct Cli {
    /// Object image file to load and run.
    #[clap(action = Set)]
    image: OsString,

    /// Memory size in cells.
    #[clap(action = Set, long, default_value_t = DEFAULT_MEMORY_SIZE)]
    memory_size: usize,

    /// Print the machine state after each instruction.
    #[clap(action = SetTrue, long)]
    trace: bool,

    /// As --trace, but wait for an input line between instructions.
    #[clap(action = SetTrue, long)]
    step: bool,
}

fn run_simulator() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // See
    // https://docs.rs/tracing-subscriber/latest/tracing_subscriber/fmt/index.html#filtering-events-with-environment-variables
    // for instructions on how to select which trace messages get
    // printed.
    let fmt_layer = tracing_subscriber::fmt::layer().with_target(true);
    let filter_layer = match tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new("info"))
    {
        Err(e) => {
            return Err(Box::new(e));
        }
        Ok(layer) => layer,
    };

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();

    let span = span!(Level::ERROR, "simulate", image=?cli.image);
    let _enter = span.enter();

    let file = File::open(&cli.image)?;
    let image = ObjectImage::from_reader(BufReader::new(file))?;
    let mut control = ControlUnit::new();
    let mut mem = MemoryUnit::new(&MemoryConfiguration {
        size: cli.memory_size,
    });
    control.load_image(&mut mem, &image)?;

    let mut observer: Box<dyn Observer> = if cli.trace || cli.step {
        Box::new(TraceWriter::new(cli.step))
    } else {
        Box::new(NullObserver)
    };
    control.run_with_observer(&mut mem, observer.as_mut())?;
    event!(Level::INFO, "machine halted normally");
    Ok(())
}

fn main() {
    match run_simulator() {
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
        Ok(()) => {
            std::process::exit(0);
        }
    }
}
