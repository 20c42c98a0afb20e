//! Meteor-M2 LRPT demodulator
//!
//! Reads a raw complex baseband capture, recovers carrier and symbol
//! timing, and writes quantized QPSK symbol bytes for a downstream LRPT
//! decoder.
//!
//! # Usage Examples
//!
//! ```bash
//! lrptdemod capture.iq 140000 symbols.sym
//! ```
//!
//! ## Headless operation with logging
//! ```bash
//! lrptdemod capture.iq 140000 symbols.sym --no-ui -vv
//! ```
//!
//! ## 8-bit captures from an rtl_sdr recording
//! ```bash
//! lrptdemod capture.cu8 1024000 symbols.sym --format cu8
//! ```

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use clap::{ArgAction, Parser};
use tracing::info;

use lrptdemod::demod::INPUT_BLOCK_SIZE;
use lrptdemod::display::TerminalUi;
use lrptdemod::{Demodulator, Error, IqFormat, IqReader};

#[derive(Parser, Debug)]
#[command(author, version, about = "Meteor-M2 LRPT demodulator: raw I/Q capture in, soft symbols out", long_about = None)]
struct Args {
    /// Path to the raw I/Q capture
    input: PathBuf,

    /// Input sample rate in Hz
    #[arg(value_parser = parse_sample_rate)]
    sample_rate: u32,

    /// Path for the output symbol stream
    output: PathBuf,

    /// IQ format: cu8, cs8, cs16 or cf32
    #[arg(short, long, default_value = "cf32", value_parser = IqFormat::from_str)]
    format: IqFormat,

    /// Disable the terminal status display (for piping/headless operation)
    #[arg(long, default_value_t = false)]
    no_ui: bool,

    /// Verbosity level (-v=info, -vv=debug, -vvv=trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn parse_sample_rate(rate: &str) -> Result<u32, Error> {
    match rate.parse::<u32>() {
        Ok(0) => Err(Error::argument("sample rate must not be zero")),
        Ok(rate) => Ok(rate),
        Err(e) => Err(Error::argument(format!("invalid sample rate '{}': {}", rate, e))),
    }
}

/// Re-wrap an open failure so the diagnostic names the file.
fn open_error(role: &str, path: &Path, e: io::Error) -> Error {
    Error::Io(io::Error::new(
        e.kind(),
        format!("couldn't open the {} file '{}': {}", role, path.display(), e),
    ))
}

fn run(args: &Args) -> Result<(), Error> {
    let reader = IqReader::from_file(
        &args.input,
        args.sample_rate,
        INPUT_BLOCK_SIZE,
        args.format,
    )
    .map_err(|e| open_error("input", &args.input, e))?;

    let outfile =
        File::create(&args.output).map_err(|e| open_error("output", &args.output, e))?;
    let mut sink = BufWriter::new(outfile);

    let mut demod = Demodulator::new(reader.sample_rate() as f64);
    let mut ui = if args.no_ui {
        None
    } else {
        Some(TerminalUi::new())
    };

    for block in reader {
        let samples = block?;
        demod.process_block(&samples, &mut sink)?;

        if let Some(ui) = ui.as_mut() {
            ui.render(&demod.status());
        }
    }

    sink.flush()?;

    // Restore the terminal before the summary goes out
    drop(ui);

    let status = demod.status();
    info!(
        blocks_in = status.blocks_in,
        blocks_out = status.blocks_out,
        locked = status.locked,
        carrier_offset_hz = status.carrier_offset_hz,
        "capture processed"
    );

    Ok(())
}

fn main() {
    let args = Args::parse();

    // 0 = WARN (quiet), 1 = INFO, 2 = DEBUG, 3+ = TRACE
    let log_level = match args.verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    let _ = tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .try_init();

    if let Err(e) = run(&args) {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
