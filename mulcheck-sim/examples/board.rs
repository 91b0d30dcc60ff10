// runs the reference target on the simulated board and prints the
// terminal transcript
//
// usage: cargo run --example board [passes] [config.yaml]

use mulcheck_core::config::HarnessConfig;
use mulcheck_sim::{Board, Faults, ReferenceTarget};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let passes = args.next().map(|p| p.parse()).transpose()?.unwrap_or(1);
    let config = match args.next() {
        Some(path) => HarnessConfig::from_file(path)?,
        None => HarnessConfig::default(),
    };

    let faults = std::env::var("MULCHECK_FAULTS")
        .ok()
        .map(|bits| bits.parse().map(Faults::from_bits_truncate))
        .transpose()?
        .unwrap_or_default();

    let mut board = Board::new(ReferenceTarget::with_faults(faults), &config)?;
    board.run_passes(passes)?;

    print!("{}", board.transcript());
    println!(
        "simulated {:.1}s over {} driver steps",
        board.clock().elapsed_seconds(),
        board.ticks(),
    );
    Ok(())
}
