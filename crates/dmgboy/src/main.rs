use anyhow::{Context, Result};
use dmgboy::Options;

fn main() -> Result<()> {
    env_logger::init();

    let mut rom_path = None;
    let mut options = Options::default();
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--no-pacing" => options.pacing = false,
            "--trace" => options.trace = true,
            flag if flag.starts_with("--") => {
                eprintln!("Unknown option '{}'", flag);
                std::process::exit(1);
            }
            _ => rom_path = Some(arg),
        }
    }

    let Some(rom_path) = rom_path else {
        eprintln!(
            "No ROM path provided.\n\
             Usage: dmgboy <rom> [--no-pacing] [--trace]"
        );
        std::process::exit(1);
    };

    log::info!("Playing ROM path: '{}'", rom_path);
    let rom = std::fs::read(&rom_path)
        .with_context(|| format!("Failed to read ROM file '{}'", rom_path))?;

    dmgboy::run(&rom, &options)
}
