use anyhow::{Context, Result};
use dmgboy_core::{Cartridge, CartridgeHeader, Emulator, EmulatorConfig, Machine, Observer};

pub struct Options {
    pub pacing: bool,
    pub trace: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            pacing: true,
            trace: false,
        }
    }
}

/// Logs every instruction before it runs, with the registers it sees.
pub struct TraceObserver;

impl Observer for TraceObserver {
    fn should_break(&mut self, _machine: &Machine) -> bool {
        log::log_enabled!(log::Level::Debug)
    }

    fn on_break(&mut self, machine: &mut Machine) {
        let pc = machine.regs.pc();
        match machine.decode_at(pc) {
            Ok(decoded) => log::debug!(
                "{pc:#06X}  {:<20} {}",
                decoded.instruction.to_string(),
                machine.regs
            ),
            Err(err) => log::debug!("{pc:#06X}  <{err}>"),
        }
    }
}

/// Validate the cartridge image and run it until the core gives up.
///
/// Only returns once emulation has stopped, always with the error that
/// stopped it.
pub fn run(rom: &[u8], options: &Options) -> Result<()> {
    let header = CartridgeHeader::parse(rom).context("Invalid cartridge header")?;
    log::info!(
        "Loaded '{}' (licensee {:#04X}, {:?}, version {})",
        header.title,
        header.licensee,
        header.destination,
        header.mask_rom_version
    );
    let cartridge = Cartridge::with_header(rom, &header).context("Unsupported cartridge image")?;

    let config = EmulatorConfig::builder().pacing(options.pacing).build();
    let mut emulator = Emulator::new(cartridge, config);
    if options.trace {
        emulator.add_observer(Box::new(TraceObserver));
    }

    let err = emulator.run();
    Err(err).context(format!(
        "Emulation stopped at {:#06X}",
        emulator.machine().regs.pc()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_truncated_image() {
        let err = run(&[0u8; 0x100], &Options::default()).unwrap_err();
        assert_eq!(err.to_string(), "Invalid cartridge header");
        assert!(err.root_cause().to_string().contains("too short"));
    }

    #[test]
    fn rejects_image_of_the_wrong_length() {
        let mut rom = vec![0u8; 0x4000];
        rom[0x0104..0x0134].copy_from_slice(&dmgboy_core::machine::cartridge::LOGO);
        rom[0x014A] = 0x01;
        rom[0x014D] = rom[0x0134..0x014D]
            .iter()
            .fold(0u8, |x, b| x.wrapping_sub(*b).wrapping_sub(1));

        let err = run(&rom, &Options::default()).unwrap_err();
        assert_eq!(err.to_string(), "Unsupported cartridge image");
    }
}
