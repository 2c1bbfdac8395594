use std::time::Duration;

use typed_builder::TypedBuilder;

use crate::clock::{Clock, SystemClock};
use crate::cpu::instruction::Instruction;
use crate::error::{GbError, Result};
use crate::machine::cartridge::Cartridge;
use crate::machine::Machine;

/// Master clock of the DMG in cycles per second.
pub const DMG_CLOCK_HZ: u32 = 4_194_304;

/// Where cartridges start executing once the boot ROM hands over.
pub const ENTRY_POINT: u16 = 0x0100;

const NANOS_PER_SEC: u64 = 1_000_000_000;

#[derive(Debug, Clone, TypedBuilder)]
pub struct EmulatorConfig {
    #[builder(default = DMG_CLOCK_HZ)]
    pub clock_hz: u32,
    /// Sleep after each instruction so it takes as long as on hardware.
    #[builder(default = true)]
    pub pacing: bool,
    #[builder(default = ENTRY_POINT)]
    pub entry_point: u16,
    /// Seed the registers with the values the boot ROM leaves behind.
    #[builder(default = true)]
    pub boot_state: bool,
}

impl Default for EmulatorConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl EmulatorConfig {
    /// Wall time `cycles` take at `clock_hz`.
    pub fn cycle_duration(&self, cycles: u32) -> Duration {
        let hz = u64::from(self.clock_hz.max(1));
        Duration::from_nanos(u64::from(cycles) * NANOS_PER_SEC / hz)
    }
}

/// Hook run before every instruction, used for breakpoints and tracing.
///
/// `on_break` may block, e.g. waiting on a debugger prompt; the loop does not
/// continue until it returns.
pub trait Observer {
    fn should_break(&mut self, machine: &Machine) -> bool;

    fn on_break(&mut self, machine: &mut Machine);
}

/// One executed instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Step {
    /// Address the instruction was fetched from.
    pub pc: u16,
    pub instruction: Instruction,
    /// Minimum cycles plus whatever the instruction added.
    pub cycles: u32,
}

pub struct Emulator<C: Clock = SystemClock> {
    machine: Machine,
    config: EmulatorConfig,
    clock: C,
    observers: Vec<Box<dyn Observer>>,
}

impl Emulator<SystemClock> {
    pub fn new(cartridge: Cartridge, config: EmulatorConfig) -> Self {
        Self::with_clock(Machine::new(cartridge), config, SystemClock::new())
    }
}

impl<C: Clock> Emulator<C> {
    pub fn with_clock(machine: Machine, config: EmulatorConfig, clock: C) -> Self {
        Self {
            machine,
            config,
            clock,
            observers: Vec::new(),
        }
    }

    pub fn machine(&self) -> &Machine {
        &self.machine
    }

    pub fn machine_mut(&mut self) -> &mut Machine {
        &mut self.machine
    }

    pub fn config(&self) -> &EmulatorConfig {
        &self.config
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Observers run in the order they were added.
    pub fn add_observer(&mut self, observer: Box<dyn Observer>) {
        self.observers.push(observer);
    }

    /// Put the CPU where the boot ROM would have left it.
    pub fn reset(&mut self) {
        if self.config.boot_state {
            self.machine.regs.apply_dmg_boot_state();
        }
        self.machine.regs.set_pc(self.config.entry_point);
        log::info!(
            "Starting at {:#06X}: {}",
            self.config.entry_point,
            self.machine.regs
        );
    }

    /// Reset, then execute instructions until one of them fails.
    ///
    /// There is no normal way out of the loop, so this only ever returns
    /// an error.
    pub fn run(&mut self) -> GbError {
        self.reset();
        loop {
            if let Err(err) = self.step() {
                return err;
            }
        }
    }

    /// Run the observers, then fetch, execute and pace one instruction.
    pub fn step(&mut self) -> Result<Step> {
        for observer in self.observers.iter_mut() {
            if observer.should_break(&self.machine) {
                observer.on_break(&mut self.machine);
            }
        }

        let started = self.clock.now();
        let pc = self.machine.regs.pc();
        let step = match self.execute_at(pc) {
            Ok(step) => step,
            Err(err) => {
                log::error!("{err} (instruction at {pc:#06X}, {})", self.machine.regs);
                return Err(err);
            }
        };
        self.pace(step.cycles, started);
        Ok(step)
    }

    fn execute_at(&mut self, pc: u16) -> Result<Step> {
        let decoded = self.machine.decode_at(pc)?;
        let outcome = decoded.instruction.execute(&mut self.machine)?;
        if !outcome.jumped {
            self.machine
                .regs
                .set_pc(pc.wrapping_add(decoded.length as u16));
        }

        let cycles = decoded.min_cycles + outcome.extra_cycles;
        log::trace!("{pc:#06X}: {} ({cycles} cycles)", decoded.instruction);
        Ok(Step {
            pc,
            instruction: decoded.instruction,
            cycles,
        })
    }

    /// Sleep off whatever is left of the instruction's budget. Overruns are
    /// not carried over to later instructions.
    fn pace(&mut self, cycles: u32, started: Duration) {
        if !self.config.pacing {
            return;
        }
        let budget = self.config.cycle_duration(cycles);
        let elapsed = self.clock.now().saturating_sub(started);
        if let Some(remaining) = budget.checked_sub(elapsed) {
            if !remaining.is_zero() {
                self.clock.sleep(remaining);
            }
        }
    }
}
