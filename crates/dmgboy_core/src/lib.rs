pub mod clock;
pub mod cpu;
pub mod emulator;
pub mod error;
pub mod machine;

pub use clock::{Clock, ManualClock, SystemClock};
pub use cpu::decoder::Decoder;
pub use cpu::instruction::Instruction;
pub use cpu::registers::{Flags, Registers};
pub use emulator::{Emulator, EmulatorConfig, Observer, Step};
pub use error::{GbError, HeaderError};
pub use machine::cartridge::{Cartridge, CartridgeHeader};
pub use machine::Machine;
