mod alu;
pub mod decoder;
mod execute;
pub mod instruction;
pub mod operand;
pub mod registers;
pub mod scanner;

pub use execute::Outcome;

#[cfg(test)]
mod tests;
