mod emitter;
mod instruction;

pub use emitter::*;
pub use instruction::*;
