/// Fatal engine faults
///
/// Chip-8 has no exception model so none of these are recoverable; any of
/// them should terminate the driving loop. `Interrupted` is the clean
/// shutdown path out of the two blocking suspend points (the Fx0A key wait
/// and the debugger pause gate).
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("program is too large ({size} bytes), max size is {max_size} bytes")]
    ProgramTooLarge { size: usize, max_size: usize },

    #[error("undecodable instruction {opcode:#06X} at {addr:#05X}")]
    UnknownOpcode { opcode: u16, addr: u16 },

    #[error("return with an empty call stack at {addr:#05X}")]
    StackUnderflow { addr: u16 },

    #[error("memory access out of bounds at {addr:#06X}")]
    OutOfBounds { addr: u16 },

    #[error("execution interrupted by shutdown")]
    Interrupted,
}
