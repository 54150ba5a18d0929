use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum Error {
    #[error("size must be greater than zero")]
    InvalidSize,

    #[error("attempt to pop or peek an empty stack")]
    Underflow,

    #[error("position {pos} is out of bounds for a stack of {size} elements")]
    IndexOutOfBounds { pos: usize, size: usize },

    #[error("insert position {pos} is out of bounds for a stack of {size} elements")]
    OutOfBounds { pos: usize, size: usize },

    #[error("range {start}..{end} is invalid for a stack of {size} elements")]
    InvalidRange {
        start: usize,
        end: usize,
        size: usize,
    },
}
