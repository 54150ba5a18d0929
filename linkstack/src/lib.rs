#![forbid(unsafe_code)]

//! LIFO stack backed by a singly-linked chain of owned nodes, with
//! positional operations (indexed read, indexed insert, sub-range
//! extraction, bulk merge) and an in-place binary-insertion sort.

mod error;
mod stack;

pub use error::{Error, Result};
pub use stack::{Iter, LinkStack};
