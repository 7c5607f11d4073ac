/*
    This module holds the containers the AST is built from
*/

pub mod array;
pub mod murmur;
pub mod set;

use thiserror::Error;

pub use array::DynamicArray;
pub use set::{HashingSet, SetElement};

// Misuse of a container. These are programming errors, not problems with
// the input being compiled
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ContainerError {
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
    #[error("invalid argument: index {index} is out of range for length {length}")]
    IndexOutOfRange { index: i64, length: usize },
}
