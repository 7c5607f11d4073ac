pub mod ast;
pub mod cli;
pub mod collections;
pub mod compiler;
pub mod error_handling;
pub mod parser;
