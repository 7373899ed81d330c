//! Core abstractions shared by every tokenizer
//!
//! - `error`: Structured error handling

pub mod error;

pub use error::{Result, SegError, TextOperation};
