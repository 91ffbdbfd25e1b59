//! Core module containing fundamental types

pub mod types;

pub use types::*;
