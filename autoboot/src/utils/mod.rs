//! Utility Library - Command line parsing

pub mod cmdline;

pub use cmdline::CmdLine;
