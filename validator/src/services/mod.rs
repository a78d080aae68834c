//! Validator services implementations

pub mod probes;
pub mod report_writer;

pub use probes::*;
pub use report_writer::*;
