//! CLI library components for the BlueButton converter.

pub mod logging;
pub mod output;
