//! PiCalc-rs library: application logic for the continuous π calculator.

pub mod app;
pub mod config;
pub mod errors;
