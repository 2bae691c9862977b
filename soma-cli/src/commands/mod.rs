//! Command implementations for the soma-analytics CLI

pub mod report;
pub mod serve;

// Re-export main dispatcher functions for flat access from main.rs
pub use report::run_report;
pub use serve::run_serve;
