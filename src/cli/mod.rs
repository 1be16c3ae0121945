//! Command Line Interface (CLI) layer for autocrop.
//!
//! This module defines argument parsing (`args`), error types (`errors`),
//! and the orchestration logic (`runner`): decode one image, run the bounds
//! analyzer and crop planner, and print the report as JSON.
//!
//! If you are embedding autocrop into another application, prefer using
//! the high-level `autocrop::api` module instead of calling the CLI code.
pub mod args;
pub mod errors;
pub mod runner;

pub use args::CliArgs;
pub use runner::run;
