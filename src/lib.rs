//! planzo library crate
//!
//! Exposes the core modules so tests, benchmarks and the binary share one
//! implementation.

pub mod app;
pub mod config;
pub mod identity;
pub mod llm;
pub mod logging;
pub mod session;
pub mod tree;
pub mod ui;
pub mod upload;
