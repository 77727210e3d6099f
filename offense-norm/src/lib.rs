// offense-norm/src/lib.rs
//! # Offense Norm CLI
//!
//! Thin command-line driver around `offense-norm-core`: batch normalization of
//! offense descriptions, per-record explanations, and catalog inspection.

pub mod cli;
pub mod commands;
pub mod logger;
pub mod ui;
