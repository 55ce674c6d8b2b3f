//! CLI module for CutScan
//!
//! This module handles command-line argument parsing and command execution.

use clap::{Parser, Subcommand};

pub mod args;
pub mod commands;

/// CutScan parallel shot-boundary detector
///
/// A command-line tool that splits a video's frame range across parallel
/// workers and reports hard cuts found by debounced SSIM comparison.
#[derive(Parser)]
#[command(name = "cutscan")]
#[command(about = "CutScan - Parallel shot-boundary detection for video files")]
#[command(version)]
#[command(long_about = None)]
pub struct Cli {
    /// Logging level
    #[arg(long, default_value = "info", global = true)]
    pub log_level: String,

    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Scan a video file for shot boundaries
    Scan(args::ScanArgs),
    /// Inspect video file metadata
    Probe(args::ProbeArgs),
}
