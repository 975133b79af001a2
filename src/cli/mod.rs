//! CLI module for Foco.
//!
//! This module provides the command-line interface:
//! - `commands`: Command definitions using clap derive
//! - `controls`: Line-based keyboard controls for the live timers
//! - `display`: Output formatting and display logic
//! - `runner`: Wiring of timers, store and notifications per command

pub mod commands;
pub mod controls;
pub mod display;
pub mod runner;

pub use commands::{
    BreatheArgs, Cli, Commands, NotificationsArgs, PomodoroArgs, StatsArgs, TaskAction, TasksArgs,
};
pub use controls::Control;
pub use display::Display;
