//! MK Ultra - terminal fighting game library
//!
//! This module exposes the simulation, editor and UI for the binaries and
//! integration tests.

pub mod ai;
pub mod app;
pub mod audio;
pub mod combat;
pub mod config;
pub mod core;
pub mod editor;
pub mod error;
pub mod fighter;
pub mod game;
pub mod input;
pub mod logging;
pub mod simulator;
pub mod stage;
pub mod ui;
pub mod utils;
