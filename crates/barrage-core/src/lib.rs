//! Core types and definitions for the BARRAGE combat core.
//!
//! This crate defines the vocabulary shared across the other crates:
//! components, weapon tables, commands, events, tick reports and constants.
//! It contains no simulation logic.

pub mod commands;
pub mod components;
pub mod constants;
pub mod enums;
pub mod error;
pub mod events;
pub mod state;
pub mod stats;
pub mod types;
