//! Shared types and host adapter traits for the menugate admin menu engine.
//!
//! This crate contains the data model (menu nodes, the live menu registry)
//! and the traits through which the engine talks to its host environment.
//! Extracting these into a separate crate lets host adapters compile
//! independently of the engine itself.

pub mod error;
pub mod host;
pub mod node;
pub mod prelude;
pub mod registry;

// vim: ts=4
