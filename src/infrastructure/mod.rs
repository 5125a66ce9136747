//! Infrastructure layer.
//!
//! Configuration loading and runtime wiring. Holds no business logic.
//!
//! # Submodules
//!
//! - [`bootstrap`] - Composition root for runtime wiring
//! - [`config`] - Configuration loading and validation

pub mod bootstrap;
pub mod config;
