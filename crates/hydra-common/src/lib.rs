//! # Hydra Common
//!
//! Shared constants and error types used across Hydra components.
//!
//! ## Modules
//! - `constants` - Shared configuration constants
//! - `error` - Common error types

pub mod constants;
pub mod error;

pub use error::HydraError;
