//! # Application Layer
//!
//! Ports, use cases, and the processing-status service coordinating the domain
//! and connector layers.

pub mod interfaces;
pub mod status_registry;
pub mod use_cases;

pub use interfaces::*;
pub use status_registry::*;
pub use use_cases::*;
