//! # Connector Layer
//!
//! External integrations implementing the application ports:
//! - Embedding generation (ONNX CLIP, mock for dev/tests)
//! - Supabase auth, storage and items table (in-memory variants for dev/tests)
//! - The axum HTTP surface

pub mod adapter;
pub mod api;

pub use adapter::*;
pub use api::{build_router, Container, ContainerConfig};
