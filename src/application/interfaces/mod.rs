mod auth_service;
mod embedding_service;
mod item_repository;
mod object_store;

pub use auth_service::*;
pub use embedding_service::*;
pub use item_repository::*;
pub use object_store::*;
