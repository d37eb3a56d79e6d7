mod in_memory_item_repository;
mod in_memory_object_store;
mod mock_embedding;
mod ort_clip_embedding;
mod static_auth;
mod supabase_auth;
mod supabase_item_repository;
mod supabase_object_store;

pub use in_memory_item_repository::*;
pub use in_memory_object_store::*;
pub use mock_embedding::*;
pub use ort_clip_embedding::*;
pub use static_auth::*;
pub use supabase_auth::*;
pub use supabase_item_repository::*;
pub use supabase_object_store::*;
