mod embedding;
mod item;
mod processing_status;
mod search_result;
mod user;

pub use embedding::*;
pub use item::*;
pub use processing_status::*;
pub use search_result::*;
pub use user::*;
