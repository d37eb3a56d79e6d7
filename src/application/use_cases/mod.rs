mod delete_item;
mod ingest_item;
mod search_items;

pub use delete_item::*;
pub use ingest_item::*;
pub use search_items::*;
