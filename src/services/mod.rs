mod errors;
mod item_service;

pub use errors::ItemError;
pub use item_service::ItemService;
