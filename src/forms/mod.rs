pub mod item;

pub use item::{FieldViolation, ItemForm};
