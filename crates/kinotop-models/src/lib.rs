pub mod movie;
pub mod link;

pub use movie::{MovieRecord, COLUMNS};
pub use link::MovieLink;
